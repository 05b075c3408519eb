//! CLI interface for remixblog

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "remixblog")]
#[command(version)]
#[command(about = "A small server-rendered blog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default remixblog.toml in the current directory
    Init,

    /// Start the web server
    Serve {
        /// Host to bind to (defaults to server.host from the config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to server.port from the config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the database tables
    Migrate,

    /// List posts
    Posts {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
