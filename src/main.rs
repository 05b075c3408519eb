use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use remixblog::cli::{self, commands, Cli, Commands};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remixblog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init().await,
        Commands::Serve { host, port } => commands::serve(host, port).await,
        Commands::Migrate => commands::migrate().await,
        Commands::Posts { format } => commands::posts(format).await,
    };

    // A missing SESSION_SECRET lands here before any socket is bound
    if let Err(e) = result {
        cli::error(&e.to_string());
        std::process::exit(1);
    }
}
