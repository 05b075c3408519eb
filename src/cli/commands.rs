//! CLI command implementations

use anyhow::Result;
use std::fs;

use crate::api;
use crate::cli::{info, print_post_table, success, warn, OutputFormat, PostRow};
use crate::config::{self, Config};
use crate::store::{self, PostgresStore, SharedStore};

/// Initialize a new remixblog.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("remixblog.toml");

    if config_path.exists() {
        warn("remixblog.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created remixblog.toml");
    info("Set SESSION_SECRET and run 'remixblog serve' to start the blog");

    Ok(())
}

/// Start the web server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    api::run_server(config, &host, port).await?;
    Ok(())
}

/// Create the database tables
pub async fn migrate() -> Result<()> {
    let config = load_config()?;

    let Some(url) = config.database.postgres_url() else {
        warn("No database.url configured; the in-memory store needs no migration");
        return Ok(());
    };

    let store = PostgresStore::connect(url).await?;
    store.migrate().await?;
    success("Database schema is up to date");
    Ok(())
}

/// List posts
pub async fn posts(format: OutputFormat) -> Result<()> {
    let config = load_config()?;

    let Some(store) = open_post_store(&config).await? else {
        warn("No database.url configured; posts only live inside a running server");
        return Ok(());
    };

    let posts = store.list_posts().await?;

    match format {
        OutputFormat::Table => {
            let mut rows = Vec::with_capacity(posts.len());
            for post in posts {
                let author = store
                    .find_user_by_id(&post.user_id)
                    .await?
                    .map(|u| u.username);
                rows.push(PostRow { post, author });
            }
            print_post_table(&rows);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&posts)?;
            println!("{}", json);
        }
    }

    Ok(())
}

// Helper functions

/// The configured persistent store, or `None` when only the in-memory store
/// is available
async fn open_post_store(config: &Config) -> Result<Option<SharedStore>> {
    if config.database.postgres_url().is_none() {
        return Ok(None);
    }
    Ok(Some(store::connect(&config.database).await?))
}

fn load_config() -> Result<Config> {
    config::load_config().map_err(|e| anyhow::anyhow!("{}", e))
}
