//! # Vitrine Server
//!
//! Binary entry point: loads configuration, connects to the catalog
//! database and serves the HTTP API.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitrine_core::SqliteDatabase;
use vitrine_server::{AppState, create_app, infra::config::Config};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "vitrine-server")]
#[command(about = "Product catalog API with image upload and resizing")]
struct Cli {
    /// Server port (overrides PORT / SERVER_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// SQLite connection string, e.g. sqlite://database.sqlite
    #[arg(long)]
    database_url: Option<String>,

    /// Directory holding uploaded and processed images
    #[arg(long)]
    uploads_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.server_port = port;
    }
    if let Some(host) = cli.host {
        config.server_host = host;
    }
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }
    if let Some(uploads_dir) = cli.uploads_dir {
        config.uploads_dir = uploads_dir;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.env_file_loaded {
        info!("loaded .env file");
    }

    config.ensure_directories()?;
    let config = Arc::new(config);

    let database = SqliteDatabase::connect(&config.database_url)
        .await
        .with_context(|| {
            format!("failed to open database {}", config.database_url)
        })?;

    let state = AppState::new(Arc::clone(&config), database.products());
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind((
        config.server_host.as_str(),
        config.server_port,
    ))
    .await
    .with_context(|| {
        format!(
            "failed to bind {}:{}",
            config.server_host, config.server_port
        )
    })?;

    info!(
        "Starting Vitrine catalog server on {}",
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;

    Ok(())
}
