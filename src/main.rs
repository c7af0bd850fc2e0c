use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use classfolio::config::{Cli, Config};
use classfolio::state::AppState;
use classfolio::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args / environment and load config
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    std::fs::create_dir_all(config.uploads_path())?;

    // Initialize database
    let pool = db::create_pool(&config.db_path())?;
    db::run_migrations(&pool)?;
    db::seed_roster(&pool)?;
    tracing::info!("Database: {}", config.db_path().display());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = routes::router(AppState::new(pool, config));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
