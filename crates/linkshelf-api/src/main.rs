//! linkshelf-api - HTTP API server for linkshelf

use std::net::SocketAddr;

use tracing::{info, warn};

use linkshelf_api::{build_app, error::set_development_mode, AppState, ServerConfig};
use linkshelf_crypto::TokenSigner;
use linkshelf_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = linkshelf_api::telemetry::init_tracing();

    let config = ServerConfig::from_env()?;
    set_development_mode(config.development);

    let db = Database::connect_with_config(&config.database_url, config.pool_config()).await?;
    info!("Connected to database");

    db.ensure_schema().await?;
    if config.seed_defaults {
        let report = db.seed_defaults().await;
        if !report.is_clean() {
            warn!(failed_steps = ?report.failed_steps, "Default data seeding incomplete");
        }
    }

    let signer = TokenSigner::new(&config.jwt_secret, config.token_ttl)?;
    let state = AppState::new(db.clone(), signer);
    let app = build_app(state, config.cors_origins());

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, closing database pool");
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
