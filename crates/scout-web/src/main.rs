//! Scout Web Server
//!
//! Run with: cargo run -p scout-web

use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scout=debug,tower_http=info,info")),
        )
        .init();

    info!("Starting Scout web server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Missing API key or bad values stop startup here.
    let config = scout_config::Config::load()?;
    let addr = config.bind_addr()?;

    let state = scout_web::state::AppState::from_config(&config)?;
    let app = scout_web::router::build_router(state, config.server.static_dir.as_deref());

    if let Some(dir) = &config.server.static_dir {
        info!("Serving front-end from {}", dir.display());
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
