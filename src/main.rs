use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use idealiza::db::{IdealizadoresStorage, connect};
use idealiza::router::{AppState, app_router};
use idealiza::service::BcryptHasher;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &idealiza::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        bcrypt_cost = cfg.bcrypt_cost,
        max_connections = cfg.max_connections
    );

    let pool = connect(&cfg.database_url, cfg.max_connections).await?;
    let storage = IdealizadoresStorage::new(pool);
    // Schema must exist before the first request is accepted.
    storage.init_schema().await?;
    info!("database schema ready");

    let state = AppState::new(storage, Arc::new(BcryptHasher::new(cfg.bcrypt_cost)));
    let app = app_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
