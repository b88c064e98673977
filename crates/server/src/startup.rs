use std::net::SocketAddr;

use axum::Router;
use common::env::check_static_dir;
use configs::AppConfig;
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;

use crate::routes;
use crate::state::AppState;

/// Resolves on Ctrl+C; a failing signal handler shuts down immediately.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl_c handler failed");
    }
    info!(event = "shutdown_signal", "shutting down");
}

/// Connect, migrate if configured, build the router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!(event = "migrations_applied", "database schema up to date");
    }

    let static_dir = match cfg.server.static_dir.as_deref() {
        Some(dir) if check_static_dir(dir).await => Some(dir),
        _ => None,
    };
    let cors = routes::build_cors(&cfg.server.cors_origins);
    Ok(routes::build_router(AppState::new(db), cors, static_dir))
}

/// Public entry: build the app and serve until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = cfg.bind_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, event = "listening", "starting server");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!(event = "stopped", "server stopped");
    Ok(())
}
