use std::sync::Arc;

use axum::extract::Request;
use axum::{Router, ServiceExt};
use configs::AppConfig;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePath;
use tracing::{error, info, warn};

use crate::routes::{self, AppState};
use service::{CountService, SeaOrmCountRepository};

/// Any origin, any method, any header.
pub fn build_cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// The router behind trailing-slash normalization.
pub type App = NormalizePath<Router>;

/// Assemble the application around an already-built service.
/// `/api/counts/` and `/api/counts/5/` route like `/api/counts` and `/api/counts/5`.
pub fn build_app(counts: CountService) -> App {
    // must wrap the router from outside: Router::layer runs after route matching
    NormalizePath::trim_trailing_slash(routes::build_router(AppState::new(counts), build_cors()))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(event = "shutdown_signal", signal = "SIGINT", "closing HTTP server"),
        _ = terminate => info!(event = "shutdown_signal", signal = "SIGTERM", "closing HTTP server"),
    }
}

/// Public entry: connect storage, build the app and serve until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&config.database).await?;

    let served = serve(&config, &db).await;

    // the pool is released on both the clean and the failed path
    if let Err(e) = db.close().await {
        error!(error = %e, "failed to close database pool");
    }
    served
}

async fn serve(config: &AppConfig, db: &DatabaseConnection) -> anyhow::Result<()> {
    if config.database.run_migrations {
        migration::Migrator::up(db, None).await?;
        info!(event = "migrations_applied", "database schema is up to date");
    }

    let repo = Arc::new(SeaOrmCountRepository::new(db.clone()));
    let app = build_app(CountService::new(repo));

    let addr = config.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server is running on port {}", addr.port());

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(event = "http_closed", "HTTP server closed");
    Ok(())
}
