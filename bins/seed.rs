//! Reset the `count` table to the fixed demo rows and print them.
use std::sync::Arc;

use dotenvy::dotenv;
use migration::MigratorTrait;
use models::Count;
use sea_orm::DatabaseConnection;
use service::{CountService, SeaOrmCountRepository};
use tracing::{error, info};

async fn seed(cfg: configs::AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;

    let outcome = reset(&cfg, &db).await;
    let closed = db.close().await;

    // the seed failure is the one worth reporting; a close failure only when seeding worked
    let rows = outcome?;
    closed?;

    info!(event = "seed_done", rows = rows.len(), "seeded counts");
    for (i, row) in rows.iter().enumerate() {
        info!(
            "[{}] ID: {}, Value: {}, Updated: {}",
            i + 1,
            row.id,
            row.value,
            row.updated_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        );
    }
    Ok(())
}

async fn reset(cfg: &configs::AppConfig, db: &DatabaseConnection) -> anyhow::Result<Vec<Count>> {
    if cfg.database.run_migrations {
        migration::Migrator::up(db, None).await?;
    }
    let counts = CountService::new(Arc::new(SeaOrmCountRepository::new(db.clone())));
    Ok(counts.seed_counts().await?)
}

fn main() -> std::process::ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "seed", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "seed", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    match rt.block_on(seed(cfg)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "seed", event = "seed_failed", error = %e, "seeding failed");
            std::process::ExitCode::FAILURE
        }
    }
}
