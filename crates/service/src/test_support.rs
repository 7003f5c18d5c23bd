#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::{Mutex, MutexGuard, OnceCell};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();
// Seeding wipes the table, so database tests take turns
static DB_LOCK: Mutex<()> = Mutex::const_new(());

pub async fn db_guard() -> MutexGuard<'static, ()> {
    DB_LOCK.lock().await
}

/// `None` when `SKIP_DB_TESTS` is set or no `DATABASE_URL` is available.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("skip: DATABASE_URL missing");
        return Ok(None);
    };

    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_try_init(|| async {
            let db = models::db::connect(&url).await?;
            migration::Migrator::up(&db, None).await?;
            db.close().await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;

    // Return a fresh connection for the current test's runtime
    Ok(Some(models::db::connect(&url).await?))
}
