use anyhow::Result;
use mealcycle_mealplan::SqliteStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use sqlx_migrator::{Migrate, Plan};
use std::str::FromStr;
use tracing::log::LevelFilter;

use crate::Config;

/// Configure SQLite PRAGMAs
///
/// - WAL mode lets reads proceed during a write
/// - busy_timeout reduces SQLITE_BUSY errors
/// - synchronous=NORMAL is safe with WAL
async fn configure_pragmas(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA temp_store = memory")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create a pool, creating the database file if it does not exist yet
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .log_statements(LevelFilter::Debug);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    configure_pragmas(&pool).await?;

    tracing::debug!("Created pool with {} max connections", max_connections);

    Ok(pool)
}

/// Apply every pending migration
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    let mut conn = pool.acquire().await?;
    mealcycle_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(())
}

/// Open the configured database, migrated and ready to plan against
pub async fn open_store(config: &Config) -> Result<SqliteStore> {
    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    migrate(&pool).await?;

    Ok(SqliteStore::new(pool.clone(), pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_applies_pragmas() -> anyhow::Result<()> {
        let pool = create_pool("sqlite::memory:", 1).await?;

        let journal_mode: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await?;
        assert_eq!(journal_mode.0, "memory");

        let temp_store: (i32,) = sqlx::query_as("PRAGMA temp_store")
            .fetch_one(&pool)
            .await?;
        assert_eq!(temp_store.0, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_migrate_is_repeatable() -> anyhow::Result<()> {
        let dir = temp_dir::TempDir::new()?;
        let url = format!("sqlite:{}", dir.child("db.sqlite3").display());
        let pool = create_pool(&url, 1).await?;

        migrate(&pool).await?;
        migrate(&pool).await?;

        let tables: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'current_meal'",
        )
        .fetch_one(&pool)
        .await?;
        assert_eq!(tables.0, 1);

        Ok(())
    }
}
