use std::{path::PathBuf, str::FromStr};

use mealcycle_mealplan::SqliteStore;
use mealcycle_mealplan::sheet::{Record, records_from_values};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_store(path: PathBuf) -> anyhow::Result<SqliteStore> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    mealcycle_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(SqliteStore::new(pool.clone(), pool))
}

pub fn records(rows: &[&[&str]]) -> Vec<Record> {
    let values = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect::<Vec<Vec<String>>>();

    records_from_values(&values)
}

#[allow(dead_code)]
pub async fn seed_day(store: &SqliteStore) -> anyhow::Result<()> {
    store
        .replace_catalog(&records(&[
            &["name", "carb", "protein", "fruit", "veggie", "last_used"],
            &["rice", "y", "", "", "", "2024-02-20T12:00:00Z"],
            &["toast", "y", "", "", "", "02/01/2024"],
            &["egg", "", "y", "", "", ""],
            &["apple", "", "", "y", "", "never"],
            &["burrito", "y", "y", "", "", "2024-02-25"],
        ]))
        .await?;

    store
        .replace_schedule(&records(&[
            &["Name", "Time", "Carb", "Protein", "Fruit", "Veggie"],
            &["Breakfast", "08:00", "y", "", "y", ""],
            &["Lunch", "12:30", "y", "y", "", ""],
            &["Tea", "16:00", "", "", "", ""],
        ]))
        .await?;

    Ok(())
}
