use std::path::PathBuf;

use anyhow::Context;
use clap::ValueEnum;
use mealcycle_mealplan::sheet::ValueRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sheet {
    Items,
    Schedule,
    Grocery,
}

#[tracing::instrument(skip(config))]
pub async fn import(config: mealcycle::Config, sheet: Sheet, file: PathBuf) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let range = ValueRange::from_json(&json)
        .with_context(|| format!("{} is not a values export", file.display()))?;

    if let Some(range) = &range.range {
        tracing::debug!("importing range {range}");
    }

    let store = mealcycle::open_store(&config).await?;

    let count = match sheet {
        Sheet::Items => store.replace_catalog(&range.records()).await?,
        Sheet::Schedule => store.replace_schedule(&range.records()).await?,
        Sheet::Grocery => {
            let names = range
                .rows()
                .into_iter()
                .skip(1)
                .filter_map(|row| row.into_iter().next())
                .collect::<Vec<_>>();

            store.replace_grocery_needed(&names).await?
        }
    };

    println!("imported {count} rows");

    Ok(())
}
