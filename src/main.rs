use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mealcycle_mealplan::MealStatus;

mod cli;

use cli::grocery::GroceryAction;
use cli::import::Sheet;

/// mealcycle - daily meals from a rotating item catalog
#[derive(Parser)]
#[command(name = "mealcycle")]
#[command(about = "Plans each day's meals from the least recently used items", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database if needed and run migrations
    Migrate,
    /// Load a sheet export (spreadsheet values JSON)
    Import {
        #[arg(value_enum)]
        sheet: Sheet,
        file: PathBuf,
    },
    /// Generate today's plan unless one already exists
    Generate,
    /// Print the current plan
    Show,
    /// Replace one item of a meal
    Replace {
        /// Meal number, as printed by `show`
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        meal: u64,
        /// Item number within the meal
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        item: u64,
    },
    /// Mark a meal as eaten
    Complete {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        meal: u64,
    },
    /// Mark a meal as skipped
    Skip {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        meal: u64,
    },
    /// Move completed meals into history
    Archive,
    /// Print archived meals, most recent first
    History {
        #[arg(long, default_value_t = 20)]
        limit: u64,
    },
    /// Put an item on the grocery list or take it off
    Grocery {
        #[arg(value_enum)]
        action: GroceryAction,
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = mealcycle::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mealcycle::observability::init_observability(
        "mealcycle",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Migrate => migrate_command(config).await,
        Commands::Import { sheet, file } => cli::import::import(config, sheet, file).await,
        Commands::Generate => cli::plan::generate(config).await,
        Commands::Show => cli::plan::show(config).await,
        Commands::Replace { meal, item } => {
            cli::plan::replace(config, (meal - 1) as usize, (item - 1) as usize).await
        }
        Commands::Complete { meal } => {
            cli::plan::set_status(config, (meal - 1) as usize, MealStatus::Completed).await
        }
        Commands::Skip { meal } => {
            cli::plan::set_status(config, (meal - 1) as usize, MealStatus::Skipped).await
        }
        Commands::Archive => cli::plan::archive(config).await,
        Commands::History { limit } => cli::plan::history(config, limit).await,
        Commands::Grocery { action, name } => cli::grocery::grocery(config, action, name).await,
    }
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: mealcycle::Config) -> Result<()> {
    tracing::info!("Migrating {}", config.database.url);

    let pool = mealcycle::create_pool(&config.database.url, 1).await?;
    mealcycle::migrate(&pool).await?;

    tracing::info!("Database migrated");

    Ok(())
}
