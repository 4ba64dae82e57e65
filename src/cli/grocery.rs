use clap::ValueEnum;
use mealcycle_mealplan::PlanStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroceryAction {
    /// The item ran out: keep it out of plans
    Need,
    /// The item is back in stock
    Have,
}

#[tracing::instrument(skip(config))]
pub async fn grocery(
    config: mealcycle::Config,
    action: GroceryAction,
    name: String,
) -> anyhow::Result<()> {
    let store = mealcycle::open_store(&config).await?;

    store
        .set_grocery_needed(name.trim(), action == GroceryAction::Need)
        .await?;

    let needed = store.load_grocery_needed().await?;
    if needed.is_empty() {
        println!("grocery list is empty");
    } else {
        println!("grocery list: {}", needed.join(", "));
    }

    Ok(())
}
