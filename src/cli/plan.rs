use mealcycle_mealplan::{
    Command, Meal, MealStatus, PlanStore, ReplaceReport, SkipReason, describe,
};

fn print_meals(meals: &[Meal]) {
    if meals.is_empty() {
        println!("no meals planned");
        return;
    }

    for (position, meal) in meals.iter().enumerate() {
        println!(
            "{}. {} {} [{}]",
            position + 1,
            meal.slot_name,
            meal.time,
            meal.status
        );

        for (index, item) in meal.items.iter().enumerate() {
            println!(
                "   {}) {} ({})",
                index + 1,
                item.name,
                describe(&item.categories)
            );
        }
    }
}

#[tracing::instrument(skip(config))]
pub async fn generate(config: mealcycle::Config) -> anyhow::Result<()> {
    let tz = config.planner.timezone.as_str();
    let command = Command(mealcycle::open_store(&config).await?);

    let report = command
        .generate(mealcycle_shared::today(tz), mealcycle_shared::now(tz))
        .await?;

    if report.reused_existing {
        println!("today's plan already exists");
    }

    print_meals(&report.meals);

    for skipped in &report.skipped {
        match &skipped.reason {
            SkipReason::EmptyRequirement => {}
            SkipReason::NoCoverage { uncovered } => println!(
                "skipped {}: no suitable items for {}",
                skipped.slot_name,
                describe(uncovered)
            ),
        }
    }

    Ok(())
}

pub async fn show(config: mealcycle::Config) -> anyhow::Result<()> {
    let store = mealcycle::open_store(&config).await?;
    let meals = store.load_current_plan().await?;

    if let Some(meal) = meals.first() {
        println!("plan for {}", meal.date);
    }

    print_meals(&meals);

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn replace(config: mealcycle::Config, meal: usize, item: usize) -> anyhow::Result<()> {
    let now = mealcycle_shared::now(config.planner.timezone.as_str());
    let command = Command(mealcycle::open_store(&config).await?);

    match command.replace(meal, item, now).await? {
        ReplaceReport::Removed { item } => {
            println!("removed {}, the rest of the meal already covers it", item.name);
        }
        ReplaceReport::Replaced {
            removed,
            added,
            dropped,
        } => {
            let added = added.iter().map(|i| i.name.as_str()).collect::<Vec<_>>();
            println!("replaced {} with {}", removed.name, added.join(", "));

            if !dropped.is_empty() {
                let dropped = dropped.iter().map(|i| i.name.as_str()).collect::<Vec<_>>();
                println!("dropped {} to stay within the item limit", dropped.join(", "));
            }
        }
        ReplaceReport::NoSuitableItem { needed } => {
            println!("no suitable item for {}", describe(&needed));
        }
    }

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn set_status(
    config: mealcycle::Config,
    meal: usize,
    status: MealStatus,
) -> anyhow::Result<()> {
    let command = Command(mealcycle::open_store(&config).await?);
    let meal = command.set_status(meal, status).await?;

    println!("{} is {}", meal.slot_name, meal.status);

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn archive(config: mealcycle::Config) -> anyhow::Result<()> {
    let command = Command(mealcycle::open_store(&config).await?);
    let count = command.archive_completed().await?;

    println!("archived {count} meals");

    Ok(())
}

pub async fn history(config: mealcycle::Config, limit: u64) -> anyhow::Result<()> {
    let store = mealcycle::open_store(&config).await?;

    for row in store.load_history(limit).await? {
        println!(
            "{} {} {} [{}]: {}",
            row.date,
            row.slot_name,
            row.time,
            row.status,
            row.item_names().collect::<Vec<_>>().join(", ")
        );
    }

    Ok(())
}
