use mealcycle_mealplan::{
    Categories, Category, Command, Item, MealStatus, PlanStore, ReplaceReport,
};
use mealcycle_shared::Error;
use temp_dir::TempDir;
use time::macros::{date, datetime};

mod helpers;

#[tokio::test]
async fn test_replace_item_in_stored_plan() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = helpers::setup_test_store(dir.child("db.sqlite3")).await?;
    helpers::seed_day(&store).await?;
    let command = Command(store.clone());
    command
        .generate(date!(2024 - 03 - 01), datetime!(2024-03-01 07:00 UTC))
        .await?;

    let report = command
        .replace(1, 0, datetime!(2024-03-01 12:00 UTC))
        .await?;

    let ReplaceReport::Replaced {
        removed,
        added,
        dropped,
    } = report
    else {
        panic!("expected a replacement, got {report:?}");
    };
    assert_eq!(removed.name, "burrito");
    assert_eq!(
        added.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
        ["egg", "rice"]
    );
    assert!(dropped.is_empty());

    let plan = store.load_current_plan().await?;
    assert_eq!(plan[1].item_names().collect::<Vec<_>>(), ["egg", "rice"]);
    assert_eq!(
        plan[1].items[0].categories,
        Categories::from([Category::Protein])
    );

    let catalog = store.load_catalog().await?;
    let egg = catalog.iter().find(|i| i.name == "egg").unwrap();
    assert_eq!(egg.last_used, Some(datetime!(2024-03-01 12:00 UTC)));

    Ok(())
}

#[tokio::test]
async fn test_replace_with_nothing_left() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = helpers::setup_test_store(dir.child("db.sqlite3")).await?;
    helpers::seed_day(&store).await?;
    store.set_grocery_needed("rice", true).await?;
    let command = Command(store.clone());
    command
        .generate(date!(2024 - 03 - 01), datetime!(2024-03-01 07:00 UTC))
        .await?;

    let report = command
        .replace(0, 1, datetime!(2024-03-01 12:00 UTC))
        .await?;

    assert_eq!(
        report,
        ReplaceReport::NoSuitableItem {
            needed: Categories::from([Category::Carb])
        }
    );
    let plan = store.load_current_plan().await?;
    assert_eq!(
        plan[0].item_names().collect::<Vec<_>>(),
        ["apple", "toast"]
    );

    Ok(())
}

#[tokio::test]
async fn test_completed_meal_cannot_change() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = helpers::setup_test_store(dir.child("db.sqlite3")).await?;
    helpers::seed_day(&store).await?;
    let command = Command(store.clone());
    command
        .generate(date!(2024 - 03 - 01), datetime!(2024-03-01 07:00 UTC))
        .await?;

    command.set_status(0, MealStatus::Completed).await?;

    assert!(matches!(
        command.set_status(0, MealStatus::Skipped).await,
        Err(Error::InvalidTransition { .. })
    ));
    assert!(matches!(
        command.replace(0, 0, datetime!(2024-03-01 12:00 UTC)).await,
        Err(Error::Server(_))
    ));

    let plan = store.load_current_plan().await?;
    assert_eq!(plan[0].status, MealStatus::Completed);
    assert_eq!(plan[1].status, MealStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn test_stored_meal_defaults() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = helpers::setup_test_store(dir.child("db.sqlite3")).await?;
    sqlx::query(
        "INSERT INTO current_meal (position, date, slot_name, item1) VALUES (0, 'someday', 'Lunch', 'mystery')",
    )
    .execute(&store.write_db)
    .await?;

    let plan = store.load_current_plan().await?;

    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].status, MealStatus::Pending);
    assert_eq!(plan[0].date, date!(1970 - 01 - 01));
    assert_eq!(plan[0].items, vec![Item::new("mystery", [])]);

    let command = Command(store);
    let report = command
        .generate(date!(2024 - 03 - 01), datetime!(2024-03-01 07:00 UTC))
        .await?;
    assert!(!report.reused_existing);

    Ok(())
}
