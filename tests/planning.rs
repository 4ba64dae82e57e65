use mealcycle::config::{DatabaseConfig, ObservabilityConfig, PlannerConfig};
use mealcycle::{Config, open_store};
use mealcycle_mealplan::sheet::ValueRange;
use mealcycle_mealplan::{Command, MealStatus, PlanStore};
use temp_dir::TempDir;
use time::macros::{date, datetime};

fn config(dir: &TempDir) -> Config {
    Config {
        database: DatabaseConfig {
            url: format!("sqlite:{}", dir.child("mealcycle.db").display()),
            max_connections: 1,
        },
        planner: PlannerConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

#[tokio::test]
async fn test_import_then_plan_a_day() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = open_store(&config(&dir)).await?;

    let items = ValueRange::from_json(
        r#"{"values": [
            ["name", "carb", "protein", "fruit", "veggie", "last_used"],
            ["oats", "y", "", "", "", "2024-02-01"],
            ["banana", "", "", "y", "", ""],
            ["lentils", "", "y", "", "", ""],
            ["spinach", "", "", "", "y", ""],
            ["bread", "y", "", "", "", "2024-01-15"]
        ]}"#,
    )?;
    let schedule = ValueRange::from_json(
        r#"{"values": [
            ["name", "time", "carb", "protein", "fruit", "veggie"],
            ["Breakfast", "07:30", "y", "", "y"],
            ["Dinner", "19:00", "y", "y", "", "y"]
        ]}"#,
    )?;
    store.replace_catalog(&items.records()).await?;
    store.replace_schedule(&schedule.records()).await?;

    let command = Command(store.clone());
    let report = command
        .generate(date!(2024 - 03 - 01), datetime!(2024-03-01 06:00 UTC))
        .await?;

    assert_eq!(report.meals.len(), 2);
    assert_eq!(
        report.meals[0].item_names().collect::<Vec<_>>(),
        ["banana", "bread"]
    );
    assert_eq!(
        report.meals[1].item_names().collect::<Vec<_>>(),
        ["lentils", "spinach", "oats"]
    );

    command.set_status(1, MealStatus::Completed).await?;
    assert_eq!(command.archive_completed().await?, 1);

    let plan = store.load_current_plan().await?;
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].slot_name, "Breakfast");

    Ok(())
}

#[tokio::test]
async fn test_reopening_store_keeps_plan() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config = config(&dir);

    let store = open_store(&config).await?;
    store
        .replace_schedule(&ValueRange::from_json(
            r#"{"values": [["name", "time", "carb"], ["Lunch", "12:00", "y"]]}"#,
        )?.records())
        .await?;
    store
        .replace_catalog(&ValueRange::from_json(
            r#"{"values": [["name", "carb"], ["rice", "y"]]}"#,
        )?.records())
        .await?;
    Command(store)
        .generate(date!(2024 - 03 - 01), datetime!(2024-03-01 06:00 UTC))
        .await?;

    let reopened = open_store(&config).await?;
    let plan = reopened.load_current_plan().await?;

    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].item_names().collect::<Vec<_>>(), ["rice"]);

    Ok(())
}
