mod current_meal;
mod grocery_needed;
mod item;
mod meal_history;
mod schedule_slot;

use sqlx_migrator::vec_box;

pub struct M0001;

sqlx_migrator::sqlite_migration!(
    M0001,
    "mealcycle",
    "m0001",
    vec_box![],
    vec_box![
        item::Operation,
        schedule_slot::Operation,
        grocery_needed::Operation,
        current_meal::Operation,
        meal_history::Operation
    ]
);
