use std::collections::BTreeSet;

use mealcycle_db::table::{
    CurrentMeal, GroceryNeeded, Item as ItemTable, MealHistory, ScheduleSlot as ScheduleTable,
};
use mealcycle_shared::Result;
use sea_query::{Expr, ExprTrait, OnConflict, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqlitePool, prelude::FromRow};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::sheet::{Fields, Record, flag, item_from_record, slot_from_record};
use crate::{Category, Item, Meal, MealStatus, PlanStore, ScheduleSlot};

#[derive(Debug, Default, FromRow)]
pub struct ItemRow {
    pub name: String,
    pub carb: String,
    pub protein: String,
    pub fruit: String,
    pub veggie: String,
    pub last_used: String,
}

impl Fields for ItemRow {
    fn field(&self, name: &str) -> &str {
        match name {
            "name" => &self.name,
            "carb" => &self.carb,
            "protein" => &self.protein,
            "fruit" => &self.fruit,
            "veggie" => &self.veggie,
            "last_used" => &self.last_used,
            _ => "",
        }
    }
}

#[derive(Debug, Default, FromRow)]
pub struct ScheduleRow {
    pub position: i64,
    pub name: String,
    pub time: String,
    pub carb: String,
    pub protein: String,
    pub fruit: String,
    pub veggie: String,
}

impl Fields for ScheduleRow {
    fn field(&self, name: &str) -> &str {
        match name {
            "name" => &self.name,
            "time" => &self.time,
            "carb" => &self.carb,
            "protein" => &self.protein,
            "fruit" => &self.fruit,
            "veggie" => &self.veggie,
            _ => "",
        }
    }
}

#[derive(Debug, Default, FromRow)]
pub struct MealRow {
    pub position: i64,
    pub date: String,
    pub slot_name: String,
    pub time: String,
    pub item1: String,
    pub item2: String,
    pub item3: String,
    pub item4: String,
    pub status: Option<String>,
}

impl MealRow {
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        [&self.item1, &self.item2, &self.item3, &self.item4]
            .into_iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Default, FromRow)]
pub struct HistoryRow {
    pub id: i64,
    pub date: String,
    pub slot_name: String,
    pub time: String,
    pub item1: String,
    pub item2: String,
    pub item3: String,
    pub item4: String,
    pub status: String,
    pub archived_at: String,
}

impl HistoryRow {
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        [&self.item1, &self.item2, &self.item3, &self.item4]
            .into_iter()
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// SQLite-backed [`PlanStore`], one table per sheet.
#[derive(Clone)]
pub struct SqliteStore {
    pub read_db: SqlitePool,
    pub write_db: SqlitePool,
}

impl SqliteStore {
    pub fn new(read_db: SqlitePool, write_db: SqlitePool) -> Self {
        Self { read_db, write_db }
    }

    /// Replaces the whole catalog. Returns how many items were written.
    pub async fn replace_catalog(&self, records: &[Record]) -> Result<usize> {
        let mut seen = BTreeSet::new();
        let items = records
            .iter()
            .filter_map(item_from_record)
            .filter(|item| seen.insert(item.name.to_owned()))
            .collect::<Vec<_>>();

        let mut tx = self.write_db.begin().await?;

        let statement = Query::delete().from_table(ItemTable::Table).to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if !items.is_empty() {
            let mut statement = Query::insert()
                .into_table(ItemTable::Table)
                .columns([
                    ItemTable::Name,
                    ItemTable::Carb,
                    ItemTable::Protein,
                    ItemTable::Fruit,
                    ItemTable::Veggie,
                    ItemTable::LastUsed,
                ])
                .to_owned();

            for item in &items {
                let last_used = match item.last_used {
                    Some(at) => at.format(&Rfc3339)?,
                    None => String::new(),
                };

                statement.values_panic([
                    item.name.to_owned().into(),
                    flag(&item.categories, Category::Carb).into(),
                    flag(&item.categories, Category::Protein).into(),
                    flag(&item.categories, Category::Fruit).into(),
                    flag(&item.categories, Category::Veggie).into(),
                    last_used.into(),
                ]);
            }

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::info!(count = items.len(), "catalog replaced");

        Ok(items.len())
    }

    /// Replaces the schedule, keeping record order as slot order.
    pub async fn replace_schedule(&self, records: &[Record]) -> Result<usize> {
        let mut seen = BTreeSet::new();
        let slots = records
            .iter()
            .filter_map(slot_from_record)
            .filter(|slot| seen.insert(slot.name.to_owned()))
            .collect::<Vec<_>>();

        let mut tx = self.write_db.begin().await?;

        let statement = Query::delete().from_table(ScheduleTable::Table).to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if !slots.is_empty() {
            let mut statement = Query::insert()
                .into_table(ScheduleTable::Table)
                .columns([
                    ScheduleTable::Position,
                    ScheduleTable::Name,
                    ScheduleTable::Time,
                    ScheduleTable::Carb,
                    ScheduleTable::Protein,
                    ScheduleTable::Fruit,
                    ScheduleTable::Veggie,
                ])
                .to_owned();

            for (position, slot) in slots.iter().enumerate() {
                statement.values_panic([
                    (position as i64).into(),
                    slot.name.to_owned().into(),
                    slot.time.to_owned().into(),
                    flag(&slot.required, Category::Carb).into(),
                    flag(&slot.required, Category::Protein).into(),
                    flag(&slot.required, Category::Fruit).into(),
                    flag(&slot.required, Category::Veggie).into(),
                ]);
            }

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::info!(count = slots.len(), "schedule replaced");

        Ok(slots.len())
    }

    pub async fn replace_grocery_needed(&self, names: &[String]) -> Result<usize> {
        let names = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect::<BTreeSet<_>>();

        let mut tx = self.write_db.begin().await?;

        let statement = Query::delete().from_table(GroceryNeeded::Table).to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if !names.is_empty() {
            let mut statement = Query::insert()
                .into_table(GroceryNeeded::Table)
                .columns([GroceryNeeded::Name])
                .to_owned();

            for name in &names {
                statement.values_panic([name.to_string().into()]);
            }

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        Ok(names.len())
    }

    /// Adds `name` to the grocery list when `needed`, removes it otherwise.
    pub async fn set_grocery_needed(&self, name: &str, needed: bool) -> Result<()> {
        let (sql, values) = if needed {
            Query::insert()
                .into_table(GroceryNeeded::Table)
                .columns([GroceryNeeded::Name])
                .values_panic([name.to_owned().into()])
                .on_conflict(OnConflict::column(GroceryNeeded::Name).do_nothing().to_owned())
                .to_owned()
                .build_sqlx(SqliteQueryBuilder)
        } else {
            Query::delete()
                .from_table(GroceryNeeded::Table)
                .and_where(Expr::col(GroceryNeeded::Name).eq(name))
                .to_owned()
                .build_sqlx(SqliteQueryBuilder)
        };

        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        Ok(())
    }

    /// Most recently archived meals first.
    pub async fn load_history(&self, limit: u64) -> Result<Vec<HistoryRow>> {
        let statement = Query::select()
            .columns([
                MealHistory::Id,
                MealHistory::Date,
                MealHistory::SlotName,
                MealHistory::Time,
                MealHistory::Item1,
                MealHistory::Item2,
                MealHistory::Item3,
                MealHistory::Item4,
                MealHistory::Status,
                MealHistory::ArchivedAt,
            ])
            .from(MealHistory::Table)
            .order_by(MealHistory::Id, Order::Desc)
            .limit(limit)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, HistoryRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }
}

#[async_trait::async_trait]
impl PlanStore for SqliteStore {
    async fn load_catalog(&self) -> Result<Vec<Item>> {
        let statement = Query::select()
            .columns([
                ItemTable::Name,
                ItemTable::Carb,
                ItemTable::Protein,
                ItemTable::Fruit,
                ItemTable::Veggie,
                ItemTable::LastUsed,
            ])
            .from(ItemTable::Table)
            .order_by(ItemTable::Name, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, ItemRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(rows.iter().filter_map(item_from_record).collect())
    }

    async fn load_schedule(&self) -> Result<Vec<ScheduleSlot>> {
        let statement = Query::select()
            .columns([
                ScheduleTable::Position,
                ScheduleTable::Name,
                ScheduleTable::Time,
                ScheduleTable::Carb,
                ScheduleTable::Protein,
                ScheduleTable::Fruit,
                ScheduleTable::Veggie,
            ])
            .from(ScheduleTable::Table)
            .order_by(ScheduleTable::Position, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, ScheduleRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(rows.iter().filter_map(slot_from_record).collect())
    }

    async fn load_grocery_needed(&self) -> Result<Vec<String>> {
        let statement = Query::select()
            .columns([GroceryNeeded::Name])
            .from(GroceryNeeded::Table)
            .order_by(GroceryNeeded::Name, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn load_current_plan(&self) -> Result<Vec<Meal>> {
        let statement = Query::select()
            .columns([
                CurrentMeal::Position,
                CurrentMeal::Date,
                CurrentMeal::SlotName,
                CurrentMeal::Time,
                CurrentMeal::Item1,
                CurrentMeal::Item2,
                CurrentMeal::Item3,
                CurrentMeal::Item4,
                CurrentMeal::Status,
            ])
            .from(CurrentMeal::Table)
            .order_by(CurrentMeal::Position, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, MealRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        if rows.is_empty() {
            return Ok(vec![]);
        }

        let catalog = self.load_catalog().await?;

        Ok(rows
            .iter()
            .map(|row| Meal {
                date: parse_date(&row.date),
                slot_name: row.slot_name.to_owned(),
                time: row.time.to_owned(),
                items: row
                    .item_names()
                    .map(|name| {
                        catalog
                            .iter()
                            .find(|item| item.name == name)
                            .cloned()
                            .unwrap_or_else(|| Item::new(name, []))
                    })
                    .collect(),
                status: row
                    .status
                    .as_deref()
                    .map(MealStatus::parse_lenient)
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn persist_plan(&self, meals: &[Meal]) -> Result<()> {
        let mut tx = self.write_db.begin().await?;
        write_plan(&mut *tx, meals).await?;
        tx.commit().await?;

        tracing::debug!(meals = meals.len(), "plan persisted");

        Ok(())
    }

    async fn touch_last_used(&self, name: &str, at: OffsetDateTime) -> Result<()> {
        let statement = Query::update()
            .table(ItemTable::Table)
            .values([(ItemTable::LastUsed, at.format(&Rfc3339)?.into())])
            .and_where(Expr::col(ItemTable::Name).eq(name))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(item = name, "touched item is not in the catalog");
        }

        Ok(())
    }

    async fn archive_completed(&self, completed: &[Meal], plan: &[Meal]) -> Result<()> {
        let mut tx = self.write_db.begin().await?;
        write_history(&mut *tx, completed).await?;
        write_plan(&mut *tx, plan).await?;
        tx.commit().await?;

        tracing::debug!(
            archived = completed.len(),
            meals = plan.len(),
            "meals archived"
        );

        Ok(())
    }
}

async fn write_plan(conn: &mut SqliteConnection, meals: &[Meal]) -> Result<()> {
    let statement = Query::delete().from_table(CurrentMeal::Table).to_owned();
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    if meals.is_empty() {
        return Ok(());
    }

    let mut statement = Query::insert()
        .into_table(CurrentMeal::Table)
        .columns([
            CurrentMeal::Position,
            CurrentMeal::Date,
            CurrentMeal::SlotName,
            CurrentMeal::Time,
            CurrentMeal::Item1,
            CurrentMeal::Item2,
            CurrentMeal::Item3,
            CurrentMeal::Item4,
            CurrentMeal::Status,
        ])
        .to_owned();

    for (position, meal) in meals.iter().enumerate() {
        let [item1, item2, item3, item4] = item_columns(meal);

        statement.values_panic([
            (position as i64).into(),
            format_date(meal.date)?.into(),
            meal.slot_name.to_owned().into(),
            meal.time.to_owned().into(),
            item1.into(),
            item2.into(),
            item3.into(),
            item4.into(),
            meal.status.to_string().into(),
        ]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    Ok(())
}

async fn write_history(conn: &mut SqliteConnection, meals: &[Meal]) -> Result<()> {
    if meals.is_empty() {
        return Ok(());
    }

    let archived_at = OffsetDateTime::now_utc().format(&Rfc3339)?;
    let mut statement = Query::insert()
        .into_table(MealHistory::Table)
        .columns([
            MealHistory::Date,
            MealHistory::SlotName,
            MealHistory::Time,
            MealHistory::Item1,
            MealHistory::Item2,
            MealHistory::Item3,
            MealHistory::Item4,
            MealHistory::Status,
            MealHistory::ArchivedAt,
        ])
        .to_owned();

    for meal in meals {
        let [item1, item2, item3, item4] = item_columns(meal);

        statement.values_panic([
            format_date(meal.date)?.into(),
            meal.slot_name.to_owned().into(),
            meal.time.to_owned().into(),
            item1.into(),
            item2.into(),
            item3.into(),
            item4.into(),
            meal.status.to_string().into(),
            archived_at.to_owned().into(),
        ]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    Ok(())
}

fn item_columns(meal: &Meal) -> [String; 4] {
    std::array::from_fn(|i| {
        meal.items
            .get(i)
            .map(|item| item.name.to_owned())
            .unwrap_or_default()
    })
}

fn format_date(date: Date) -> Result<String> {
    Ok(date.format(format_description!("[year]-[month]-[day]"))?)
}

/// A date that cannot be read sorts as the epoch, which always forces a new plan.
fn parse_date(raw: &str) -> Date {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .unwrap_or(OffsetDateTime::UNIX_EPOCH.date())
}
