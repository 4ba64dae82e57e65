use mealcycle_shared::Result;
use time::OffsetDateTime;

use crate::{Item, Meal, ScheduleSlot};

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod sqlite;

        pub use sqlite::*;
    }
}

/// Backing store the planner reads snapshots from and writes results to.
///
/// Implementations own every concern of the underlying storage: record
/// layout, marker parsing, transport. The engine only sees typed values.
#[async_trait::async_trait]
pub trait PlanStore: Send + Sync {
    async fn load_catalog(&self) -> Result<Vec<Item>>;

    async fn load_schedule(&self) -> Result<Vec<ScheduleSlot>>;

    async fn load_grocery_needed(&self) -> Result<Vec<String>>;

    /// Meals of the current plan, in display order. A missing status is pending.
    async fn load_current_plan(&self) -> Result<Vec<Meal>>;

    /// Replaces the whole current plan. Must leave the previous plan intact on failure.
    async fn persist_plan(&self, meals: &[Meal]) -> Result<()>;

    /// Point update of one item's recency marker.
    async fn touch_last_used(&self, name: &str, at: OffsetDateTime) -> Result<()>;

    /// Appends `completed` to the history log and replaces the current plan
    /// with `plan`, both or neither.
    async fn archive_completed(&self, completed: &[Meal], plan: &[Meal]) -> Result<()>;
}
