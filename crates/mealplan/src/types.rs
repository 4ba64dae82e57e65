use mealcycle_shared::{Error, Result};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::{Date, OffsetDateTime};

use crate::{Categories, Category, MAX_ITEMS_PER_MEAL};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub categories: Categories,
    /// `None` when the item was never used or its history could not be read.
    pub last_used: Option<OffsetDateTime>,
}

impl Item {
    pub fn new(name: impl Into<String>, categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            name: name.into(),
            categories: categories.into_iter().collect(),
            last_used: None,
        }
    }

    pub fn used_at(mut self, at: OffsetDateTime) -> Self {
        self.last_used = Some(at);
        self
    }

    /// Sort key for least-recently-used ordering; never-used items sort as the epoch.
    pub fn recency(&self) -> OffsetDateTime {
        self.last_used.unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub name: String,
    pub time: String,
    pub required: Categories,
}

impl ScheduleSlot {
    pub fn new(
        name: impl Into<String>,
        time: impl Into<String>,
        required: impl IntoIterator<Item = Category>,
    ) -> Self {
        Self {
            name: name.into(),
            time: time.into(),
            required: required.into_iter().collect(),
        }
    }
}

#[derive(
    EnumString, VariantArray, Display, AsRefStr, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
#[strum(serialize_all = "lowercase")]
pub enum MealStatus {
    #[default]
    Pending,
    Completed,
    Skipped,
}

impl MealStatus {
    /// Reads a stored status; anything unrecognised is pending.
    pub fn parse_lenient(value: &str) -> Self {
        value.trim().to_lowercase().parse().unwrap_or_default()
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, MealStatus::Pending)
    }

    pub fn can_transition_to(&self, to: MealStatus) -> bool {
        *self == MealStatus::Pending && to.is_terminal()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Meal {
    pub date: Date,
    pub slot_name: String,
    pub time: String,
    /// Selection order, at most four items.
    pub items: Vec<Item>,
    pub status: MealStatus,
}

impl Meal {
    pub fn new(date: Date, slot: &ScheduleSlot, items: Vec<Item>) -> Self {
        Self {
            date,
            slot_name: slot.name.to_owned(),
            time: slot.time.to_owned(),
            items,
            status: MealStatus::Pending,
        }
    }

    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.name.as_str())
    }

    /// Puts `replacement` where the item at `index` was, then drops the other
    /// items from the tail until the meal is back under the cap. Inserted items
    /// are never dropped. Returns what was dropped, in meal order.
    pub fn splice(&mut self, index: usize, replacement: Vec<Item>) -> Result<Vec<Item>> {
        if index >= self.items.len() {
            mealcycle_shared::not_found!("item {} in {}", index + 1, self.slot_name);
        }

        let inserted = index..index + replacement.len();
        self.items.splice(index..=index, replacement);

        let mut dropped = vec![];
        let mut position = self.items.len();

        while self.items.len() > MAX_ITEMS_PER_MEAL && position > 0 {
            position -= 1;

            if !inserted.contains(&position) {
                dropped.push(self.items.remove(position));
            }
        }

        dropped.reverse();

        Ok(dropped)
    }

    pub fn transition(&mut self, to: MealStatus) -> Result<()> {
        if !self.status.can_transition_to(to) {
            return Err(Error::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }

        self.status = to;

        Ok(())
    }
}
