use std::collections::BTreeSet;

use mealcycle_shared::Result;
use time::{Date, OffsetDateTime};

use crate::{
    Categories, DailyPlan, ExclusionSet, GenerateReport, Item, Meal, MealStatus, PlanStore,
    Replacement, SkipReason, SlotOutcome, describe, find_replacement, needs_new_meals,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplaceReport {
    Removed { item: Item },
    Replaced {
        removed: Item,
        added: Vec<Item>,
        dropped: Vec<Item>,
    },
    NoSuitableItem { needed: Categories },
}

#[derive(Clone)]
pub struct Command<S: PlanStore>(pub S);

impl<S: PlanStore> Command<S> {
    pub async fn current_plan(&self) -> Result<Vec<Meal>> {
        self.0.load_current_plan().await
    }

    #[tracing::instrument(skip(self))]
    pub async fn generate(&self, today: Date, now: OffsetDateTime) -> Result<GenerateReport> {
        let current = self.0.load_current_plan().await?;

        if !needs_new_meals(&current, today) {
            tracing::debug!("plan for {today} already exists");

            return Ok(GenerateReport {
                meals: current,
                skipped: vec![],
                reused_existing: true,
            });
        }

        let schedule = self.0.load_schedule().await?;
        let grocery_needed = self.0.load_grocery_needed().await?;
        let mut plan = DailyPlan::new(today, grocery_needed);

        for slot in &schedule {
            let catalog = self.0.load_catalog().await?;

            match plan.plan_slot(slot, &catalog) {
                SlotOutcome::Planned(meal) => {
                    tracing::info!(
                        slot = %meal.slot_name,
                        items = ?meal.item_names().collect::<Vec<_>>(),
                        "meal planned"
                    );

                    for name in meal.item_names() {
                        self.0.touch_last_used(name, now).await?;
                    }
                }
                SlotOutcome::Skipped(skipped) => match &skipped.reason {
                    SkipReason::EmptyRequirement => {
                        tracing::debug!(slot = %skipped.slot_name, "slot requires nothing");
                    }
                    SkipReason::NoCoverage { uncovered } => {
                        tracing::warn!(
                            slot = %skipped.slot_name,
                            uncovered = %describe(uncovered),
                            "no suitable items"
                        );
                    }
                },
            }
        }

        let report = plan.finish();
        let completed = current
            .into_iter()
            .filter(|meal| meal.status == MealStatus::Completed)
            .collect::<Vec<_>>();

        if completed.is_empty() {
            self.0.persist_plan(&report.meals).await?;
        } else {
            tracing::info!(count = completed.len(), "archiving completed meals");
            self.0.archive_completed(&completed, &report.meals).await?;
        }

        Ok(report)
    }

    #[tracing::instrument(skip(self))]
    pub async fn replace(
        &self,
        meal: usize,
        item: usize,
        now: OffsetDateTime,
    ) -> Result<ReplaceReport> {
        let mut plan = self.0.load_current_plan().await?;

        let Some(target) = plan.get(meal) else {
            mealcycle_shared::not_found!("meal {}", meal + 1);
        };

        if target.status.is_terminal() {
            mealcycle_shared::bail!("{} is already {}", target.slot_name, target.status);
        }

        let used_elsewhere = plan
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != meal)
            .flat_map(|(_, other)| other.item_names().map(str::to_owned))
            .collect::<ExclusionSet>();

        let catalog = self.0.load_catalog().await?;
        let grocery_needed = self
            .0
            .load_grocery_needed()
            .await?
            .into_iter()
            .collect::<BTreeSet<_>>();

        let replacement = find_replacement(target, item, &catalog, &grocery_needed, &used_elsewhere)?;
        let target = &mut plan[meal];

        let report = match replacement {
            Replacement::NoCoverage { needed } => {
                tracing::warn!(
                    slot = %target.slot_name,
                    needed = %describe(&needed),
                    "no suitable replacement"
                );

                return Ok(ReplaceReport::NoSuitableItem { needed });
            }
            Replacement::Redundant => {
                let removed = target.items.remove(item);
                tracing::info!(slot = %target.slot_name, item = %removed.name, "item removed");

                ReplaceReport::Removed { item: removed }
            }
            Replacement::Found(items) => {
                let removed = target.items[item].clone();
                let added = items.clone();
                let dropped = target.splice(item, items)?;

                for new_item in &added {
                    self.0.touch_last_used(&new_item.name, now).await?;
                }

                tracing::info!(
                    slot = %target.slot_name,
                    removed = %removed.name,
                    added = ?added.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
                    "item replaced"
                );

                ReplaceReport::Replaced {
                    removed,
                    added,
                    dropped,
                }
            }
        };

        self.0.persist_plan(&plan).await?;

        Ok(report)
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_status(&self, meal: usize, status: MealStatus) -> Result<Meal> {
        let mut plan = self.0.load_current_plan().await?;

        let Some(target) = plan.get_mut(meal) else {
            mealcycle_shared::not_found!("meal {}", meal + 1);
        };

        target.transition(status)?;
        let updated = target.clone();

        self.0.persist_plan(&plan).await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub async fn archive_completed(&self) -> Result<usize> {
        let plan = self.0.load_current_plan().await?;
        let (completed, remaining): (Vec<_>, Vec<_>) = plan
            .into_iter()
            .partition(|meal| meal.status == MealStatus::Completed);

        if completed.is_empty() {
            return Ok(0);
        }

        self.0.archive_completed(&completed, &remaining).await?;

        Ok(completed.len())
    }
}
