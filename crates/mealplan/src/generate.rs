use std::collections::BTreeSet;

use time::{Date, OffsetDateTime};

use crate::{
    Categories, ExclusionSet, Item, Meal, ScheduleSlot, available_items, coverage,
    is_exact_cover, select_items,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The slot requires no category at all.
    EmptyRequirement,
    /// No combination of available items covers the slot; `uncovered` is what
    /// the best effort left out.
    NoCoverage { uncovered: Categories },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedSlot {
    pub slot_name: String,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotOutcome {
    Planned(Meal),
    Skipped(SkippedSlot),
}

/// One day's generation in progress.
///
/// Slots must be fed in schedule order, one at a time, each with a catalog
/// snapshot taken after the previous slot's picks were stamped as used.
/// Items placed in a meal are never offered to a later slot of the same day.
#[derive(Debug)]
pub struct DailyPlan {
    date: Date,
    grocery_needed: BTreeSet<String>,
    used: ExclusionSet,
    meals: Vec<Meal>,
    skipped: Vec<SkippedSlot>,
}

impl DailyPlan {
    pub fn new(date: Date, grocery_needed: impl IntoIterator<Item = String>) -> Self {
        Self {
            date,
            grocery_needed: grocery_needed.into_iter().collect(),
            used: ExclusionSet::new(),
            meals: vec![],
            skipped: vec![],
        }
    }

    pub fn date(&self) -> Date {
        self.date
    }

    /// Names already placed in a meal today.
    pub fn used(&self) -> &ExclusionSet {
        &self.used
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn skipped(&self) -> &[SkippedSlot] {
        &self.skipped
    }

    pub fn plan_slot(&mut self, slot: &ScheduleSlot, catalog: &[Item]) -> SlotOutcome {
        if slot.required.is_empty() {
            return self.skip(slot, SkipReason::EmptyRequirement);
        }

        let available = available_items(catalog, &self.used, &self.grocery_needed);
        let items = select_items(&slot.required, &available);

        if items.is_empty() || !is_exact_cover(&items, &slot.required) {
            let uncovered = slot
                .required
                .difference(&coverage(&items))
                .copied()
                .collect();

            return self.skip(slot, SkipReason::NoCoverage { uncovered });
        }

        self.used.extend(items.iter().map(|i| i.name.to_owned()));

        let meal = Meal::new(self.date, slot, items);
        self.meals.push(meal.clone());

        SlotOutcome::Planned(meal)
    }

    pub fn finish(self) -> GenerateReport {
        GenerateReport {
            meals: self.meals,
            skipped: self.skipped,
            reused_existing: false,
        }
    }

    fn skip(&mut self, slot: &ScheduleSlot, reason: SkipReason) -> SlotOutcome {
        let skipped = SkippedSlot {
            slot_name: slot.name.to_owned(),
            reason,
        };
        self.skipped.push(skipped.clone());

        SlotOutcome::Skipped(skipped)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub meals: Vec<Meal>,
    pub skipped: Vec<SkippedSlot>,
    /// The stored plan was already for today and was returned unchanged.
    pub reused_existing: bool,
}

/// Whether today needs a fresh plan: nothing planned yet, or the stored plan
/// belongs to another day.
pub fn needs_new_meals(current: &[Meal], today: Date) -> bool {
    current.is_empty() || current.iter().any(|meal| meal.date != today)
}

/// Plans a whole day against an in-memory catalog snapshot.
///
/// Picked items get `last_used = now` on the snapshot before the next slot is
/// planned, which is exactly what a store-backed run observes after touching
/// each item.
pub fn generate_day(
    date: Date,
    schedule: &[ScheduleSlot],
    catalog: &[Item],
    grocery_needed: impl IntoIterator<Item = String>,
    now: OffsetDateTime,
) -> GenerateReport {
    let mut catalog = catalog.to_vec();
    let mut plan = DailyPlan::new(date, grocery_needed);

    for slot in schedule {
        if let SlotOutcome::Planned(meal) = plan.plan_slot(slot, &catalog) {
            for picked in meal.item_names() {
                if let Some(item) = catalog.iter_mut().find(|i| i.name == picked) {
                    item.last_used = Some(now);
                }
            }
        }
    }

    plan.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, MealStatus};
    use proptest::prelude::*;
    use time::macros::{date, datetime};

    const TODAY: Date = date!(2024 - 03 - 01);
    const NOW: OffsetDateTime = datetime!(2024-03-01 07:00 UTC);

    fn names(meal: &Meal) -> Vec<&str> {
        meal.item_names().collect()
    }

    #[test]
    fn test_cross_slot_exclusion() {
        let schedule = vec![
            ScheduleSlot::new("Breakfast", "08:00", [Category::Carb]),
            ScheduleSlot::new("Lunch", "12:00", [Category::Carb]),
        ];
        let catalog = vec![Item::new("rice", [Category::Carb])];

        let report = generate_day(TODAY, &schedule, &catalog, [], NOW);

        assert_eq!(report.meals.len(), 1);
        assert_eq!(report.meals[0].slot_name, "Breakfast");
        assert_eq!(
            report.skipped,
            vec![SkippedSlot {
                slot_name: "Lunch".to_owned(),
                reason: SkipReason::NoCoverage {
                    uncovered: Categories::from([Category::Carb])
                },
            }]
        );
    }

    #[test]
    fn test_empty_requirement_is_skipped() {
        let schedule = vec![
            ScheduleSlot::new("Snack", "15:00", []),
            ScheduleSlot::new("Dinner", "19:00", [Category::Protein]),
        ];
        let catalog = vec![Item::new("egg", [Category::Protein])];

        let report = generate_day(TODAY, &schedule, &catalog, [], NOW);

        assert_eq!(report.meals.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::EmptyRequirement);
    }

    #[test]
    fn test_failed_slot_does_not_abort_day() {
        let schedule = vec![
            ScheduleSlot::new("Breakfast", "08:00", [Category::Fruit]),
            ScheduleSlot::new("Lunch", "12:00", [Category::Carb]),
        ];
        let catalog = vec![Item::new("rice", [Category::Carb])];

        let report = generate_day(TODAY, &schedule, &catalog, [], NOW);

        assert_eq!(report.meals.len(), 1);
        assert_eq!(report.meals[0].slot_name, "Lunch");
    }

    #[test]
    fn test_partial_cover_is_skipped() {
        let schedule = vec![ScheduleSlot::new(
            "Lunch",
            "12:00",
            [Category::Carb, Category::Protein],
        )];
        let catalog = vec![Item::new("rice", [Category::Carb])];

        let report = generate_day(TODAY, &schedule, &catalog, [], NOW);

        assert!(report.meals.is_empty());
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::NoCoverage {
                uncovered: Categories::from([Category::Protein])
            }
        );
    }

    #[test]
    fn test_grocery_items_are_unavailable() {
        let schedule = vec![ScheduleSlot::new("Lunch", "12:00", [Category::Carb])];
        let catalog = vec![
            Item::new("bread", [Category::Carb]),
            Item::new("rice", [Category::Carb]),
        ];

        let report = generate_day(TODAY, &schedule, &catalog, ["bread".to_owned()], NOW);

        assert_eq!(names(&report.meals[0]), ["rice"]);
    }

    #[test]
    fn test_meals_are_pending_and_dated() {
        let schedule = vec![ScheduleSlot::new("Lunch", "12:00", [Category::Carb])];
        let catalog = vec![Item::new("rice", [Category::Carb])];

        let report = generate_day(TODAY, &schedule, &catalog, [], NOW);

        assert_eq!(report.meals[0].status, MealStatus::Pending);
        assert_eq!(report.meals[0].date, TODAY);
        assert_eq!(report.meals[0].time, "12:00");
    }

    #[test]
    fn test_needs_new_meals() {
        let slot = ScheduleSlot::new("Lunch", "12:00", [Category::Carb]);
        let today = Meal::new(TODAY, &slot, vec![]);
        let yesterday = Meal::new(date!(2024 - 02 - 29), &slot, vec![]);

        assert!(needs_new_meals(&[], TODAY));
        assert!(!needs_new_meals(std::slice::from_ref(&today), TODAY));
        assert!(needs_new_meals(&[yesterday.clone()], TODAY));
        assert!(needs_new_meals(&[today, yesterday], TODAY));
    }

    #[test]
    fn test_plan_slot_tracks_used_items() {
        let mut plan = DailyPlan::new(TODAY, []);
        let slot = ScheduleSlot::new("Lunch", "12:00", [Category::Carb, Category::Protein]);
        let catalog = vec![
            Item::new("rice", [Category::Carb]),
            Item::new("egg", [Category::Protein]),
        ];

        let outcome = plan.plan_slot(&slot, &catalog);

        assert!(matches!(outcome, SlotOutcome::Planned(_)));
        assert_eq!(
            plan.used(),
            &ExclusionSet::from(["egg".to_owned(), "rice".to_owned()])
        );
        assert_eq!(plan.meals().len(), 1);
    }

    fn schedule_strategy() -> impl Strategy<Value = Vec<ScheduleSlot>> {
        prop::collection::vec(
            prop::sample::subsequence(
                vec![
                    Category::Carb,
                    Category::Protein,
                    Category::Fruit,
                    Category::Veggie,
                ],
                0..=4,
            ),
            1..6,
        )
        .prop_map(|slots| {
            slots
                .into_iter()
                .enumerate()
                .map(|(i, tags)| ScheduleSlot::new(format!("slot-{i}"), "", tags))
                .collect()
        })
    }

    fn catalog_strategy() -> impl Strategy<Value = Vec<Item>> {
        prop::collection::vec((0u8..16, 0i64..100_000), 0..30).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (mask, secs))| {
                    let tags = [
                        Category::Carb,
                        Category::Protein,
                        Category::Fruit,
                        Category::Veggie,
                    ]
                    .into_iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, tag)| tag);

                    Item::new(format!("item-{i}"), tags)
                        .used_at(OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(secs))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn property_generated_meals_cover_exactly(
            schedule in schedule_strategy(),
            catalog in catalog_strategy(),
        ) {
            let report = generate_day(TODAY, &schedule, &catalog, [], NOW);
            let mut seen = BTreeSet::new();

            for meal in &report.meals {
                let slot = schedule.iter().find(|s| s.name == meal.slot_name).unwrap();
                prop_assert!(is_exact_cover(&meal.items, &slot.required));
                prop_assert!(meal.items.len() <= crate::MAX_ITEMS_PER_MEAL);
                for name in meal.item_names() {
                    prop_assert!(seen.insert(name.to_owned()), "{} used twice", name);
                }
            }

            prop_assert_eq!(report.meals.len() + report.skipped.len(), schedule.len());
        }

        #[test]
        fn property_generation_is_deterministic(
            schedule in schedule_strategy(),
            catalog in catalog_strategy(),
        ) {
            let first = generate_day(TODAY, &schedule, &catalog, [], NOW);
            let second = generate_day(TODAY, &schedule, &catalog, [], NOW);

            prop_assert_eq!(first, second);
        }
    }
}
