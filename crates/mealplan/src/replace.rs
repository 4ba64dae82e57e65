use std::collections::BTreeSet;

use mealcycle_shared::Result;

use crate::{
    Categories, ExclusionSet, Item, Meal, available_items, coverage, is_exact_cover, select_items,
};

/// Result of looking for a stand-in for one item of a meal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Replacement {
    Redundant,
    Found(Vec<Item>),
    NoCoverage { needed: Categories },
}

/// Categories that would go missing if the item at `index` left the meal.
pub fn needed_categories(meal: &Meal, index: usize) -> Result<Categories> {
    let Some(replaced) = meal.items.get(index) else {
        mealcycle_shared::not_found!("item {} in {}", index + 1, meal.slot_name);
    };

    let others = coverage(
        meal.items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, item)| item),
    );

    Ok(replaced.categories.difference(&others).copied().collect())
}

/// Finds what should take the place of the item at `index`.
pub fn find_replacement(
    meal: &Meal,
    index: usize,
    catalog: &[Item],
    grocery_needed: &BTreeSet<String>,
    used_elsewhere: &ExclusionSet,
) -> Result<Replacement> {
    let needed = needed_categories(meal, index)?;

    if needed.is_empty() {
        return Ok(Replacement::Redundant);
    }

    let mut excluded = used_elsewhere.clone();
    excluded.extend(meal.item_names().map(str::to_owned));

    let available = available_items(catalog, &excluded, grocery_needed);
    let items = select_items(&needed, &available);

    if items.is_empty() || !is_exact_cover(&items, &needed) {
        return Ok(Replacement::NoCoverage { needed });
    }

    Ok(Replacement::Found(items))
}
