use std::collections::BTreeSet;

use crate::{Categories, Item, categories_match_exactly};

/// Hard cap on the number of items a single meal may hold.
pub const MAX_ITEMS_PER_MEAL: usize = 4;

/// Picks the items for one meal from candidates ordered oldest first.
///
/// A single item whose categories equal `required` always wins. Otherwise the
/// greedy pass takes, scan after scan, the first candidate that brings at
/// least one missing category, overlaps nothing already covered and brings
/// nothing outside `required`. There is no backtracking: the result may stop
/// short of full coverage, either because no candidate qualifies or because
/// the cap was reached. Use [`crate::is_exact_cover`] to tell.
pub fn select_items(required: &Categories, available: &[Item]) -> Vec<Item> {
    cover(required, available, |item| &item.categories)
        .into_iter()
        .cloned()
        .collect()
}

/// Tag-agnostic core of [`select_items`].
pub fn cover<'a, T, C, F>(
    required: &BTreeSet<T>,
    candidates: &'a [C],
    tags_of: F,
) -> Vec<&'a C>
where
    T: Ord + Copy,
    F: Fn(&C) -> &BTreeSet<T>,
{
    if required.is_empty() {
        return vec![];
    }

    if let Some(candidate) = candidates
        .iter()
        .find(|c| categories_match_exactly(tags_of(c), required))
    {
        return vec![candidate];
    }

    let mut covered = BTreeSet::new();
    let mut remaining = candidates.iter().collect::<Vec<_>>();
    let mut selected = vec![];

    while selected.len() < MAX_ITEMS_PER_MEAL && covered != *required {
        let Some(position) = remaining
            .iter()
            .position(|c| fits(tags_of(c), &covered, required))
        else {
            break;
        };

        let candidate = remaining.remove(position);
        covered.extend(tags_of(candidate).iter().copied());
        selected.push(candidate);
    }

    selected
}

fn fits<T: Ord>(tags: &BTreeSet<T>, covered: &BTreeSet<T>, required: &BTreeSet<T>) -> bool {
    tags.is_disjoint(covered)
        && tags.is_subset(required)
        && tags.iter().any(|t| !covered.contains(t))
}
