use std::collections::BTreeSet;

use time::format_description::well_known::{Iso8601, Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::Item;

/// Item names that must not be offered for the current selection.
pub type ExclusionSet = BTreeSet<String>;

/// Candidates for a selection, least recently used first.
///
/// Drops excluded items and items on the grocery list, then orders by
/// `last_used` ascending with the item name as tie-break. Duplicate names keep
/// their first occurrence so the order stays total.
pub fn available_items(
    catalog: &[Item],
    excluded: &ExclusionSet,
    grocery_needed: &BTreeSet<String>,
) -> Vec<Item> {
    let mut seen = BTreeSet::new();
    let mut items = catalog
        .iter()
        .filter(|item| !excluded.contains(&item.name) && !grocery_needed.contains(&item.name))
        .filter(|item| seen.insert(item.name.as_str()))
        .cloned()
        .collect::<Vec<_>>();

    items.sort_by(|a, b| {
        a.recency()
            .cmp(&b.recency())
            .then_with(|| a.name.cmp(&b.name))
    });

    items
}

/// Reads a stored recency marker.
///
/// Tries RFC 3339 / ISO 8601, then `MM/DD/YYYY`, then a few other common
/// shapes. Anything else, including an empty cell or "never", is `None` and
/// sorts as the oldest possible use.
pub fn parse_last_used(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();

    if raw.is_empty() || raw.eq_ignore_ascii_case("never") {
        return None;
    }

    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(at);
    }

    if let Ok(at) = OffsetDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Some(at);
    }

    if let Some(date) = parse_us_date(raw) {
        return Some(date.midnight().assume_utc());
    }

    parse_generic(raw)
}

fn parse_us_date(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[month]/[day]/[year]"))
        .or_else(|_| {
            Date::parse(
                raw,
                format_description!("[month padding:none]/[day padding:none]/[year]"),
            )
        })
        .ok()
}

fn parse_generic(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc2822) {
        return Some(at);
    }

    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(date.midnight().assume_utc());
    }

    let naive = [
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    ];

    naive
        .iter()
        .copied()
        .find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
        .map(|at| at.assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;
    use time::macros::datetime;

    fn names(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(
            parse_last_used("2024-01-05T10:30:00Z"),
            Some(datetime!(2024-01-05 10:30:00 UTC))
        );
        assert_eq!(
            parse_last_used("2024-01-05T10:30:00.250+02:00"),
            Some(datetime!(2024-01-05 08:30:00.25 UTC))
        );
    }

    #[test]
    fn test_parse_us_date() {
        assert_eq!(
            parse_last_used("03/07/2024"),
            Some(datetime!(2024-03-07 00:00:00 UTC))
        );
        assert_eq!(
            parse_last_used("3/7/2024"),
            Some(datetime!(2024-03-07 00:00:00 UTC))
        );
    }

    #[test]
    fn test_parse_generic_shapes() {
        assert_eq!(
            parse_last_used("2024-06-01"),
            Some(datetime!(2024-06-01 00:00:00 UTC))
        );
        assert_eq!(
            parse_last_used("2024-06-01 08:15:00"),
            Some(datetime!(2024-06-01 08:15:00 UTC))
        );
        assert_eq!(
            parse_last_used("Sat, 01 Jun 2024 08:15:00 +0000"),
            Some(datetime!(2024-06-01 08:15:00 UTC))
        );
    }

    #[test]
    fn test_parse_failures_are_none() {
        assert_eq!(parse_last_used(""), None);
        assert_eq!(parse_last_used("never"), None);
        assert_eq!(parse_last_used("last tuesday"), None);
        assert_eq!(parse_last_used("13/45/2024"), None);
    }

    #[test]
    fn test_available_items_order() {
        let catalog = vec![
            Item::new("banana", [Category::Fruit]).used_at(datetime!(2024-06-01 00:00 UTC)),
            Item::new("apple", [Category::Fruit]).used_at(datetime!(2024-06-01 00:00 UTC)),
            Item::new("rice", [Category::Carb]).used_at(datetime!(2024-01-01 00:00 UTC)),
            Item::new("tofu", [Category::Protein]),
            Item::new("egg", [Category::Protein]),
        ];

        let items = available_items(&catalog, &ExclusionSet::new(), &BTreeSet::new());

        assert_eq!(names(&items), ["egg", "tofu", "rice", "apple", "banana"]);
    }

    #[test]
    fn test_available_items_exclusions() {
        let catalog = vec![
            Item::new("rice", [Category::Carb]),
            Item::new("bread", [Category::Carb]),
            Item::new("pasta", [Category::Carb]),
        ];
        let excluded = ExclusionSet::from(["rice".to_owned()]);
        let grocery = BTreeSet::from(["pasta".to_owned()]);

        let items = available_items(&catalog, &excluded, &grocery);

        assert_eq!(names(&items), ["bread"]);
    }

    #[test]
    fn test_available_items_dedupes_names() {
        let catalog = vec![
            Item::new("rice", [Category::Carb]),
            Item::new("rice", [Category::Protein]),
        ];

        let items = available_items(&catalog, &ExclusionSet::new(), &BTreeSet::new());

        assert_eq!(items.len(), 1);
        assert!(items[0].categories.contains(&Category::Carb));
    }

    #[test]
    fn test_available_items_is_stable_under_permutation() {
        let mut catalog = vec![
            Item::new("c", []).used_at(datetime!(2024-02-01 00:00 UTC)),
            Item::new("a", []),
            Item::new("b", []),
        ];
        let first = available_items(&catalog, &ExclusionSet::new(), &BTreeSet::new());
        catalog.reverse();
        let second = available_items(&catalog, &ExclusionSet::new(), &BTreeSet::new());

        assert_eq!(first, second);
    }
}
