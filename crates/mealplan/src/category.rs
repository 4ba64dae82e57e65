use std::collections::BTreeSet;

use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Nutritional tag an item provides or a slot requires.
///
/// The planning algorithms only ever treat tags as opaque set members, so a
/// new variant here is all it takes to plan with an extra tag.
#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Carb,
    Protein,
    Fruit,
    Veggie,
}

impl Category {
    /// Record field holding this tag's presence marker.
    pub fn field_name(&self) -> &'static str {
        match self {
            Category::Carb => "carb",
            Category::Protein => "protein",
            Category::Fruit => "fruit",
            Category::Veggie => "veggie",
        }
    }
}

pub type Categories = BTreeSet<Category>;

/// True iff both sets hold exactly the same tags.
pub fn categories_match_exactly<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> bool {
    a.len() == b.len() && a.symmetric_difference(b).next().is_none()
}

/// Union of the categories provided by `items`.
pub fn coverage<'a, I>(items: I) -> Categories
where
    I: IntoIterator<Item = &'a crate::Item>,
{
    items
        .into_iter()
        .flat_map(|item| item.categories.iter().copied())
        .collect()
}

/// Exact cover check: union equals `required` and no tag is provided twice.
pub fn is_exact_cover(items: &[crate::Item], required: &Categories) -> bool {
    let provided = items.iter().map(|i| i.categories.len()).sum::<usize>();
    let covered = coverage(items);

    provided == covered.len() && categories_match_exactly(&covered, required)
}

pub fn describe(categories: &Categories) -> String {
    if categories.is_empty() {
        return "none".to_owned();
    }

    categories
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
