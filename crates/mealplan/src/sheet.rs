//! Tabular record adapter.
//!
//! Rows arrive as a header row followed by value rows, every cell a string.
//! This is the only place that knows category presence is written as a
//! `"y"` cell; everything past this module works with [`Categories`].

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{Categories, Category, Item, ScheduleSlot, parse_last_used};
use strum::VariantArray;

/// Cell value marking a category as present.
pub const MARKER: &str = "y";

/// Named access to the cells of one row.
pub trait Fields {
    /// Cell under `name`, or `""` if the row has no such field.
    fn field(&self, name: &str) -> &str;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(normalize_header(&name.into()), value.into());
    }
}

impl Fields for Record {
    fn field(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::default();
        for (name, value) in iter {
            record.insert(name, value);
        }

        record
    }
}

/// `"Last Used"` and `"last_used"` address the same field.
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Maps value rows onto the header row by position.
///
/// Short rows are padded with empty cells, cells past the header are
/// ignored, and blank rows are dropped.
pub fn records_from_values(values: &[Vec<String>]) -> Vec<Record> {
    let Some((header, rows)) = values.split_first() else {
        return vec![];
    };

    let header = header
        .iter()
        .map(|h| normalize_header(h))
        .collect::<Vec<_>>();

    rows.iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            let mut record = Record::default();
            for (position, name) in header.iter().enumerate() {
                if name.is_empty() {
                    continue;
                }
                let value = row.get(position).cloned().unwrap_or_default();
                record.0.insert(name.to_owned(), value);
            }

            record
        })
        .collect()
}

/// Categories whose field in `record` holds exactly [`MARKER`].
pub fn categories_of(record: &impl Fields, tags: &[Category]) -> Categories {
    tags.iter()
        .copied()
        .filter(|tag| record.field(tag.field_name()) == MARKER)
        .collect()
}

/// Cell written for `tag`.
pub fn flag(categories: &Categories, tag: Category) -> &'static str {
    if categories.contains(&tag) { MARKER } else { "" }
}

/// Builds an item from its row; rows without a name are not items.
pub fn item_from_record(record: &impl Fields) -> Option<Item> {
    let name = record.field("name").trim();
    if name.is_empty() {
        return None;
    }

    Some(Item {
        name: name.to_owned(),
        categories: categories_of(record, Category::VARIANTS),
        last_used: parse_last_used(record.field("last_used")),
    })
}

pub fn slot_from_record(record: &impl Fields) -> Option<ScheduleSlot> {
    let name = record.field("name").trim();
    if name.is_empty() {
        return None;
    }

    Some(ScheduleSlot {
        name: name.to_owned(),
        time: record.field("time").to_owned(),
        required: categories_of(record, Category::VARIANTS),
    })
}

/// Spreadsheet range payload: `{"range": "...", "values": [[...], ...]}`.
#[derive(Debug, Default, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Cell>>,
}

impl ValueRange {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.values
            .iter()
            .map(|row| row.iter().map(|c| c.0.to_owned()).collect())
            .collect()
    }

    pub fn records(&self) -> Vec<Record> {
        records_from_values(&self.rows())
    }
}

/// One cell; numbers and booleans are kept as their text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell(pub String);

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let text = match value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        Ok(Cell(text))
    }
}
