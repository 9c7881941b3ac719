use std::cmp::Ordering;
use std::io;

use super::model::{FieldValue, Record};

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Known columns first (in `default_order`), then every other key in the
/// order it was discovered.
pub fn ordered_columns(keys: &[String], default_order: &[String]) -> Vec<String> {
    let known = default_order.iter().filter(|k| keys.contains(k));
    let extras = keys.iter().filter(|k| !default_order.contains(k));
    known.chain(extras).cloned().collect()
}

/// Columns shown before the user picks any: the configured defaults that
/// actually occur in the data.
pub fn default_visible_columns(keys: &[String], defaults: &[String]) -> Vec<String> {
    defaults.iter().filter(|k| keys.contains(k)).cloned().collect()
}

/// Title-case each whitespace-separated word: `"engine capacity"` →
/// `"Engine Capacity"`.
pub fn column_header(key: &str) -> String {
    key.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Display text for a cell; absent values render empty.
pub fn format_cell(value: Option<&FieldValue>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
        }
    }
}

/// Numbers before text; text compared case-insensitively.
fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_string().to_lowercase().cmp(&b.to_string().to_lowercase()),
    }
}

/// Stable sort of `indices` by `column`. Records without the column always
/// sort last, whatever the order.
pub fn sort_indices(records: &[Record], indices: &mut [usize], column: &str, order: SortOrder) {
    indices.sort_by(|&i, &j| match (records[i].get(column), records[j].get(column)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match order {
            SortOrder::Ascending => compare_values(a, b),
            SortOrder::Descending => compare_values(a, b).reverse(),
        },
    });
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write the given rows and columns as CSV with a title-cased header.
pub fn write_csv<W: io::Write>(
    writer: W,
    records: &[Record],
    indices: &[usize],
    columns: &[String],
) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(columns.iter().map(|c| column_header(c)))?;
    for &idx in indices {
        let record = &records[idx];
        wtr.write_record(columns.iter().map(|c| format_cell(record.get(c))))?;
    }
    wtr.flush()?;
    Ok(())
}
