use std::collections::{BTreeMap, BTreeSet};

use super::model::{Catalog, FieldValue, Record};

// ---------------------------------------------------------------------------
// Filter predicates: per-field constraints
// ---------------------------------------------------------------------------

/// A user constraint on one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Closed interval; only numeric values can satisfy it.
    Range { min: f64, max: f64 },
    /// Case-insensitive substring over text or list values.
    Contains(String),
    /// No restriction.
    Unset,
}

impl Constraint {
    pub fn range(min: f64, max: f64) -> Self {
        Constraint::Range { min, max }
    }

    pub fn contains(query: impl Into<String>) -> Self {
        Constraint::Contains(query.into())
    }

    /// Evaluate against a record's value for the constrained field.
    /// Missing or wrongly-typed values fail every constraint except `Unset`.
    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        match self {
            Constraint::Unset => true,
            Constraint::Range { min, max } => value
                .and_then(FieldValue::as_f64)
                .is_some_and(|v| *min <= v && v <= *max),
            Constraint::Contains(query) => value
                .and_then(FieldValue::search_text)
                .is_some_and(|text| text.to_lowercase().contains(&query.to_lowercase())),
        }
    }
}

/// Field name → constraint. A field without an entry is unrestricted.
pub type FilterState = BTreeMap<String, Constraint>;

/// Selected license names. Empty means "any license or none".
pub type LicenseSelection = BTreeSet<String>;

/// A record passes when every constraint holds for it.
pub fn matches_all(record: &Record, filters: &FilterState) -> bool {
    filters
        .iter()
        .all(|(field, constraint)| constraint.matches(record.get(field)))
}

/// A record passes when nothing is selected, or when at least one of its
/// resolved licenses is selected.
pub fn passes_license_selection(record: &Record, selection: &LicenseSelection) -> bool {
    selection.is_empty()
        || record
            .licenses()
            .iter()
            .any(|license| selection.contains(&license.name))
}

/// Return indices of records that pass all constraints and the license
/// selection, in their original order.
pub fn filtered_indices(
    records: &[Record],
    filters: &FilterState,
    selection: &LicenseSelection,
) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| matches_all(r, filters) && passes_license_selection(r, selection))
        .map(|(i, _)| i)
        .collect()
}

/// Same as [`filtered_indices`] but yields the records themselves.
pub fn filter_records<'a>(
    records: &'a [Record],
    filters: &FilterState,
    selection: &LicenseSelection,
) -> Vec<&'a Record> {
    filtered_indices(records, filters, selection)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

// ---------------------------------------------------------------------------
// Facets: which fields can be filtered, and over which range
// ---------------------------------------------------------------------------

/// Every field name present in at least one record, sorted.
pub fn all_keys(records: &[Record]) -> Vec<String> {
    let keys: BTreeSet<&str> = records.iter().flat_map(|r| r.keys()).collect();
    keys.into_iter().map(str::to_string).collect()
}

/// Fields holding a number in at least one record.
pub fn numeric_keys(records: &[Record]) -> Vec<String> {
    keys_where(records, |v| matches!(v, FieldValue::Number(_)))
}

/// Fields that substring filters can match in at least one record.
pub fn string_keys(records: &[Record]) -> Vec<String> {
    keys_where(records, |v| v.search_text().is_some())
}

fn keys_where(records: &[Record], pred: impl Fn(&FieldValue) -> bool) -> Vec<String> {
    let keys: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.iter())
        .filter(|(_, v)| pred(v))
        .map(|(k, _)| k)
        .collect();
    keys.into_iter().map(str::to_string).collect()
}

/// Min/max per numeric field over its finite values; `(0, 0)` for a field
/// without any.
pub fn numeric_ranges(records: &[Record], keys: &[String]) -> BTreeMap<String, (f64, f64)> {
    keys.iter()
        .map(|key| {
            let range = records
                .iter()
                .filter_map(|r| r.number(key))
                .filter(|v| v.is_finite())
                .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                    Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                    None => Some((v, v)),
                })
                .unwrap_or((0.0, 0.0));
            (key.clone(), range)
        })
        .collect()
}

/// Input step for a numeric range: one order of magnitude below the span,
/// never below 1.
pub fn dynamic_step(min: f64, max: f64) -> f64 {
    let magnitude = 10f64.powf((max - min).log10().floor() - 1.0);
    magnitude.max(1.0)
}

// ---------------------------------------------------------------------------
// Name search across categories
// ---------------------------------------------------------------------------

/// Matches from one category.
#[derive(Debug)]
pub struct CategoryMatches<'a> {
    pub category: &'a str,
    pub records: Vec<&'a Record>,
}

/// Case-insensitive name search over every record category, or only over
/// `category` when given. Categories without hits are left out.
pub fn search_by_name<'a>(
    catalog: &'a Catalog,
    query: &str,
    category: Option<&str>,
) -> Vec<CategoryMatches<'a>> {
    let query = query.to_lowercase();
    catalog
        .categories()
        .filter(|(name, _)| category.map_or(true, |c| c == *name))
        .filter_map(|(name, records)| {
            let hits: Vec<&Record> = records
                .iter()
                .filter(|r| r.name().is_some_and(|n| n.to_lowercase().contains(&query)))
                .collect();
            (!hits.is_empty()).then_some(CategoryMatches {
                category: name,
                records: hits,
            })
        })
        .collect()
}
