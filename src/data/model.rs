use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a normalized record
// ---------------------------------------------------------------------------

/// A dynamically-typed field value as found in the outfit document.
///
/// Absence is never encoded here: a field that does not apply to a record is
/// simply not present in the record's map.
///
/// Equality treats two NaN numbers as equal, so normalizing the same input
/// twice compares equal even when a ratio divided zero by zero.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// Array whose elements are all strings.
    TextList(Vec<String>),
    /// Resolved license references (Engines only). Shared with the catalog.
    Licenses(Vec<Arc<License>>),
    /// Anything else (bools, nested objects, mixed arrays), passed through.
    Other(JsonValue),
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::TextList(a), FieldValue::TextList(b)) => a == b,
            (FieldValue::Licenses(a), FieldValue::Licenses(b)) => a == b,
            (FieldValue::Other(a), FieldValue::Other(b)) => a == b,
            _ => false,
        }
    }
}

impl FieldValue {
    /// Classify a raw JSON value.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) => FieldValue::Number(f),
                None => FieldValue::Other(value.clone()),
            },
            JsonValue::String(s) => FieldValue::Text(s.clone()),
            JsonValue::Array(items) => {
                let strings: Option<Vec<String>> = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect();
                match strings {
                    Some(list) => FieldValue::TextList(list),
                    None => FieldValue::Other(value.clone()),
                }
            }
            other => FieldValue::Other(other.clone()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text used by substring filters. Lists are joined with `", "`.
    /// Returns `None` for values that are neither text nor a list.
    pub fn search_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::TextList(items) => Some(items.join(", ")),
            FieldValue::Licenses(licenses) => Some(license_names(licenses).join(", ")),
            FieldValue::Number(_) | FieldValue::Other(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(v) => write!(f, "{v}"),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::TextList(items) => write!(f, "{}", items.join(", ")),
            FieldValue::Licenses(licenses) => write!(f, "{}", license_names(licenses).join(", ")),
            FieldValue::Other(v) => write!(f, "{v}"),
        }
    }
}

fn license_names(licenses: &[Arc<License>]) -> Vec<&str> {
    licenses.iter().map(|l| l.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// KnownField – canonical identifiers for fields the normalizer understands
// ---------------------------------------------------------------------------

/// Fields with a fixed meaning. Raw keys are matched case-insensitively and
/// stored under [`KnownField::key`]; every other key keeps its original casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownField {
    Name,
    Cost,
    Mass,
    OutfitSpace,
    EngineCapacity,
    Thrust,
    Turn,
    ReverseThrust,
    TurningEnergy,
    TurningHeat,
    ThrustingEnergy,
    Licenses,
}

impl KnownField {
    pub const ALL: [KnownField; 12] = [
        KnownField::Name,
        KnownField::Cost,
        KnownField::Mass,
        KnownField::OutfitSpace,
        KnownField::EngineCapacity,
        KnownField::Thrust,
        KnownField::Turn,
        KnownField::ReverseThrust,
        KnownField::TurningEnergy,
        KnownField::TurningHeat,
        KnownField::ThrustingEnergy,
        KnownField::Licenses,
    ];

    pub fn key(self) -> &'static str {
        match self {
            KnownField::Name => "name",
            KnownField::Cost => "cost",
            KnownField::Mass => "mass",
            KnownField::OutfitSpace => "outfit space",
            KnownField::EngineCapacity => "engine capacity",
            KnownField::Thrust => "thrust",
            KnownField::Turn => "turn",
            KnownField::ReverseThrust => "reverse thrust",
            KnownField::TurningEnergy => "turning energy",
            KnownField::TurningHeat => "turning heat",
            KnownField::ThrustingEnergy => "thrusting energy",
            KnownField::Licenses => "licenses",
        }
    }

    /// Case-insensitive lookup of a raw field name.
    pub fn from_key(raw: &str) -> Option<Self> {
        let lower = raw.to_lowercase();
        Self::ALL.into_iter().find(|field| field.key() == lower)
    }

    /// Capacity-like quantities that an outfit consumes; stored negated.
    pub fn is_consumed_capacity(self) -> bool {
        matches!(self, KnownField::OutfitSpace | KnownField::EngineCapacity)
    }
}

// ---------------------------------------------------------------------------
// Record – one normalized outfit
// ---------------------------------------------------------------------------

/// A normalized outfit: field name → value, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

/// Engines are plain records with engine-specific fields and derived metrics.
pub type Engine = Record;

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_f64)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.text(KnownField::Name.key())
    }

    /// Outfit space as stored (negative for outfits that consume space).
    pub fn outfit_space(&self) -> Option<f64> {
        self.number(KnownField::OutfitSpace.key())
    }

    /// Resolved licenses; empty when the record carries none.
    pub fn licenses(&self) -> &[Arc<License>] {
        match self.get(KnownField::Licenses.key()) {
            Some(FieldValue::Licenses(licenses)) => licenses,
            _ => &[],
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// License
// ---------------------------------------------------------------------------

/// A license, identified by its name (trailing " License" removed).
///
/// Licenses are published as `Arc<License>` and never mutated afterwards;
/// engines hold clones of those `Arc`s rather than copies.
#[derive(Debug, Clone, PartialEq)]
pub struct License {
    pub name: String,
    pub cost: Option<f64>,
    /// Remaining fields of the license record.
    pub extra: BTreeMap<String, FieldValue>,
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ---------------------------------------------------------------------------
// Catalog – the complete normalized document
// ---------------------------------------------------------------------------

/// Name → license lookup, built once after license normalization.
#[derive(Debug, Clone, Default)]
pub struct LicenseIndex {
    by_name: BTreeMap<String, Arc<License>>,
}

impl LicenseIndex {
    pub fn get(&self, name: &str) -> Option<&Arc<License>> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Insert unless the name is already taken. Returns whether it was inserted.
    pub fn insert_first(&mut self, license: Arc<License>) -> bool {
        if self.by_name.contains_key(&license.name) {
            return false;
        }
        self.by_name.insert(license.name.clone(), license);
        true
    }
}

/// All normalized categories of one outfit document.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// De-duplicated licenses in document order.
    pub licenses: Vec<Arc<License>>,
    pub license_index: LicenseIndex,
    pub engines: Vec<Engine>,
    /// Every other category, normalized with the generic pipeline.
    pub others: BTreeMap<String, Vec<Record>>,
}

impl Catalog {
    /// Record-shaped categories: "Engines" followed by the others.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[Record])> {
        std::iter::once((super::normalize::ENGINES, self.engines.as_slice())).chain(
            self.others
                .iter()
                .map(|(name, records)| (name.as_str(), records.as_slice())),
        )
    }

    pub fn category(&self, name: &str) -> Option<&[Record]> {
        self.categories()
            .find(|(category, _)| *category == name)
            .map(|(_, records)| records)
    }

    /// Licenses sorted by name, as shown in the license picker.
    pub fn sorted_license_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.licenses.iter().map(|l| l.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty() && self.engines.is_empty() && self.others.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_json_values() {
        assert_eq!(FieldValue::from_json(&json!(3)), FieldValue::Number(3.0));
        assert_eq!(
            FieldValue::from_json(&json!("Ion")),
            FieldValue::Text("Ion".into())
        );
        assert_eq!(
            FieldValue::from_json(&json!(["a", "b"])),
            FieldValue::TextList(vec!["a".into(), "b".into()])
        );
        assert!(matches!(
            FieldValue::from_json(&json!(["a", 1])),
            FieldValue::Other(_)
        ));
        assert!(matches!(FieldValue::from_json(&json!(true)), FieldValue::Other(_)));
    }

    #[test]
    fn nan_numbers_compare_equal() {
        assert_eq!(FieldValue::Number(f64::NAN), FieldValue::Number(f64::NAN));
        assert_eq!(FieldValue::Number(0.0), FieldValue::Number(-0.0));
        assert_ne!(FieldValue::Number(f64::NAN), FieldValue::Number(1.0));
        assert_ne!(FieldValue::Number(1.0), FieldValue::Text("1".into()));
    }

    #[test]
    fn known_fields_match_case_insensitively() {
        assert_eq!(
            KnownField::from_key("engine Capacity"),
            Some(KnownField::EngineCapacity)
        );
        assert_eq!(KnownField::from_key("THRUST"), Some(KnownField::Thrust));
        assert_eq!(KnownField::from_key("steering flare sprite"), None);
    }

    #[test]
    fn license_index_keeps_first() {
        let mut index = LicenseIndex::default();
        let first = Arc::new(License {
            name: "Pirate".into(),
            cost: Some(1.0),
            extra: BTreeMap::new(),
        });
        let second = Arc::new(License {
            name: "Pirate".into(),
            cost: Some(2.0),
            extra: BTreeMap::new(),
        });
        assert!(index.insert_first(first));
        assert!(!index.insert_first(second));
        assert_eq!(index.get("Pirate").and_then(|l| l.cost), Some(1.0));
    }
}
