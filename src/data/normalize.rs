use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use super::model::{Catalog, Engine, FieldValue, KnownField, License, LicenseIndex, Record};
use super::pattern::IgnoreSet;

/// An untyped record exactly as it appears in the outfit document.
pub type RawRecord = Map<String, JsonValue>;

pub const ENGINES: &str = "Engines";
pub const LICENSES: &str = "Licenses";

const LICENSE_SUFFIX: &str = " License";

pub const THRUST_PER_CAPACITY: &str = "thrust per capacity";
pub const TURN_PER_CAPACITY: &str = "turn per capacity";
pub const REVERSE_THRUST_PER_CAPACITY: &str = "reverse thrust per capacity";
pub const THRUST_TURN_PER_CAPACITY: &str = "thrust+turn per capacity";
pub const ENERGY_PER_COMBINED_THRUST: &str = "energy per combined thrust";

/// Every field added by [`derive_engine_metrics`].
pub const DERIVED_FIELDS: &[&str] = &[
    THRUST_PER_CAPACITY,
    TURN_PER_CAPACITY,
    REVERSE_THRUST_PER_CAPACITY,
    THRUST_TURN_PER_CAPACITY,
    ENERGY_PER_COMBINED_THRUST,
];

const RATIO_PLACES: usize = 3;
const ENERGY_PLACES: usize = 6;

/// Enough fractional digits to print any `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Turns raw category records into normalized [`Record`]s and [`License`]s.
///
/// Pipeline per record: drop ignored fields, canonicalize known keys, apply
/// value transforms. Engines additionally get license resolution and derived
/// metrics. Nothing here fails: bad or missing inputs just skip the step
/// that needed them. Input records are never mutated.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    ignore: IgnoreSet,
}

impl Normalizer {
    pub fn new(ignore: IgnoreSet) -> Self {
        Self { ignore }
    }

    /// Generic pipeline used for every category without special handling.
    pub fn normalize_records<'a, I>(&self, raw: I) -> Vec<Record>
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        raw.into_iter().map(|r| self.clean_record(r)).collect()
    }

    /// Normalize licenses and build the name lookup. Duplicate names after
    /// suffix stripping keep the first occurrence.
    pub fn normalize_licenses<'a, I>(&self, raw: I) -> (Vec<Arc<License>>, LicenseIndex)
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let mut licenses = Vec::new();
        let mut index = LicenseIndex::default();

        for record in raw {
            let Some(license) = license_from_record(self.clean_record(record)) else {
                log::debug!("Skipping license record without a name");
                continue;
            };
            let license = Arc::new(license);
            if index.insert_first(Arc::clone(&license)) {
                licenses.push(license);
            } else {
                log::debug!("Dropping duplicate license {:?}", license.name);
            }
        }

        (licenses, index)
    }

    /// Normalize engines: generic pipeline, license resolution against
    /// `index`, then derived metrics.
    pub fn normalize_engines<'a, I>(&self, raw: I, index: &LicenseIndex) -> Vec<Engine>
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        raw.into_iter()
            .map(|record| {
                let mut engine = self.clean_record(record);
                let licenses_key = KnownField::Licenses.key();
                let resolved = resolve_licenses(engine.get(licenses_key), index);
                engine.insert(licenses_key, FieldValue::Licenses(resolved));
                derive_engine_metrics(&mut engine);
                engine
            })
            .collect()
    }

    /// Normalize a whole outfit document: licenses first, then engines
    /// (which reference them), then every other category.
    pub fn build_catalog(&self, document: &Map<String, JsonValue>) -> Catalog {
        let (licenses, license_index) =
            self.normalize_licenses(category_records(document, LICENSES));
        let engines = self.normalize_engines(category_records(document, ENGINES), &license_index);

        let mut others = BTreeMap::new();
        for (category, value) in document {
            if category == LICENSES || category == ENGINES {
                continue;
            }
            if !value.is_array() {
                log::warn!("Skipping category {category:?}: not an array of records");
                continue;
            }
            let records = self.normalize_records(category_records(document, category));
            log::debug!("Normalized {} records in {category:?}", records.len());
            others.insert(category.clone(), records);
        }

        log::info!(
            "Normalized {} licenses, {} engines, {} other categories",
            licenses.len(),
            engines.len(),
            others.len()
        );

        Catalog {
            licenses,
            license_index,
            engines,
            others,
        }
    }

    /// Field removal, key canonicalization and sign flips.
    fn clean_record(&self, raw: &RawRecord) -> Record {
        let mut record = Record::new();

        for (key, value) in raw {
            if self.ignore.matches(key) {
                continue;
            }

            let known = KnownField::from_key(key);
            let canonical = known.map_or_else(|| key.clone(), |f| f.key().to_string());
            // Two raw spellings of one known field: the first one wins.
            if record.contains_key(&canonical) {
                continue;
            }

            let mut value = FieldValue::from_json(value);
            if known.is_some_and(KnownField::is_consumed_capacity) {
                value = negate(value);
            }
            record.insert(canonical, value);
        }

        record
    }
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

fn negate(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Number(v) => FieldValue::Number(-v),
        other => other,
    }
}

/// Strip one trailing " License" from a license name.
pub fn strip_license_suffix(name: &str) -> &str {
    name.strip_suffix(LICENSE_SUFFIX).unwrap_or(name)
}

fn license_from_record(mut record: Record) -> Option<License> {
    let name = match record.remove(KnownField::Name.key())? {
        FieldValue::Text(name) => strip_license_suffix(&name).to_string(),
        _ => return None,
    };
    let cost = match record.remove(KnownField::Cost.key()) {
        Some(FieldValue::Number(cost)) => Some(cost),
        Some(other) => {
            record.insert(KnownField::Cost.key(), other);
            None
        }
        None => None,
    };

    Some(License {
        name,
        cost,
        extra: record.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
    })
}

/// License names referenced by a raw `licenses` value: a single string, an
/// array of strings, or an array of objects carrying a `name`.
pub fn license_names(value: Option<&FieldValue>) -> Vec<String> {
    match value {
        Some(FieldValue::Text(name)) => vec![name.clone()],
        Some(FieldValue::TextList(names)) => names.clone(),
        Some(FieldValue::Other(JsonValue::Array(items))) => items
            .iter()
            .filter_map(|item| match item {
                JsonValue::String(name) => Some(name.clone()),
                JsonValue::Object(obj) => obj.get("name").and_then(JsonValue::as_str).map(str::to_string),
                _ => None,
            })
            .collect(),
        Some(FieldValue::Licenses(licenses)) => licenses.iter().map(|l| l.name.clone()).collect(),
        _ => Vec::new(),
    }
}

/// Resolve referenced names against the license index, keeping source order.
/// Unknown names are dropped; names resolving to the same license collapse.
pub fn resolve_licenses(value: Option<&FieldValue>, index: &LicenseIndex) -> Vec<Arc<License>> {
    let mut resolved: Vec<Arc<License>> = Vec::new();
    for name in license_names(value) {
        let Some(license) = index.get(&name) else {
            log::trace!("Unknown license {name:?}");
            continue;
        };
        if !resolved.iter().any(|l| Arc::ptr_eq(l, license)) {
            resolved.push(Arc::clone(license));
        }
    }
    resolved
}

// ---------------------------------------------------------------------------
// Derived engine metrics
// ---------------------------------------------------------------------------

/// Round to `places` decimals the way a fixed-point print does: the exact
/// binary value decides, ties go away from zero. `1.2345` is stored as
/// `1.23449999...` and therefore rounds down to `1.234`.
///
/// Non-finite values and magnitudes of `1e21` or more come back unchanged.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() || value.abs() >= 1e21 {
        return value;
    }

    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let Some((int_part, fraction)) = exact.split_once('.') else {
        return value;
    };
    let (kept, dropped) = fraction.split_at(places.min(fraction.len()));

    let mut digits: Vec<u8> = int_part.bytes().chain(kept.bytes()).collect();
    if dropped.as_bytes().first().is_some_and(|&d| d >= b'5') {
        increment_decimal(&mut digits);
    }

    let split = digits.len() - kept.len();
    let text = format!(
        "{}.{}",
        String::from_utf8_lossy(&digits[..split]),
        String::from_utf8_lossy(&digits[split..])
    );
    text.parse::<f64>()
        .map_or(value, |rounded| rounded.copysign(value))
}

/// Add one unit in the last place to a string of ASCII digits.
fn increment_decimal(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Add the per-capacity ratios and the energy ratio to an engine.
///
/// Uses the already sign-flipped `engine capacity`, so per-capacity ratios
/// of ordinary engines come out negative. Every metric needs a numeric
/// capacity; the single-input ratios also need their input. A zero capacity
/// yields infinite (or NaN) ratios, which are stored as they are.
pub fn derive_engine_metrics(engine: &mut Engine) {
    let Some(capacity) = engine.number(KnownField::EngineCapacity.key()) else {
        return;
    };

    let thrust = engine.number(KnownField::Thrust.key());
    let turn = engine.number(KnownField::Turn.key());
    let reverse_thrust = engine.number(KnownField::ReverseThrust.key());
    let turning_energy = engine.number(KnownField::TurningEnergy.key());
    let thrusting_energy = engine.number(KnownField::ThrustingEnergy.key());

    let combined_thrust = thrust.unwrap_or(0.0) + turn.unwrap_or(0.0);
    let combined_energy = turning_energy.unwrap_or(0.0) + thrusting_energy.unwrap_or(0.0);
    let energy_divisor = if combined_thrust == 0.0 { 1.0 } else { combined_thrust };

    let metrics = [
        (THRUST_PER_CAPACITY, thrust.map(|t| round_to(t / capacity, RATIO_PLACES))),
        (TURN_PER_CAPACITY, turn.map(|t| round_to(t / capacity, RATIO_PLACES))),
        (
            REVERSE_THRUST_PER_CAPACITY,
            reverse_thrust.map(|t| round_to(t / capacity, RATIO_PLACES)),
        ),
        (
            THRUST_TURN_PER_CAPACITY,
            Some(round_to(combined_thrust / capacity, RATIO_PLACES)),
        ),
        (
            ENERGY_PER_COMBINED_THRUST,
            Some(round_to(combined_energy / energy_divisor, ENERGY_PLACES)),
        ),
    ];

    for (key, value) in metrics {
        if let Some(value) = value {
            engine.insert(key, FieldValue::Number(value));
        }
    }
}

// ---------------------------------------------------------------------------
// Document helpers
// ---------------------------------------------------------------------------

/// Object records of one category; non-object entries are skipped.
fn category_records<'a>(
    document: &'a Map<String, JsonValue>,
    category: &str,
) -> impl Iterator<Item = &'a RawRecord> {
    document
        .get(category)
        .and_then(JsonValue::as_array)
        .into_iter()
        .flatten()
        .filter_map(JsonValue::as_object)
}
