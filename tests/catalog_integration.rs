//! End-to-end checks of the load → normalize → filter pipeline against
//! in-memory documents and files on disk.

use std::io::Write;

use serde_json::{json, Value};
use tempfile::NamedTempFile;

use outfit_explorer::data::filter::{search_by_name, LicenseSelection};
use outfit_explorer::data::loader::{load_file, load_str};
use outfit_explorer::data::normalize::{
    round_to, RawRecord, THRUST_PER_CAPACITY, THRUST_TURN_PER_CAPACITY,
};
use outfit_explorer::data::pattern::{IgnoreSet, DEFAULT_IGNORE_PATTERNS};
use outfit_explorer::{
    filter_records, filtered_indices, Catalog, Constraint, FieldValue, FilterState, Normalizer,
};

// =============================================================================
// Fixtures
// =============================================================================

fn document() -> Value {
    json!({
        "Licenses": [
            { "name": "Pirate License", "cost": 1000 },
            { "name": "Navy License", "cost": 50000, "thumbnail": "outfit/navy" },
            { "name": "Pirate", "cost": 7 }
        ],
        "Engines": [
            { "name": "Ion Engine", "engine Capacity": 50, "Thrust": 30, "cost": 50,
              "Thumbnail": "outfit/ion", "flare sprite": "effect/ion", "licenses": ["Pirate"] },
            { "name": "Fusion Drive", "engine capacity": 80, "thrust": 60, "turn": 200,
              "cost": 200, "Outfit Space": 80, "licenses": "Navy" },
            { "name": "Sail", "cost": 500, "Description": "Slow.", "licenses": ["Ghost"] },
            { "name": "Plasma Thruster", "engine capacity": 0, "thrust": 10, "cost": 600,
              "afterburner flare effect": "effect/plasma", "licenses": ["Pirate", "Navy", "Pirate"] }
        ],
        "Guns": [
            { "name": "Ion Cannon", "outfit space": 20, "category": "Guns" },
            { "name": "Blaster", "outfit space": 10 }
        ]
    })
}

fn catalog() -> Catalog {
    load_str(&document().to_string(), &Normalizer::default()).unwrap()
}

fn raw_engines(doc: &Value) -> Vec<RawRecord> {
    doc["Engines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}

fn names<'a>(catalog: &'a Catalog, indices: &[usize]) -> Vec<&'a str> {
    indices
        .iter()
        .map(|&i| catalog.engines[i].name().unwrap())
        .collect()
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn normalizing_twice_yields_equal_collections() {
    let doc = document();
    let normalizer = Normalizer::default();
    let first = load_str(&doc.to_string(), &normalizer).unwrap();
    let second = load_str(&doc.to_string(), &normalizer).unwrap();

    assert_eq!(first.licenses, second.licenses);
    assert_eq!(first.engines, second.engines);
    assert_eq!(first.others, second.others);
}

#[test]
fn ignored_fields_never_survive() {
    let catalog = catalog();
    let ignore = IgnoreSet::new(DEFAULT_IGNORE_PATTERNS);

    for (_, records) in catalog.categories() {
        for record in records {
            for key in record.keys() {
                assert!(!ignore.matches(key), "ignored field {key:?} survived");
            }
        }
    }
    for license in &catalog.licenses {
        assert!(license.extra.keys().all(|k| !ignore.matches(k)));
    }
}

#[test]
fn capacities_are_negated() {
    let doc = document();
    let catalog = catalog();

    for (raw, engine) in raw_engines(&doc).iter().zip(&catalog.engines) {
        for (raw_key, raw_value) in raw {
            let lower = raw_key.to_lowercase();
            if lower != "engine capacity" && lower != "outfit space" {
                continue;
            }
            let expected = -raw_value.as_f64().unwrap();
            assert_eq!(engine.number(&lower), Some(expected), "{raw_key} on {:?}", engine.name());
        }
    }
}

#[test]
fn thrust_per_capacity_present_iff_inputs_numeric() {
    let catalog = catalog();

    for engine in &catalog.engines {
        let thrust = engine.number("thrust");
        let capacity = engine.number("engine capacity");
        let derived = engine.number(THRUST_PER_CAPACITY);
        match (thrust, capacity) {
            (Some(t), Some(c)) => {
                assert_eq!(derived, Some(round_to(t / c, 3)), "{:?}", engine.name());
            }
            _ => assert_eq!(derived, None, "{:?}", engine.name()),
        }
    }
}

#[test]
fn ion_engine_scenario() {
    let doc = json!({
        "Engines": [{ "engine Capacity": 50, "Thrust": 30, "name": "Ion Engine" }]
    });
    let catalog = load_str(&doc.to_string(), &Normalizer::default()).unwrap();
    let engine = &catalog.engines[0];

    assert_eq!(engine.name(), Some("Ion Engine"));
    assert_eq!(engine.number("engine capacity"), Some(-50.0));
    assert_eq!(engine.number("thrust"), Some(30.0));
    assert_eq!(engine.number(THRUST_PER_CAPACITY), Some(-0.6));
    assert!(!engine.contains_key("engine Capacity"));
    assert!(!engine.contains_key("Thrust"));
}

#[test]
fn zero_capacity_engine_keeps_its_ratios() {
    let doc = json!({ "Engines": [{ "name": "Z", "engine capacity": 0, "thrust": 5 }] });
    let catalog = load_str(&doc.to_string(), &Normalizer::default()).unwrap();
    let engine = &catalog.engines[0];

    assert_eq!(engine.number("thrust"), Some(5.0));
    assert_eq!(engine.number(THRUST_PER_CAPACITY), Some(f64::NEG_INFINITY));
    assert_eq!(engine.number(THRUST_TURN_PER_CAPACITY), Some(f64::NEG_INFINITY));
}

#[test]
fn pirate_license_scenario() {
    let doc = json!({ "Licenses": [{ "name": "Pirate License", "cost": 1000 }] });
    let catalog = load_str(&doc.to_string(), &Normalizer::default()).unwrap();

    assert_eq!(catalog.licenses.len(), 1);
    assert_eq!(catalog.licenses[0].name, "Pirate");
    assert_eq!(catalog.licenses[0].cost, Some(1000.0));
}

#[test]
fn duplicate_license_names_keep_the_first() {
    let catalog = catalog();

    let pirates: Vec<_> = catalog.licenses.iter().filter(|l| l.name == "Pirate").collect();
    assert_eq!(pirates.len(), 1);
    assert_eq!(pirates[0].cost, Some(1000.0));
    assert_eq!(catalog.sorted_license_names(), vec!["Navy", "Pirate"]);
}

#[test]
fn engine_licenses_resolve_against_the_collection() {
    let catalog = catalog();
    let licenses_of = |name: &str| -> Vec<String> {
        catalog
            .engines
            .iter()
            .find(|e| e.name() == Some(name))
            .unwrap()
            .licenses()
            .iter()
            .map(|l| l.name.clone())
            .collect()
    };

    assert_eq!(licenses_of("Ion Engine"), vec!["Pirate"]);
    assert_eq!(licenses_of("Fusion Drive"), vec!["Navy"]);
    assert!(licenses_of("Sail").is_empty());
    assert_eq!(licenses_of("Plasma Thruster"), vec!["Pirate", "Navy"]);
}

#[test]
fn other_categories_use_the_generic_pipeline() {
    let catalog = catalog();
    let guns = catalog.category("Guns").unwrap();

    assert_eq!(guns.len(), 2);
    assert_eq!(guns[0].number("outfit space"), Some(-20.0));
    assert!(!guns[0].contains_key("category"));
    assert!(!guns[0].contains_key(THRUST_PER_CAPACITY));
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn cost_range_is_inclusive() {
    let catalog = catalog();
    let mut filters = FilterState::new();
    filters.insert("cost".into(), Constraint::range(100.0, 500.0));

    let hits = filter_records(&catalog.engines, &filters, &LicenseSelection::new());
    let costs: Vec<f64> = hits.iter().filter_map(|e| e.number("cost")).collect();
    assert_eq!(costs, vec![200.0, 500.0]);
}

#[test]
fn name_substring_is_case_insensitive() {
    let catalog = catalog();
    let mut filters = FilterState::new();
    filters.insert("name".into(), Constraint::contains("ion"));

    let hits = filtered_indices(&catalog.engines, &filters, &LicenseSelection::new());
    assert_eq!(names(&catalog, &hits), vec!["Ion Engine", "Fusion Drive"]);
}

#[test]
fn constraints_are_conjunctive() {
    let catalog = catalog();
    let cost = Constraint::range(0.0, 300.0);
    let name = Constraint::contains("e");

    let mut filters = FilterState::new();
    filters.insert("cost".into(), cost.clone());
    filters.insert("name".into(), name.clone());
    let hits = filtered_indices(&catalog.engines, &filters, &LicenseSelection::new());

    for (i, engine) in catalog.engines.iter().enumerate() {
        let expected = cost.matches(engine.get("cost")) && name.matches(engine.get("name"));
        assert_eq!(hits.contains(&i), expected, "{:?}", engine.name());
    }
}

#[test]
fn filtering_keeps_input_order() {
    let catalog = catalog();
    let mut filters = FilterState::new();
    filters.insert("cost".into(), Constraint::range(0.0, 1000.0));

    let hits = filtered_indices(&catalog.engines, &filters, &LicenseSelection::new());
    assert!(hits.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(hits.len(), catalog.engines.len());
}

#[test]
fn empty_filter_returns_everything() {
    let catalog = catalog();
    let hits = filtered_indices(&catalog.engines, &FilterState::new(), &LicenseSelection::new());
    assert_eq!(hits, (0..catalog.engines.len()).collect::<Vec<_>>());
}

#[test]
fn filter_on_missing_field_matches_nothing() {
    let catalog = catalog();
    let mut filters = FilterState::new();
    filters.insert("shield generation".into(), Constraint::range(0.0, 1e9));

    assert!(filtered_indices(&catalog.engines, &filters, &LicenseSelection::new()).is_empty());
}

#[test]
fn license_selection_is_anded_with_constraints() {
    let catalog = catalog();
    let selection: LicenseSelection = ["Navy".to_string()].into_iter().collect();

    let hits = filtered_indices(&catalog.engines, &FilterState::new(), &selection);
    assert_eq!(names(&catalog, &hits), vec!["Fusion Drive", "Plasma Thruster"]);

    let mut filters = FilterState::new();
    filters.insert("cost".into(), Constraint::range(0.0, 300.0));
    let hits = filtered_indices(&catalog.engines, &filters, &selection);
    assert_eq!(names(&catalog, &hits), vec!["Fusion Drive"]);
}

#[test]
fn search_spans_categories() {
    let catalog = catalog();
    let results = search_by_name(&catalog, "ION", None);

    let summary: Vec<(&str, Vec<&str>)> = results
        .iter()
        .map(|g| (g.category, g.records.iter().map(|r| r.name().unwrap()).collect()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Engines", vec!["Ion Engine", "Fusion Drive"]),
            ("Guns", vec!["Ion Cannon"]),
        ]
    );
}

// =============================================================================
// Loading from disk
// =============================================================================

#[test]
fn load_file_reads_a_document() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", document()).unwrap();

    let catalog = load_file(file.path(), &Normalizer::default()).unwrap();
    assert_eq!(catalog.engines.len(), 4);
    assert_eq!(catalog.licenses.len(), 2);
}

#[test]
fn load_file_reports_bad_json_with_path() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let err = load_file(file.path(), &Normalizer::default()).unwrap_err();
    assert!(format!("{err:#}").contains(&file.path().display().to_string()));
}

#[test]
fn custom_ignore_patterns_apply() {
    let normalizer = Normalizer::new(IgnoreSet::new(["*cost*"]));
    let doc = json!({ "Engines": [{ "name": "Ion Engine", "Cost": 5, "thumbnail": "x" }] });
    let catalog = load_str(&doc.to_string(), &normalizer).unwrap();
    let engine = &catalog.engines[0];

    assert!(!engine.contains_key("cost"));
    assert_eq!(engine.get("thumbnail"), Some(&FieldValue::Text("x".into())));
}
