use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::Catalog;
use super::normalize::Normalizer;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why an outfit document could not be read.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a top-level JSON object of categories, found {0}")]
    NotAnObject(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse an outfit document.
///
/// Expected shape:
///
/// ```json
/// {
///   "Licenses": [{ "name": "Pirate License", "cost": 1000 }, ...],
///   "Engines":  [{ "name": "Ion Engine", "engine capacity": 50, ... }, ...],
///   "Guns":     [...],
///   ...
/// }
/// ```
pub fn parse_document(text: &str) -> Result<Map<String, JsonValue>, LoadError> {
    match serde_json::from_str::<JsonValue>(text)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(LoadError::NotAnObject(json_kind(&other))),
    }
}

/// Parse and normalize an outfit document held in memory.
pub fn load_str(text: &str, normalizer: &Normalizer) -> Result<Catalog, LoadError> {
    let document = parse_document(text)?;
    Ok(normalizer.build_catalog(&document))
}

/// Read, parse and normalize an outfit document from disk.
pub fn load_file(path: &Path, normalizer: &Normalizer) -> Result<Catalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading outfit file {}", path.display()))?;
    let catalog = load_str(&text, normalizer)
        .with_context(|| format!("parsing outfit file {}", path.display()))?;
    log::info!(
        "Loaded {} engines and {} licenses from {}",
        catalog.engines.len(),
        catalog.licenses.len(),
        path.display()
    );
    Ok(catalog)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_object_documents() {
        let err = parse_document("[1, 2]").unwrap_err();
        assert!(matches!(err, LoadError::NotAnObject("an array")));
        assert!(matches!(parse_document("{"), Err(LoadError::Json(_))));
    }

    #[test]
    fn missing_categories_yield_empty_collections() {
        let catalog = load_str("{}", &Normalizer::default()).unwrap();
        assert!(catalog.is_empty());
    }
}
