//! Dataset loading from JSON files.
//!
//! One file holds one semester's corpus: the declared schema (property name
//! to kind) and an array of flat language records. Datapoints are coerced to
//! their declared kinds here, so the engine never sees an untyped value.
//! Records carry a `name` key that, together with the semester label, forms
//! the identifying key of each language.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::construct::{Dataset, Language, OtherHasher, Schema};
use crate::datatype::{PropertyKind, Value};
use crate::error::{LingdbError, Result};

/// The property every record must carry to identify its language.
pub const NAME_PROPERTY: &str = "name";

#[derive(Deserialize)]
struct DatasetFile {
    semester: String,
    schema: HashMap<String, PropertyKind>,
    languages: Vec<serde_json::Map<String, serde_json::Value>>,
}

pub fn from_path(path: &Path) -> Result<Dataset> {
    let json = fs::read_to_string(path)
        .map_err(|e| LingdbError::Dataset(format!("cannot read {}: {e}", path.display())))?;
    from_str(&json)
}

pub fn from_str(json: &str) -> Result<Dataset> {
    let file: DatasetFile = serde_json::from_str(json)?;
    if file.schema.get(NAME_PROPERTY) != Some(&PropertyKind::Str) {
        return Err(LingdbError::Dataset(format!(
            "schema must declare '{NAME_PROPERTY}' with kind string"
        )));
    }
    let semester: Arc<str> = Arc::from(file.semester.as_str());
    let schema = Arc::new(Schema::new(file.schema.clone()));

    let mut languages = Vec::with_capacity(file.languages.len());
    for record in &file.languages {
        let name = record
            .get(NAME_PROPERTY)
            .and_then(|raw| raw.as_str())
            .ok_or_else(|| {
                LingdbError::Dataset(format!("record without a '{NAME_PROPERTY}' datapoint"))
            })?;
        let mut data: HashMap<String, Value, OtherHasher> = HashMap::default();
        for (key, raw) in record {
            let Some(kind) = file.schema.get(key).copied() else {
                warn!(semester = %semester, language = name, key, "skipping undeclared key");
                continue;
            };
            // null marks a datapoint that was not collected
            if raw.is_null() {
                continue;
            }
            let value = Value::from_json(kind, raw).ok_or_else(|| {
                LingdbError::Dataset(format!(
                    "datapoint '{key}' of language '{name}' does not match declared kind {kind}"
                ))
            })?;
            data.insert(key.clone(), value);
        }
        languages.push(Arc::new(Language::new(
            Arc::clone(&semester),
            name.to_owned(),
            Arc::clone(&schema),
            data,
        )));
    }
    info!(semester = %semester, languages = languages.len(), "dataset loaded");
    Ok(Dataset::new(semester, schema, languages))
}
