//! The submission surface between the selector forms and the engine.
//!
//! The form layer never sends Query objects; it sends [`QueryDescription`]s,
//! the terminal parameters of a chain (property, mode, k, selection list).
//! This module owns the one mapping from the six human-readable mode labels
//! to [`Mode`], builds the chain for each description against a kept dataset,
//! and shapes evaluations into serializable replies.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::construct::{Dataset, DatasetKeeper};
use crate::datatype::{Comparator, Mode, Value};
use crate::error::{LingdbError, Result};
use crate::query::Evaluation;

/// Default share of languages that must carry a queried property before the
/// results are considered representative; below this the batch fails with
/// [`LingdbError::Quorum`]. Overridable per interface.
const QUORUM_SHARE: f64 = 0.5;

/// Map a human-readable mode label onto the canonical [`Mode`].
///
/// Pure, total and case sensitive; unrecognized labels fail loudly rather
/// than falling back to anything.
pub fn parse_mode(label: &str) -> Result<Mode> {
    match label {
        "at least" => Ok(Mode::AtLeast),
        "at most" => Ok(Mode::AtMost),
        "exactly" => Ok(Mode::Exactly),
        "not equal to" => Ok(Mode::NotEqual),
        "less than" => Ok(Mode::LessThan),
        "more than" => Ok(Mode::MoreThan),
        other => Err(LingdbError::UnrecognizedMode(other.to_owned())),
    }
}

/// The serializable form of one completed query.
#[derive(Deserialize, Debug)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryDescription {
    /// Count how many of `selection` appear in the property and keep the
    /// languages where the count satisfies `mode` against `k`.
    Contains {
        property: String,
        mode: String,
        k: usize,
        selection: Vec<String>,
    },
    /// Keep the languages whose property value satisfies the comparison.
    /// The value is coerced to the declared kind of the property.
    Compare {
        property: String,
        operator: Comparator,
        value: serde_json::Value,
    },
    /// Report the property value per language, optionally reduced to the
    /// size of a set-of-string datapoint.
    Project {
        property: String,
        #[serde(default)]
        length: bool,
    },
}

impl QueryDescription {
    pub fn property(&self) -> &str {
        match self {
            QueryDescription::Contains { property, .. } => property,
            QueryDescription::Compare { property, .. } => property,
            QueryDescription::Project { property, .. } => property,
        }
    }
}

/// One row of a projection reply.
#[derive(Serialize, Debug)]
pub struct ValueRow {
    pub language: String,
    pub value: Value,
}

/// What one description evaluates to, shaped for the form layer.
#[derive(Serialize, Debug)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryReply {
    Matches {
        count: usize,
        languages: Vec<String>,
    },
    Values {
        rows: Vec<ValueRow>,
    },
}

/// Owns the dataset keeper and runs batches of query descriptions.
pub struct QueryInterface {
    datasets: Mutex<DatasetKeeper>,
    quorum_share: f64,
}

impl QueryInterface {
    pub fn new() -> Self {
        Self::with_quorum_share(QUORUM_SHARE)
    }

    pub fn with_quorum_share(quorum_share: f64) -> Self {
        Self {
            datasets: Mutex::new(DatasetKeeper::new()),
            quorum_share,
        }
    }

    pub fn keep_dataset(&self, dataset: Dataset) -> (Arc<Dataset>, bool) {
        self.datasets.lock().unwrap().keep(dataset)
    }
    pub fn activate(&self, semester: &str) -> Result<Arc<Dataset>> {
        self.datasets.lock().unwrap().activate(semester)
    }
    pub fn active(&self) -> Option<Arc<Dataset>> {
        self.datasets.lock().unwrap().active()
    }

    /// Run a batch of descriptions against the named semester's dataset, or
    /// against the active dataset when no semester is given. The batch fails
    /// on the first invalid description; valid descriptions never corrupt one
    /// another, since each builds its own chain.
    pub fn run(
        &self,
        semester: Option<&str>,
        descriptions: &[QueryDescription],
    ) -> Result<Vec<QueryReply>> {
        let dataset = match semester {
            Some(semester) => self.datasets.lock().unwrap().get(semester).ok_or_else(|| {
                LingdbError::Dataset(format!("no dataset kept for semester '{semester}'"))
            })?,
            None => self
                .active()
                .ok_or_else(|| LingdbError::Dataset("no active dataset".to_owned()))?,
        };
        descriptions
            .iter()
            .map(|description| self.run_one(&dataset, description))
            .collect()
    }

    fn run_one(&self, dataset: &Dataset, description: &QueryDescription) -> Result<QueryReply> {
        let property = description.property();
        // The engine fails loudly on missing datapoints, so the form layer
        // narrows explicitly to the languages that carry the property. A
        // batch over a poorly covered property fails outright; a result a
        // caller could mistake for full coverage is never returned.
        let root = dataset.query().has(property)?;
        let covered = root.languages().len();
        if !dataset.is_empty() && (covered as f64 / dataset.len() as f64) < self.quorum_share {
            warn!(
                semester = dataset.semester(),
                property,
                covered,
                total = dataset.len(),
                "data coverage below quorum"
            );
            return Err(LingdbError::Quorum {
                property: property.to_owned(),
                covered,
                total: dataset.len(),
            });
        }
        let query = match description {
            QueryDescription::Contains {
                property,
                mode,
                k,
                selection,
            } => {
                let mode = parse_mode(mode)?;
                root.property(property)?
                    .contains(mode, *k, selection.iter().cloned())?
            }
            QueryDescription::Compare {
                property,
                operator,
                value,
            } => {
                let kind = dataset.schema().property_ref(property)?.kind();
                let value = Value::from_json(kind, value).ok_or_else(|| {
                    LingdbError::Dataset(format!(
                        "comparison value for '{property}' does not match declared kind {kind}"
                    ))
                })?;
                root.property(property)?.compare(*operator, value)?
            }
            QueryDescription::Project { property, length } => {
                let focused = root.property(property)?;
                if *length { focused.length()? } else { focused }
            }
        };
        Ok(reply_from(query.evaluate()?))
    }
}

impl Default for QueryInterface {
    fn default() -> Self {
        Self::new()
    }
}

fn reply_from(evaluation: Evaluation) -> QueryReply {
    match evaluation {
        Evaluation::Languages(languages) => QueryReply::Matches {
            count: languages.len(),
            languages: languages
                .iter()
                .map(|language| language.name().to_owned())
                .collect(),
        },
        Evaluation::Projections(projections) => QueryReply::Values {
            rows: projections
                .into_iter()
                .map(|projection| ValueRow {
                    language: projection.language.name().to_owned(),
                    value: projection.value,
                })
                .collect(),
        },
    }
}
