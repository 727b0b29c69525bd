use thiserror::Error;

use crate::datatype::PropertyKind;

#[derive(Error, Debug)]
pub enum LingdbError {
    #[error("Unknown property: {name}")]
    UnknownProperty { name: String },
    #[error("No property in focus for operation '{operation}'")]
    NoProperty { operation: &'static str },
    #[error("Operation '{operation}' is not valid for property '{property}' of kind {kind}")]
    TypeMismatch {
        operation: &'static str,
        property: String,
        kind: PropertyKind,
    },
    #[error("Language '{language}' has no value for property '{property}'")]
    MissingValue { language: String, property: String },
    #[error("Unrecognized mode: '{0}'")]
    UnrecognizedMode(String),
    #[error("Only {covered} of {total} languages have a value for property '{property}'")]
    Quorum {
        property: String,
        covered: usize,
        total: usize,
    },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Dataset error: {0}")]
    Dataset(String),
    #[error("Execution error: {0}")]
    Execution(String),
}

pub type Result<T> = std::result::Result<T, LingdbError>;

impl From<serde_json::Error> for LingdbError {
    fn from(e: serde_json::Error) -> Self {
        Self::Dataset(e.to_string())
    }
}
