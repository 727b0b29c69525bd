// used for query descriptions coming off the wire and replies going back
use serde::{Deserialize, Serialize};

// set-of-string datapoints keep their glyphs ordered for stable display
use std::collections::BTreeSet;
// used to print out readable forms of a data type
use std::fmt;

/// The declared kind of a property in a dataset schema.
///
/// Every datapoint a [`crate::construct::Language`] carries has exactly one of
/// these kinds, and operations are validated against them before a query chain
/// may proceed.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "string")]
    Str,
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "set-of-string")]
    SetOfStr,
    #[serde(rename = "categorical")]
    Categorical,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropertyKind::Str => write!(f, "string"),
            PropertyKind::Bool => write!(f, "bool"),
            PropertyKind::Number => write!(f, "number"),
            PropertyKind::SetOfStr => write!(f, "set-of-string"),
            PropertyKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// One datapoint value held by a language.
///
/// Categorical values are kept apart from plain strings so that equality
/// against the wrong family of property fails validation instead of silently
/// comparing across kinds.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Bool(bool),
    Number(i64),
    SetOfStr(BTreeSet<String>),
    Categorical(String),
}

impl Value {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Value::Str(_) => PropertyKind::Str,
            Value::Bool(_) => PropertyKind::Bool,
            Value::Number(_) => PropertyKind::Number,
            Value::SetOfStr(_) => PropertyKind::SetOfStr,
            Value::Categorical(_) => PropertyKind::Categorical,
        }
    }
    /// Coerce a raw JSON value into the declared kind of its property.
    /// Returns `None` when the JSON shape does not match the kind.
    pub fn from_json(kind: PropertyKind, raw: &serde_json::Value) -> Option<Value> {
        match kind {
            PropertyKind::Str => raw.as_str().map(|s| Value::Str(s.to_owned())),
            PropertyKind::Bool => raw.as_bool().map(Value::Bool),
            PropertyKind::Number => raw.as_i64().map(Value::Number),
            PropertyKind::SetOfStr => raw.as_array().and_then(|items| {
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_owned))
                    .collect::<Option<BTreeSet<String>>>()
                    .map(Value::SetOfStr)
            }),
            PropertyKind::Categorical => raw.as_str().map(|s| Value::Categorical(s.to_owned())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::SetOfStr(set) => {
                let mut s = String::new();
                for member in set {
                    s += member;
                    s += ", ";
                }
                s.pop();
                s.pop();
                write!(f, "{{{}}}", s)
            }
            Value::Categorical(c) => write!(f, "{}", c),
        }
    }
}

/// The comparison operators accepted by `compare`.
///
/// The ordered operators carry total-order semantics on the number kind only;
/// `Eq` and `Neq` are additionally legal on string, bool and categorical
/// properties.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparator {
    /// True for the operators that require an ordered kind.
    pub fn ordered(&self) -> bool {
        matches!(self, Comparator::Lt | Comparator::Lte | Comparator::Gt | Comparator::Gte)
    }
    pub fn compare<T: Ord + ?Sized>(&self, left: &T, right: &T) -> bool {
        match self {
            Comparator::Eq => left == right,
            Comparator::Neq => left != right,
            Comparator::Lt => left < right,
            Comparator::Lte => left <= right,
            Comparator::Gt => left > right,
            Comparator::Gte => left >= right,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Comparator::Eq => write!(f, "eq"),
            Comparator::Neq => write!(f, "neq"),
            Comparator::Lt => write!(f, "lt"),
            Comparator::Lte => write!(f, "lte"),
            Comparator::Gt => write!(f, "gt"),
            Comparator::Gte => write!(f, "gte"),
        }
    }
}

/// The canonical six-way counting comparison used by `contains`.
///
/// The selector forms send these as human-readable labels ("at least",
/// "more than", ...); the mapping from labels to this enum lives in the
/// interface layer, exactly once.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Mode {
    AtLeast,
    AtMost,
    Exactly,
    NotEqual,
    LessThan,
    MoreThan,
}

impl Mode {
    /// Apply the mode as `count <mode> k`.
    pub fn satisfied(&self, count: usize, k: usize) -> bool {
        match self {
            Mode::AtLeast => count >= k,
            Mode::AtMost => count <= k,
            Mode::Exactly => count == k,
            Mode::NotEqual => count != k,
            Mode::LessThan => count < k,
            Mode::MoreThan => count > k,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::AtLeast => write!(f, "at-least"),
            Mode::AtMost => write!(f, "at-most"),
            Mode::Exactly => write!(f, "exactly"),
            Mode::NotEqual => write!(f, "not-equal"),
            Mode::LessThan => write!(f, "less-than"),
            Mode::MoreThan => write!(f, "more-than"),
        }
    }
}
