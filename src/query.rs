//! The chainable query engine over a language collection.
//!
//! A [`Query`] is one immutable node in a chain. Every chain step returns a
//! new node; nothing ever mutates a node a caller already holds, so partial
//! chains can be kept around and extended in different directions. Evaluation
//! is lazy and memoized per node, and is a pure function of the node's
//! (source collection, focused property, operation) triple.

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::construct::{Language, PropertyRef, Schema};
use crate::datatype::{Comparator, Mode, PropertyKind, Value};
use crate::error::{LingdbError, Result};

// ------------- Operation -------------
/// The closed set of operations that can act on a focused property.
///
/// Each variant carries its own validation rule against the declared kind of
/// the property it is applied to, checked at the chain step.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Operation {
    Compare(Comparator, Value),
    Contains(Mode, usize, BTreeSet<String>),
    Length,
    IsTrue,
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::Compare(..) => "compare",
            Operation::Contains(..) => "contains",
            Operation::Length => "length",
            Operation::IsTrue => "is_true",
        }
    }
    /// Predicates narrow the source collection; anything else projects one
    /// value per language.
    pub fn is_predicate(&self) -> bool {
        !matches!(self, Operation::Length)
    }
    fn validate(&self, property: &PropertyRef) -> Result<()> {
        let valid = match self {
            Operation::Compare(comparator, value) => {
                if comparator.ordered() {
                    property.kind() == PropertyKind::Number && value.kind() == PropertyKind::Number
                } else {
                    property.kind() == value.kind()
                        && matches!(
                            property.kind(),
                            PropertyKind::Number
                                | PropertyKind::Str
                                | PropertyKind::Bool
                                | PropertyKind::Categorical
                        )
                }
            }
            Operation::Contains(..) => property.kind() == PropertyKind::SetOfStr,
            Operation::Length => property.kind() == PropertyKind::SetOfStr,
            Operation::IsTrue => property.kind() == PropertyKind::Bool,
        };
        if valid {
            Ok(())
        } else {
            Err(LingdbError::TypeMismatch {
                operation: self.name(),
                property: property.name().to_owned(),
                kind: property.kind(),
            })
        }
    }
    // Predicate application. Only called on values that passed validation,
    // so the kinds are known to line up.
    fn test(&self, value: &Value) -> bool {
        match self {
            Operation::Compare(comparator, right) => match (value, right) {
                (Value::Number(l), Value::Number(r)) => comparator.compare(l, r),
                (Value::Str(l), Value::Str(r)) => comparator.compare(l, r),
                (Value::Bool(l), Value::Bool(r)) => comparator.compare(l, r),
                (Value::Categorical(l), Value::Categorical(r)) => comparator.compare(l, r),
                _ => false,
            },
            Operation::Contains(mode, k, selection) => match value {
                Value::SetOfStr(set) => mode.satisfied(set.intersection(selection).count(), *k),
                _ => false,
            },
            Operation::IsTrue => matches!(value, Value::Bool(true)),
            Operation::Length => false,
        }
    }
    // Scalar transform application.
    fn project(&self, value: &Value) -> Value {
        match (self, value) {
            (Operation::Length, Value::SetOfStr(set)) => Value::Number(set.len() as i64),
            _ => value.clone(),
        }
    }
}

// ------------- Evaluation -------------
/// One (language, value) pair produced by a projection or scalar transform.
/// Identity is preserved so callers can map values back to languages.
#[derive(Clone, Debug)]
pub struct Projection {
    pub language: Arc<Language>,
    pub value: Value,
}

/// What a chain evaluates to: a narrowed language collection when the last
/// step was a predicate, or one value per language otherwise.
#[derive(Clone, Debug)]
pub enum Evaluation {
    Languages(Vec<Arc<Language>>),
    Projections(Vec<Projection>),
}

impl Evaluation {
    pub fn len(&self) -> usize {
        match self {
            Evaluation::Languages(languages) => languages.len(),
            Evaluation::Projections(projections) => projections.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ------------- Query -------------
/// One immutable node in a query chain.
///
/// Constructed by [`crate::construct::Dataset::query`] (the root factory) or
/// by chaining from an existing node. The source collection is handed in
/// explicitly; there is no module-level dataset state.
#[derive(Debug)]
pub struct Query {
    schema: Arc<Schema>,
    languages: Arc<Vec<Arc<Language>>>,
    property: Option<PropertyRef>,
    operation: Option<Operation>,
    evaluation: OnceLock<Evaluation>,
}

impl Query {
    pub fn over(schema: Arc<Schema>, languages: Vec<Arc<Language>>) -> Self {
        Self {
            schema,
            languages: Arc::new(languages),
            property: None,
            operation: None,
            evaluation: OnceLock::new(),
        }
    }

    pub fn languages(&self) -> &[Arc<Language>] {
        &self.languages
    }
    pub fn focused_property(&self) -> Option<&PropertyRef> {
        self.property.as_ref()
    }
    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }

    // The source collection for a chained step: an evaluated predicate hands
    // its narrowed collection on, everything else passes through unchanged.
    fn derive(&self) -> Result<Arc<Vec<Arc<Language>>>> {
        if self.operation.as_ref().is_some_and(Operation::is_predicate) {
            match self.evaluate()? {
                Evaluation::Languages(languages) => Ok(Arc::new(languages)),
                Evaluation::Projections(_) => Ok(Arc::clone(&self.languages)),
            }
        } else {
            Ok(Arc::clone(&self.languages))
        }
    }

    /// Focus a property, resetting any operation. Valid from any state.
    pub fn property(&self, name: &str) -> Result<Query> {
        let property = self.schema.property_ref(name)?;
        Ok(Query {
            schema: Arc::clone(&self.schema),
            languages: self.derive()?,
            property: Some(property),
            operation: None,
            evaluation: OnceLock::new(),
        })
    }

    /// Whole-language predicate: keep the languages that carry a datapoint
    /// for the named property. The resulting query is unfocused.
    pub fn has(&self, name: &str) -> Result<Query> {
        let property = self.schema.property_ref(name)?;
        let languages = self.derive()?;
        let retained: Vec<Arc<Language>> = languages
            .iter()
            .filter(|language| language.carries(property.name()))
            .map(Arc::clone)
            .collect();
        Ok(Query {
            schema: Arc::clone(&self.schema),
            languages: Arc::new(retained),
            property: None,
            operation: None,
            evaluation: OnceLock::new(),
        })
    }

    pub fn compare(&self, comparator: Comparator, value: Value) -> Result<Query> {
        self.operate(Operation::Compare(comparator, value))
    }
    /// Count `|P ∩ selection|` per language and keep those where the count
    /// satisfies `mode` against `k`.
    pub fn contains(
        &self,
        mode: Mode,
        k: usize,
        selection: impl IntoIterator<Item = String>,
    ) -> Result<Query> {
        self.operate(Operation::Contains(mode, k, selection.into_iter().collect()))
    }
    /// Scalar transform: the size of a set-of-string datapoint.
    pub fn length(&self) -> Result<Query> {
        self.operate(Operation::Length)
    }
    pub fn is_true(&self) -> Result<Query> {
        self.operate(Operation::IsTrue)
    }
    pub fn eq(&self, value: Value) -> Result<Query> {
        self.compare(Comparator::Eq, value)
    }
    pub fn neq(&self, value: Value) -> Result<Query> {
        self.compare(Comparator::Neq, value)
    }

    // Chaining a new operation copies the node and overwrites the operation;
    // the focused property and source collection stay as they are.
    fn operate(&self, operation: Operation) -> Result<Query> {
        let property = match &self.property {
            Some(property) => property.clone(),
            None => {
                return Err(LingdbError::NoProperty {
                    operation: operation.name(),
                });
            }
        };
        operation.validate(&property)?;
        Ok(Query {
            schema: Arc::clone(&self.schema),
            languages: Arc::clone(&self.languages),
            property: Some(property),
            operation: Some(operation),
            evaluation: OnceLock::new(),
        })
    }

    /// Evaluate this node. The result is memoized, and evaluating twice
    /// without chaining yields equal results.
    ///
    /// A missing datapoint fails with
    /// [`LingdbError::MissingValue`] instead of being silently excluded.
    pub fn evaluate(&self) -> Result<Evaluation> {
        if let Some(evaluation) = self.evaluation.get() {
            return Ok(evaluation.clone());
        }
        let evaluation = self.compute()?;
        Ok(self.evaluation.get_or_init(|| evaluation).clone())
    }

    fn compute(&self) -> Result<Evaluation> {
        let Some(property) = &self.property else {
            // unfocused: the identity mapping over the source collection
            return Ok(Evaluation::Languages(self.languages.as_ref().clone()));
        };
        match &self.operation {
            None => {
                // raw projection of the focused property
                let mut projections = Vec::with_capacity(self.languages.len());
                for language in self.languages.iter() {
                    let value = Self::datapoint(language, property)?;
                    projections.push(Projection {
                        language: Arc::clone(language),
                        value: value.clone(),
                    });
                }
                Ok(Evaluation::Projections(projections))
            }
            Some(operation) if operation.is_predicate() => {
                let mut retained = Vec::new();
                for language in self.languages.iter() {
                    let value = Self::datapoint(language, property)?;
                    if operation.test(value) {
                        retained.push(Arc::clone(language));
                    }
                }
                debug!(
                    property = property.name(),
                    retained = retained.len(),
                    of = self.languages.len(),
                    "predicate evaluated"
                );
                Ok(Evaluation::Languages(retained))
            }
            Some(operation) => {
                let mut projections = Vec::with_capacity(self.languages.len());
                for language in self.languages.iter() {
                    let value = Self::datapoint(language, property)?;
                    projections.push(Projection {
                        language: Arc::clone(language),
                        value: operation.project(value),
                    });
                }
                Ok(Evaluation::Projections(projections))
            }
        }
    }

    fn datapoint<'a>(language: &'a Language, property: &PropertyRef) -> Result<&'a Value> {
        language.get(property.name())?.ok_or_else(|| LingdbError::MissingValue {
            language: language.name().to_owned(),
            property: property.name().to_owned(),
        })
    }
}
