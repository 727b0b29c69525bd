//! Lingdb – an in-memory query engine over linguistic-typology datasets.
//!
//! Lingdb centers on two constructs:
//! * A [`construct::Language`] is an immutable record of one natural
//!   language's datapoints (phoneme inventories, typological traits), typed
//!   by the dataset's [`construct::Schema`].
//! * A [`query::Query`] is one immutable node in a chain over a collection of
//!   languages. Chaining (`property`, `compare`, `contains`, `length`, ...)
//!   always returns a new node; evaluation is lazy, memoized and pure.
//!
//! A chain whose last step is a predicate evaluates to a narrowed language
//! collection; a projection or scalar transform evaluates to one
//! (language, value) pair per language, so values can always be mapped back
//! to the language they came from.
//!
//! ## Modules
//! * [`construct`] – Schema, property handles, languages, datasets and the
//!   dataset keeper.
//! * [`datatype`] – Property kinds, datapoint values and the comparison
//!   operators (including the canonical six-way counting [`datatype::Mode`]).
//! * [`query`] – The chainable query engine and its evaluation results.
//! * [`load`] – JSON dataset loading and kind coercion.
//! * [`interface`] – Query descriptions, the mode-label mapping and reply
//!   shaping for the selector forms.
//! * [`server`] – An axum endpoint accepting batches of query descriptions.
//!
//! ## Quick Start
//! ```
//! use lingdb::datatype::{Comparator, Value};
//! use lingdb::load;
//!
//! let dataset = load::from_str(r#"{
//!     "semester": "F19",
//!     "schema": {"name": "string", "num_consonants": "number"},
//!     "languages": [
//!         {"name": "Kalaallisut", "num_consonants": 18},
//!         {"name": "Rotokas", "num_consonants": 6}
//!     ]
//! }"#).unwrap();
//! let matches = dataset
//!     .query()
//!     .property("num_consonants").unwrap()
//!     .compare(Comparator::Gte, Value::Number(10)).unwrap()
//!     .evaluate().unwrap();
//! assert_eq!(matches.len(), 1);
//! ```
//!
//! ## Errors
//! All validation failures are reported synchronously at the chain step that
//! caused them (see [`error::LingdbError`]); a failing step never corrupts
//! the nodes built before it, and no failure is ever swallowed into an empty
//! result.

pub mod construct;
pub mod datatype;
pub mod error;
pub mod interface;
pub mod load;
pub mod query;
pub mod server;
