// keepers and datapoint maps use a fast hasher since keys are short strings
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;
use std::collections::HashMap;

// used to print out readable forms of a construct
use std::fmt;
// languages are hashable so result sets can be deduplicated by identity
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// our own stuff that we need
use crate::datatype::{PropertyKind, Value};
use crate::error::{LingdbError, Result};
use crate::query::Query;

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

// ------------- Schema -------------
/// The declared properties of one dataset: property name to kind.
///
/// A schema is built once by the loader and shared read-only by every
/// language and query over that dataset.
#[derive(Debug)]
pub struct Schema {
    properties: HashMap<String, PropertyKind, OtherHasher>,
}

impl Schema {
    pub fn new(properties: impl IntoIterator<Item = (String, PropertyKind)>) -> Self {
        Self {
            properties: properties.into_iter().collect(),
        }
    }
    pub fn kind(&self, name: &str) -> Option<PropertyKind> {
        self.properties.get(name).copied()
    }
    /// Resolve a property name into a typed handle, or fail for names
    /// outside the declared schema.
    pub fn property_ref(&self, name: &str) -> Result<PropertyRef> {
        match self.kind(name) {
            Some(kind) => Ok(PropertyRef {
                name: Arc::from(name),
                kind,
            }),
            None => Err(LingdbError::UnknownProperty {
                name: name.to_owned(),
            }),
        }
    }
    pub fn len(&self) -> usize {
        self.properties.len()
    }
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

// ------------- PropertyRef -------------
/// A typed handle naming one language attribute plus its declared kind.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct PropertyRef {
    name: Arc<str>,
    kind: PropertyKind,
}

impl PropertyRef {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }
}
impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::<{}>", self.name, self.kind)
    }
}

// ------------- Language -------------
/// One dataset row: an immutable record of the datapoints collected for a
/// single natural language.
///
/// Identity is the pair (semester, name); two languages compare equal on that
/// key alone, not on a deep comparison of every datapoint. There are no
/// mutators, so references can be shared between query chains freely.
#[derive(Debug)]
pub struct Language {
    semester: Arc<str>,
    name: String,
    schema: Arc<Schema>,
    data: HashMap<String, Value, OtherHasher>,
}

impl Language {
    pub fn new(
        semester: Arc<str>,
        name: String,
        schema: Arc<Schema>,
        data: HashMap<String, Value, OtherHasher>,
    ) -> Self {
        Self {
            semester,
            name,
            schema,
            data,
        }
    }
    pub fn semester(&self) -> &str {
        &self.semester
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Get the value of the named datapoint.
    ///
    /// Fails for names outside the declared schema. A declared property that
    /// simply was not collected for this language yields `Ok(None)`.
    pub fn get(&self, property: &str) -> Result<Option<&Value>> {
        if self.schema.kind(property).is_none() {
            return Err(LingdbError::UnknownProperty {
                name: property.to_owned(),
            });
        }
        Ok(self.data.get(property))
    }
    /// True if a datapoint is present for the named property.
    /// Names outside the schema are simply absent.
    pub fn carries(&self, property: &str) -> bool {
        self.data.contains_key(property)
    }
    /// Structural equality on the identifying key (semester + name).
    pub fn equals(&self, other: &Language) -> bool {
        *self.semester == *other.semester && self.name == other.name
    }
}
impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}
impl Eq for Language {}
impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.semester.hash(state);
        self.name.hash(state);
    }
}
impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.semester)
    }
}

// ------------- Dataset -------------
/// One semester's corpus: an ordered collection of languages sharing a schema.
///
/// The order is the dataset order and is preserved through filtering.
pub struct Dataset {
    semester: Arc<str>,
    schema: Arc<Schema>,
    languages: Vec<Arc<Language>>,
}

impl Dataset {
    pub fn new(semester: Arc<str>, schema: Arc<Schema>, languages: Vec<Arc<Language>>) -> Self {
        Self {
            semester,
            schema,
            languages,
        }
    }
    pub fn semester(&self) -> &str {
        &self.semester
    }
    pub fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }
    pub fn languages(&self) -> &[Arc<Language>] {
        &self.languages
    }
    pub fn len(&self) -> usize {
        self.languages.len()
    }
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
    /// The root query factory: a fresh, unfocused query over the whole corpus.
    pub fn query(&self) -> Query {
        Query::over(Arc::clone(&self.schema), self.languages.clone())
    }
}

// ------------- DatasetKeeper -------------
/// Owns the loaded datasets, keyed by semester, and tracks which one is
/// active. Keeping a semester again replaces its dataset wholesale.
pub struct DatasetKeeper {
    kept: HashMap<String, Arc<Dataset>, OtherHasher>,
    active: Option<Arc<Dataset>>,
}

impl DatasetKeeper {
    pub fn new() -> Self {
        Self {
            kept: HashMap::default(),
            active: None,
        }
    }
    pub fn keep(&mut self, dataset: Dataset) -> (Arc<Dataset>, bool) {
        let keepsake = Arc::new(dataset);
        let previously_kept = self
            .kept
            .insert(keepsake.semester().to_owned(), Arc::clone(&keepsake))
            .is_some();
        // the first dataset kept becomes active, and a replacement dataset
        // takes over from the one it replaces
        match &self.active {
            None => self.active = Some(Arc::clone(&keepsake)),
            Some(active) if active.semester() == keepsake.semester() => {
                self.active = Some(Arc::clone(&keepsake));
            }
            Some(_) => (),
        }
        (keepsake, previously_kept)
    }
    pub fn get(&self, semester: &str) -> Option<Arc<Dataset>> {
        self.kept.get(semester).map(Arc::clone)
    }
    pub fn activate(&mut self, semester: &str) -> Result<Arc<Dataset>> {
        match self.get(semester) {
            Some(dataset) => {
                self.active = Some(Arc::clone(&dataset));
                Ok(dataset)
            }
            None => Err(LingdbError::Dataset(format!(
                "no dataset kept for semester '{semester}'"
            ))),
        }
    }
    pub fn active(&self) -> Option<Arc<Dataset>> {
        self.active.as_ref().map(Arc::clone)
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
}

impl Default for DatasetKeeper {
    fn default() -> Self {
        Self::new()
    }
}
