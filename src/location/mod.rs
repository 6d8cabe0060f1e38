//! Navigation targets and their normalization.
//!
//! # Data Flow
//! ```text
//! RawLocation ("/users/7?tab=posts#top" or Location { name, params, .. })
//!     → normalize.rs (relative params, relative paths, inline query/hash)
//!     → path.rs (segment resolution) + query.rs (query codec)
//!     → Location { normalized: true }
//! ```
//!
//! # Design Decisions
//! - Named targets are not given a path here; the matcher fills it
//! - A normalized Location passes through normalization unchanged

pub mod encoding;
pub mod normalize;
pub mod path;
pub mod query;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use normalize::normalize_location;
pub use query::{DefaultQueryCodec, QueryCodec};

/// Route parameters, decoded.
pub type Params = IndexMap<String, String>;

/// Parsed query string. Key order follows first appearance.
pub type Query = IndexMap<String, QueryValue>;

/// A query value. Repeated keys collect into a list; a key without `=` has
/// no value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(Option<String>),
    List(Vec<Option<String>>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(Some(value.to_string()))
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(Some(value))
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::List(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

/// A navigation target, addressed either by name or by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Location {
    pub name: Option<String>,
    pub path: Option<String>,
    pub params: Params,
    pub query: Query,
    /// Empty or starting with `#` once normalized.
    pub hash: String,
    /// Resolve a relative path by appending to the current path.
    pub append: bool,
    #[serde(skip)]
    pub normalized: bool,
}

impl Location {
    /// A path-addressed target.
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// A name-addressed target.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A target that only changes parameters of the current route.
    pub fn params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::default().with_params(params)
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    pub fn appended(mut self) -> Self {
        self.append = true;
        self
    }

    pub fn is_named(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

/// Anything that can be navigated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLocation {
    Path(String),
    Location(Location),
}

impl From<&str> for RawLocation {
    fn from(path: &str) -> Self {
        RawLocation::Path(path.to_string())
    }
}

impl From<String> for RawLocation {
    fn from(path: String) -> Self {
        RawLocation::Path(path)
    }
}

impl From<Location> for RawLocation {
    fn from(location: Location) -> Self {
        RawLocation::Location(location)
    }
}

impl From<&Location> for RawLocation {
    fn from(location: &Location) -> Self {
        RawLocation::Location(location.clone())
    }
}
