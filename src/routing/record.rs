//! Compiled route records and the values they carry.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::location::{Params, Query};
use crate::pattern::Pattern;
use crate::routing::route::Route;

/// Free-form metadata attached to a route.
pub type Meta = serde_json::Map<String, Value>;

/// Opaque handle the rendering layer registers per view slot.
pub type InstanceId = u64;

/// Slot name used when a route declares a single component.
pub const DEFAULT_SLOT: &str = "default";

/// Index of a record in its [`RouteTable`](crate::routing::RouteTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub(crate) usize);

impl RecordId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Reference to a component known to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ComponentRef(String);

impl ComponentRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Explicit fields of a redirect target. Unset fields are inherited from the
/// location being redirected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectTarget {
    pub name: Option<String>,
    pub path: Option<String>,
    pub query: Option<Query>,
    pub hash: Option<String>,
    pub params: Option<Params>,
}

impl RedirectTarget {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }
}

impl From<&str> for RedirectTarget {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

pub type ComputedRedirect = Arc<dyn Fn(&Route) -> RedirectTarget + Send + Sync>;

/// Where a route redirects to.
#[derive(Clone, Deserialize)]
#[serde(from = "RedirectConfig")]
pub enum Redirect {
    /// A path, possibly relative to the parent route.
    Literal(String),
    Structured(RedirectTarget),
    /// Computed from the route that would have matched.
    Computed(ComputedRedirect),
}

impl Redirect {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Route) -> RedirectTarget + Send + Sync + 'static,
    {
        Redirect::Computed(Arc::new(f))
    }
}

impl fmt::Debug for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Redirect::Literal(path) => f.debug_tuple("Literal").field(path).finish(),
            Redirect::Structured(target) => f.debug_tuple("Structured").field(target).finish(),
            Redirect::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Redirect {
    fn from(path: &str) -> Self {
        Redirect::Literal(path.to_string())
    }
}

impl From<RedirectTarget> for Redirect {
    fn from(target: RedirectTarget) -> Self {
        Redirect::Structured(target)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RedirectConfig {
    Literal(String),
    Structured(RedirectTarget),
}

impl From<RedirectConfig> for Redirect {
    fn from(config: RedirectConfig) -> Self {
        match config {
            RedirectConfig::Literal(path) => Redirect::Literal(path),
            RedirectConfig::Structured(target) => Redirect::Structured(target),
        }
    }
}

pub type ComputedProps = Arc<dyn Fn(&Route) -> Meta + Send + Sync>;

/// How a view slot receives props from the route.
#[derive(Clone, Deserialize)]
#[serde(from = "PropsConfig")]
pub enum PropsSpec {
    Disabled,
    /// Pass every route param as a prop.
    Params,
    Static(Meta),
    Computed(ComputedProps),
}

impl PropsSpec {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Route) -> Meta + Send + Sync + 'static,
    {
        PropsSpec::Computed(Arc::new(f))
    }

    pub fn resolve(&self, route: &Route) -> Option<Meta> {
        match self {
            PropsSpec::Disabled => None,
            PropsSpec::Params => Some(
                route
                    .params
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                    .collect(),
            ),
            PropsSpec::Static(props) => Some(props.clone()),
            PropsSpec::Computed(f) => Some(f(route)),
        }
    }
}

impl fmt::Debug for PropsSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropsSpec::Disabled => f.write_str("Disabled"),
            PropsSpec::Params => f.write_str("Params"),
            PropsSpec::Static(props) => f.debug_tuple("Static").field(props).finish(),
            PropsSpec::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PropsConfig {
    Flag(bool),
    Static(Meta),
}

impl From<PropsConfig> for PropsSpec {
    fn from(config: PropsConfig) -> Self {
        match config {
            PropsConfig::Flag(true) => PropsSpec::Params,
            PropsConfig::Flag(false) => PropsSpec::Disabled,
            PropsConfig::Static(props) => PropsSpec::Static(props),
        }
    }
}

/// One declared route after compilation.
///
/// Records live in the table arena and are shared by `Arc`; the parent link
/// is an index, so records never own their ancestors.
#[derive(Debug)]
pub struct RouteRecord {
    pub id: RecordId,
    /// Normalized path template.
    pub path: String,
    pub pattern: Arc<Pattern>,
    pub components: IndexMap<String, ComponentRef>,
    pub name: Option<String>,
    pub parent: Option<RecordId>,
    /// Canonical path when this record was created for an alias.
    pub match_as: Option<String>,
    pub redirect: Option<Redirect>,
    pub meta: Meta,
    pub props: IndexMap<String, PropsSpec>,
    instances: Mutex<IndexMap<String, InstanceId>>,
}

impl RouteRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: RecordId,
        path: String,
        pattern: Arc<Pattern>,
        components: IndexMap<String, ComponentRef>,
        name: Option<String>,
        parent: Option<RecordId>,
        match_as: Option<String>,
        redirect: Option<Redirect>,
        meta: Meta,
        props: IndexMap<String, PropsSpec>,
    ) -> Self {
        Self {
            id,
            path,
            pattern,
            components,
            name,
            parent,
            match_as,
            redirect,
            meta,
            props,
            instances: Mutex::new(IndexMap::new()),
        }
    }

    pub fn component(&self, slot: &str) -> Option<&ComponentRef> {
        self.components.get(slot)
    }

    /// Props for the component in `slot`, or `None` when the slot has none.
    pub fn resolve_props(&self, slot: &str, route: &Route) -> Option<Meta> {
        self.props.get(slot).and_then(|spec| spec.resolve(route))
    }

    /// Record (or with `None`, clear) the instance rendered in `slot`.
    pub fn register_instance(&self, slot: &str, instance: Option<InstanceId>) {
        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
        match instance {
            Some(instance) => {
                instances.insert(slot.to_string(), instance);
            }
            None => {
                instances.shift_remove(slot);
            }
        }
    }

    pub fn instance(&self, slot: &str) -> Option<InstanceId> {
        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(slot)
            .copied()
    }
}
