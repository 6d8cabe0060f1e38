//! Resolved routes.

use std::sync::Arc;

use crate::location::query::QueryCodec;
use crate::location::{DefaultQueryCodec, Location, Params, Query};
use crate::routing::record::{Meta, RouteRecord};

/// The result of resolving a location.
///
/// `matched` runs from the root ancestor to the leaf record, so
/// `matched[depth]` is the record rendered at nesting level `depth`. It is
/// empty when nothing matched.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: Option<String>,
    pub meta: Meta,
    pub path: String,
    pub hash: String,
    pub query: Query,
    pub params: Params,
    pub full_path: String,
    pub matched: Vec<Arc<RouteRecord>>,
    /// The location as requested before the first redirect.
    pub redirected_from: Option<Location>,
}

impl Route {
    pub(crate) fn new(
        matched: Vec<Arc<RouteRecord>>,
        location: &Location,
        redirected_from: Option<Location>,
        codec: &dyn QueryCodec,
    ) -> Self {
        let leaf = matched.last();
        let path = location
            .path
            .clone()
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| "/".to_string());

        Self {
            name: location
                .name
                .clone()
                .or_else(|| leaf.and_then(|record| record.name.clone())),
            meta: leaf.map(|record| record.meta.clone()).unwrap_or_default(),
            full_path: full_path(&path, &location.query, &location.hash, codec),
            path,
            hash: location.hash.clone(),
            query: location.query.clone(),
            params: location.params.clone(),
            matched,
            redirected_from,
        }
    }

    /// The route in effect before any navigation: nothing matched, at `/`.
    pub fn start() -> Self {
        Self::new(Vec::new(), &Location::path("/"), None, &DefaultQueryCodec)
    }

    pub fn is_matched(&self) -> bool {
        !self.matched.is_empty()
    }

    /// The leaf record.
    pub fn record(&self) -> Option<&Arc<RouteRecord>> {
        self.matched.last()
    }

    /// Full path of the pre-redirect location.
    pub fn redirected_from_path(&self, codec: &dyn QueryCodec) -> Option<String> {
        self.redirected_from.as_ref().map(|location| {
            full_path(
                location.path.as_deref().unwrap_or_default(),
                &location.query,
                &location.hash,
                codec,
            )
        })
    }
}

/// `path + ?query + #hash`, with an empty path rendered as `/`.
pub fn full_path(path: &str, query: &Query, hash: &str, codec: &dyn QueryCodec) -> String {
    let path = if path.is_empty() { "/" } else { path };
    format!("{}{}{}", path, codec.stringify(query), hash)
}

fn strip_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

fn with_trailing_slash(path: &str) -> String {
    format!("{}/", strip_trailing_slash(path))
}

/// Two routes describe the same location, ignoring a trailing slash.
pub fn is_same_route(a: &Route, b: &Route) -> bool {
    strip_trailing_slash(&a.path) == strip_trailing_slash(&b.path) && a.hash == b.hash && a.query == b.query
}

/// `current` is at or below `target`: its path starts with the target path,
/// the target hash (if any) matches, and every target query key is present.
pub fn is_included_route(current: &Route, target: &Route) -> bool {
    with_trailing_slash(&current.path).starts_with(&with_trailing_slash(&target.path))
        && (target.hash.is_empty() || current.hash == target.hash)
        && target.query.keys().all(|key| current.query.contains_key(key))
}
