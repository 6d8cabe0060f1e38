//! Location matching and redirect/alias resolution.
//!
//! # Responsibilities
//! - Match a named location through the name index
//! - Match a path location by scanning the table in priority order
//! - Follow redirects and aliases until a concrete route is produced
//!
//! # Design Decisions
//! - No match is not an error: the route simply has nothing in `matched`
//! - First match wins; wildcard routes are scanned last
//! - Redirects inherit query, hash and params field by field
//! - Redirect hops per call are bounded by `RouterOptions::max_redirects`

use std::sync::Arc;

use crate::config::validation::check_routes;
use crate::config::{ConfigError, RouteConfig, RouterConfig, RouterOptions};
use crate::error::RouterError;
use crate::location::path::resolve_path;
use crate::location::query::QueryCodec;
use crate::location::{normalize_location, DefaultQueryCodec, Location, Params, RawLocation};
use crate::pattern::{fill_params, PatternCache};
use crate::routing::record::{Redirect, RedirectTarget, RouteRecord};
use crate::routing::route::Route;
use crate::routing::table::RouteTable;

/// A location resolved for a navigation link.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The normalized target.
    pub location: Location,
    pub route: Route,
    /// Full path to link to: the pre-redirect path when the target
    /// redirects, otherwise the route's own full path.
    pub full_path: String,
}

/// Resolves locations against a route table.
#[derive(Debug)]
pub struct Matcher {
    table: RouteTable,
    cache: PatternCache,
    options: RouterOptions,
    codec: Arc<dyn QueryCodec>,
}

impl Matcher {
    /// Build a matcher with its own pattern cache.
    pub fn new(routes: &[RouteConfig], options: RouterOptions) -> Result<Self, RouterError> {
        Self::with_cache(routes, options, PatternCache::new())
    }

    /// Build a matcher that shares `cache` with other matchers.
    pub fn with_cache(
        routes: &[RouteConfig],
        options: RouterOptions,
        cache: PatternCache,
    ) -> Result<Self, RouterError> {
        let mut matcher = Self {
            table: RouteTable::new(),
            cache,
            options,
            codec: Arc::new(DefaultQueryCodec),
        };
        matcher.add_routes(routes)?;
        Ok(matcher)
    }

    pub fn from_config(config: &RouterConfig) -> Result<Self, RouterError> {
        Self::new(&config.routes, config.options.clone())
    }

    /// Replace the query codec used for parsing and full paths.
    pub fn with_query_codec(mut self, codec: impl QueryCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Register more routes. Wildcards stay behind every other path.
    pub fn add_routes(&mut self, routes: &[RouteConfig]) -> Result<(), RouterError> {
        check_routes(routes, &self.options).map_err(ConfigError::Validation)?;
        self.table.extend(routes, &self.cache);
        Ok(())
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    pub fn codec(&self) -> &dyn QueryCodec {
        self.codec.as_ref()
    }

    /// Resolve `raw` into a route.
    ///
    /// `current` supplies the base for relative paths and relative params.
    /// `redirected_from` is recorded on the result when set.
    ///
    /// A named target whose required params cannot be filled still matches
    /// its record: the fill yields an empty path, which the route reports as
    /// `/` with a non-empty `matched`. Check `params` against
    /// [`Pattern::required_params`](crate::pattern::Pattern::required_params)
    /// to tell this apart from a real match at `/`.
    pub fn match_route(
        &self,
        raw: impl Into<RawLocation>,
        current: Option<&Route>,
        redirected_from: Option<&Location>,
    ) -> Route {
        self.match_at(raw.into(), current, redirected_from.cloned(), 0)
    }

    /// Normalize `raw` with `append` semantics and resolve it.
    pub fn resolve(&self, raw: impl Into<RawLocation>, current: Option<&Route>, append: bool) -> Resolution {
        let location = normalize_location(raw, current, append, &self.cache, self.codec());
        let route = self.match_route(&location, current, None);
        let full_path = route
            .redirected_from_path(self.codec())
            .unwrap_or_else(|| route.full_path.clone());
        Resolution {
            location,
            route,
            full_path,
        }
    }

    fn match_at(
        &self,
        raw: RawLocation,
        current: Option<&Route>,
        redirected_from: Option<Location>,
        hops: usize,
    ) -> Route {
        let mut location = normalize_location(raw, current, false, &self.cache, self.codec());

        if let Some(name) = location.name.clone().filter(|name| !name.is_empty()) {
            let Some(record) = self.table.by_name(&name) else {
                tracing::warn!(name = %name, "Route with name does not exist");
                return self.create_route(None, &location, None);
            };

            let required = record.pattern.required_params();
            if let Some(current) = current {
                for (key, value) in &current.params {
                    if !location.params.contains_key(key) && required.contains(key) {
                        location.params.insert(key.clone(), value.clone());
                    }
                }
            }

            let context = format!("named route \"{name}\"");
            location.path = Some(fill_params(&self.cache, &record.path, &location.params, &context));
            return self.dispatch(record, location, redirected_from, hops);
        }

        if let Some(path) = location.path.clone().filter(|path| !path.is_empty()) {
            location.params = Params::new();
            for record in self.table.records_by_priority() {
                if let Some(params) = record.pattern.match_path(&path) {
                    location.params = params;
                    return self.dispatch(record, location, redirected_from, hops);
                }
            }
        }

        tracing::debug!(path = ?location.path, "No route matched");
        self.create_route(None, &location, None)
    }

    fn dispatch(
        &self,
        record: &Arc<RouteRecord>,
        location: Location,
        redirected_from: Option<Location>,
        hops: usize,
    ) -> Route {
        if let Some(redirect) = &record.redirect {
            let original = redirected_from.unwrap_or(location);
            return self.redirect(record, redirect, original, hops);
        }
        if let Some(match_as) = &record.match_as {
            return self.alias(location, match_as, redirected_from, hops);
        }
        self.create_route(Some(record), &location, redirected_from)
    }

    fn redirect(&self, record: &Arc<RouteRecord>, redirect: &Redirect, location: Location, hops: usize) -> Route {
        if hops >= self.options.max_redirects {
            tracing::warn!(
                path = %record.path,
                max_redirects = self.options.max_redirects,
                "Redirect limit exceeded"
            );
            return self.create_route(None, &location, None);
        }

        let target = match redirect {
            Redirect::Literal(path) => RedirectTarget::path(path.as_str()),
            Redirect::Structured(target) => target.clone(),
            Redirect::Computed(f) => f(&self.create_route(Some(record), &location, None)),
        };

        let query = target.query.unwrap_or_else(|| location.query.clone());
        let params = target.params.unwrap_or_else(|| location.params.clone());
        let mut hash = target.hash.unwrap_or_else(|| location.hash.clone());
        if !hash.is_empty() && !hash.starts_with('#') {
            hash.insert(0, '#');
        }

        if let Some(name) = target.name.filter(|name| !name.is_empty()) {
            if self.table.by_name(&name).is_none() {
                tracing::warn!(name = %name, "redirect failed: named route not found");
            }
            tracing::debug!(from = %record.path, to = %name, "Following named redirect");
            let next = Location {
                name: Some(name),
                params,
                query,
                hash,
                normalized: true,
                ..Location::default()
            };
            return self.match_at(next.into(), None, Some(location), hops + 1);
        }

        if let Some(path) = target.path.filter(|path| !path.is_empty()) {
            let parent_path = self
                .table
                .parent(record)
                .map(|parent| parent.path.as_str())
                .unwrap_or("/");
            let raw_path = resolve_path(&path, parent_path, true);
            let context = format!("redirect route with path \"{raw_path}\"");
            let resolved = fill_params(&self.cache, &raw_path, &params, &context);
            tracing::debug!(from = %record.path, to = %resolved, "Following redirect");
            let next = Location {
                path: Some(resolved),
                query,
                hash,
                normalized: true,
                ..Location::default()
            };
            return self.match_at(next.into(), None, Some(location), hops + 1);
        }

        tracing::warn!(path = %record.path, "invalid redirect option: neither name nor path is set");
        self.create_route(None, &location, None)
    }

    fn alias(&self, location: Location, match_as: &str, redirected_from: Option<Location>, hops: usize) -> Route {
        let context = format!("aliased route with path \"{match_as}\"");
        let aliased_path = fill_params(&self.cache, match_as, &location.params, &context);
        let canonical = Location {
            path: Some(aliased_path),
            normalized: true,
            ..Location::default()
        };
        let aliased = self.match_at(canonical.into(), None, None, hops);
        self.create_route(aliased.matched.last(), &location, redirected_from)
    }

    fn create_route(
        &self,
        record: Option<&Arc<RouteRecord>>,
        location: &Location,
        redirected_from: Option<Location>,
    ) -> Route {
        let matched = record
            .map(|record| self.table.ancestors(record))
            .unwrap_or_default();
        Route::new(matched, location, redirected_from, self.codec())
    }
}
