//! Location normalization.
//!
//! # Responsibilities
//! - Pass already-normalized targets through unchanged
//! - Expand relative-params navigation against the current route
//! - Resolve relative paths and merge inline and explicit query/hash

use crate::location::path::{parse_path, resolve_path};
use crate::location::query::{resolve_query, QueryCodec};
use crate::location::{Location, RawLocation};
use crate::pattern::{fill_params, PatternCache};
use crate::routing::Route;

/// Turn `raw` into a canonical [`Location`].
///
/// `append` resolves relative paths by appending to the current path rather
/// than replacing its last segment.
pub fn normalize_location(
    raw: impl Into<RawLocation>,
    current: Option<&Route>,
    append: bool,
    cache: &PatternCache,
    codec: &dyn QueryCodec,
) -> Location {
    let mut next = match raw.into() {
        RawLocation::Path(path) => Location::path(path),
        RawLocation::Location(location) => location,
    };

    if next.normalized || next.is_named() {
        return next;
    }

    if next.path.is_none() && !next.params.is_empty() {
        match current {
            Some(current) => {
                next.normalized = true;
                let mut params = current.params.clone();
                params.extend(std::mem::take(&mut next.params));

                if let Some(name) = &current.name {
                    next.name = Some(name.clone());
                    next.params = params;
                } else if let Some(record) = current.matched.last() {
                    let context = format!("path {}", current.path);
                    next.path = Some(fill_params(cache, &record.path, &params, &context));
                    next.params = params;
                } else {
                    tracing::warn!("relative params navigation requires a current route.");
                }
                return next;
            }
            None => {
                tracing::warn!("relative params navigation requires a current route.");
            }
        }
    }

    let raw_path = next.path.take().unwrap_or_default();
    let parsed = parse_path(&raw_path);
    let base = current
        .map(|route| route.path.as_str())
        .filter(|path| !path.is_empty())
        .unwrap_or("/");
    let path = if parsed.path.is_empty() {
        base.to_string()
    } else {
        resolve_path(parsed.path, base, append || next.append)
    };

    let query = resolve_query(parsed.query, &next.query, codec);

    let mut hash = if next.hash.is_empty() {
        parsed.hash.to_string()
    } else {
        next.hash
    };
    if !hash.is_empty() && !hash.starts_with('#') {
        hash.insert(0, '#');
    }

    Location {
        path: Some(path),
        query,
        hash,
        normalized: true,
        ..Location::default()
    }
}
