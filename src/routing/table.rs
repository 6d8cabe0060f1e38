//! Flat route table.
//!
//! # Responsibilities
//! - Flatten nested and aliased route configs into records
//! - Keep `path_list` in match priority order (declaration order, `*` last)
//! - Index records by normalized path and by name, first writer wins
//!
//! # Design Decisions
//! - Records live in an arena; parent links are `RecordId`s
//! - Records that lose a path or name race stay in the arena so their
//!   children keep a valid parent
//! - Duplicate paths are inert; duplicate names are warned about

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::RouteConfig;
use crate::location::path::clean_path;
use crate::pattern::PatternCache;
use crate::routing::record::{RecordId, RouteRecord, DEFAULT_SLOT};

/// Path that matches everything and must be tried last.
pub const WILDCARD: &str = "*";

/// Join a route path onto its parent's normalized path.
///
/// One trailing slash is dropped unless `strict`; absolute paths are kept.
pub fn normalize_path(path: &str, parent: Option<&str>, strict: bool) -> String {
    let path = if strict {
        path
    } else {
        path.strip_suffix('/').unwrap_or(path)
    };
    match parent {
        Some(parent) if !path.starts_with('/') => clean_path(&format!("{parent}/{path}")),
        _ => path.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct RouteTable {
    records: Vec<Arc<RouteRecord>>,
    path_list: Vec<String>,
    path_map: HashMap<String, RecordId>,
    name_map: HashMap<String, RecordId>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from route declarations.
    pub fn build(configs: &[RouteConfig], cache: &PatternCache) -> Self {
        let mut table = Self::new();
        table.extend(configs, cache);
        table
    }

    /// Merge more declarations into the table.
    pub fn extend(&mut self, configs: &[RouteConfig], cache: &PatternCache) {
        let mut builder = TableBuilder { table: self, cache };
        for config in configs {
            builder.add_route(config, None, None);
        }
        self.stabilize();

        tracing::debug!(
            records = self.records.len(),
            paths = self.path_list.len(),
            names = self.name_map.len(),
            "Route table updated"
        );
    }

    /// Normalized paths in match priority order.
    pub fn path_list(&self) -> &[String] {
        &self.path_list
    }

    /// Records in match priority order.
    pub fn records_by_priority(&self) -> impl Iterator<Item = &Arc<RouteRecord>> {
        self.path_list
            .iter()
            .filter_map(|path| self.path_map.get(path))
            .map(|id| self.record(*id))
    }

    pub fn record(&self, id: RecordId) -> &Arc<RouteRecord> {
        &self.records[id.0]
    }

    pub fn by_path(&self, path: &str) -> Option<&Arc<RouteRecord>> {
        self.path_map.get(path).map(|id| self.record(*id))
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<RouteRecord>> {
        self.name_map.get(name).map(|id| self.record(*id))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.name_map.keys().map(String::as_str)
    }

    pub fn parent(&self, record: &RouteRecord) -> Option<&Arc<RouteRecord>> {
        record.parent.map(|id| self.record(id))
    }

    /// The chain from the root ancestor down to `record`.
    pub fn ancestors(&self, record: &Arc<RouteRecord>) -> Vec<Arc<RouteRecord>> {
        let mut chain = vec![Arc::clone(record)];
        let mut next = record.parent;
        while let Some(id) = next {
            let parent = self.record(id);
            chain.push(Arc::clone(parent));
            next = parent.parent;
        }
        chain.reverse();
        chain
    }

    /// Number of records, including ones shadowed by an earlier path.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn push_record(&mut self, record: RouteRecord) -> RecordId {
        let id = record.id;
        self.records.push(Arc::new(record));
        id
    }

    fn next_id(&self) -> RecordId {
        RecordId(self.records.len())
    }

    /// Register the record's path; returns false if the path was taken.
    pub fn insert_path(&mut self, id: RecordId) -> bool {
        let path = &self.records[id.0].path;
        if self.path_map.contains_key(path) {
            return false;
        }
        self.path_list.push(path.clone());
        self.path_map.insert(path.clone(), id);
        true
    }

    /// Register a name; returns false if the name was taken.
    pub fn insert_name(&mut self, name: &str, id: RecordId) -> bool {
        if self.name_map.contains_key(name) {
            return false;
        }
        self.name_map.insert(name.to_string(), id);
        true
    }

    /// Move wildcard paths to the end, keeping relative order otherwise.
    fn stabilize(&mut self) {
        let (mut paths, wildcards): (Vec<String>, Vec<String>) =
            self.path_list.drain(..).partition(|path| path != WILDCARD);
        paths.extend(wildcards);
        self.path_list = paths;
    }
}

/// Recursive descent over one batch of declarations.
struct TableBuilder<'a> {
    table: &'a mut RouteTable,
    cache: &'a PatternCache,
}

impl TableBuilder<'_> {
    fn add_route(&mut self, config: &RouteConfig, parent: Option<RecordId>, match_as: Option<String>) {
        let Some(raw_path) = config.path.as_deref() else {
            tracing::warn!(name = ?config.name, "Skipping route without \"path\"");
            return;
        };

        let options = config.pattern_options();
        let parent_path = parent.map(|id| self.table.record(id).path.clone());
        let path = normalize_path(raw_path, parent_path.as_deref(), options.strict);

        let pattern = match self.cache.compile(&path, options) {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Skipping route with invalid path");
                return;
            }
        };

        let (components, props) = if config.components.is_empty() {
            let mut components = IndexMap::new();
            if let Some(component) = &config.component {
                components.insert(DEFAULT_SLOT.to_string(), component.clone());
            }
            let mut props = IndexMap::new();
            if let Some(spec) = &config.props {
                props.insert(DEFAULT_SLOT.to_string(), spec.clone());
            }
            (components, props)
        } else {
            (config.components.clone(), config.named_props.clone())
        };

        let id = self.table.next_id();
        self.table.push_record(RouteRecord::new(
            id,
            path.clone(),
            pattern,
            components,
            config.name.clone(),
            parent,
            match_as.clone(),
            config.redirect.clone(),
            config.meta.clone(),
            props,
        ));

        for child in &config.children {
            let child_match_as = match_as.as_deref().map(|canonical| {
                normalize_path(child.path.as_deref().unwrap_or_default(), Some(canonical), child.strict)
            });
            self.add_route(child, Some(id), child_match_as);
        }

        self.table.insert_path(id);

        for alias in &config.alias {
            if alias == raw_path {
                tracing::warn!(path = %raw_path, "Ignoring alias with the same value as the path");
                continue;
            }
            let alias_config = RouteConfig {
                path: Some(alias.clone()),
                children: config.children.clone(),
                ..RouteConfig::default()
            };
            let canonical = if path.is_empty() { "/".to_string() } else { path.clone() };
            self.add_route(&alias_config, parent, Some(canonical));
        }

        if let Some(name) = &config.name {
            if !self.table.insert_name(name, id) && match_as.is_none() {
                tracing::warn!(name = %name, path = %path, "Duplicate named routes definition");
            }
        }
    }
}
