//! Compiled-pattern cache.
//!
//! Templates are finite and known when routes are declared, so entries are
//! never evicted. The cache is a cheap-clone handle passed explicitly to the
//! table builder and the matcher.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::PatternError;
use crate::pattern::compiler::{Pattern, PatternOptions};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    template: String,
    options: PatternOptions,
}

/// Read-through, append-only cache keyed by `(template, options)`.
///
/// Two threads compiling the same new key at once both compile; the first
/// insert wins and the other result is dropped.
#[derive(Debug, Clone, Default)]
pub struct PatternCache {
    patterns: Arc<DashMap<CacheKey, Arc<Pattern>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached pattern, compiling it on first use.
    pub fn compile(&self, template: &str, options: PatternOptions) -> Result<Arc<Pattern>, PatternError> {
        let key = CacheKey {
            template: template.to_string(),
            options,
        };
        if let Some(pattern) = self.patterns.get(&key) {
            return Ok(Arc::clone(pattern.value()));
        }

        let pattern = Arc::new(Pattern::compile(template, options)?);
        tracing::trace!(template, ?options, "Compiled route pattern");
        let entry = self.patterns.entry(key).or_insert(pattern);
        Ok(Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
