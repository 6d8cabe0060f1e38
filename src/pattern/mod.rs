//! Path template subsystem.
//!
//! # Data Flow
//! ```text
//! template string + PatternOptions
//!     → cache.rs (lookup by template and options)
//!     → compiler.rs (tokenize, build anchored regex + per-key validators)
//!     → Arc<Pattern>
//!
//! Pattern::match_path(path)  → Option<Params>
//! Pattern::fill(params)      → Result<String, FillError>
//! ```
//!
//! # Design Decisions
//! - Fill is the inverse of match: a filled path matches its own template
//! - Fill failures are recoverable; `fill_params` logs and yields ""

pub mod cache;
pub mod compiler;

pub use cache::PatternCache;
pub use compiler::{Key, KeyName, Pattern, PatternOptions, Token, PATH_MATCH};

use crate::location::Params;

/// Render `template` with `params`, logging and returning an empty path when
/// a parameter is missing or invalid.
///
/// `context` names the owning route in the warning. Callers treat an empty
/// result as a no-op navigation.
pub fn fill_params(cache: &PatternCache, template: &str, params: &Params, context: &str) -> String {
    let pattern = match cache.compile(template, PatternOptions::default()) {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot fill params for {}", context);
            return String::new();
        }
    };

    match pattern.fill(params) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(error = %e, "missing param for {}", context);
            String::new()
        }
    }
}
