//! Configuration validation.
//!
//! # Responsibilities
//! - Detect route defects (missing path, bad templates, empty components)
//! - Detect advisories (alias equal to path, shadowed default child,
//!   missing leading slash)
//!
//! # Design Decisions
//! - Returns all issues, not just the first
//! - Validation is a pure function over the declarations
//! - Defects fail only in strict mode; everything else is logged

use thiserror::Error;

use crate::config::schema::{RouteConfig, RouterConfig, RouterOptions};
use crate::pattern::compiler::duplicate_params;
use crate::pattern::Pattern;
use crate::routing::table::{normalize_path, WILDCARD};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("\"path\" is required in a route configuration (name: {name:?})")]
    MissingPath { name: Option<String> },

    #[error("route config \"component\" for path \"{path}\" cannot be empty")]
    EmptyComponent { path: String },

    #[error("Duplicate param keys in route with path \"{path}\": {param}")]
    DuplicateParam { path: String, param: String },

    #[error("invalid route path \"{path}\": {reason}")]
    InvalidPattern { path: String, reason: String },

    #[error("Found an alias with the same value as the path: \"{path}\"")]
    AliasSameAsPath { path: String },

    #[error("Named route '{name}' has a default child route; navigating by name will not render it")]
    NamedRouteWithDefaultChild { name: String },

    #[error("Non-nested routes must include a leading slash character: \"{path}\"")]
    MissingLeadingSlash { path: String },
}

impl ValidationError {
    /// Defects break a route; the rest are advisories.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            ValidationError::MissingPath { .. }
                | ValidationError::EmptyComponent { .. }
                | ValidationError::DuplicateParam { .. }
                | ValidationError::InvalidPattern { .. }
        )
    }
}

/// Collect every issue in `routes`.
pub fn validate_routes(routes: &[RouteConfig]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for route in routes {
        validate_route(route, None, &mut errors);
    }
    errors
}

fn validate_template(path: &str, route: &RouteConfig, errors: &mut Vec<ValidationError>) {
    for param in duplicate_params(path) {
        errors.push(ValidationError::DuplicateParam {
            path: path.to_string(),
            param,
        });
    }
    if let Err(e) = Pattern::compile(path, route.pattern_options()) {
        errors.push(ValidationError::InvalidPattern {
            path: path.to_string(),
            reason: e.to_string(),
        });
    }
}

fn check_leading_slash(path: &str, errors: &mut Vec<ValidationError>) {
    if !path.is_empty() && !path.starts_with('/') && !path.starts_with(WILDCARD) {
        errors.push(ValidationError::MissingLeadingSlash {
            path: path.to_string(),
        });
    }
}

fn validate_route(route: &RouteConfig, parent: Option<&str>, errors: &mut Vec<ValidationError>) {
    let Some(raw_path) = route.path.as_deref() else {
        errors.push(ValidationError::MissingPath {
            name: route.name.clone(),
        });
        return;
    };

    let options = route.pattern_options();
    let path = normalize_path(raw_path, parent, options.strict);
    if parent.is_none() {
        check_leading_slash(&path, errors);
    }
    validate_template(&path, route, errors);

    let components = route.component.iter().chain(route.components.values());
    if components.into_iter().any(|component| component.as_str().is_empty()) {
        errors.push(ValidationError::EmptyComponent { path: path.clone() });
    }

    if let Some(name) = &route.name {
        let has_default_child = route
            .children
            .iter()
            .any(|child| matches!(child.path.as_deref(), Some("" | "/")));
        if route.redirect.is_none() && has_default_child {
            errors.push(ValidationError::NamedRouteWithDefaultChild { name: name.clone() });
        }
    }

    for alias in &route.alias {
        if alias == raw_path {
            errors.push(ValidationError::AliasSameAsPath { path: alias.clone() });
            continue;
        }
        let alias_path = normalize_path(alias, parent, options.strict);
        if parent.is_none() {
            check_leading_slash(&alias_path, errors);
        }
        validate_template(&alias_path, route, errors);
    }

    for child in &route.children {
        validate_route(child, Some(&path), errors);
    }
}

/// Validate a whole configuration file.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    check_routes(&config.routes, &config.options)
}

/// Fail on defects in strict mode; otherwise log every issue.
pub fn check_routes(routes: &[RouteConfig], options: &RouterOptions) -> Result<(), Vec<ValidationError>> {
    let issues = validate_routes(routes);

    if options.strict_config {
        let defects: Vec<ValidationError> = issues.iter().filter(|issue| issue.is_defect()).cloned().collect();
        if !defects.is_empty() {
            return Err(defects);
        }
    }

    for issue in &issues {
        tracing::warn!(defect = issue.is_defect(), "{}", issue);
    }
    Ok(())
}
