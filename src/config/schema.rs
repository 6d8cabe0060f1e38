//! Configuration schema definitions.
//!
//! This module defines the route table file format and the resolver options.
//! All types derive Serde traits for deserialization from config files.
//! Function-valued redirects and props can only be set from code.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::pattern::PatternOptions;
use crate::routing::record::{ComponentRef, Meta, PropsSpec, Redirect};

/// Root configuration for a route table file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Resolver behavior.
    pub options: RouterOptions,

    /// Logging settings for the CLI.
    pub observability: ObservabilityConfig,

    /// Route declarations, in priority order.
    pub routes: Vec<RouteConfig>,
}

/// Resolver options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Treat configuration defects as errors instead of warnings.
    pub strict_config: bool,

    /// Maximum redirect hops followed for one match.
    pub max_redirects: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            strict_config: false,
            max_redirects: 16,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// One route declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Path template, relative to the parent unless it starts with `/`.
    pub path: Option<String>,

    /// Name for name-addressed navigation.
    pub name: Option<String>,

    /// Extra templates that resolve to this route.
    #[serde(deserialize_with = "one_or_many")]
    pub alias: Vec<String>,

    /// Nested routes.
    pub children: Vec<RouteConfig>,

    pub redirect: Option<Redirect>,

    /// Component for the default view slot.
    pub component: Option<ComponentRef>,

    /// Components per named view slot. Takes precedence over `component`.
    pub components: IndexMap<String, ComponentRef>,

    /// Props for the default slot.
    pub props: Option<PropsSpec>,

    /// Props per named slot, used with `components`.
    pub named_props: IndexMap<String, PropsSpec>,

    pub meta: Meta,

    /// Match letters case-sensitively (default: insensitive).
    pub case_sensitive: Option<bool>,

    /// A trailing slash is significant.
    pub strict: bool,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(alias) => vec![alias],
        OneOrMany::Many(aliases) => aliases,
    })
}

impl RouteConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias.push(alias.into());
        self
    }

    pub fn child(mut self, child: RouteConfig) -> Self {
        self.children.push(child);
        self
    }

    pub fn redirect(mut self, redirect: impl Into<Redirect>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }

    pub fn component(mut self, component: impl Into<ComponentRef>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Bind a component to a named view slot.
    pub fn components(mut self, slot: impl Into<String>, component: impl Into<ComponentRef>) -> Self {
        self.components.insert(slot.into(), component.into());
        self
    }

    pub fn props(mut self, props: PropsSpec) -> Self {
        self.props = Some(props);
        self
    }

    pub fn named_props(mut self, slot: impl Into<String>, props: PropsSpec) -> Self {
        self.named_props.insert(slot.into(), props);
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.case_sensitive = Some(sensitive);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Options used to compile this route's pattern.
    pub fn pattern_options(&self) -> PatternOptions {
        PatternOptions {
            sensitive: self.case_sensitive.unwrap_or(false),
            strict: self.strict,
        }
    }
}
