//! Route resolution library.
//!
//! Declared routes are compiled into a [`RouteTable`]; a [`Matcher`] turns
//! raw locations (paths or name-addressed targets) into [`Route`]s, following
//! redirects and aliases.

pub mod config;
pub mod error;
pub mod location;
pub mod observability;
pub mod pattern;
pub mod routing;

pub use config::{RouteConfig, RouterConfig, RouterOptions};
pub use error::RouterError;
pub use location::{Location, Params, Query, QueryValue, RawLocation};
pub use pattern::{Pattern, PatternCache, PatternOptions};
pub use routing::{Matcher, Redirect, RedirectTarget, Resolution, Route, RouteRecord, RouteTable};
