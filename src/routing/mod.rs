//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation:
//!     RouteConfig[]
//!     → table.rs (flatten nesting, compile patterns, index by path and name)
//!     → record.rs (immutable RouteRecord per path and alias)
//!
//! Resolution:
//!     raw location + current route
//!     → location::normalize_location
//!     → matcher.rs (name lookup or first pattern match)
//!     → redirect / alias handling
//!     → route.rs (Route with matched chain root..leaf)
//! ```
//!
//! # Design Decisions
//! - Declaration order is priority; the first matching path wins
//! - Wildcard routes are always tried last
//! - Deterministic: same input always matches same route
//! - Failure to match is a value (empty `matched`), never an error

pub mod matcher;
pub mod record;
pub mod route;
pub mod table;

pub use matcher::{Matcher, Resolution};
pub use record::{ComponentRef, Meta, PropsSpec, RecordId, Redirect, RedirectTarget, RouteRecord};
pub use route::{is_included_route, is_same_route, Route};
pub use table::RouteTable;
