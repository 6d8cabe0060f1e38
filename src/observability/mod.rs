//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! matcher / table / validation / pattern fill
//!     → tracing events (warn on malformed routes and bad redirects,
//!       debug on resolution)
//!     → logging.rs subscriber (stderr)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is the caller's job
//! - Log level comes from config and can be overridden by `RUST_LOG`

pub mod logging;

pub use logging::init_logging;
