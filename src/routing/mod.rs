//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route lookup in declaration order)
//!     → matcher.rs (compare path against template, extract :params)
//!     → Return: matched Route + params, or NoMatch
//!
//! Route Compilation (at startup):
//!     (method, "/tasks/:id", handler)[]
//!     → Compile templates into segments
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod matcher;
pub mod router;

pub use matcher::{PathParams, PathTemplate};
pub use router::{Route, RouteMatch, RouteTable};
