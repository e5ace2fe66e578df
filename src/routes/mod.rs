//! Route Table
//!
//! Declarative client-side routes and the machinery to resolve URLs against them:
//!
//! - **descriptor**: `RouteDescriptor` and the application's default table
//! - **pattern**: path pattern parsing and matching
//! - **location**: URL splitting and base handling
//! - **table**: validated, immutable `RouteTable`
//! - **error**: error types
//!
//! # Example
//!
//! ```rust
//! use spa_routes::routes::{RouteDescriptor, RouteTable};
//! use spa_routes::views::ViewId;
//!
//! let table = RouteTable::from_descriptors(vec![
//!     RouteDescriptor::new("home", "/", ViewId::Home),
//!     RouteDescriptor::new("user", "/users/:id", ViewId::User).forward_props(),
//!     RouteDescriptor::new("notFound", "*", ViewId::NotFound),
//! ])
//! .unwrap();
//!
//! let matched = table.resolve("/users/7").unwrap();
//! assert_eq!(matched.name, "user");
//! assert_eq!(matched.params["id"], "7");
//! ```

pub mod descriptor;
pub mod error;
pub mod location;
pub mod pattern;
pub mod table;

pub use descriptor::{default_routes, RouteDescriptor, FALLBACK_PATH};
pub use error::{RouteError, RouteResult};
pub use location::{normalize_base, Location};
pub use pattern::{Params, PathPattern, Segment, SPLAT_PARAM};
pub use table::{
    MatchOptions, RouteEntry, RouteMatch, RouteSummary, RouteTable, RouteTableBuilder,
};
