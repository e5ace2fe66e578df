//! # spa-routes
//!
//! Declarative route table for a single-page application, with lazy view
//! loading, clean-URL navigation and a shell server for deep links.
//!
//! ## Features
//!
//! - **Validated table**: unique names, a single trailing `*` fallback, props checked against views
//! - **Ordered matching**: first match wins, `:param` and `*` patterns
//! - **Lazy views**: a closed set of views, each loaded on first use only
//! - **History mode**: clean URLs, with a server that answers every deep link
//!
//! ## Modules
//!
//! - [`routes`]: Route descriptors, patterns and the route table
//! - [`views`]: View identifiers, loaders and pages
//! - [`navigation`]: Router options and the navigator
//! - [`server`]: Shell server with Axum
//! - [`config`]: Configuration loading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spa_routes::navigation::{Navigator, RouterOptions};
//! use spa_routes::routes::RouteTable;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build the table once at start-up
//!     let options = Arc::new(RouterOptions::new(RouteTable::default_table()?));
//!
//!     // Resolve without rendering
//!     let matched = options.routes.resolve("/users/7")?;
//!     assert_eq!(matched.name, "user");
//!
//!     // Navigate: the User view loads here, not before
//!     let navigator = Navigator::new(Arc::clone(&options));
//!     navigator.push("/users/7").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod navigation;
pub mod routes;
pub mod server;
pub mod views;

// Re-export top-level types for convenience
pub use routes::{
    default_routes, Location, Params, RouteDescriptor, RouteError, RouteMatch, RouteResult,
    RouteTable,
};

pub use views::{Page, View, ViewError, ViewId, ViewLoader, ViewRegistry};

pub use navigation::{
    Mode, NavigationError, NavigationOutcome, NavigationResult, Navigator, RenderedRoute,
    RouterOptions,
};

pub use server::{build_router, serve, AppState, ServerError};

pub use config::{Config, ConfigError, LoggingConfig, RouterConfig, ServerConfig};
