//! Navigation
//!
//! Router configuration and the runtime navigation state built on top of it.
//!
//! - **options**: `RouterOptions` (`routes` + `mode`) and `Mode`
//! - **navigator**: history stack, current route, pending state
//! - **error**: error types
//!
//! # Example
//!
//! ```rust,no_run
//! use spa_routes::navigation::{Navigator, RouterOptions};
//! use spa_routes::routes::RouteTable;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = Arc::new(RouterOptions::new(RouteTable::default_table()?));
//!     let navigator = Navigator::new(options);
//!
//!     let outcome = navigator.push("/users/7").await?;
//!     if let Some(rendered) = outcome.completed() {
//!         println!("{}", rendered.page.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod navigator;
pub mod options;

pub use error::{NavigationError, NavigationResult};
pub use navigator::{NavigationOutcome, Navigator, RenderedRoute};
pub use options::{Mode, RouterOptions};
