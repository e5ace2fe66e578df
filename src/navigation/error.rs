//! Navigation error types

use thiserror::Error;

use crate::routes::RouteError;
use crate::views::ViewError;

/// Errors that can occur while navigating
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Resolution against the route table failed
    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    /// The target view failed to load or render
    #[error("View error: {0}")]
    View(#[from] ViewError),

    /// Navigating to the location that is already current
    #[error("Already at {0}")]
    Duplicated(String),

    /// History traversal past either end
    #[error("Cannot move {delta} entries in history")]
    OutOfHistory { delta: isize },
}

/// Result type for navigation operations
pub type NavigationResult<T> = Result<T, NavigationError>;
