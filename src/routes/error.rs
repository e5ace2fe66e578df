//! Route table error types
//!
//! Defines every error that can occur while building or querying a route table.

use thiserror::Error;

/// Errors that can occur in the route table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No descriptors were supplied
    #[error("Route table is empty")]
    EmptyTable,

    /// Two descriptors share a name
    #[error("Duplicate route name: {0}")]
    DuplicateName(String),

    /// No descriptor uses the `*` wildcard path
    #[error("Route table has no '*' fallback route")]
    MissingFallback,

    /// More than one descriptor uses the `*` wildcard path
    #[error("Route table has more than one '*' fallback route: {first} and {second}")]
    MultipleFallbacks { first: String, second: String },

    /// The `*` descriptor is not the last entry
    #[error("Fallback route '{0}' must be the last entry in the table")]
    FallbackNotLast(String),

    /// Path pattern could not be parsed
    #[error("Invalid path pattern '{path}': {reason}")]
    InvalidPattern { path: String, reason: String },

    /// Path params and view props disagree on a props-forwarding route
    #[error("Route '{route}' forwards props but {reason}")]
    PropsMismatch { route: String, reason: String },

    /// Named navigation to a route that does not exist
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// Named navigation without a required param
    #[error("Route '{route}' requires param '{param}'")]
    MissingParam { route: String, param: String },

    /// Nothing matched (only possible without a fallback)
    #[error("No route matched path: {0}")]
    NoMatch(String),
}

/// Result type alias for route table operations
pub type RouteResult<T> = Result<T, RouteError>;
