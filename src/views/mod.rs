//! Views
//!
//! The closed set of views the route table can point at, and the contract
//! every view implements.
//!
//! - **loader**: on-demand, memoised view loading (`ViewLoader`, `ViewRegistry`)
//! - **pages**: the view implementations themselves
//!
//! Each [`ViewId`] maps to exactly one loader function through an exhaustive
//! `match`, so a view without a loader does not compile. Loaders only run
//! when a route using the view is first rendered.

pub mod loader;
pub mod pages;

pub use loader::{LoadFn, LoadFuture, ViewLoader, ViewRegistry};
pub use pages::{HomeView, NotFoundView, UserView};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::routes::{Params, RouteMatch};

/// Identifier of a loadable view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViewId {
    Home = 0,
    User = 1,
    NotFound = 2,
}

impl ViewId {
    /// Every view, in declaration order
    pub const ALL: [ViewId; 3] = [ViewId::Home, ViewId::User, ViewId::NotFound];

    /// Stable key used in logs and JSON
    pub fn key(self) -> &'static str {
        match self {
            ViewId::Home => "Home",
            ViewId::User => "User",
            ViewId::NotFound => "NotFound",
        }
    }

    /// Props the view cannot render without when props are forwarded
    pub fn required_props(self) -> &'static [&'static str] {
        match self {
            ViewId::Home => &[],
            ViewId::User => &["id"],
            ViewId::NotFound => &[],
        }
    }

    /// Every prop the view accepts
    pub fn accepted_props(self) -> &'static [&'static str] {
        match self {
            ViewId::Home => &[],
            ViewId::User => &["id"],
            ViewId::NotFound => &["pathMatch"],
        }
    }

    /// The deferred loader for this view
    pub fn loader(self) -> LoadFn {
        match self {
            ViewId::Home => pages::load_home,
            ViewId::User => pages::load_user,
            ViewId::NotFound => pages::load_not_found,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// Errors raised while loading or rendering a view
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The loader failed to produce the view
    #[error("Failed to load view {view}: {reason}")]
    LoadFailed { view: ViewId, reason: String },

    /// Neither props nor route params carried a value the view needs
    #[error("View {view} is missing required prop '{prop}'")]
    MissingProp { view: ViewId, prop: String },
}

/// Rendered output of a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub title: String,
    /// HTML fragment placed inside the application mount point
    pub body: String,
}

/// What a view gets to see when rendered
#[derive(Debug, Clone, Copy)]
pub struct ViewInput<'a> {
    /// The active route (router context)
    pub route: &'a RouteMatch,
}

impl<'a> ViewInput<'a> {
    pub fn new(route: &'a RouteMatch) -> Self {
        Self { route }
    }

    /// Props forwarded by the route, if it forwards any
    pub fn props(&self) -> Option<&'a Params> {
        self.route.props.as_ref()
    }

    pub fn prop(&self, name: &str) -> Option<&'a str> {
        self.props()
            .and_then(|props| props.get(name))
            .map(String::as_str)
    }

    /// Read a param straight from the router context
    pub fn param(&self, name: &str) -> Option<&'a str> {
        self.route.params.get(name).map(String::as_str)
    }
}

/// A renderable view
pub trait View: Send + Sync {
    fn id(&self) -> ViewId;

    fn render(&self, input: &ViewInput<'_>) -> Result<Page, ViewError>;
}
