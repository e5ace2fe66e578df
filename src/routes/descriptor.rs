//! Route descriptors
//!
//! The authored, declarative half of the route table.

use serde::{Deserialize, Serialize};

use crate::views::ViewId;

/// Path used by the fallback route
pub const FALLBACK_PATH: &str = "*";

/// A declarative route record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Unique name, used for named navigation
    pub name: String,
    /// Path pattern (`/users/:id`, `*`, ...)
    pub path: String,
    /// View rendered when the route is active
    pub view: ViewId,
    /// Forward path params to the view as props
    #[serde(default)]
    pub props: bool,
}

impl RouteDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>, view: ViewId) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            view,
            props: false,
        }
    }

    /// Builder method: forward path params as props
    pub fn forward_props(mut self) -> Self {
        self.props = true;
        self
    }

    /// True for the `*` route
    pub fn is_fallback(&self) -> bool {
        self.path == FALLBACK_PATH
    }
}

/// The application's route table, in match order
pub fn default_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("home", "", ViewId::Home),
        RouteDescriptor::new("user", "/users/:id", ViewId::User).forward_props(),
        RouteDescriptor::new("notFound", FALLBACK_PATH, ViewId::NotFound),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routes_shape() {
        let routes = default_routes();
        assert_eq!(routes.len(), 3);
        assert!(routes.last().unwrap().is_fallback());
        assert_eq!(routes.iter().filter(|r| r.is_fallback()).count(), 1);
        assert!(routes.iter().any(|r| r.name == "user" && r.props));
    }

    #[test]
    fn test_descriptor_deserialize_defaults_props() {
        let d: RouteDescriptor =
            serde_json::from_str(r#"{"name":"home","path":"/","view":"Home"}"#).unwrap();
        assert!(!d.props);
        assert_eq!(d.view, ViewId::Home);
    }
}
