//! Router configuration
//!
//! The object handed to the navigation layer: the resolved route table plus
//! the addressing mode. Built explicitly at start-up and shared by `Arc`.

use serde::Serialize;
use std::sync::Arc;

use crate::navigation::error::NavigationResult;
use crate::routes::{Location, Params, RouteError, RouteMatch, RouteResult, RouteTable};
use crate::views::{Page, ViewInput};

/// URL addressing style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Clean URLs (`/users/7`); the server must answer every deep link with the shell
    History,
    /// Fragment URLs (`/#/users/7`)
    Hash,
}

impl Mode {
    /// Format a base-relative path as an href in this mode
    pub fn href(self, base: &str, full_path: &str) -> String {
        match self {
            Mode::History if base == "/" => full_path.to_string(),
            Mode::History => format!("{}{}", base, full_path),
            Mode::Hash if base == "/" => format!("/#{}", full_path),
            Mode::Hash => format!("{}/#{}", base, full_path),
        }
    }
}

/// Router configuration: `routes` and `mode`
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub routes: Arc<RouteTable>,
    pub mode: Mode,
}

impl RouterOptions {
    /// Configuration for a table; always clean-URL addressing
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes: Arc::new(routes),
            mode: Mode::History,
        }
    }

    /// href for a resolved location
    pub fn href(&self, location: &Location) -> String {
        self.mode.href(self.routes.base(), &location.full_path())
    }

    /// href for a named route
    pub fn href_for(&self, name: &str, params: &Params) -> RouteResult<String> {
        let path = self.routes.path_for(name, params)?;
        Ok(self.mode.href(self.routes.base(), &path))
    }

    /// Load the matched route's view (on first use) and render it
    pub async fn render(&self, route: &RouteMatch) -> NavigationResult<Page> {
        let entry = self
            .routes
            .entries()
            .get(route.index)
            .filter(|e| e.name() == route.name)
            .ok_or_else(|| RouteError::UnknownRoute(route.name.clone()))?;

        let view = entry.loader().load().await?;
        let page = view.render(&ViewInput::new(route))?;
        Ok(page)
    }
}

impl From<RouteTable> for RouterOptions {
    fn from(routes: RouteTable) -> Self {
        Self::new(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{default_routes, RouteDescriptor};
    use crate::views::ViewId;

    #[test]
    fn test_mode_is_always_history() {
        let default = RouterOptions::new(RouteTable::default_table().unwrap());
        assert_eq!(default.mode, Mode::History);

        let other = RouterOptions::new(
            RouteTable::from_descriptors(vec![RouteDescriptor::new(
                "only",
                "*",
                ViewId::NotFound,
            )])
            .unwrap(),
        );
        assert_eq!(other.mode, Mode::History);
    }

    #[test]
    fn test_href_formatting() {
        assert_eq!(Mode::History.href("/", "/users/7"), "/users/7");
        assert_eq!(Mode::History.href("/app", "/users/7"), "/app/users/7");
        assert_eq!(Mode::Hash.href("/", "/users/7"), "/#/users/7");
        assert_eq!(Mode::Hash.href("/app", "/users/7"), "/app/#/users/7");
    }

    #[test]
    fn test_href_for_named_route() {
        let table = RouteTable::builder()
            .routes(default_routes())
            .base("/app")
            .build()
            .unwrap();
        let options = RouterOptions::new(table);
        let mut params = Params::new();
        params.insert("id".to_string(), "5".to_string());
        assert_eq!(options.href_for("user", &params).unwrap(), "/app/users/5");
    }

    #[tokio::test]
    async fn test_render_loads_view_on_demand() {
        let options = RouterOptions::new(RouteTable::default_table().unwrap());
        let route = options.routes.resolve("/users/42").unwrap();
        let loader = options.routes.get("user").unwrap().loader().clone();
        assert!(!loader.is_loaded());

        let page = options.render(&route).await.unwrap();
        assert_eq!(page.title, "User 42");
        assert!(loader.is_loaded());
        assert!(!options.routes.get("home").unwrap().loader().is_loaded());
    }
}
