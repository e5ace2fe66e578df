//! View implementations
//!
//! Minimal server-renderable pages. Each page has a loader function that
//! yields once before returning, standing in for fetching a separately built
//! chunk.

use futures_util::FutureExt;
use std::sync::Arc;

use super::{LoadFuture, Page, View, ViewError, ViewId, ViewInput};

pub(crate) fn load_home() -> LoadFuture {
    async {
        tokio::task::yield_now().await;
        Ok(Arc::new(HomeView) as Arc<dyn View>)
    }
    .boxed()
}

pub(crate) fn load_user() -> LoadFuture {
    async {
        tokio::task::yield_now().await;
        Ok(Arc::new(UserView) as Arc<dyn View>)
    }
    .boxed()
}

pub(crate) fn load_not_found() -> LoadFuture {
    async {
        tokio::task::yield_now().await;
        Ok(Arc::new(NotFoundView) as Arc<dyn View>)
    }
    .boxed()
}

/// Landing page
#[derive(Debug, Default)]
pub struct HomeView;

impl View for HomeView {
    fn id(&self) -> ViewId {
        ViewId::Home
    }

    fn render(&self, _input: &ViewInput<'_>) -> Result<Page, ViewError> {
        Ok(Page {
            title: "Home".to_string(),
            body: "<h1>Home</h1>".to_string(),
        })
    }
}

/// Single user page
///
/// Takes `id` as a prop when the route forwards props, otherwise reads it
/// from the route params.
#[derive(Debug, Default)]
pub struct UserView;

impl View for UserView {
    fn id(&self) -> ViewId {
        ViewId::User
    }

    fn render(&self, input: &ViewInput<'_>) -> Result<Page, ViewError> {
        let id = input
            .prop("id")
            .or_else(|| input.param("id"))
            .ok_or_else(|| ViewError::MissingProp {
                view: ViewId::User,
                prop: "id".to_string(),
            })?;
        let id = escape_html(id);

        Ok(Page {
            title: format!("User {}", id),
            body: format!("<h1>User</h1><p data-user-id=\"{id}\">{id}</p>"),
        })
    }
}

/// Fallback page for unmatched paths
#[derive(Debug, Default)]
pub struct NotFoundView;

impl View for NotFoundView {
    fn id(&self) -> ViewId {
        ViewId::NotFound
    }

    fn render(&self, input: &ViewInput<'_>) -> Result<Page, ViewError> {
        let path = escape_html(&input.route.location.path);
        Ok(Page {
            title: "Not Found".to_string(),
            body: format!("<h1>Page Not Found</h1><p>No page at <code>{}</code>.</p>", path),
        })
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
