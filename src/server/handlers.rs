//! Server handlers
//!
//! - GET /health/live - Liveness probe
//! - GET /health - Status with route and view details
//! - GET /api/routes - The route table
//! - GET /api/resolve?url=... - Resolve a URL without rendering
//! - everything else - the application shell, rendered for the matched route

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::navigation::Mode;
use crate::routes::{RouteMatch, RouteSummary};
use crate::server::error::{ServerError, ServerResult};
use crate::server::state::AppState;
use crate::views::{pages::escape_html, Page, ViewId};

/// Health status response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub routes: usize,
    pub loaded_views: Vec<ViewId>,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Route table response
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub mode: Mode,
    pub base: String,
    pub routes: Vec<RouteSummary>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub url: String,
}

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let routes = &state.router.routes;
    Json(HealthResponse {
        status: "healthy".to_string(),
        routes: routes.len(),
        loaded_views: routes.registry().loaded_views(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/routes
pub async fn list_routes(State(state): State<Arc<AppState>>) -> Json<RoutesResponse> {
    let routes = &state.router.routes;
    Json(RoutesResponse {
        mode: state.router.mode,
        base: routes.base().to_string(),
        routes: routes.entries().iter().map(|e| e.summary()).collect(),
    })
}

/// GET /api/resolve?url=/users/7
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveQuery>,
) -> ServerResult<Json<RouteMatch>> {
    let matched = state.router.routes.resolve(&query.url)?;
    Ok(Json(matched))
}

/// Fallback: serve the shell for any deep link
///
/// The matched view is loaded on demand and rendered into the mount point.
/// Paths only the `*` route matches get a 404 status with the not-found view.
pub async fn render_shell(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> ServerResult<(StatusCode, Html<String>)> {
    if method != Method::GET && method != Method::HEAD {
        return Err(ServerError::MethodNotAllowed(method.to_string()));
    }

    let url = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let route = state.router.routes.resolve(url)?;
    let page = state.router.render(&route).await?;

    let status = if route.fallback {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    tracing::debug!(route = %route.name, status = %status, "Shell rendered");

    let document = render_document(&state, &route, &page)?;
    Ok((status, Html(document)))
}

fn render_document(state: &AppState, route: &RouteMatch, page: &Page) -> ServerResult<String> {
    let title = if state.config.title.is_empty() {
        escape_html(&page.title)
    } else {
        format!(
            "{} | {}",
            escape_html(&page.title),
            escape_html(&state.config.title)
        )
    };
    let base = state.router.routes.base();
    let base_href = if base == "/" {
        "/".to_string()
    } else {
        format!("{}/", base)
    };
    // Keep the embedded JSON from closing the script tag
    let route_state = serde_json::to_string(route)?.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<base href="{base}">
</head>
<body>
<div id="app" data-route="{name}">{body}</div>
<script>window.__ROUTE__ = {route_state};</script>
</body>
</html>
"#,
        title = title,
        base = escape_html(&base_href),
        name = escape_html(&route.name),
        body = page.body,
        route_state = route_state,
    ))
}
