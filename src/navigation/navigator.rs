//! Navigator
//!
//! Owns runtime navigation state: the history stack, the current route and
//! whether a navigation is still waiting on its view.
//!
//! # Navigation flow
//!
//! ```text
//! push(url) → resolve → load view (lazy) → render → commit to history
//!                           │
//!                           └─ a newer navigation started meanwhile → Superseded
//! ```
//!
//! Every navigation takes a generation number. Only the latest generation may
//! commit, so a slow view load can never overwrite a later navigation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::navigation::error::{NavigationError, NavigationResult};
use crate::navigation::options::RouterOptions;
use crate::routes::{Params, RouteMatch};
use crate::views::Page;

/// A committed history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRoute {
    pub route: RouteMatch,
    pub page: Page,
}

/// How a navigation ended
#[derive(Debug, Clone)]
pub enum NavigationOutcome {
    /// The route was rendered and is now current
    Completed(Arc<RenderedRoute>),
    /// A newer navigation started before this one finished; nothing was committed
    Superseded,
}

impl NavigationOutcome {
    pub fn completed(&self) -> Option<&Arc<RenderedRoute>> {
        match self {
            NavigationOutcome::Completed(rendered) => Some(rendered),
            NavigationOutcome::Superseded => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Commit {
    Push,
    Replace,
}

#[derive(Debug, Default)]
struct History {
    entries: Vec<Arc<RenderedRoute>>,
    cursor: Option<usize>,
}

impl History {
    fn current(&self) -> Option<Arc<RenderedRoute>> {
        self.cursor.map(|i| Arc::clone(&self.entries[i]))
    }
}

/// Runtime navigation state over a [`RouterOptions`]
#[derive(Debug)]
pub struct Navigator {
    options: Arc<RouterOptions>,
    history: RwLock<History>,
    /// Generation of the most recently started navigation
    started: AtomicU64,
    /// Highest generation that has finished (committed, superseded or failed)
    settled: AtomicU64,
}

impl Navigator {
    pub fn new(options: Arc<RouterOptions>) -> Self {
        Self {
            options,
            history: RwLock::new(History::default()),
            started: AtomicU64::new(0),
            settled: AtomicU64::new(0),
        }
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Navigate to a URL, adding a history entry
    pub async fn push(&self, url: &str) -> NavigationResult<NavigationOutcome> {
        let route = self.options.routes.resolve(url)?;
        self.navigate(route, Commit::Push).await
    }

    /// Navigate to a URL, replacing the current history entry
    pub async fn replace(&self, url: &str) -> NavigationResult<NavigationOutcome> {
        let route = self.options.routes.resolve(url)?;
        self.navigate(route, Commit::Replace).await
    }

    /// Navigate to a named route
    pub async fn push_named(
        &self,
        name: &str,
        params: &Params,
    ) -> NavigationResult<NavigationOutcome> {
        let route = self.options.routes.resolve_named(name, params)?;
        self.navigate(route, Commit::Push).await
    }

    /// Move through history by `delta` entries
    pub async fn go(&self, delta: isize) -> NavigationResult<Arc<RenderedRoute>> {
        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        let result = {
            let mut history = self.history.write().await;
            let target = history
                .cursor
                .and_then(|c| c.checked_add_signed(delta))
                .filter(|&t| t < history.entries.len());
            match target {
                Some(target) => {
                    history.cursor = Some(target);
                    Ok(Arc::clone(&history.entries[target]))
                }
                None => Err(NavigationError::OutOfHistory { delta }),
            }
        };
        self.settled.fetch_max(generation, Ordering::SeqCst);

        if let Ok(entry) = &result {
            tracing::debug!(delta, route = %entry.route.name, "History traversal");
        }
        result
    }

    pub async fn back(&self) -> NavigationResult<Arc<RenderedRoute>> {
        self.go(-1).await
    }

    pub async fn forward(&self) -> NavigationResult<Arc<RenderedRoute>> {
        self.go(1).await
    }

    /// The current history entry
    pub async fn current(&self) -> Option<Arc<RenderedRoute>> {
        self.history.read().await.current()
    }

    pub async fn history_len(&self) -> usize {
        self.history.read().await.entries.len()
    }

    /// True while the latest navigation is still loading its view
    pub fn is_pending(&self) -> bool {
        self.started.load(Ordering::SeqCst) > self.settled.load(Ordering::SeqCst)
    }

    async fn navigate(
        &self,
        route: RouteMatch,
        commit: Commit,
    ) -> NavigationResult<NavigationOutcome> {
        if let Commit::Push = commit {
            if let Some(current) = self.current().await {
                if current.route.location == route.location {
                    return Err(NavigationError::Duplicated(route.location.full_path()));
                }
            }
        }

        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            generation,
            route = %route.name,
            path = %route.location.path,
            "Navigation started"
        );

        let rendered = self.options.render(&route).await;
        let outcome = match rendered {
            Ok(page) => self.commit(generation, route, page, commit).await,
            Err(e) => {
                tracing::warn!(generation, error = %e, "Navigation failed");
                Err(e)
            }
        };

        self.settled.fetch_max(generation, Ordering::SeqCst);
        outcome
    }

    async fn commit(
        &self,
        generation: u64,
        route: RouteMatch,
        page: Page,
        commit: Commit,
    ) -> NavigationResult<NavigationOutcome> {
        let mut history = self.history.write().await;

        if self.started.load(Ordering::SeqCst) != generation {
            tracing::warn!(
                generation,
                route = %route.name,
                "Navigation superseded before its view finished loading"
            );
            return Ok(NavigationOutcome::Superseded);
        }

        let rendered = Arc::new(RenderedRoute { route, page });
        match (commit, history.cursor) {
            (Commit::Replace, Some(cursor)) => {
                history.entries[cursor] = Arc::clone(&rendered);
            }
            (_, cursor) => {
                let keep = cursor.map(|c| c + 1).unwrap_or(0);
                history.entries.truncate(keep);
                history.entries.push(Arc::clone(&rendered));
                let last = history.entries.len() - 1;
                history.cursor = Some(last);
            }
        }

        tracing::info!(
            route = %rendered.route.name,
            path = %rendered.route.location.full_path(),
            "Navigation completed"
        );
        Ok(NavigationOutcome::Completed(rendered))
    }
}
