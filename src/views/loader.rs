//! Lazy view loading
//!
//! A [`ViewLoader`] wraps a view's loader function and memoises the first
//! successful result. Nothing runs until [`ViewLoader::load`] is awaited, so
//! building a route table never pulls in a view. Concurrent first loads share
//! one loader run; a failed load leaves the cell empty and is retried on the
//! next call.

use futures_util::future::BoxFuture;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{View, ViewError, ViewId};

/// Future returned by a loader function
pub type LoadFuture = BoxFuture<'static, Result<Arc<dyn View>, ViewError>>;

/// A deferred view loader
pub type LoadFn = fn() -> LoadFuture;

struct LoaderInner {
    view: ViewId,
    load_fn: LoadFn,
    cell: OnceCell<Arc<dyn View>>,
    /// Number of times the loader function actually ran
    runs: AtomicUsize,
}

/// Shared, memoising handle to one view's loader
#[derive(Clone)]
pub struct ViewLoader {
    inner: Arc<LoaderInner>,
}

impl ViewLoader {
    /// Loader using the view's registered load function
    pub fn new(view: ViewId) -> Self {
        Self::with_fn(view, view.loader())
    }

    /// Loader using a custom load function
    pub fn with_fn(view: ViewId, load_fn: LoadFn) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                view,
                load_fn,
                cell: OnceCell::new(),
                runs: AtomicUsize::new(0),
            }),
        }
    }

    pub fn view(&self) -> ViewId {
        self.inner.view
    }

    /// Resolve the view, running the loader on first use
    pub async fn load(&self) -> Result<Arc<dyn View>, ViewError> {
        let inner = &self.inner;
        let view = inner
            .cell
            .get_or_try_init(|| async {
                inner.runs.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(view = %inner.view, "Loading view");
                let loaded = (inner.load_fn)().await;
                match &loaded {
                    Ok(_) => tracing::info!(view = %inner.view, "View loaded"),
                    Err(e) => tracing::warn!(view = %inner.view, error = %e, "View load failed"),
                }
                loaded
            })
            .await?;
        Ok(Arc::clone(view))
    }

    /// True once a load has succeeded
    pub fn is_loaded(&self) -> bool {
        self.inner.cell.initialized()
    }

    /// How many times the loader function has run
    pub fn load_count(&self) -> usize {
        self.inner.runs.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for ViewLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewLoader")
            .field("view", &self.inner.view)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// One loader per view
///
/// Routes that share a view share its loader, so a view is fetched once no
/// matter how many routes point at it.
#[derive(Debug, Clone)]
pub struct ViewRegistry {
    loaders: [ViewLoader; 3],
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            loaders: ViewId::ALL.map(ViewLoader::new),
        }
    }

    /// Replace one view's load function
    pub fn with_loader(mut self, view: ViewId, load_fn: LoadFn) -> Self {
        self.loaders[view.index()] = ViewLoader::with_fn(view, load_fn);
        self
    }

    pub fn get(&self, view: ViewId) -> &ViewLoader {
        &self.loaders[view.index()]
    }

    /// Views whose loader has completed
    pub fn loaded_views(&self) -> Vec<ViewId> {
        self.loaders
            .iter()
            .filter(|l| l.is_loaded())
            .map(|l| l.view())
            .collect()
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;

    fn failing_load() -> LoadFuture {
        async {
            Err(ViewError::LoadFailed {
                view: ViewId::User,
                reason: "chunk unavailable".to_string(),
            })
        }
        .boxed()
    }

    #[tokio::test]
    async fn test_loader_is_lazy() {
        let loader = ViewLoader::new(ViewId::Home);
        assert!(!loader.is_loaded());
        assert_eq!(loader.load_count(), 0);

        let view = loader.load().await.unwrap();
        assert_eq!(view.id(), ViewId::Home);
        assert!(loader.is_loaded());
        assert_eq!(loader.load_count(), 1);
    }

    #[tokio::test]
    async fn test_loader_runs_once() {
        let loader = ViewLoader::new(ViewId::User);
        loader.load().await.unwrap();
        loader.load().await.unwrap();
        assert_eq!(loader.load_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_loads_coalesce() {
        let loader = ViewLoader::new(ViewId::NotFound);
        let other = loader.clone();
        let (a, b) = tokio::join!(loader.load(), other.load());
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(loader.load_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let loader = ViewLoader::with_fn(ViewId::User, failing_load);
        assert!(loader.load().await.is_err());
        assert!(loader.load().await.is_err());
        assert!(!loader.is_loaded());
        assert_eq!(loader.load_count(), 2);
    }

    #[tokio::test]
    async fn test_registry_shares_loaders() {
        let registry = ViewRegistry::new();
        let a = registry.get(ViewId::User).clone();
        let b = registry.get(ViewId::User).clone();

        a.load().await.unwrap();
        assert!(b.is_loaded());
        assert_eq!(registry.loaded_views(), vec![ViewId::User]);
    }
}
