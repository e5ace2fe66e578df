//! Application State
//!
//! Shared state accessible by all server handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::navigation::RouterOptions;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Router configuration (route table + mode)
    pub router: Arc<RouterOptions>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(router: Arc<RouterOptions>, config: ServerConfig) -> Self {
        Self {
            router,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
