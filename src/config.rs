//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::routes::{default_routes, RouteResult, RouteTable};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Shell server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Per-request timeout; 0 disables it
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Directory served under `/assets`
    #[serde(default)]
    pub assets_dir: Option<String>,

    /// Site name appended to each page title
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_title() -> String {
    "App".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
            assets_dir: None,
            title: default_title(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Route matching configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    /// Base path the application is served under
    #[serde(default = "default_base")]
    pub base: String,

    #[serde(default)]
    pub case_sensitive: bool,
}

fn default_base() -> String {
    "/".to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            case_sensitive: false,
        }
    }
}

impl RouterConfig {
    /// Build the application's route table with these match options
    pub fn build_table(&self) -> RouteResult<RouteTable> {
        RouteTable::builder()
            .routes(default_routes())
            .base(&self.base)
            .case_sensitive(self.case_sensitive)
            .build()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("spa-routes").join("config.toml")),
            Some(PathBuf::from("/etc/spa-routes/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SPA_ROUTES_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SPA_ROUTES_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid SPA_ROUTES_PORT: {}", port),
            }
        }
        if let Ok(dir) = std::env::var("SPA_ROUTES_ASSETS_DIR") {
            self.server.assets_dir = Some(dir);
        }

        if let Ok(base) = std::env::var("SPA_ROUTES_BASE") {
            self.router.base = base;
        }

        if let Ok(level) = std::env::var("SPA_ROUTES_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SPA_ROUTES_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# spa-routes Configuration
#
# Environment variables override these settings:
# - SPA_ROUTES_HOST
# - SPA_ROUTES_PORT
# - SPA_ROUTES_ASSETS_DIR
# - SPA_ROUTES_BASE
# - SPA_ROUTES_LOG_LEVEL
# - SPA_ROUTES_LOG_FORMAT

[server]
# Shell server host
host = "0.0.0.0"

# Shell server port
port = 8080

# Allowed CORS origins (empty = allow any)
cors_origins = []

# Request timeout in seconds (0 disables it)
request_timeout_secs = 30

# Static assets served under /assets
# assets_dir = "./dist/assets"

# Site name appended to each page title
title = "App"

[router]
# Base path the application is mounted under
base = "/"

# Match static path segments case-sensitively
case_sensitive = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.router.base, "/");
        assert!(!config.router.case_sensitive);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert!(config.server.assets_dir.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[router]\nbase = \"/app\"\ncase_sensitive = true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.router.base, "/app");
        assert!(config.router.case_sensitive);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_build_table_from_config() {
        let router = RouterConfig {
            base: "app".to_string(),
            case_sensitive: true,
        };
        let table = router.build_table().unwrap();
        assert_eq!(table.base(), "/app");
        assert!(table.options().case_sensitive);
        assert_eq!(table.resolve("/app/users/1").unwrap().name, "user");
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        let bad = Config::load(file.path()).unwrap_err();
        assert!(matches!(bad, ConfigError::Parse { .. }));
    }
}
