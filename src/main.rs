//! spa-routes CLI
//!
//! Command-line interface for the route table:
//! - Serve the application shell
//! - Print the route table
//! - Resolve a URL
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use spa_routes::config::{generate_default_config, Config, LoggingConfig};
use spa_routes::navigation::RouterOptions;
use spa_routes::server::{serve, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "spa-routes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Route table and history-mode shell server for a single-page app")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the application shell
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the route table
    Routes {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Resolve a URL against the route table
    Resolve {
        /// URL or path, e.g. /users/7?tab=groups
        url: String,
        /// Override the configured base path
        #[arg(long)]
        base: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            tracing::info!("Starting spa-routes v{}", env!("CARGO_PKG_VERSION"));

            let table = config.router.build_table().context("building route table")?;
            let router = Arc::new(RouterOptions::new(table));
            tracing::info!(
                routes = router.routes.len(),
                mode = ?router.mode,
                "Router configured"
            );

            let state = AppState::new(router, config.server.clone());
            serve(state, &config.server).await?;
        }

        Commands::Routes { format } => {
            let table = config.router.build_table()?;
            let summaries: Vec<_> = table.entries().iter().map(|e| e.summary()).collect();

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&summaries)?),
                _ => {
                    println!("{:<12} {:<16} {:<10} {}", "NAME", "PATH", "VIEW", "PROPS");
                    for route in &summaries {
                        let path = if route.path.is_empty() { "(root)" } else { route.path.as_str() };
                        println!(
                            "{:<12} {:<16} {:<10} {}",
                            route.name, path, route.view, route.props
                        );
                    }
                }
            }
        }

        Commands::Resolve { url, base } => {
            if let Some(base) = base {
                config.router.base = base;
            }
            let table = config.router.build_table()?;
            let matched = table.resolve(&url)?;
            println!("{}", serde_json::to_string_pretty(&matched)?);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Initialize tracing; RUST_LOG wins over the configured level
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("spa_routes={},tower_http=info", config.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
