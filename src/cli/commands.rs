use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use super::demo::demo_router;
use crate::logging::{init_logging, LogConfig};
use crate::runtime_config::RuntimeConfig;
use crate::server::{AppService, HttpServer};

/// Command-line interface for segtrie
#[derive(Parser)]
#[command(name = "segtrie")]
#[command(about = "Segment-trie HTTP router", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the demo routes over HTTP
    Serve {
        /// Address and port to bind the server to
        #[arg(long, env = "SEGTRIE_ADDR", default_value = "127.0.0.1:8080")]
        addr: String,
    },
    /// Print the routing table and exit
    Routes,
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Fails when logging cannot be installed, a route cannot be registered, or
/// the server cannot bind `addr`.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Routes => {
            let router = demo_router().context("failed to build routing table")?;
            router.dump_routes();
            Ok(())
        }
        Commands::Serve { addr } => {
            init_logging(&LogConfig::from_env())?;

            let config = RuntimeConfig::from_env();
            config.apply();
            info!(
                stack_size = config.stack_size,
                max_body_bytes = config.max_body_bytes,
                "Runtime configured"
            );

            let router = demo_router().context("failed to build routing table")?;
            router.log_routes();

            let service = AppService::new(Arc::new(router), config);
            let handle = HttpServer(service)
                .start(addr.as_str())
                .with_context(|| format!("failed to bind {addr}"))?;
            handle
                .join()
                .map_err(|e| anyhow!("server coroutine panicked: {e:?}"))
        }
    }
}
