//! # CLI Module
//!
//! Command-line entry points of the `segtrie` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Start the HTTP server with the demo SDK routes:
//!
//! ```bash
//! segtrie serve --addr 0.0.0.0:8080
//! ```
//!
//! The address can also come from `SEGTRIE_ADDR`. Logging and runtime
//! settings are read from the `SEGTRIE_LOG_*`, `SEGTRIE_STACK_SIZE` and
//! `SEGTRIE_MAX_BODY_BYTES` variables.
//!
//! ### `routes`
//!
//! Print the routing table without starting a server:
//!
//! ```bash
//! segtrie routes
//! ```

mod commands;
mod demo;


pub use commands::{run_cli, Cli, Commands};
pub use demo::demo_router;
