//! # segtrie
//!
//! **segtrie** is a small HTTP request router built on a segment trie, served
//! through `may` coroutines and `may_minihttp`.
//!
//! ## Overview
//!
//! Routes are registered as `(method, path, handler)` triples where a path
//! segment starting with `:` captures the matching request segment. A request
//! is matched by a depth-first walk over the trie that backtracks out of dead
//! ends. Captured variables are injected next to the decoded request payload
//! so a handler reads both through one accessor API.
//!
//! ## Architecture
//!
//! - **[`router`]** - segment trie, registration and dispatch
//! - **[`params`]** - typed accessors over the per-request payload tree
//! - **[`value`]** - the dynamically typed payload tree
//! - **[`handler`]** - handler trait, request and response types
//! - **[`error`]** - error kinds shared by every layer
//! - **[`server`]** - body decoding, status mapping and the HTTP service
//! - **[`runtime_config`]** / **[`logging`]** - environment-driven setup
//! - **[`cli`]** - the `segtrie` binary's commands
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer<br/>(may_minihttp)
//!     participant Service as AppService
//!     participant Body as body::decode_body
//!     participant Router
//!     participant Handler
//!
//!     Client->>Server: HTTP request
//!     Server->>Service: call(req, res)
//!     Service->>Body: decode by Content-Type
//!     Body-->>Service: Value payload
//!     Service->>Router: dispatch(HandlerRequest)
//!     Router->>Router: walk trie, push/pop bindings
//!     Router->>Handler: handle(req) with injected vars
//!     Handler-->>Router: Result<HandlerResponse>
//!     Router-->>Service: DispatchOutcome or Error
//!     Service->>Server: status + body
//!     Server-->>Client: HTTP response
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use segtrie::runtime_config::RuntimeConfig;
//! use segtrie::server::{AppService, HttpServer};
//! use segtrie::{HandlerRequest, HandlerResponse, Router};
//! use std::sync::Arc;
//!
//! let mut router = Router::new();
//! router.get("/api/sdk/v3/latest_version/:os", |req: &HandlerRequest| {
//!     let os = req.params.get("os")?.as_str()?;
//!     Ok(HandlerResponse::json(200, serde_json::json!({ "os": os })))
//! })?;
//!
//! let config = RuntimeConfig::from_env();
//! config.apply();
//! let service = AppService::new(Arc::new(router), config);
//! let handle = HttpServer(service).start("127.0.0.1:8080")?;
//! handle.join().ok();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod error;
pub mod handler;
pub mod logging;
pub mod params;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod value;

pub use error::{Error, Result};
pub use handler::{DispatchOutcome, Handler, HandlerRequest, HandlerResponse, HeaderVec};
pub use params::{ParamRef, Params};
pub use router::Router;
pub use value::{Object, Value};
