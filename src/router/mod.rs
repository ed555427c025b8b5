//! # Router Module
//!
//! The router maps an HTTP method and a request path to a registered handler
//! using a segment trie.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Building the trie from `(method, path, handler)` registrations
//! - Rejecting duplicate `(method, path)` registrations
//! - Matching request paths segment by segment, with backtracking
//! - Capturing `:name` variables and injecting them into the request params
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Registration**: at startup, each path is split on `/` and walked into
//!    the trie. A node is reused only when its segment text is identical, so
//!    `/users/:id/posts` and `/users/:uid/comments` produce two sibling
//!    variable nodes under `users`.
//!
//! 2. **Dispatch**: for each request, a depth-first search tries, at every
//!    depth, the child whose segment equals the request segment plus every
//!    variable child, in insertion order. Variable bindings are pushed before
//!    descending and popped after returning, so a failed branch leaves no
//!    trace for its siblings.
//!
//! ## Example
//!
//! ```rust
//! use segtrie::{DispatchOutcome, HandlerRequest, HandlerResponse, Params, Router, Value};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.get("/users/:id", |req: &HandlerRequest| {
//!     let id = req.params.get("id")?.as_long()?;
//!     Ok(HandlerResponse::json(200, serde_json::json!({ "id": id })))
//! })?;
//!
//! let req = HandlerRequest::new(Method::GET, "/users/42", Params::new(Value::Null));
//! match router.dispatch(req)? {
//!     DispatchOutcome::Handled(resp) => assert_eq!(resp.body["id"], 42),
//!     DispatchOutcome::Preflight => unreachable!(),
//! }
//! # Ok::<(), segtrie::Error>(())
//! ```
//!
//! ## Terminal rules
//!
//! When the whole path is consumed at a node:
//! - HEAD and OPTIONS succeed without running anything
//! - a node with handlers but not for this method fails `MethodNotAllowed`
//! - a node without any handler fails `RouteNotFound`
//!
//! Those failures end the search; they are not backtracked.

mod bindings;
mod core;
mod node;

pub use bindings::{BindingStack, MAX_INLINE_PARAMS};
pub use core::{Router, REGISTRABLE_METHODS};
pub use node::VARIABLE_MARKER;
