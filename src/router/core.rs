//! Router core: registration and the dispatch entry point.

use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::bindings::BindingStack;
use super::node::{child_for_insert, walk, RouteNode};
use crate::error::{Error, Result};
use crate::handler::{DispatchOutcome, Handler, HandlerRequest, HandlerResponse};

/// Methods that can carry a handler. HEAD and OPTIONS are answered by the
/// router itself at any matched path.
pub const REGISTRABLE_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
];

/// Path segments kept inline while splitting a request path.
const MAX_INLINE_SEGMENTS: usize = 16;

/// Dispatch walks slower than this are logged at `warn`.
const SLOW_DISPATCH: Duration = Duration::from_millis(1);

/// Segment-trie router mapping `(method, path)` to a handler.
///
/// Build it once with [`Router::add_route`] (or the per-method helpers), then
/// share it read-only, typically behind an `Arc`, across every request.
/// Registration needs `&mut self`, dispatch only `&self`.
#[derive(Debug, Clone, Default)]
pub struct Router {
    /// Root-level nodes; the first path element (empty for `/...`) selects one
    roots: Vec<RouteNode>,
    /// Number of registered `(method, path)` pairs
    route_count: usize,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` and `path`.
    ///
    /// `path` is split on `/`; segments starting with `:` capture the matching
    /// request segment under that name.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedMethod`] for anything but GET, POST, PUT, DELETE, PATCH
    /// - [`Error::DuplicateRoute`] if `(method, path)` is already registered
    pub fn add_route<F>(&mut self, method: Method, path: &str, handler: F) -> Result<()>
    where
        F: Fn(&HandlerRequest) -> Result<HandlerResponse> + Send + Sync + 'static,
    {
        self.add_handler(method, path, Arc::new(handler))
    }

    /// Register an already shared handler, e.g. a type implementing [`Handler`].
    pub fn add_handler(
        &mut self,
        method: Method,
        path: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<()> {
        if !REGISTRABLE_METHODS.contains(&method) {
            warn!(method = %method, path = %path, "Rejected route with unsupported method");
            return Err(Error::UnsupportedMethod(method));
        }

        let mut parts = path.split('/');
        let root = parts.next().unwrap_or_default();
        let rest: Vec<&str> = parts.collect();

        match child_for_insert(&mut self.roots, root).insert(&rest, method.clone(), handler, path)
        {
            Ok(()) => {
                self.route_count += 1;
                debug!(
                    method = %method,
                    path = %path,
                    routes_count = self.route_count,
                    "Route registered"
                );
                Ok(())
            }
            Err(err) => {
                warn!(method = %method, path = %path, error = %err, "Route registration failed");
                Err(err)
            }
        }
    }

    pub fn get<F>(&mut self, path: &str, handler: F) -> Result<()>
    where
        F: Fn(&HandlerRequest) -> Result<HandlerResponse> + Send + Sync + 'static,
    {
        self.add_route(Method::GET, path, handler)
    }

    pub fn post<F>(&mut self, path: &str, handler: F) -> Result<()>
    where
        F: Fn(&HandlerRequest) -> Result<HandlerResponse> + Send + Sync + 'static,
    {
        self.add_route(Method::POST, path, handler)
    }

    pub fn put<F>(&mut self, path: &str, handler: F) -> Result<()>
    where
        F: Fn(&HandlerRequest) -> Result<HandlerResponse> + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, path, handler)
    }

    pub fn delete<F>(&mut self, path: &str, handler: F) -> Result<()>
    where
        F: Fn(&HandlerRequest) -> Result<HandlerResponse> + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, path, handler)
    }

    pub fn patch<F>(&mut self, path: &str, handler: F) -> Result<()>
    where
        F: Fn(&HandlerRequest) -> Result<HandlerResponse> + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, path, handler)
    }

    /// Route `req` to its handler.
    ///
    /// Path variables captured on the way are injected into `req.params`
    /// before the handler runs. HEAD and OPTIONS on any fully matched path
    /// return [`DispatchOutcome::Preflight`] without running a handler.
    ///
    /// # Errors
    ///
    /// - [`Error::RouteNotFound`] when no branch matches the whole path, or the
    ///   matched node has no handlers at all
    /// - [`Error::MethodNotAllowed`] when the matched node lacks `req.method`
    /// - whatever the handler itself returns
    pub fn dispatch(&self, mut req: HandlerRequest) -> Result<DispatchOutcome> {
        let path = req.path.clone();
        let method = req.method.clone();
        let parts: SmallVec<[&str; MAX_INLINE_SEGMENTS]> = path.split('/').collect();
        let mut bindings = BindingStack::new();

        let start = Instant::now();
        let result = match walk(&self.roots, &parts, &mut req, &mut bindings) {
            Ok(Some(outcome)) => Ok(outcome),
            Ok(None) => Err(Error::RouteNotFound),
            Err(err) => Err(err),
        };
        let elapsed = start.elapsed();
        debug_assert!(bindings.is_empty(), "binding stack not drained");

        match &result {
            Ok(DispatchOutcome::Handled(resp)) => debug!(
                method = %method,
                path = %path,
                status = resp.status,
                duration_us = elapsed.as_micros(),
                "Route matched"
            ),
            Ok(DispatchOutcome::Preflight) => debug!(
                method = %method,
                path = %path,
                "Preflight answered without handler"
            ),
            Err(err) => debug!(
                method = %method,
                path = %path,
                error = %err,
                duration_us = elapsed.as_micros(),
                "Dispatch failed"
            ),
        }

        if elapsed > SLOW_DISPATCH {
            warn!(
                method = %method,
                path = %path,
                duration_us = elapsed.as_micros(),
                "Slow dispatch detected"
            );
        }

        result
    }

    /// Every registered `(method, path)` pair in trie order.
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut out = Vec::with_capacity(self.route_count);
        for root in &self.roots {
            collect_routes(root, None, &mut out);
        }
        out
    }

    /// Number of registered `(method, path)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Log the routing table once registration is complete.
    pub fn log_routes(&self) {
        let routes_summary: Vec<String> = self
            .routes()
            .iter()
            .take(10)
            .map(|(method, path)| format!("{method} {path}"))
            .collect();

        info!(
            routes_count = self.route_count,
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
    }

    #[cfg(test)]
    pub(super) fn roots(&self) -> &[RouteNode] {
        &self.roots
    }

    /// Print all registered routes to stdout.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.route_count);
        for (method, path) in self.routes() {
            println!("[route] {method} {path}");
        }
    }
}

fn collect_routes(node: &RouteNode, prefix: Option<&str>, out: &mut Vec<(Method, String)>) {
    let path = match prefix {
        Some(prefix) => format!("{prefix}/{}", node.segment()),
        None => node.segment().to_string(),
    };

    let mut methods: Vec<&Method> = node.handlers().keys().collect();
    methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    out.extend(methods.into_iter().map(|m| (m.clone(), path.clone())));

    for child in node.children() {
        collect_routes(child, Some(&path), out);
    }
}
