//! Segment trie nodes and the recursive dispatch walk.
//!
//! Each node holds one `/`-delimited path segment. Segments starting with `:`
//! are variables and match any request segment. Unlike a radix tree, nodes are
//! never split or merged: registration only reuses a child whose segment text
//! is identical, so `:id` and `:user_id` at the same depth are two siblings.
//!
//! During dispatch every child whose segment equals the request segment, and
//! every variable child, is a candidate. Candidates are tried in insertion
//! order; literal children get no priority over variable ones.

use http::Method;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::bindings::BindingStack;
use crate::error::{Error, Result};
use crate::handler::{DispatchOutcome, Handler, HandlerRequest};

/// Prefix marking a variable segment.
pub const VARIABLE_MARKER: char = ':';

/// Node in the segment trie.
#[derive(Clone)]
pub(crate) struct RouteNode {
    /// Segment text as registered, marker included for variables
    segment: Box<str>,
    /// Variable name without the marker; `None` for literal segments
    param_name: Option<Arc<str>>,
    /// Children in insertion order
    children: Vec<RouteNode>,
    /// Handlers of the route ending at this node
    handlers: HashMap<Method, Arc<dyn Handler>>,
}

impl RouteNode {
    pub(crate) fn new(segment: &str) -> Self {
        let param_name = segment
            .strip_prefix(VARIABLE_MARKER)
            .map(Arc::<str>::from);
        Self {
            segment: segment.into(),
            param_name,
            children: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    pub(crate) fn segment(&self) -> &str {
        &self.segment
    }

    pub(crate) fn is_variable(&self) -> bool {
        self.param_name.is_some()
    }

    pub(crate) fn children(&self) -> &[RouteNode] {
        &self.children
    }

    pub(crate) fn handlers(&self) -> &HashMap<Method, Arc<dyn Handler>> {
        &self.handlers
    }

    /// Store `handler` under the node reached by `parts`, creating nodes on the way.
    ///
    /// `path` is only used to name the route in a [`Error::DuplicateRoute`].
    pub(crate) fn insert(
        &mut self,
        parts: &[&str],
        method: Method,
        handler: Arc<dyn Handler>,
        path: &str,
    ) -> Result<()> {
        let Some((part, rest)) = parts.split_first() else {
            if self.handlers.contains_key(&method) {
                return Err(Error::DuplicateRoute {
                    method,
                    path: path.to_string(),
                });
            }
            self.handlers.insert(method, handler);
            return Ok(());
        };

        child_for_insert(&mut self.children, part).insert(rest, method, handler, path)
    }

    /// Continue the walk below this node with the remaining request segments.
    fn descend<'p>(
        &self,
        rest: &[&'p str],
        req: &mut HandlerRequest,
        bindings: &mut BindingStack<'p>,
    ) -> Result<Option<DispatchOutcome>> {
        if rest.is_empty() {
            self.terminal(req, bindings).map(Some)
        } else {
            walk(&self.children, rest, req, bindings)
        }
    }

    /// The whole request path has been consumed at this node.
    fn terminal(
        &self,
        req: &mut HandlerRequest,
        bindings: &BindingStack<'_>,
    ) -> Result<DispatchOutcome> {
        if req.method == Method::HEAD || req.method == Method::OPTIONS {
            return Ok(DispatchOutcome::Preflight);
        }

        let Some(handler) = self.handlers.get(&req.method) else {
            return Err(if self.handlers.is_empty() {
                Error::RouteNotFound
            } else {
                Error::MethodNotAllowed
            });
        };

        for (name, value) in bindings {
            req.params.inject_field(name, value);
        }
        handler.handle(req).map(DispatchOutcome::Handled)
    }
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.handlers.keys().map(Method::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("RouteNode")
            .field("segment", &self.segment)
            .field("methods", &methods)
            .field("children", &self.children)
            .finish()
    }
}

/// Existing child with exactly this segment text, or a freshly appended one.
pub(crate) fn child_for_insert<'n>(nodes: &'n mut Vec<RouteNode>, part: &str) -> &'n mut RouteNode {
    let idx = match nodes.iter().position(|n| n.segment() == part) {
        Some(idx) => idx,
        None => {
            nodes.push(RouteNode::new(part));
            nodes.len() - 1
        }
    };
    &mut nodes[idx]
}

/// Depth-first search over `nodes` for the request segments `parts`.
///
/// Returns `Ok(None)` on a dead end so the caller can try its next candidate.
/// Errors raised at a terminal node, including a handler's own error, end the
/// search immediately.
///
/// Every binding pushed here is popped before returning, whatever the result.
pub(crate) fn walk<'p>(
    nodes: &[RouteNode],
    parts: &[&'p str],
    req: &mut HandlerRequest,
    bindings: &mut BindingStack<'p>,
) -> Result<Option<DispatchOutcome>> {
    let Some((&part, rest)) = parts.split_first() else {
        return Ok(None);
    };

    let candidates = nodes
        .iter()
        .filter(|node| node.is_variable() || node.segment() == part);

    for node in candidates {
        let result = match &node.param_name {
            Some(name) => {
                bindings.push((Arc::clone(name), part));
                let result = node.descend(rest, req, bindings);
                bindings.pop();
                result
            }
            None => node.descend(rest, req, bindings),
        };

        match result {
            Ok(None) => continue,
            found => return found,
        }
    }

    Ok(None)
}
