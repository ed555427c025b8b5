//! Path-variable bindings collected during one dispatch walk.

use smallvec::SmallVec;
use std::sync::Arc;

/// Number of bindings kept inline before the stack spills to the heap.
/// Most routes capture ≤4 variables (e.g., `/users/:id/posts/:post_id`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// LIFO stack of `(name, value)` pairs mirroring the recursion depth of the walk.
///
/// Names are shared with the variable node that declared them; values borrow
/// from the request path.
pub type BindingStack<'p> = SmallVec<[(Arc<str>, &'p str); MAX_INLINE_PARAMS]>;
