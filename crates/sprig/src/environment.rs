//! Runtime environment: the scope chain
//!
//! The chain is a stack of [`Frame`]s, innermost last. Each frame owns its
//! bindings plus a trace record (a label and the offset of the last token
//! inspected while it was innermost) used to build tracebacks.

mod frame;

pub use frame::{Frame, ScopeGuard};

use indexmap::IndexMap;

use crate::error::{EvalError, TraceEntry};
use crate::value::Value;

/// Identifier → value mapping a library exposes.
///
/// This is the whole registration contract: a library builds an `Exports`
/// and the host merges it into a frame with [`Environment::import`].
pub type Exports = IndexMap<String, Value>;

/// The runtime environment managing the scope chain.
///
/// # Example
///
/// ```
/// use sprig::{Environment, Value};
///
/// let mut env = Environment::new();
///
/// // Global scope
/// env.define("x", Value::Number(1.0));
///
/// // Enter a new scope
/// env.push_frame("do");
/// env.define("y", Value::Number(2.0));
/// env.define("x", Value::Number(10.0)); // Shadows outer x
///
/// assert_eq!(env.get("x"), Some(&Value::Number(10.0))); // Gets inner x
/// assert_eq!(env.get("y"), Some(&Value::Number(2.0)));
///
/// // Exit scope
/// env.pop_frame();
///
/// assert_eq!(env.get("x"), Some(&Value::Number(1.0))); // Back to outer x
/// assert_eq!(env.get("y"), None); // y is gone
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    /// Frames, global first
    frames: Vec<Frame>,

    /// Current nesting of user function calls
    call_depth: usize,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create an environment holding only an empty global frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new("program", None)],
            call_depth: 0,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Frame Management (Scope Entry/Exit)
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a new scope (push a frame).
    ///
    /// The new frame's trace record starts at the token last inspected by
    /// its parent. Prefer [`Environment::scope_guard`], which pops the frame
    /// again even when evaluation fails.
    pub fn push_frame(&mut self, label: impl Into<String>) {
        let frame = Frame::new(label, self.last_offset());
        tracing::trace!(label = %frame.label(), depth = self.frames.len() + 1, "push frame");
        self.frames.push(frame);
    }

    /// Exit the current scope (pop a frame).
    ///
    /// Does nothing if at the global scope (won't pop the last frame).
    pub fn pop_frame(&mut self) {
        // Never pop the global frame
        if self.frames.len() > 1 {
            if let Some(frame) = self.frames.pop() {
                tracing::trace!(label = %frame.label(), depth = self.frames.len(), "pop frame");
            }
        }
    }

    /// Get the current scope depth (number of frames).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if we're at global scope.
    pub fn is_global_scope(&self) -> bool {
        self.frames.len() == 1
    }

    /// Iterate over the frames, global first.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Depth Tracking (Stack Overflow Protection)
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a function call. Returns error if `max` would be exceeded.
    pub fn enter_call(&mut self, max: usize) -> Result<(), EvalError> {
        if self.call_depth >= max {
            return Err(EvalError::StackOverflow { max });
        }
        self.call_depth += 1;
        Ok(())
    }

    /// Exit a function call.
    pub fn exit_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }

    /// Get current call depth.
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding
    // ═══════════════════════════════════════════════════════════════════

    /// Bind `name` in the innermost frame, always as a fresh local.
    ///
    /// The stored value is a deep copy of `value`.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.innermost_mut().insert(name.into(), value.deep_copy());
    }

    /// Assign to the nearest existing binding of `name`.
    ///
    /// Searches from the innermost frame outward and overwrites the first
    /// binding found. If no frame binds `name`, it is created in the global
    /// frame. The stored value is a deep copy of `value`.
    pub fn set(&mut self, name: &str, value: Value) {
        let value = value.deep_copy();
        if let Some(slot) = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))
        {
            *slot = value;
            return;
        }
        tracing::debug!(name, "assignment to unbound name creates a global");
        self.frames[0].insert(name.to_string(), value);
    }

    /// Merge a library's exports into the innermost frame.
    pub fn import(&mut self, exports: &Exports) {
        let frame = self.innermost_mut();
        for (name, value) in exports {
            frame.insert(name.clone(), value.clone());
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a binding by name, innermost frame first.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Look up a binding, failing with `UndefinedIdentifier`.
    pub fn lookup(&self, name: &str) -> Result<Value, EvalError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedIdentifier {
                name: name.to_string(),
            })
    }

    /// Look up a binding in the innermost frame only.
    pub fn get_local(&self, name: &str) -> Option<&Value> {
        self.frames.last().and_then(|frame| frame.get(name))
    }

    /// Check if a binding exists in any frame.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Check if a binding exists in the current (innermost) scope only.
    pub fn contains_in_current_scope(&self, name: &str) -> bool {
        self.get_local(name).is_some()
    }

    /// Get all binding names in the current scope.
    pub fn names_in_current_scope(&self) -> Vec<&str> {
        self.frames
            .last()
            .map(|frame| frame.names().collect())
            .unwrap_or_default()
    }

    /// Get the number of bindings across all frames.
    pub fn len(&self) -> usize {
        self.frames.iter().map(Frame::len).sum()
    }

    /// Check if no frame holds any binding.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every binding and frame, returning to a fresh global scope.
    pub fn clear(&mut self) {
        self.frames = vec![Frame::new("program", None)];
        self.call_depth = 0;
    }

    // ═══════════════════════════════════════════════════════════════════
    // Diagnostics
    // ═══════════════════════════════════════════════════════════════════

    /// Record that the token at `offset` is being inspected.
    pub fn mark(&mut self, offset: usize) {
        self.innermost_mut().mark(offset);
    }

    /// Offset of the token last inspected in the innermost frame.
    pub fn last_offset(&self) -> Option<usize> {
        self.frames.last().and_then(Frame::last_offset)
    }

    /// Snapshot of the live frames, innermost first.
    pub fn traceback(&self) -> Vec<TraceEntry> {
        self.frames
            .iter()
            .rev()
            .map(|frame| TraceEntry {
                label: frame.label().to_string(),
                offset: frame.last_offset(),
            })
            .collect()
    }

    fn innermost_mut(&mut self) -> &mut Frame {
        // The global frame is never popped, so there is always one.
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}
