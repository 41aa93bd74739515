//! Scope frames and the RAII scope guard for automatic frame cleanup

use indexmap::IndexMap;

use super::Environment;
use crate::error::EvalError;
use crate::value::Value;

/// One layer of the scope chain.
#[derive(Debug, Clone)]
pub struct Frame {
    bindings: IndexMap<String, Value>,
    label: String,
    last_offset: Option<usize>,
}

impl Frame {
    /// Create an empty frame whose trace starts at `offset`.
    pub fn new(label: impl Into<String>, offset: Option<usize>) -> Self {
        Self {
            bindings: IndexMap::new(),
            label: label.into(),
            last_offset: offset,
        }
    }

    /// Diagnostic label (`program`, `function`, `while`, ...).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Offset of the last token inspected while this frame was innermost.
    pub fn last_offset(&self) -> Option<usize> {
        self.last_offset
    }

    /// Look up a binding in this frame only.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Iterate over bindings in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Binding names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Number of bindings in this frame.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether this frame holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(super) fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.bindings.get_mut(name)
    }

    pub(super) fn insert(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    pub(super) fn mark(&mut self, offset: usize) {
        self.last_offset = Some(offset);
    }
}

/// RAII guard that automatically pops a frame when dropped.
///
/// Frames are popped in exact reverse order of pushing, including when a
/// runtime error unwinds through the guard.
///
/// # Example
///
/// ```
/// use sprig::{Environment, Value};
///
/// let mut env = Environment::new();
/// env.define("x", Value::Number(1.0));
///
/// {
///     let mut guard = env.scope_guard("do");
///     guard.define("y", Value::Number(2.0));
///     // y is visible here
/// }
/// // guard dropped, frame popped, y is gone
/// assert!(!env.contains("y"));
/// assert!(env.contains("x"));
/// ```
pub struct ScopeGuard<'a> {
    env: &'a mut Environment,
    call: bool,
}

impl Environment {
    /// Create a scope guard that pushes a frame now and pops it on drop.
    pub fn scope_guard(&mut self, label: impl Into<String>) -> ScopeGuard<'_> {
        self.push_frame(label);
        ScopeGuard {
            env: self,
            call: false,
        }
    }

    /// Like [`Environment::scope_guard`], but also counts as one level of
    /// call nesting.
    ///
    /// # Errors
    ///
    /// Returns `StackOverflow` (and pushes nothing) if the call depth would
    /// exceed `max_depth`.
    pub fn call_guard(
        &mut self,
        label: impl Into<String>,
        max_depth: usize,
    ) -> Result<ScopeGuard<'_>, EvalError> {
        self.enter_call(max_depth)?;
        self.push_frame(label);
        Ok(ScopeGuard {
            env: self,
            call: true,
        })
    }
}

impl<'a> Drop for ScopeGuard<'a> {
    fn drop(&mut self) {
        self.env.pop_frame();
        if self.call {
            self.env.exit_call();
        }
    }
}

impl<'a> std::ops::Deref for ScopeGuard<'a> {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        self.env
    }
}

impl<'a> std::ops::DerefMut for ScopeGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.env
    }
}
