//! Value trait implementations: constructors, predicates, extractors, From traits, PartialEq

use std::sync::Arc;

use crate::error::EvalError;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(Arc::new(s.into()))
    }

    /// Create a list value
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    /// Create a native function value
    pub fn native<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value], &mut crate::Environment) -> Result<Value, EvalError>
            + Send
            + Sync
            + 'static,
    {
        Value::Callable(Callable::Native(NativeFn::new(name, arity, func)))
    }

    /// Create a special form value
    pub fn special<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[crate::Node], &mut crate::Environment, &crate::EvalContext) -> crate::EvalResult
            + Send
            + Sync
            + 'static,
    {
        Value::Callable(Callable::Special(SpecialForm::new(name, func)))
    }

    /// Create a user closure value
    pub fn closure(closure: Closure) -> Self {
        Value::Callable(Callable::Closure(Arc::new(closure)))
    }

    /// Parse a number from its textual form.
    ///
    /// Accepts anything the lexer produces for a number token (`12`,
    /// `-3.5`, `-.25`, `7.`) plus surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNumber` if `text` is not numeric.
    pub fn number_from_str(text: &str) -> Result<Self, EvalError> {
        text.trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| EvalError::InvalidNumber {
                text: text.to_string(),
            })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is a number
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Check if value is a list or text
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::List(_) | Value::Text(_))
    }

    /// Check if value is callable (native, closure, or special form)
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Callable(_))
    }

    /// Language-level type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Text(_) => "text",
            Value::Callable(Callable::Native(_)) => "native",
            Value::Callable(Callable::Closure(_)) => "fn",
            Value::Callable(Callable::Special(_)) => "special",
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════

    /// Extract number value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract text slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract list items as slice
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Extract callable
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Copy semantics
    // ═══════════════════════════════════════════════════════════════════

    /// Structurally independent duplicate of this value.
    ///
    /// Sequences are rebuilt element by element so the result shares no
    /// allocation with `self`. Callables are immutable and keep their
    /// identity.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::List(items) => Value::list(items.iter().map(Value::deep_copy).collect()),
            Value::Text(s) => Value::text(s.as_str()),
            other => other.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::list(v.into_iter().map(Into::into).collect())
    }
}
