//! Callable value types: native functions, user closures, and special forms
//!
//! The three kinds differ only in *when* their arguments are evaluated:
//!
//! - [`NativeFn`] and [`Closure`] are eager: the evaluator reduces every
//!   argument left to right and checks the count before the call.
//! - [`SpecialForm`] receives the raw argument trees and decides itself what
//!   to evaluate, in which order, and how often.

use std::sync::Arc;

use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::{EvalError, EvalResult};
use crate::parser::Node;

use super::Value;

/// Type alias for native function pointers to reduce complexity
pub type NativeFnPtr =
    Arc<dyn Fn(&[Value], &mut Environment) -> Result<Value, EvalError> + Send + Sync>;

/// Type alias for special form pointers
pub type SpecialFnPtr =
    Arc<dyn Fn(&[Node], &mut Environment, &EvalContext) -> EvalResult + Send + Sync>;

/// One of the three callable kinds.
#[derive(Clone)]
pub enum Callable {
    /// Host function with a fixed arity, called with evaluated arguments
    Native(NativeFn),

    /// User-defined function built by `fn`
    Closure(Arc<Closure>),

    /// Host function receiving unevaluated argument trees
    Special(SpecialForm),
}

impl Callable {
    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Callable::Native(f) => &f.name,
            Callable::Closure(_) => "fn",
            Callable::Special(s) => &s.name,
        }
    }

    /// Number of evaluated arguments an eager callable accepts.
    ///
    /// Special forms have no fixed arity and return `None`.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Callable::Native(f) => Some(f.arity),
            Callable::Closure(c) => Some(c.params.len()),
            Callable::Special(_) => None,
        }
    }

    /// Identity comparison: two callables are equal only if they share
    /// the same underlying function or closure.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => Arc::ptr_eq(&a.func, &b.func),
            (Callable::Closure(a), Callable::Closure(b)) => Arc::ptr_eq(a, b),
            (Callable::Special(a), Callable::Special(b)) => Arc::ptr_eq(&a.func, &b.func),
            _ => false,
        }
    }
}

/// A host function exposed to programs.
///
/// The evaluator guarantees `args.len() == arity` before calling `func`.
#[derive(Clone)]
pub struct NativeFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// Exact number of arguments
    pub arity: usize,

    /// The actual function pointer
    pub func: NativeFnPtr,
}

impl NativeFn {
    /// Create a native function.
    pub fn new<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value], &mut Environment) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }
}

impl std::fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NativeFn({}/{})", self.name, self.arity)
    }
}

/// A user-defined function.
///
/// The body is a sequence of trees evaluated with group semantics in a
/// fresh frame pushed on top of the caller's scope chain.
#[derive(Debug, Clone)]
pub struct Closure {
    /// Parameter names, in positional order
    pub params: Vec<String>,

    /// The unevaluated body
    pub body: Arc<[Node]>,
}

impl Closure {
    /// Create a closure from parameter names and body trees.
    pub fn new(params: Vec<String>, body: impl Into<Arc<[Node]>>) -> Self {
        Self {
            params,
            body: body.into(),
        }
    }
}

/// A host function that controls evaluation of its own arguments.
#[derive(Clone)]
pub struct SpecialForm {
    /// Form name (for display/debugging)
    pub name: String,

    /// The actual function pointer
    pub func: SpecialFnPtr,
}

impl SpecialForm {
    /// Create a special form.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Node], &mut Environment, &EvalContext) -> EvalResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

impl std::fmt::Debug for SpecialForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SpecialForm({})", self.name)
    }
}
