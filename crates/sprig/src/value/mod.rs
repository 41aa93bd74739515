//! Value representation for runtime values

mod callable;
mod display;
mod impls;
mod sequence;

pub use callable::{Callable, Closure, NativeFn, NativeFnPtr, SpecialFnPtr, SpecialForm};
pub use display::format_number;

use std::sync::Arc;

/// Runtime value representation for the Sprig interpreter.
///
/// Sequences (`List` and `Text`) are never mutated after construction:
/// every "mutating" operation builds a new value, so sharing the `Arc`
/// between clones is safe. [`Value::deep_copy`] is still applied whenever a
/// value is bound into a scope or pulled out of a container, so that no two
/// bindings ever share structure.
#[derive(Clone)]
pub enum Value {
    /// The unit/absence value
    Null,

    /// Floating-point scalar; the only numeric type
    Number(f64),

    /// `true` or `false`
    Bool(bool),

    /// Ordered, 0-indexed collection of values
    List(Arc<Vec<Value>>),

    /// Sequence of characters
    Text(Arc<String>),

    /// Native, user-defined, or special-form callable
    Callable(Callable),
}
