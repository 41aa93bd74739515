//! Display and Debug implementations for Value

use std::fmt;

use super::*;

/// Format a number the way programs print it.
///
/// Integral values print without a fractional part (`5`, not `5.0`).
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        // -0.0 prints as 0
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{:?}", s.as_str()),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, ")")
            }
            Value::Callable(Callable::Native(n)) => write!(f, "<native {}/{}>", n.name, n.arity),
            Value::Callable(Callable::Closure(c)) => write!(f, "<fn ({})>", c.params.join(" ")),
            Value::Callable(Callable::Special(s)) => write!(f, "<special {}>", s.name),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s), // No quotes for Display
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            _ => fmt::Debug::fmt(self, f),
        }
    }
}
