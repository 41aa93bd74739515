//! Standard library with built-in functions and special forms
//!
//! Every library is an [`Exports`] map built on demand. Nothing here reaches
//! into the evaluator beyond the public callable contract: natives receive
//! evaluated arguments whose count has already been checked, special forms
//! receive raw trees.

mod control;
mod core;
mod list;
mod ops;
mod text;

use crate::environment::{Environment, Exports};
use crate::error::{EvalError, EvalResult};
use crate::parser::Node;
use crate::value::Value;
use crate::EvalContext;

/// Libraries loaded by [`Environment::with_prelude`], in load order.
pub const PRELUDE: &[&str] = &["core", "ops", "control", "list"];

/// Names accepted by `import`.
pub const LIBRARIES: &[&str] = &["core", "ops", "control", "list", "str"];

/// Build the exports of the built-in library called `name`.
pub fn library(name: &str) -> Option<Exports> {
    match name {
        "core" => Some(self::core::exports()),
        "ops" => Some(ops::exports()),
        "control" => Some(control::exports()),
        "list" => Some(list::exports()),
        "str" => Some(text::exports()),
        _ => None,
    }
}

impl Environment {
    /// Create an environment with the standard prelude loaded.
    pub fn with_prelude() -> Self {
        let mut env = Self::new();
        env.load_prelude();
        env
    }

    /// Load the standard prelude into the innermost frame.
    pub fn load_prelude(&mut self) {
        for name in PRELUDE {
            if let Some(exports) = library(name) {
                self.import(&exports);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registration Helpers
// ═══════════════════════════════════════════════════════════════════════

fn define_native<F>(exports: &mut Exports, name: &str, arity: usize, func: F)
where
    F: Fn(&[Value], &mut Environment) -> Result<Value, EvalError> + Send + Sync + 'static,
{
    exports.insert(name.to_string(), Value::native(name, arity, func));
}

fn define_special<F>(exports: &mut Exports, name: &str, func: F)
where
    F: Fn(&[Node], &mut Environment, &EvalContext) -> EvalResult + Send + Sync + 'static,
{
    exports.insert(name.to_string(), Value::special(name, func));
}

// ═══════════════════════════════════════════════════════════════════════
// Argument Checks
// ═══════════════════════════════════════════════════════════════════════

fn expect_number(func: &str, position: usize, value: &Value) -> Result<f64, EvalError> {
    value
        .as_number()
        .ok_or_else(|| EvalError::wrong_argument(func, position, "number", value))
}

fn expect_bool(func: &str, position: usize, value: &Value) -> Result<bool, EvalError> {
    value
        .as_bool()
        .ok_or_else(|| EvalError::wrong_argument(func, position, "bool", value))
}

fn expect_text<'a>(func: &str, position: usize, value: &'a Value) -> Result<&'a str, EvalError> {
    value
        .as_str()
        .ok_or_else(|| EvalError::wrong_argument(func, position, "text", value))
}

fn expect_identifier<'a>(form: &str, node: &'a Node) -> Result<&'a str, EvalError> {
    node.as_identifier()
        .ok_or_else(|| EvalError::NotAnIdentifier {
            form: form.to_string(),
            found: node.describe(),
        })
}

/// Check the number of raw argument trees a special form received.
fn check_form_arity(
    form: &str,
    args: &[Node],
    min: usize,
    max: Option<usize>,
) -> Result<(), EvalError> {
    let got = args.len();
    let ok = got >= min && max.map_or(true, |max| got <= max);
    if ok {
        return Ok(());
    }
    let expected = match max {
        Some(max) if max == min => min.to_string(),
        Some(max) => format!("{}-{}", min, max),
        None => format!("at least {}", min),
    };
    Err(EvalError::SpecialFormArity {
        form: form.to_string(),
        expected,
        got,
    })
}
