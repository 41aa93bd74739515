//! Control flow: conditionals and loops
//!
//! Every branch and loop body runs in its own frame, pushed through a scope
//! guard so it is popped again on the error path.

use super::{check_form_arity, define_special, expect_identifier};
use crate::environment::{Environment, Exports};
use crate::error::{EvalError, EvalResult};
use crate::eval::{attach_trace, eval_group, Evaluate};
use crate::parser::Node;
use crate::value::Value;
use crate::EvalContext;

/// Exports of the `control` library.
pub fn exports() -> Exports {
    let mut exports = Exports::new();
    define_special(&mut exports, "if", special_if);
    define_special(&mut exports, "for", special_for);
    define_special(&mut exports, "repeat", special_repeat);
    define_special(&mut exports, "while", special_while);
    exports
}

// ═══════════════════════════════════════════════════════════════════════
// Conditionals
// ═══════════════════════════════════════════════════════════════════════

/// `(if cond then [else])`
fn special_if(args: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    check_form_arity("if", args, 2, Some(3))?;

    let condition = match args[0].eval(env, ctx)? {
        Value::Bool(b) => b,
        other => return Err(condition_error("if", &other).into()),
    };

    if condition {
        let mut guard = env.scope_guard("if true");
        args[1].eval(&mut guard, ctx)
    } else if let Some(otherwise) = args.get(2) {
        let mut guard = env.scope_guard("if false");
        otherwise.eval(&mut guard, ctx)
    } else {
        Ok(Value::Null)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Loops
// ═══════════════════════════════════════════════════════════════════════

/// `(for var (end) body...)`, `(for var (start end) body...)`,
/// `(for var (start end step) body...)`
///
/// The bounds are evaluated once, in the enclosing frame. The loop variable
/// lives in the loop's frame; the body may reassign it.
fn special_for(args: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    check_form_arity("for", args, 3, None)?;
    let var = expect_identifier("for", &args[0])?;

    let Node::Group(range) = &args[1] else {
        return Err(EvalError::TypeError {
            message: format!(
                "the second argument to for should be in parentheses, like (for i (10) ...), instead it got {}",
                args[1].describe()
            ),
        }
        .into());
    };
    let mut bounds = Vec::with_capacity(range.len());
    for (position, node) in range.iter().enumerate() {
        let value = node.eval(env, ctx)?;
        let n = value
            .as_number()
            .ok_or_else(|| EvalError::wrong_argument("for's range", position, "number", &value))?;
        bounds.push(n);
    }
    let (start, end, step) = match bounds[..] {
        [end] => (0.0, end, 1.0),
        [start, end] => (start, end, 1.0),
        [start, end, step] => (start, end, step),
        _ => {
            return Err(EvalError::InvalidArgument {
                message: format!(
                    "the range of for needs 1-3 elements, instead it has {}",
                    range.len()
                ),
            }
            .into())
        }
    };
    if step == 0.0 {
        return Err(EvalError::InvalidArgument {
            message: "the step of for cannot be 0".to_string(),
        }
        .into());
    }

    let body = &args[2..];
    let mut guard = env.scope_guard("for");
    guard.define(var, Value::Number(start));
    loop {
        let current = loop_variable(&guard, var)?;
        let done = if step > 0.0 {
            current >= end
        } else {
            current <= end
        };
        if done {
            break;
        }
        eval_group(body, &mut guard, ctx)?;
        let next = loop_variable(&guard, var)? + step;
        guard.define(var, Value::Number(next));
    }
    Ok(Value::Null)
}

/// Read the loop variable from the loop's own frame.
///
/// Errors are traced here, while that frame is still live.
fn loop_variable(env: &Environment, var: &str) -> EvalResult<f64> {
    let err = match env.get_local(var) {
        Some(Value::Number(n)) => return Ok(*n),
        Some(other) => EvalError::TypeError {
            message: format!(
                "the loop variable `{}` must stay a number, instead it became {:?}",
                var, other
            ),
        },
        None => EvalError::UndefinedIdentifier {
            name: var.to_string(),
        },
    };
    Err(attach_trace(err.into(), env))
}

/// `(repeat n body...)`
fn special_repeat(args: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    check_form_arity("repeat", args, 2, None)?;

    let amount = args[0].eval(env, ctx)?;
    let Some(amount) = amount.as_number() else {
        return Err(EvalError::wrong_argument("repeat", 0, "number", &amount).into());
    };

    let mut guard = env.scope_guard("repeat");
    let mut result = Value::Null;
    for _ in 0..amount.trunc().max(0.0) as u64 {
        result = eval_group(&args[1..], &mut guard, ctx)?;
    }
    Ok(result)
}

/// `(while cond body...)`
///
/// The condition is evaluated inside the loop's frame before every pass.
fn special_while(args: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    check_form_arity("while", args, 2, None)?;

    let mut guard = env.scope_guard("while");
    let mut result = Value::Null;
    loop {
        let condition = args[0].eval(&mut guard, ctx)?;
        match condition {
            Value::Bool(true) => {}
            Value::Bool(false) => break,
            other => {
                let err = condition_error("while", &other).into();
                return Err(attach_trace(err, &guard));
            }
        }
        result = eval_group(&args[1..], &mut guard, ctx)?;
    }
    Ok(result)
}

fn condition_error(form: &str, found: &Value) -> EvalError {
    EvalError::TypeError {
        message: format!(
            "the condition of {} must be a bool, instead it got {:?}",
            form, found
        ),
    }
}
