//! Function call evaluation

use crate::error::{EvalError, EvalResult};
use crate::parser::Node;
use crate::value::{Callable, Closure};
use crate::{Environment, EvalContext, Value};

use super::{eval_group, Evaluate};

/// Apply a callable to the raw argument trees of a group.
///
/// `head` is the node the callable was evaluated from; when it is an
/// identifier, that name labels the call in diagnostics.
///
/// # Errors
///
/// Returns `ArityMismatch` if an eager callable receives the wrong number of
/// arguments. The check runs before any frame is pushed.
pub fn call_value(
    callable: &Callable,
    head: &Node,
    args: &[Node],
    env: &mut Environment,
    ctx: &EvalContext,
) -> EvalResult {
    match callable {
        Callable::Special(form) => (form.func)(args, env, ctx),
        Callable::Native(native) => {
            let values = eval_args(args, env, ctx)?;
            check_arity(callable, head, values.len())?;
            Ok((native.func)(&values, env)?)
        }
        Callable::Closure(closure) => {
            let values = eval_args(args, env, ctx)?;
            check_arity(callable, head, values.len())?;
            call_closure(closure, head.as_identifier(), values, env, ctx)
        }
    }
}

/// Evaluate argument trees left to right.
pub fn eval_args(args: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult<Vec<Value>> {
    args.iter().map(|arg| arg.eval(env, ctx)).collect()
}

/// Closures are reported under the name they were called by, natives under
/// their registered name.
fn check_arity(callable: &Callable, head: &Node, got: usize) -> Result<(), EvalError> {
    let Some(expected) = callable.arity() else {
        return Ok(());
    };
    if expected == got {
        return Ok(());
    }
    let name = match callable {
        Callable::Closure(_) => head.as_identifier(),
        _ => None,
    }
    .unwrap_or_else(|| callable.name());
    Err(EvalError::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

/// Call a user-defined function.
///
/// The body runs in a fresh frame on top of the caller's chain; the guard
/// pops it (and leaves the call) however the body finishes.
fn call_closure(
    closure: &Closure,
    name: Option<&str>,
    args: Vec<Value>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> EvalResult {
    let label = match name {
        Some(name) => format!("function {}", name),
        None => "function".to_string(),
    };

    let mut guard = env.call_guard(label, ctx.max_call_depth)?;
    for (param, arg) in closure.params.iter().zip(args) {
        guard.define(param.clone(), arg);
    }

    eval_group(&closure.body, &mut guard, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn eval_str(source: &str, env: &mut Environment, ctx: &EvalContext) -> EvalResult {
        let tree = parse(&tokenize(source).unwrap()).unwrap();
        tree.eval(env, ctx)
    }

    fn env_with_closure(name: &str, params: &[&str], body: &str) -> Environment {
        let Node::Group(body) = parse(&tokenize(body).unwrap()).unwrap() else {
            panic!("Expected root group");
        };
        let closure = Closure::new(params.iter().map(|p| p.to_string()).collect(), body);
        let mut env = Environment::new();
        env.define(name, Value::closure(closure));
        env
    }

    #[test]
    fn test_closure_binds_params_in_new_frame() {
        let mut env = env_with_closure("second", &["a", "b"], "b");
        let result = eval_str("(second 1 2)", &mut env, &EvalContext::default()).unwrap();
        assert_eq!(result, Value::Number(2.0));
        assert!(!env.contains("a"));
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn test_closure_arity_mismatch_leaves_depth() {
        let mut env = env_with_closure("second", &["a", "b"], "b");
        let err = eval_str("(second 1)", &mut env, &EvalContext::default()).unwrap_err();
        assert_eq!(
            err.kind,
            EvalError::ArityMismatch {
                name: "second".to_string(),
                expected: 2,
                got: 1
            }
        );
        assert_eq!(env.depth(), 1);
        assert_eq!(env.call_depth(), 0);
    }

    #[test]
    fn test_anonymous_closure_arity_uses_fn() {
        let mut env = Environment::new();
        let closure = Closure::new(vec!["x".to_string()], Vec::<Node>::new());
        let head = Node::Value(Value::closure(closure));
        let Value::Callable(callable) = head.eval(&mut env, &EvalContext::default()).unwrap()
        else {
            panic!("Expected callable");
        };
        let err = call_value(&callable, &head, &[], &mut env, &EvalContext::default()).unwrap_err();
        assert_eq!(
            err.kind,
            EvalError::ArityMismatch {
                name: "fn".to_string(),
                expected: 1,
                got: 0
            }
        );
    }

    #[test]
    fn test_error_inside_closure_has_function_frame() {
        let mut env = env_with_closure("broken", &[], "missing");
        let err = eval_str("(broken)", &mut env, &EvalContext::default()).unwrap_err();
        let labels: Vec<_> = err.traceback.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["function broken", "program"]);
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn test_recursion_limit() {
        let mut env = env_with_closure("loop", &[], "(loop)");
        let ctx = EvalContext::with_max_call_depth(16);
        let err = eval_str("(loop)", &mut env, &ctx).unwrap_err();
        assert_eq!(err.kind, EvalError::StackOverflow { max: 16 });
        assert_eq!(err.traceback.len(), 17);
        assert_eq!(env.depth(), 1);
        assert_eq!(env.call_depth(), 0);
    }
}
