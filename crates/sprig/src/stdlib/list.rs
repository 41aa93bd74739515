//! Sequence operations on lists and text

use super::{define_native, define_special, expect_number};
use crate::environment::{Environment, Exports};
use crate::error::EvalResult;
use crate::eval::eval_args;
use crate::parser::Node;
use crate::value::Value;
use crate::EvalContext;

/// Exports of the `list` library.
pub fn exports() -> Exports {
    let mut exports = Exports::new();

    define_special(&mut exports, "#l", special_list);

    define_native(&mut exports, "#len", 1, |args, _| {
        Ok(Value::Number(args[0].len()? as f64))
    });
    define_native(&mut exports, "#nth", 2, |args, _| {
        let index = expect_number("#nth", 1, &args[1])?;
        args[0].index(index)
    });
    define_native(&mut exports, "#push", 2, |args, _| args[0].push(&args[1]));
    define_native(&mut exports, "#pop", 1, |args, _| args[0].pop());
    define_native(&mut exports, "#set", 3, |args, _| {
        let index = expect_number("#set", 1, &args[1])?;
        args[0].set(index, &args[2])
    });

    exports
}

/// `(#l expr...)`: evaluate every argument into a new list.
fn special_list(args: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    Ok(Value::list(eval_args(args, env, ctx)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::eval::Evaluate;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn run(source: &str, env: &mut Environment) -> EvalResult {
        let tree = parse(&tokenize(source).unwrap()).unwrap();
        tree.eval(env, &EvalContext::default())
    }

    #[test]
    fn test_list_literal() {
        let mut env = Environment::with_prelude();
        assert_eq!(
            run("(#l 1 (+ 1 1) \"x\")", &mut env).unwrap(),
            Value::from(vec![Value::from(1), Value::from(2), Value::from("x")])
        );
        assert_eq!(run("(#l)", &mut env).unwrap(), Value::list(vec![]));
    }

    #[test]
    fn test_push_returns_new_list() {
        let mut env = Environment::with_prelude();
        run("(define a (#l 1 2))", &mut env).unwrap();
        run("(define b (#push a 3))", &mut env).unwrap();
        assert_eq!(run("(#len a)", &mut env).unwrap(), Value::Number(2.0));
        assert_eq!(run("(#len b)", &mut env).unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_nth_and_set() {
        let mut env = Environment::with_prelude();
        run("(define a (#l 10 20 30))", &mut env).unwrap();
        assert_eq!(run("(#nth a 1)", &mut env).unwrap(), Value::Number(20.0));
        assert_eq!(
            run("(#set a 0 5)", &mut env).unwrap(),
            Value::from(vec![5, 20, 30])
        );
        let err = run("(#nth a 3)", &mut env).unwrap_err();
        assert!(matches!(err.kind, EvalError::IndexOutOfBounds { len: 3, .. }));
    }

    #[test]
    fn test_text_is_a_sequence() {
        let mut env = Environment::with_prelude();
        assert_eq!(run("(#len \"abc\")", &mut env).unwrap(), Value::Number(3.0));
        assert_eq!(run("(#nth \"abc\" 2)", &mut env).unwrap(), Value::text("c"));
        assert_eq!(run("(#pop \"abc\")", &mut env).unwrap(), Value::text("ab"));
        assert_eq!(
            run("(#push \"n=\" 4)", &mut env).unwrap(),
            Value::text("n=4")
        );
    }

    #[test]
    fn test_non_sequence_is_type_error() {
        let mut env = Environment::with_prelude();
        let err = run("(#len 5)", &mut env).unwrap_err();
        assert!(matches!(err.kind, EvalError::TypeError { .. }));
    }
}
