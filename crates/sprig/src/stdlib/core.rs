//! Core forms: blocks, functions, bindings, I/O, and library import

use std::io::{self, BufRead, Write};

use rand::Rng;

use super::{
    check_form_arity, define_native, define_special, expect_identifier, expect_number,
    expect_text, library,
};
use crate::environment::{Environment, Exports};
use crate::error::{EvalError, EvalResult};
use crate::eval::{eval_group, Evaluate};
use crate::parser::Node;
use crate::value::{Closure, Value};
use crate::EvalContext;

/// Exports of the `core` library.
pub fn exports() -> Exports {
    let mut exports = Exports::new();

    exports.insert("true".to_string(), Value::Bool(true));
    exports.insert("false".to_string(), Value::Bool(false));
    exports.insert("null".to_string(), Value::Null);

    define_special(&mut exports, "do", special_do);
    define_special(&mut exports, "fn", special_fn);
    define_special(&mut exports, "define", special_define);
    define_special(&mut exports, "set", special_set);
    define_special(&mut exports, "print", special_print);
    define_special(&mut exports, "import", special_import);

    define_native(&mut exports, "input", 0, native_input);
    define_native(&mut exports, "int_input", 0, native_int_input);
    define_native(&mut exports, "rand", 2, native_rand);
    define_native(&mut exports, "type", 1, native_type);
    define_native(&mut exports, "error", 1, native_error);
    define_native(&mut exports, "scopes", 0, native_scopes);

    exports
}

// ═══════════════════════════════════════════════════════════════════════
// Special Forms
// ═══════════════════════════════════════════════════════════════════════

/// `(do expr...)`: evaluate the arguments as a group in a new frame.
fn special_do(args: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    let mut guard = env.scope_guard("do");
    eval_group(args, &mut guard, ctx)
}

/// `(fn (params...) body...)`
fn special_fn(args: &[Node], _env: &mut Environment, _ctx: &EvalContext) -> EvalResult {
    check_form_arity("fn", args, 2, None)?;

    let Node::Group(param_nodes) = &args[0] else {
        return Err(EvalError::TypeError {
            message: format!(
                "the first argument to fn needs to be a list of parameters, instead it got {}",
                args[0].describe()
            ),
        }
        .into());
    };

    let params = param_nodes
        .iter()
        .map(|node| expect_identifier("fn", node).map(str::to_string))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Value::closure(Closure::new(params, args[1..].to_vec())))
}

/// `(define name value)`: bind in the innermost frame.
fn special_define(args: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    check_form_arity("define", args, 2, Some(2))?;
    let name = expect_identifier("define", &args[0])?;
    let value = args[1].eval(env, ctx)?;
    env.define(name, value);
    Ok(Value::Null)
}

/// `(set name value)`: assign to the nearest binding, or create a global.
fn special_set(args: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    check_form_arity("set", args, 2, Some(2))?;
    let name = expect_identifier("set", &args[0])?;
    let value = args[1].eval(env, ctx)?;
    env.set(name, value);
    Ok(Value::Null)
}

/// `(print expr...)`: write each value as it is evaluated, space separated.
fn special_print(args: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    let mut stdout = io::stdout();
    let mut result = Value::Null;
    for (i, arg) in args.iter().enumerate() {
        result = arg.eval(env, ctx)?;
        let separator = if i > 0 { " " } else { "" };
        write!(stdout, "{}{}", separator, result).map_err(io_error)?;
    }
    writeln!(stdout).map_err(io_error)?;
    Ok(result)
}

/// `(import name)`: merge a built-in library into the innermost frame.
fn special_import(args: &[Node], env: &mut Environment, _ctx: &EvalContext) -> EvalResult {
    check_form_arity("import", args, 1, Some(1))?;
    let name = expect_identifier("import", &args[0])?;
    let exports = library(name).ok_or_else(|| EvalError::UnknownModule {
        name: name.to_string(),
    })?;
    tracing::debug!(library = name, count = exports.len(), "import");
    env.import(&exports);
    Ok(Value::text(name))
}

// ═══════════════════════════════════════════════════════════════════════
// Native Functions
// ═══════════════════════════════════════════════════════════════════════

fn native_input(_args: &[Value], _env: &mut Environment) -> Result<Value, EvalError> {
    read_line().map(Value::text)
}

fn native_int_input(_args: &[Value], _env: &mut Environment) -> Result<Value, EvalError> {
    loop {
        if let Ok(n) = read_line()?.trim().parse::<i64>() {
            return Ok(Value::Number(n as f64));
        }
    }
}

fn native_rand(args: &[Value], _env: &mut Environment) -> Result<Value, EvalError> {
    let low = expect_number("rand", 0, &args[0])?.trunc() as i64;
    let high = expect_number("rand", 1, &args[1])?.trunc() as i64;
    if low > high {
        return Err(EvalError::InvalidArgument {
            message: format!("rand needs low <= high, but got {} and {}", low, high),
        });
    }
    let n = rand::thread_rng().gen_range(low..=high);
    Ok(Value::Number(n as f64))
}

fn native_type(args: &[Value], _env: &mut Environment) -> Result<Value, EvalError> {
    Ok(Value::text(args[0].type_name()))
}

fn native_error(args: &[Value], _env: &mut Environment) -> Result<Value, EvalError> {
    let message = expect_text("error", 0, &args[0])?;
    Err(EvalError::User {
        message: message.to_string(),
    })
}

/// Print every frame, global first.
fn native_scopes(_args: &[Value], env: &mut Environment) -> Result<Value, EvalError> {
    let mut stdout = io::stdout();
    for (depth, frame) in env.frames().enumerate() {
        writeln!(stdout, "[{}] {}", depth, frame.label()).map_err(io_error)?;
        for (name, value) in frame.iter() {
            writeln!(stdout, "    {} = {:?}", name, value).map_err(io_error)?;
        }
    }
    Ok(Value::Null)
}

fn read_line() -> Result<String, EvalError> {
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line).map_err(io_error)?;
    if read == 0 {
        return Err(EvalError::Io {
            message: "end of input".to_string(),
        });
    }
    let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
    line.truncate(trimmed);
    Ok(line)
}

fn io_error(err: io::Error) -> EvalError {
    EvalError::Io {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn run(source: &str, env: &mut Environment) -> EvalResult {
        let tree = parse(&tokenize(source).unwrap()).unwrap();
        tree.eval(env, &EvalContext::default())
    }

    fn core_env() -> Environment {
        let mut env = Environment::new();
        env.import(&exports());
        env
    }

    #[test]
    fn test_define_returns_null() {
        let mut env = core_env();
        assert_eq!(run("(define x 1)", &mut env).unwrap(), Value::Null);
        assert_eq!(env.get("x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_define_needs_identifier() {
        let mut env = core_env();
        let err = run("(define 5 1)", &mut env).unwrap_err();
        assert!(matches!(err.kind, EvalError::NotAnIdentifier { .. }));
    }

    #[test]
    fn test_do_scopes_definitions() {
        let mut env = core_env();
        let result = run("(do (define y 2) y)", &mut env).unwrap();
        assert_eq!(result, Value::Number(2.0));
        assert!(!env.contains("y"));
    }

    #[test]
    fn test_fn_builds_closure() {
        let mut env = core_env();
        run("(define second (fn (a b) b))", &mut env).unwrap();
        assert_eq!(run("(second 1 2)", &mut env).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_fn_rejects_non_identifier_params() {
        let mut env = core_env();
        let err = run("(fn (a 1) a)", &mut env).unwrap_err();
        assert!(matches!(err.kind, EvalError::NotAnIdentifier { .. }));
    }

    #[test]
    fn test_import() {
        let mut env = core_env();
        assert_eq!(run("(import str)", &mut env).unwrap(), Value::text("str"));
        assert!(env.contains("str:upper"));
        let err = run("(import nowhere)", &mut env).unwrap_err();
        assert_eq!(
            err.kind,
            EvalError::UnknownModule {
                name: "nowhere".to_string()
            }
        );
    }

    #[test]
    fn test_error_raises_user_message() {
        let mut env = core_env();
        let err = run("(error \"boom\")", &mut env).unwrap_err();
        assert_eq!(
            err.kind,
            EvalError::User {
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_rand_stays_in_range() {
        let mut env = core_env();
        for _ in 0..20 {
            let n = run("(rand 1 3)", &mut env).unwrap().as_number().unwrap();
            assert!((1.0..=3.0).contains(&n));
        }
    }

    #[test]
    fn test_type() {
        let mut env = core_env();
        assert_eq!(run("(type 1)", &mut env).unwrap(), Value::text("number"));
        assert_eq!(run("(type type)", &mut env).unwrap(), Value::text("native"));
        assert_eq!(run("(type do)", &mut env).unwrap(), Value::text("special"));
    }
}
