//! Numeric conversion, arithmetic, comparison, and boolean logic

use super::{define_native, expect_bool, expect_number};
use crate::environment::Exports;
use crate::error::EvalError;
use crate::value::Value;

type Arithmetic = fn(f64, f64) -> Result<f64, EvalError>;
type Comparison = fn(f64, f64) -> bool;

/// Exports of the `ops` library.
pub fn exports() -> Exports {
    let mut exports = Exports::new();

    define_native(&mut exports, "num", 1, |args, _| {
        to_number("num", &args[0]).map(Value::Number)
    });
    define_native(&mut exports, "int", 1, |args, _| {
        to_number("int", &args[0]).map(|n| Value::Number(n.trunc()))
    });

    let arithmetic: [(&'static str, Arithmetic); 5] = [
        ("+", |a, b| Ok(a + b)),
        ("-", |a, b| Ok(a - b)),
        ("*", |a, b| Ok(a * b)),
        ("/", divide),
        ("mod", modulo),
    ];
    for (name, op) in arithmetic {
        define_native(&mut exports, name, 2, move |args, _| {
            let a = expect_number(name, 0, &args[0])?;
            let b = expect_number(name, 1, &args[1])?;
            op(a, b).map(Value::Number)
        });
    }

    let comparisons: [(&'static str, Comparison); 7] = [
        ("=", |a, b| a == b),
        ("==", |a, b| a == b),
        ("!=", |a, b| a != b),
        ("<", |a, b| a < b),
        (">", |a, b| a > b),
        ("<=", |a, b| a <= b),
        (">=", |a, b| a >= b),
    ];
    for (name, op) in comparisons {
        define_native(&mut exports, name, 2, move |args, _| {
            let a = expect_number(name, 0, &args[0])?;
            let b = expect_number(name, 1, &args[1])?;
            Ok(Value::Bool(op(a, b)))
        });
    }

    define_native(&mut exports, "not", 1, |args, _| {
        Ok(Value::Bool(!expect_bool("not", 0, &args[0])?))
    });
    define_native(&mut exports, "and", 2, |args, _| {
        let a = expect_bool("and", 0, &args[0])?;
        let b = expect_bool("and", 1, &args[1])?;
        Ok(Value::Bool(a && b))
    });
    define_native(&mut exports, "or", 2, |args, _| {
        let a = expect_bool("or", 0, &args[0])?;
        let b = expect_bool("or", 1, &args[1])?;
        Ok(Value::Bool(a || b))
    });

    exports
}

/// Numbers pass through; text is parsed.
fn to_number(func: &str, value: &Value) -> Result<f64, EvalError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| EvalError::InvalidNumber {
                text: s.to_string(),
            }),
        other => Err(EvalError::wrong_argument(func, 0, "number or text", other)),
    }
}

fn divide(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(a / b)
}

/// Remainder taking the sign of the divisor.
fn modulo(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}
