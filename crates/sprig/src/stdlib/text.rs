//! Text helpers, loaded with `(import str)`

use super::{check_form_arity, define_native, define_special, expect_text};
use crate::environment::{Environment, Exports};
use crate::error::{EvalError, EvalResult};
use crate::eval::eval_args;
use crate::parser::Node;
use crate::value::Value;
use crate::EvalContext;

/// Exports of the `str` library.
pub fn exports() -> Exports {
    let mut exports = Exports::new();

    define_native(&mut exports, "str:upper", 1, |args, _| {
        Ok(Value::text(expect_text("str:upper", 0, &args[0])?.to_uppercase()))
    });
    define_native(&mut exports, "str:lower", 1, |args, _| {
        Ok(Value::text(expect_text("str:lower", 0, &args[0])?.to_lowercase()))
    });
    define_native(&mut exports, "str:eq", 2, |args, _| {
        let a = expect_text("str:eq", 0, &args[0])?;
        let b = expect_text("str:eq", 1, &args[1])?;
        Ok(Value::Bool(a == b))
    });
    define_native(&mut exports, "str:to_str", 1, |args, _| {
        Ok(Value::text(args[0].to_string()))
    });
    define_special(&mut exports, "str:fmt", special_fmt);

    exports
}

/// `(str:fmt template args...)`
///
/// Each `%` in the template is replaced by the display form of the next
/// argument; `%%` is a literal `%`. Surplus arguments are ignored.
fn special_fmt(args: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    check_form_arity("str:fmt", args, 1, None)?;
    let values = eval_args(args, env, ctx)?;
    let template = expect_text("str:fmt", 0, &values[0])?;
    Ok(Value::text(format_template(template, &values[1..])?))
}

fn format_template(template: &str, values: &[Value]) -> Result<String, EvalError> {
    let mut output = String::with_capacity(template.len());
    let mut values = values.iter();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            output.push(c);
        } else if chars.next_if_eq(&'%').is_some() {
            output.push('%');
        } else {
            let value = values.next().ok_or_else(|| EvalError::InvalidArgument {
                message: "str:fmt got more % than values to put in them".to_string(),
            })?;
            output.push_str(&value.to_string());
        }
    }
    Ok(output)
}
