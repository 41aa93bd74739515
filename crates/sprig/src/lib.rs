//! # Sprig
//!
//! A tree-walking interpreter for Sprig, a small S-expression scripting
//! language.
//!
//! Source text flows through three stages:
//!
//! - **Lexer**: characters to a flat token sequence
//! - **Parser**: tokens to a tree of groups and leaves
//! - **Evaluator**: recursive reduction of the tree against a scope chain
//!
//! Conditionals, loops, binding forms, and function construction are not
//! syntax. They are special forms: ordinary bindings that receive their
//! argument trees unevaluated. The standard library registers them the same
//! way a host would register its own functions, through [`Exports`].
//!
//! ## Example
//!
//! ```
//! use sprig::{run, Environment, Value};
//!
//! let mut env = Environment::with_prelude();
//! let value = run("(define x (num 10)) (set x (+ x (num 5))) x", &mut env).unwrap();
//! assert_eq!(value, Value::Number(15.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod diagnostic;
pub mod environment;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
mod stack;
pub mod stdlib;
pub mod value;

// Re-export main types
pub use context::EvalContext;
pub use diagnostic::{offset_to_line_col, Diagnostic, Phase, TraceLine};
pub use environment::{Environment, Exports, Frame, ScopeGuard};
pub use error::{
    EvalError, EvalResult, LexError, LexErrorKind, ParseError, ParseErrorKind, Result,
    RuntimeError, SprigError, TraceEntry,
};
pub use eval::{call_value, eval_group, eval_node, Evaluate};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse, Node};
pub use value::{Callable, Closure, NativeFn, NativeFnPtr, SpecialFnPtr, SpecialForm, Value};

/// Sprig version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tokenize and parse `source` into a tree without evaluating it.
///
/// # Errors
///
/// Returns the first lex or parse error.
pub fn parse_source(source: &str) -> Result<Node> {
    let tokens = tokenize(source)?;
    Ok(parse(&tokens)?)
}

/// Run a program against `env` with the default [`EvalContext`].
///
/// Bindings the program makes at top level stay in `env`, so a host can run
/// several programs in one environment (as a REPL does).
///
/// # Errors
///
/// Any lex, parse, or runtime error. On error the scope chain is back at the
/// depth it had on entry.
pub fn run(source: &str, env: &mut Environment) -> Result<Value> {
    run_with_context(source, env, &EvalContext::default())
}

/// Run a program against `env` with an explicit context.
///
/// # Errors
///
/// See [`run`].
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn run_with_context(source: &str, env: &mut Environment, ctx: &EvalContext) -> Result<Value> {
    let tree = parse_source(source)?;
    tracing::debug!(depth = env.depth(), "evaluating program");
    Ok(tree.eval(env, ctx)?)
}

/// Whether `source` is ready to run, or an interactive front end should
/// keep reading lines.
///
/// Only input that more text could still complete counts as incomplete: an
/// open string literal, an open `{ ... }` comment, or an unmatched `(`.
/// Input with any other error, nesting past the parser's limit included, is
/// "complete" so that running it reports the error.
pub fn is_complete(source: &str) -> bool {
    match tokenize(source) {
        Err(err) => !err.is_incomplete(),
        Ok(tokens) => !matches!(
            parser::validate(&tokens),
            Err(ParseError {
                kind: ParseErrorKind::UnmatchedOpen,
                ..
            })
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_is_complete() {
        assert!(is_complete("(+ 1 2)"));
        assert!(is_complete(""));
        assert!(!is_complete("(define x"));
        assert!(!is_complete("(print \"abc"));
        assert!(!is_complete("{ still a comment"));
        assert!(is_complete("a)"));
        assert!(is_complete("1.2.3"));
    }

    #[test]
    fn test_too_deep_input_is_complete_and_fails() {
        let depth = 100_000;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(is_complete(&source));
        // still unbalanced, but no amount of extra input would make it parse
        assert!(is_complete(&"(".repeat(depth)));

        let mut env = Environment::with_prelude();
        let err = run(&source, &mut env).unwrap_err();
        assert!(matches!(
            err,
            SprigError::Parse(ParseError {
                kind: ParseErrorKind::TooDeep { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_run_keeps_top_level_bindings() {
        let mut env = Environment::with_prelude();
        run("(define x 1)", &mut env).unwrap();
        assert_eq!(run("(+ x 1)", &mut env).unwrap(), Value::Number(2.0));
    }
}
