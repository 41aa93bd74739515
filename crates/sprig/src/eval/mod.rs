//! Tree evaluation

mod call;

pub use call::{call_value, eval_args};

use crate::error::{EvalError, EvalResult, RuntimeError};
use crate::lexer::{Token, TokenKind};
use crate::parser::Node;
use crate::stack::ensure_sufficient_stack;
use crate::{Environment, EvalContext, Value};

/// Trait for evaluating tree nodes to values.
///
/// This is the core abstraction for the tree-walking interpreter.
pub trait Evaluate {
    /// Evaluate this node in the given environment.
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> EvalResult;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Node Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Node {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(env, ctx))
    }
}

impl Node {
    fn eval_inner(&self, env: &mut Environment, ctx: &EvalContext) -> EvalResult {
        if ctx.trace {
            tracing::trace!(offset = ?self.offset(), depth = env.depth(), "eval {}", self.describe());
        }

        let result = match self {
            Node::Leaf(token) => eval_leaf(token, env),
            Node::Group(nodes) => eval_group(nodes, env, ctx),
            // Already reduced
            Node::Value(value) => Ok(value.clone()),
        };

        // The innermost step an error passes through captures the trace,
        // before any scope guard above it pops its frame.
        result.map_err(|err| attach_trace(err, env))
    }
}

fn eval_leaf(token: &Token, env: &mut Environment) -> EvalResult {
    env.mark(token.offset);
    let value = match token.kind {
        TokenKind::Number => Value::number_from_str(&token.text)?,
        TokenKind::String => Value::text(token.text.as_str()),
        TokenKind::Identifier => env.lookup(&token.text)?,
        TokenKind::OpenParen | TokenKind::CloseParen | TokenKind::Eof => {
            return Err(EvalError::TypeError {
                message: format!("{} cannot be evaluated", token.kind),
            }
            .into())
        }
    };
    Ok(value)
}

/// Evaluate a sequence of nodes with group semantics.
///
/// The head is evaluated first. A callable head is applied to the rest of
/// the nodes; any other head makes the group a block: the remaining nodes
/// are evaluated left to right and the last value is returned (the head's
/// own value if there are no others). An empty sequence yields `null`.
///
/// Function and loop bodies are evaluated through this same function.
pub fn eval_group(nodes: &[Node], env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    let Some((head, rest)) = nodes.split_first() else {
        return Ok(Value::Null);
    };

    match head.eval(env, ctx)? {
        Value::Callable(callable) => call_value(&callable, head, rest, env, ctx),
        value => {
            let mut last = value;
            for node in rest {
                last = node.eval(env, ctx)?;
            }
            Ok(last)
        }
    }
}

/// Record the error location and the live frames, unless an inner step
/// already did.
///
/// Special forms that raise errors of their own while one of their frames is
/// pushed call this before the frame's guard drops.
pub(crate) fn attach_trace(mut err: RuntimeError, env: &Environment) -> RuntimeError {
    if !err.is_traced() {
        err.offset = env.last_offset();
        err.traceback = env.traceback();
    }
    err
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate a node (convenience wrapper).
pub fn eval_node(node: &Node, env: &mut Environment, ctx: &EvalContext) -> EvalResult {
    node.eval(env, ctx)
}
