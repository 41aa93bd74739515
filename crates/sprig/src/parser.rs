//! Paren-matching parser turning a flat token sequence into a tree
//!
//! The parser walks the tokens once with an explicit stack of open groups.
//! `(` pushes a new group, `)` pops it and appends it to its parent as a
//! single [`Node::Group`]. Every other token is copied through as a
//! [`Node::Leaf`]. Nesting is capped at [`MAX_NESTING`] so that the trees
//! handed to the evaluator stay shallow enough to walk recursively.

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::value::Value;

/// A node of the parsed program.
///
/// Trees are never mutated after parsing; loop bodies and function bodies
/// are the same tree evaluated repeatedly.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A single token
    Leaf(Token),

    /// A parenthesized sequence of nodes
    Group(Vec<Node>),

    /// An already-reduced value spliced into a tree
    Value(Value),
}

impl Node {
    /// Offset of the first token in this node, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Node::Leaf(token) => Some(token.offset),
            Node::Group(nodes) => nodes.iter().find_map(Node::offset),
            Node::Value(_) => None,
        }
    }

    /// The identifier text, if this node is an identifier leaf.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Node::Leaf(token) if token.is_identifier() => Some(&token.text),
            _ => None,
        }
    }

    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Node::Leaf(token) => format!("{} {}", token.kind, token),
            Node::Group(nodes) => format!("a group of {} element(s)", nodes.len()),
            Node::Value(value) => format!("the value {:?}", value),
        }
    }
}

/// Deepest group nesting accepted by [`parse`] and [`validate`].
pub const MAX_NESTING: usize = 1024;

/// Parse a token sequence into a tree.
///
/// The returned root is a [`Node::Group`] holding the top-level nodes. The
/// trailing end-of-input token is not part of the tree.
///
/// # Errors
///
/// `UnmatchedOpen` (reported at the leftmost unclosed parenthesis),
/// `UnexpectedClose` (at the stray closing one) or `TooDeep` (at the first
/// parenthesis past [`MAX_NESTING`]).
pub fn parse(tokens: &[Token]) -> Result<Node, ParseError> {
    let mut root = Vec::new();
    // Groups still waiting for their `)`: offset of the `(` and the
    // children collected so far.
    let mut open: Vec<(usize, Vec<Node>)> = Vec::new();

    for token in strip_eof(tokens) {
        match token.kind {
            TokenKind::OpenParen => {
                check_depth(open.len(), token.offset)?;
                open.push((token.offset, Vec::new()));
            }
            TokenKind::CloseParen => {
                let (_, children) = open.pop().ok_or_else(|| unexpected_close(token))?;
                innermost(&mut open, &mut root).push(Node::Group(children));
            }
            _ => innermost(&mut open, &mut root).push(Node::Leaf(token.clone())),
        }
    }

    match open.first() {
        None => Ok(Node::Group(root)),
        Some(&(offset, _)) => Err(ParseError::new(ParseErrorKind::UnmatchedOpen, offset)),
    }
}

/// Check that `tokens` would parse, without building a tree.
///
/// Performs the same walk as [`parse`] and reports the same error.
pub fn validate(tokens: &[Token]) -> Result<(), ParseError> {
    let mut open = Vec::new();

    for token in strip_eof(tokens) {
        match token.kind {
            TokenKind::OpenParen => {
                check_depth(open.len(), token.offset)?;
                open.push(token.offset);
            }
            TokenKind::CloseParen => {
                open.pop().ok_or_else(|| unexpected_close(token))?;
            }
            _ => {}
        }
    }

    match open.first() {
        None => Ok(()),
        Some(&offset) => Err(ParseError::new(ParseErrorKind::UnmatchedOpen, offset)),
    }
}

/// Boolean form of [`validate`]; used by interactive front ends to decide
/// whether an input is complete.
pub fn is_valid(tokens: &[Token]) -> bool {
    validate(tokens).is_ok()
}

fn strip_eof(tokens: &[Token]) -> &[Token] {
    match tokens.split_last() {
        Some((last, rest)) if last.kind == TokenKind::Eof => rest,
        _ => tokens,
    }
}

/// Fails when `depth` groups are already open.
fn check_depth(depth: usize, offset: usize) -> Result<(), ParseError> {
    if depth >= MAX_NESTING {
        return Err(ParseError::new(
            ParseErrorKind::TooDeep { max: MAX_NESTING },
            offset,
        ));
    }
    Ok(())
}

fn innermost<'a>(
    open: &'a mut [(usize, Vec<Node>)],
    root: &'a mut Vec<Node>,
) -> &'a mut Vec<Node> {
    match open.last_mut() {
        Some((_, children)) => children,
        None => root,
    }
}

fn unexpected_close(token: &Token) -> ParseError {
    ParseError::new(ParseErrorKind::UnexpectedClose, token.offset)
}
