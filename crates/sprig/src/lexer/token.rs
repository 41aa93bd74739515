//! Token representation produced by the lexer

use std::fmt;

/// The kind of a lexed token.
///
/// Comments are recognised by the lexer but never emitted, so they have no
/// kind here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Numeric literal such as `12`, `-3.5` or `-.25`
    Number,

    /// String literal; the token text excludes the surrounding quotes
    String,

    /// Any other run of non-delimiter characters (`define`, `+`, `#nth`)
    Identifier,

    /// `(`
    OpenParen,

    /// `)`
    CloseParen,

    /// End of input, always the last token
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Identifier => "identifier",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A single lexed token.
///
/// Tokens are immutable once produced. `offset` is the byte offset of the
/// token's first character in the source (the opening quote for strings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What sort of token this is
    pub kind: TokenKind,

    /// Source text of the token (string contents without quotes)
    pub text: String,

    /// Byte offset into the source
    pub offset: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// Check whether this token is an identifier.
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "{:?}", self.text),
            TokenKind::Eof => write!(f, "<eof>"),
            _ => f.write_str(&self.text),
        }
    }
}
