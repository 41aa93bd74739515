//! Character-level lexer turning source text into a flat token sequence
//!
//! The lexer is a small state machine. It scans left to right and is always
//! in exactly one of the states below; tokens are emitted when a state is
//! closed by a delimiter.
//!
//! ```text
//! neutral ──"──▶ in-string ──"──▶ neutral
//!    │ ──digit / -digit──▶ in-number ──delim──▶ neutral (delim re-read)
//!    │ ──other──▶ in-identifier ──delim──▶ neutral (delim re-read)
//!    │ ──~──▶ in-comment ──\n──▶ neutral
//!    └ ──{──▶ in-multiline-comment ──}──▶ neutral
//! ```

mod token;

pub use token::{Token, TokenKind};

use crate::error::{LexError, LexErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Neutral,
    InString,
    InNumber,
    InIdentifier,
    InComment,
    InMultilineComment,
}

/// Tokenize a complete source text.
///
/// Comments are discarded and a trailing [`TokenKind::Eof`] token is always
/// appended.
///
/// # Errors
///
/// Returns a [`LexError`] for an unterminated string or multi-line comment,
/// and for malformed numbers (a second decimal point, or a non-digit glued
/// to a number).
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Lexer over a single source text.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    position: usize,
    state: State,
    buffer: String,
    start: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            position: 0,
            state: State::Neutral,
            buffer: String::new(),
            start: 0,
            tokens: Vec::new(),
        }
    }

    /// Run the lexer to completion.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(&(offset, c)) = self.chars.get(self.position) {
            // A closing delimiter is not consumed; it is re-read in neutral.
            if self.step(offset, c)? {
                self.position += 1;
            }
        }
        self.finish()
    }

    /// Feed one character. Returns whether the character was consumed.
    fn step(&mut self, offset: usize, c: char) -> Result<bool, LexError> {
        match self.state {
            State::Neutral => self.neutral(offset, c),
            State::InString => {
                if c == '"' && !self.buffer.ends_with('\\') {
                    self.emit(TokenKind::String);
                } else {
                    self.buffer.push(c);
                }
            }
            State::InNumber => {
                if c.is_ascii_digit() {
                    self.buffer.push(c);
                } else if c == '.' {
                    if self.buffer.contains('.') {
                        return Err(LexError::new(
                            LexErrorKind::MultipleDecimalPoints {
                                text: format!("{}.", self.buffer),
                            },
                            offset,
                        ));
                    }
                    self.buffer.push(c);
                } else if is_delimiter(c) {
                    self.emit(TokenKind::Number);
                    return Ok(false);
                } else {
                    return Err(LexError::new(
                        LexErrorKind::MalformedNumber {
                            text: self.buffer.clone(),
                            found: c,
                        },
                        offset,
                    ));
                }
            }
            State::InIdentifier => {
                if is_delimiter(c) {
                    self.emit(TokenKind::Identifier);
                    return Ok(false);
                }
                self.buffer.push(c);
            }
            State::InComment => {
                if c == '\n' {
                    self.state = State::Neutral;
                }
            }
            State::InMultilineComment => {
                if c == '}' {
                    self.state = State::Neutral;
                }
            }
        }
        Ok(true)
    }

    fn neutral(&mut self, offset: usize, c: char) {
        self.start = offset;
        match c {
            '(' => {
                self.buffer.push(c);
                self.emit(TokenKind::OpenParen);
            }
            ')' => {
                self.buffer.push(c);
                self.emit(TokenKind::CloseParen);
            }
            '"' => self.state = State::InString,
            '~' => self.state = State::InComment,
            '{' => self.state = State::InMultilineComment,
            c if c.is_whitespace() => {}
            c if c.is_ascii_digit() => self.begin(State::InNumber, c),
            '-' if matches!(self.peek(), Some(n) if n.is_ascii_digit() || n == '.') => {
                self.begin(State::InNumber, c)
            }
            c => self.begin(State::InIdentifier, c),
        }
    }

    fn finish(mut self) -> Result<Vec<Token>, LexError> {
        match self.state {
            State::InNumber => self.emit(TokenKind::Number),
            State::InIdentifier => self.emit(TokenKind::Identifier),
            State::InString => {
                return Err(LexError::new(LexErrorKind::UnterminatedString, self.start))
            }
            State::InMultilineComment => {
                return Err(LexError::new(LexErrorKind::UnterminatedComment, self.start))
            }
            State::Neutral | State::InComment => {}
        }
        self.tokens
            .push(Token::new(TokenKind::Eof, "", self.source.len()));
        Ok(self.tokens)
    }

    fn begin(&mut self, state: State, first: char) {
        self.state = state;
        self.buffer.push(first);
    }

    fn emit(&mut self, kind: TokenKind) {
        let text = std::mem::take(&mut self.buffer);
        self.tokens.push(Token::new(kind, text, self.start));
        self.state = State::Neutral;
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).map(|&(_, c)| c)
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_parens_are_single_tokens() {
        assert_eq!(
            kinds("(())"),
            vec![
                TokenKind::OpenParen,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::CloseParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_closed_by_paren() {
        let tokens = tokenize("(num 12)").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].text, "12");
        assert_eq!(tokens[3].kind, TokenKind::CloseParen);
    }

    #[test]
    fn test_negative_and_leading_dot_numbers() {
        let tokens = tokenize("-3 -.5 - -x").unwrap();
        assert_eq!(tokens[0].text, "-3");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[1].text, "-.5");
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[3].text, "-x");
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_token_at_end_of_input_is_closed() {
        let tokens = tokenize("x 42").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "42");
        assert_eq!(tokens[2].offset, 4);
    }

    #[test]
    fn test_offsets_point_at_first_character() {
        let tokens = tokenize("  (define \"hi\")").unwrap();
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[1].offset, 3);
        assert_eq!(tokens[2].offset, 10);
    }

    #[test]
    fn test_second_decimal_point_is_error() {
        let err = tokenize("1.2.3").unwrap_err();
        assert!(matches!(
            err.kind,
            LexErrorKind::MultipleDecimalPoints { .. }
        ));
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_letter_inside_number_is_error() {
        let err = tokenize("12ab").unwrap_err();
        assert!(matches!(
            err.kind,
            LexErrorKind::MalformedNumber { found: 'a', .. }
        ));
    }

    #[test]
    fn test_comments_are_discarded() {
        assert_eq!(
            kinds("a ~ ignored (\nb {also\nignored} c"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_running_to_end_is_fine() {
        assert_eq!(kinds("x ~ trailing"), vec![TokenKind::Identifier, TokenKind::Eof]);
    }
}
