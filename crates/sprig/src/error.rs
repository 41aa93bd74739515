//! Error types for lexing, parsing, and evaluation

use thiserror::Error;

use crate::value::Value;

/// What went wrong while lexing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// End of input reached inside a string literal
    #[error("unterminated string literal")]
    UnterminatedString,

    /// End of input reached inside a `{ ... }` comment
    #[error("unterminated multi-line comment")]
    UnterminatedComment,

    /// A number with more than one decimal point
    #[error("there can be only one decimal point in a number, but `{text}` has more")]
    MultipleDecimalPoints {
        /// The number text up to and including the offending point
        text: String,
    },

    /// A number followed directly by a non-delimiter character
    #[error("malformed number: `{text}` cannot be followed by `{found}`")]
    MalformedNumber {
        /// The number text collected so far
        text: String,
        /// The offending character
        found: char,
    },
}

/// Fatal error raised by the lexer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct LexError {
    /// What went wrong
    pub kind: LexErrorKind,

    /// Byte offset the error refers to
    pub offset: usize,
}

impl LexError {
    /// Create a lex error at `offset`.
    pub fn new(kind: LexErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Whether more input could still turn this into a valid program.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self.kind,
            LexErrorKind::UnterminatedString | LexErrorKind::UnterminatedComment
        )
    }
}

/// What went wrong while parsing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `(` with no matching `)`
    #[error("unmatched parenthesis")]
    UnmatchedOpen,

    /// A `)` with no `(` before it
    #[error("unexpected closing parenthesis")]
    UnexpectedClose,

    /// Groups nested past the parser's limit
    #[error("groups nested deeper than {max} levels")]
    TooDeep {
        /// The nesting limit
        max: usize,
    },
}

/// Fatal error raised by the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,

    /// Byte offset of the offending parenthesis
    pub offset: usize,
}

impl ParseError {
    /// Create a parse error at `offset`.
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Errors that can occur during evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Identifier not bound in any frame
    #[error("`{name}` is not defined in any scope")]
    UndefinedIdentifier {
        /// The identifier text
        name: String,
    },

    /// Eager callable invoked with the wrong number of arguments
    #[error("{name} expected {expected} argument{}, but got {got}", plural(.expected))]
    ArityMismatch {
        /// Display name of the callable
        name: String,
        /// Declared arity
        expected: usize,
        /// Number of evaluated arguments
        got: usize,
    },

    /// Special form used with the wrong number of argument trees
    #[error("{form} needs {expected} argument(s), but got {got}")]
    SpecialFormArity {
        /// Name of the form
        form: String,
        /// Human-readable description of the accepted count (`2`, `2-3`, `at least 2`)
        expected: String,
        /// Number of argument trees given
        got: usize,
    },

    /// Value of the wrong type
    #[error("type error: {message}")]
    TypeError {
        /// Description of the mismatch
        message: String,
    },

    /// Text that cannot be read as a number
    #[error("you can't make a number out of {text:?}")]
    InvalidNumber {
        /// The offending text
        text: String,
    },

    /// Sequence index outside `0..len`
    #[error("index {index} is out of bounds for a sequence of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: f64,
        /// Sequence length
        len: usize,
    },

    /// Division or modulo by zero
    #[error("division by zero")]
    DivisionByZero,

    /// A binding form was handed something other than a bare identifier
    #[error("{form} needs an identifier here, instead it got {found}")]
    NotAnIdentifier {
        /// Name of the form
        form: String,
        /// Description of what was found
        found: String,
    },

    /// Argument has the right type but an unusable value
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem
        message: String,
    },

    /// `import` of a library that does not exist
    #[error("couldn't find library `{name}`")]
    UnknownModule {
        /// Requested library name
        name: String,
    },

    /// Host I/O failure inside a builtin
    #[error("I/O error: {message}")]
    Io {
        /// Underlying error message
        message: String,
    },

    /// Call depth limit exceeded
    #[error("stack overflow: maximum call depth of {max} exceeded")]
    StackOverflow {
        /// The configured limit
        max: usize,
    },

    /// Error raised by the program itself via `error`
    #[error("{message}")]
    User {
        /// The user's message
        message: String,
    },
}

fn plural(n: &usize) -> &'static str {
    if *n == 1 {
        ""
    } else {
        "s"
    }
}

impl EvalError {
    /// Build a type error for the `position`-th (0-based) argument of `func`.
    pub fn wrong_argument(func: &str, position: usize, expected: &str, got: &Value) -> Self {
        const ORDINALS: [&str; 4] = ["st", "nd", "rd", "th"];
        EvalError::TypeError {
            message: format!(
                "the {}{} argument to {} should be a {}, instead it got {:?}",
                position + 1,
                ORDINALS[position.min(3)],
                func,
                expected,
                got
            ),
        }
    }
}

/// One live frame at the moment an error was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    /// Frame label (`program`, `function add`, `while`, ...)
    pub label: String,

    /// Offset of the last token inspected in that frame
    pub offset: Option<usize>,
}

/// An evaluation error together with where it happened.
///
/// The location and traceback are captured once, by the innermost
/// evaluation step the error passes through, while all frames are live.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct RuntimeError {
    /// What went wrong
    pub kind: EvalError,

    /// Offset of the last token inspected before the failure
    pub offset: Option<usize>,

    /// Live frames, innermost first
    pub traceback: Vec<TraceEntry>,
}

impl RuntimeError {
    /// Whether location and traceback have been captured yet.
    pub fn is_traced(&self) -> bool {
        !self.traceback.is_empty()
    }
}

impl From<EvalError> for RuntimeError {
    fn from(kind: EvalError) -> Self {
        Self {
            kind,
            offset: None,
            traceback: Vec::new(),
        }
    }
}

/// Main error type for running a Sprig program
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SprigError {
    /// Failure while tokenizing
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    /// Failure while building the tree
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Failure while evaluating
    #[error("runtime error: {0}")]
    Eval(#[from] RuntimeError),
}

impl From<EvalError> for SprigError {
    fn from(err: EvalError) -> Self {
        SprigError::Eval(err.into())
    }
}

/// Result type alias for running programs
pub type Result<T> = std::result::Result<T, SprigError>;

/// Result type alias for evaluation steps
pub type EvalResult<T = Value> = std::result::Result<T, RuntimeError>;
