use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Parse(ParseError),
    InvalidEncoding(std::str::Utf8Error),
    /// A required interpolation reference resolved to nothing. Fails the
    /// whole load.
    MissingVariable(String),
    /// Raised only by the scalar accessor layer when a value is demanded
    /// with no fallback; distinct from parse errors.
    VariableNotFound(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Parse(err) => write!(f, "{err}"),
            Self::InvalidEncoding(err) => write!(f, "invalid UTF-8 input: {err}"),
            Self::MissingVariable(name) => {
                write!(f, "required variable `{name}` is not set")
            }
            Self::VariableNotFound(name) => {
                write!(f, "environment variable `{name}` not found")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidEncoding(err) => Some(err),
            Self::MissingVariable(_) | Self::VariableNotFound(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ParseError> for Error {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(value: std::str::Utf8Error) -> Self {
        Self::InvalidEncoding(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: u32,
    pub column: u32,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: u32, column: u32, kind: ParseErrorKind) -> Self {
        Self { line, column, kind }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.line, self.column, self.kind
        )
    }
}

impl StdError for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An escape sequence's digits are absent or invalid for its form.
    MalformedEscape,
    /// Opening quote with no matching close before end of input.
    UnterminatedQuote,
    /// No `=` separator, an invalid key, or trailing content after the
    /// value before the line terminator.
    MalformedAssignment,
    /// A line matched neither the assignment nor the empty-line grammar.
    ParseFailure,
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedEscape => write!(f, "malformed escape sequence"),
            Self::UnterminatedQuote => write!(f, "unterminated quote"),
            Self::MalformedAssignment => write!(f, "malformed assignment"),
            Self::ParseFailure => write!(f, "unrecognized line"),
        }
    }
}
