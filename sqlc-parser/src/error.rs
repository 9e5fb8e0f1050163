use std::fmt;

use sqlc_diagnostics::Span;
use sqlc_lexer::LexerError;

/// A parser error: either the lexer failed beneath it, or the token
/// stream didn't match the grammar at a given point.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    /// The lexer rejected the source before parsing could begin.
    Lex(LexerError),
    /// The parser expected one thing and found another.
    Expected {
        /// Human-readable description of what was expected.
        expected: String,
        /// Human-readable description of what was found, if anything.
        found: Option<String>,
        /// Source range of the unexpected token (or of EOF).
        span: Span,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(err) => write!(f, "{err}"),
            ParseError::Expected {
                expected,
                found: Some(found),
                ..
            } => write!(f, "expected {expected}, found {found}"),
            ParseError::Expected {
                expected,
                found: None,
                ..
            } => write!(f, "expected {expected}, but reached end of input"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> Self {
        ParseError::Lex(err)
    }
}

impl ParseError {
    /// The span this error should be reported at.
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(err) => err.span(),
            ParseError::Expected { span, .. } => *span,
        }
    }
}
