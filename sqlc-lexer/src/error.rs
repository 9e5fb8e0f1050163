use sqlc_diagnostics::Span;
use thiserror::Error;

/// An error produced while tokenizing a single source file.
///
/// Lexer errors are fatal for the statement they occur in: the caller
/// (the parser) recovers by skipping to the next `;`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum LexerError {
    /// A byte sequence that doesn't start any recognized token.
    #[error("invalid character {found:?}")]
    InvalidCharacter {
        /// The offending character.
        found: char,
        /// Where it was found.
        span: Span,
    },
    /// A `'...'`, `x'...'` or delimited identifier that never saw its closing quote.
    #[error("unterminated {kind}")]
    Unterminated {
        /// What was left open (`"string literal"`, `"blob literal"`, `"quoted identifier"`).
        kind: &'static str,
        /// From the opening quote to end of input.
        span: Span,
    },
    /// A `/* ... */` comment that never saw its closing `*/`.
    #[error("unterminated block comment")]
    UnterminatedComment {
        /// From the opening `/*` to end of input.
        span: Span,
    },
    /// A blob literal (`x'...'`) with an odd number of hex digits, or containing
    /// a non-hex-digit character.
    #[error("malformed blob literal: {reason}")]
    MalformedBlob {
        /// Why the literal was rejected.
        reason: &'static str,
        /// The literal's span, including the `x'...'` delimiters.
        span: Span,
    },
}

impl LexerError {
    /// The span the error should be reported at.
    pub fn span(&self) -> Span {
        match self {
            LexerError::InvalidCharacter { span, .. }
            | LexerError::Unterminated { span, .. }
            | LexerError::UnterminatedComment { span }
            | LexerError::MalformedBlob { span, .. } => *span,
        }
    }
}
