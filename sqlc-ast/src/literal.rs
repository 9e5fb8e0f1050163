use sqlc_diagnostics::{Span, Spanned};

/// A literal value as written in source.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralValue {
    /// An integer literal (`INTEGER`), in its original textual form.
    Integer(String),
    /// A literal with a fractional part or exponent (`REAL`).
    Real(String),
    /// A single-quoted string literal (`TEXT`).
    String(String),
    /// An `x'...'` blob literal (`BLOB`).
    Blob(String),
    /// `NULL`.
    Null,
    /// `TRUE`.
    True,
    /// `FALSE`.
    False,
    /// `CURRENT_TIME`.
    CurrentTime,
    /// `CURRENT_DATE`.
    CurrentDate,
    /// `CURRENT_TIMESTAMP`.
    CurrentTimestamp,
}

/// A literal, with its source span.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    /// The literal's value.
    pub value: LiteralValue,
    /// Source range of the literal token.
    pub span: Span,
}

impl Spanned for Literal {
    fn span(&self) -> Span {
        self.span
    }
}
