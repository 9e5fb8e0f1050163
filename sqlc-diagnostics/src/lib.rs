//! # sqlc-diagnostics
//!
//! Source ranges, severities and diagnostic records shared by every stage
//! of the sqlc-gen compiler, from the lexer through the IR assembler.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod diagnostic;
mod span;

pub use self::{
    diagnostic::{sort_stable, Diagnostic, Severity},
    span::{LineCol, Span, Spanned},
};
