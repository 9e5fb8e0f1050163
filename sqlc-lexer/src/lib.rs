//! # sqlc-lexer
//!
//! Converts SQL source text into a sequence of spanned tokens for the
//! permissive SQLite-compatible dialect this compiler analyzes.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod error;
mod keyword;
mod lexer;
mod token;

pub use self::{
    error::LexerError,
    keyword::Keyword,
    lexer::Lexer,
    token::{Ident, ParamSigil, Token, TokenKind},
};
