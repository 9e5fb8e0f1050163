//! # sqlc-parser
//!
//! Recursive-descent / Pratt parser for the permissive SQLite-compatible
//! dialect this compiler analyzes. Converts a lexed token stream into
//! `sqlc-ast` syntax trees: migration files (sequences of DDL statements)
//! and user query files (sequences of named query declarations).

#![deny(missing_docs)]
#![deny(unused_imports)]

mod cursor;
mod error;
mod parser;

pub use self::{error::ParseError, parser::Parser};
