//! # sqlc
//!
//! The facade crate: wires the lexer, parser, schema catalog, type system,
//! semantic analyzer and IR crates into a single library entry point,
//! [`compile_project`]. Takes pre-loaded migration/query source pairs and
//! returns a frozen [`sqlc_ir::Ir`] plus sorted diagnostics. Performs no
//! I/O, reads no manifest, and knows nothing about a project layout or a
//! CLI -- embedding that is left to the caller.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod driver;

pub use sqlc_ast as ast;
pub use sqlc_diagnostics as diagnostics;
pub use sqlc_ir as ir;
pub use sqlc_lexer as lexer;
pub use sqlc_parser as parser;
pub use sqlc_schema as schema;
pub use sqlc_types as types;

pub use driver::{compile_project, CompileInput, DriverError, ManifestFields, MigrationSource, QuerySource};
