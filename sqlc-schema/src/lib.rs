//! # sqlc-schema
//!
//! The accumulating catalog a sequence of DDL statements folds into:
//! tables, columns, indexes, triggers and pragma state. This crate owns the
//! structural half of schema evolution (duplicate/missing-name bookkeeping);
//! type-dependent validation (STRICT type membership, `CHECK`/`GENERATED`
//! expression checking) is layered on top by the analyzer, which is the
//! only caller that also has the type system in hand.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod column;
mod index;
mod pragma;
mod schema;
mod table;
mod trigger;

pub use self::{
    column::{Column, ColumnList, GeneratedColumn},
    index::Index,
    pragma::{pragma_bool, PragmaSettings},
    schema::{Schema, SchemaError},
    table::{Table, TableKind},
    trigger::Trigger,
};
