//! # sqlc-ast
//!
//! Abstract syntax tree types shared by the parser and semantic analyzer:
//! expressions, DDL/DML statements, `SELECT` queries, and the query-file
//! declaration wrapper.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod data_type;
mod ddl;
mod dml;
mod expr;
mod literal;
mod name;
mod query;
mod query_def;
mod stmt;

pub use self::{
    data_type::*, ddl::*, dml::*, expr::*, literal::*, name::*, query::*, query_def::*, stmt::*,
};
