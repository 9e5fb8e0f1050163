use sqlc_diagnostics::{Span, Spanned};

use crate::ddl::{
    AlterTable, CreateIndex, CreateTable, CreateTrigger, CreateView, DropObject, Pragma, ReIndex,
};
use crate::dml::{Delete, Insert, Update};
use crate::query::Select;

/// A single top-level SQL statement, as found in a migration file or inline
/// inside a query-file declaration.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    /// `CREATE TABLE ...`.
    CreateTable(CreateTable),
    /// `ALTER TABLE ...`.
    AlterTable(AlterTable),
    /// `DROP TABLE|INDEX|VIEW|TRIGGER ...`.
    Drop(DropObject),
    /// `CREATE [UNIQUE] INDEX ...`.
    CreateIndex(CreateIndex),
    /// `CREATE VIEW ...`.
    CreateView(CreateView),
    /// `CREATE TRIGGER ...`.
    CreateTrigger(CreateTrigger),
    /// `PRAGMA ...`.
    Pragma(Pragma),
    /// `REINDEX ...`.
    ReIndex(ReIndex),
    /// `SELECT ...` (including compound selects and CTEs).
    Select(Box<Select>),
    /// `INSERT ...`.
    Insert(Insert),
    /// `UPDATE ...`.
    Update(Update),
    /// `DELETE ...`.
    Delete(Delete),
}

impl Statement {
    /// Returns the span covering this whole statement.
    pub fn span(&self) -> Span {
        match self {
            Statement::CreateTable(s) => s.span,
            Statement::AlterTable(s) => s.span,
            Statement::Drop(s) => s.span,
            Statement::CreateIndex(s) => s.span,
            Statement::CreateView(s) => s.span,
            Statement::CreateTrigger(s) => s.span,
            Statement::Pragma(s) => s.span,
            Statement::ReIndex(s) => s.span,
            Statement::Select(s) => s.span,
            Statement::Insert(s) => s.span,
            Statement::Update(s) => s.span,
            Statement::Delete(s) => s.span,
        }
    }

    /// Whether this statement is a DDL (schema-mutating) statement, as
    /// opposed to a DML/query statement.
    pub fn is_ddl(&self) -> bool {
        matches!(
            self,
            Statement::CreateTable(_)
                | Statement::AlterTable(_)
                | Statement::Drop(_)
                | Statement::CreateIndex(_)
                | Statement::CreateView(_)
                | Statement::CreateTrigger(_)
                | Statement::Pragma(_)
                | Statement::ReIndex(_)
        )
    }
}

impl Spanned for Statement {
    fn span(&self) -> Span {
        Statement::span(self)
    }
}

/// A parsed migration file: a sequence of DDL statements applied in order.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MigrationFile {
    /// The statements, in file order.
    pub statements: Vec<Statement>,
}
