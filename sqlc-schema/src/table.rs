use sqlc_ast::ObjectName;
use sqlc_diagnostics::{Span, Spanned};

use crate::column::ColumnList;

/// What produced a table's shape.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableKind {
    /// An ordinary `CREATE TABLE`.
    Normal,
    /// A `CREATE VIEW`; its columns are its defining query's output row.
    View,
    /// An `fts5` virtual table.
    Fts5,
    /// A CTE's row shape, scoped to the statement that defines it.
    Cte,
    /// A derived-table (subquery in `FROM`) row shape.
    Subquery,
}

/// A table (or table-shaped thing — view, CTE, subquery) in the catalog.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    /// The table's possibly schema-qualified name.
    pub name: ObjectName,
    /// Its columns, in declaration order; duplicate names are possible
    /// after a join-derived [`TableKind::Subquery`] row is registered, so
    /// this is a [`ColumnList`] rather than a simple map.
    pub columns: ColumnList,
    /// Canonical names of the columns making up the primary key, in
    /// declaration order. Empty for a table with no primary key (SQLite's
    /// implicit `rowid` still applies but is not modeled as a column here).
    pub primary_key: Vec<String>,
    /// What produced this table's shape.
    pub kind: TableKind,
    /// Whether `STRICT` was specified.
    pub strict: bool,
    /// Whether `WITHOUT ROWID` was specified.
    pub without_rowid: bool,
    /// Source range of the statement that introduced this table.
    pub span: Span,
}

impl Table {
    /// Creates an empty table of the given kind, ready to have columns
    /// pushed onto it while a `CREATE TABLE` body is folded.
    pub fn new(name: ObjectName, kind: TableKind, span: Span) -> Self {
        Self {
            name,
            columns: ColumnList::new(),
            primary_key: Vec::new(),
            kind,
            strict: false,
            without_rowid: false,
            span,
        }
    }
}

impl Spanned for Table {
    fn span(&self) -> Span {
        self.span
    }
}
