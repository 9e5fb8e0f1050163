use sqlc_diagnostics::{Span, Spanned};

use crate::data_type::DataType;
use crate::expr::Expr;
use crate::name::{Ident, ObjectName};
use crate::query::Select;
use crate::stmt::Statement;

/// The action taken `ON DELETE`/`ON UPDATE` of a foreign key.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferentialAction {
    /// `SET NULL`.
    SetNull,
    /// `SET DEFAULT`.
    SetDefault,
    /// `CASCADE`.
    Cascade,
    /// `RESTRICT`.
    Restrict,
    /// `NO ACTION`.
    NoAction,
}

/// A `REFERENCES table (col, ...)` clause with its optional actions.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForeignKeyClause {
    /// The referenced table.
    pub table: ObjectName,
    /// The referenced columns; empty means "the referenced table's primary key".
    pub columns: Vec<Ident>,
    /// The `ON DELETE` action, if given.
    pub on_delete: Option<ReferentialAction>,
    /// The `ON UPDATE` action, if given.
    pub on_update: Option<ReferentialAction>,
}

/// A `ROLLBACK|ABORT|FAIL|IGNORE|REPLACE` conflict-resolution clause attached
/// to a `PRIMARY KEY`/`NOT NULL`/`UNIQUE` column or table constraint.
pub use crate::dml::ConflictAction as ConflictClause;

/// A single column constraint attached inline to a column definition.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnConstraint {
    /// `PRIMARY KEY [ASC|DESC] conflict-clause [AUTOINCREMENT]`.
    PrimaryKey {
        /// Whether `AUTOINCREMENT` was specified.
        autoincrement: bool,
        /// The `ON CONFLICT` resolution, if given.
        on_conflict: Option<ConflictClause>,
    },
    /// `NOT NULL conflict-clause`.
    NotNull {
        /// The `ON CONFLICT` resolution, if given.
        on_conflict: Option<ConflictClause>,
    },
    /// `NULL` (explicit, overriding an inherited `NOT NULL` expectation).
    Null,
    /// `UNIQUE conflict-clause`.
    Unique {
        /// The `ON CONFLICT` resolution, if given.
        on_conflict: Option<ConflictClause>,
    },
    /// `CHECK (expr)`.
    Check(Expr),
    /// `DEFAULT expr`.
    Default(Expr),
    /// `COLLATE name`.
    Collate(Ident),
    /// `REFERENCES ...`.
    ForeignKey(ForeignKeyClause),
    /// `GENERATED ALWAYS AS (expr) [STORED|VIRTUAL]`.
    GeneratedAs {
        /// The generating expression.
        expr: Expr,
        /// Whether the column is materialized (`STORED`) or computed on read (`VIRTUAL`).
        stored: bool,
    },
}

/// One column definition inside a `CREATE TABLE`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnDef {
    /// The column's name.
    pub name: Ident,
    /// The declared (and possibly annotated) type, if given. SQLite allows
    /// columns with no declared type.
    pub data_type: Option<DataType>,
    /// The column's constraints, in declaration order.
    pub constraints: Vec<ColumnConstraint>,
    /// Source range of the whole column definition.
    pub span: Span,
}

/// A table-level constraint (as opposed to one attached to a single column).
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableConstraint {
    /// `PRIMARY KEY (col, ...)`.
    PrimaryKey {
        /// The participating columns.
        columns: Vec<Ident>,
    },
    /// `UNIQUE (col, ...)`.
    Unique {
        /// The participating columns.
        columns: Vec<Ident>,
    },
    /// `CHECK (expr)`.
    Check {
        /// The check expression.
        expr: Expr,
    },
    /// `FOREIGN KEY (col, ...) REFERENCES ...`.
    ForeignKey {
        /// The local columns.
        columns: Vec<Ident>,
        /// The reference clause.
        references: ForeignKeyClause,
    },
}

/// The body of a `CREATE TABLE`: either an explicit column/constraint list,
/// or `AS SELECT ...`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreateTableBody {
    /// `(col1 TYPE ..., col2 TYPE ..., PRIMARY KEY (...))`.
    Columns {
        /// The column definitions, in declaration order.
        columns: Vec<ColumnDef>,
        /// The table-level constraints.
        constraints: Vec<TableConstraint>,
        /// Whether `WITHOUT ROWID` was specified.
        without_rowid: bool,
        /// Whether `STRICT` was specified.
        strict: bool,
    },
    /// `AS SELECT ...`.
    AsSelect(Box<Select>),
}

/// `CREATE [TEMP|TEMPORARY] TABLE [IF NOT EXISTS] name (...)`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateTable {
    /// The table's name.
    pub name: ObjectName,
    /// Whether `IF NOT EXISTS` was specified.
    pub if_not_exists: bool,
    /// Whether `TEMP`/`TEMPORARY` was specified.
    pub temporary: bool,
    /// The table body.
    pub body: CreateTableBody,
    /// Source range of the whole statement.
    pub span: Span,
}

/// One indexed column expression in `CREATE INDEX`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexedColumn {
    /// The indexed expression (usually a bare column reference).
    pub expr: Expr,
    /// `ASC`/`DESC`, if given.
    pub descending: bool,
}

/// `CREATE [UNIQUE] INDEX [IF NOT EXISTS] name ON table (...) [WHERE ...]`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateIndex {
    /// The index's name.
    pub name: ObjectName,
    /// Whether `UNIQUE` was specified.
    pub unique: bool,
    /// Whether `IF NOT EXISTS` was specified.
    pub if_not_exists: bool,
    /// The indexed table.
    pub table: ObjectName,
    /// The indexed columns/expressions.
    pub columns: Vec<IndexedColumn>,
    /// The partial-index `WHERE` predicate, if present.
    pub predicate: Option<Expr>,
    /// Source range of the whole statement.
    pub span: Span,
}

/// `CREATE [TEMP] VIEW [IF NOT EXISTS] name [(cols)] AS SELECT ...`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateView {
    /// The view's name.
    pub name: ObjectName,
    /// Whether `IF NOT EXISTS` was specified.
    pub if_not_exists: bool,
    /// Whether `TEMP`/`TEMPORARY` was specified.
    pub temporary: bool,
    /// The explicit output column name list, if given.
    pub columns: Vec<Ident>,
    /// The defining query.
    pub query: Box<Select>,
    /// Source range of the whole statement.
    pub span: Span,
}

/// When a trigger fires relative to its triggering statement.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerTiming {
    /// `BEFORE`.
    Before,
    /// `AFTER`.
    After,
    /// `INSTEAD OF`.
    InsteadOf,
}

/// What statement a trigger fires on.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEvent {
    /// `INSERT`.
    Insert,
    /// `DELETE`.
    Delete,
    /// `UPDATE`, optionally restricted to specific columns.
    Update {
        /// The `OF col, ...` restriction, if given.
        columns: Vec<Ident>,
    },
}

/// `CREATE TRIGGER name {BEFORE|AFTER|INSTEAD OF} event ON table ... BEGIN ... END`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateTrigger {
    /// The trigger's name.
    pub name: ObjectName,
    /// Whether `IF NOT EXISTS` was specified.
    pub if_not_exists: bool,
    /// When the trigger fires.
    pub timing: TriggerTiming,
    /// What it fires on.
    pub event: TriggerEvent,
    /// The table it's attached to.
    pub table: ObjectName,
    /// `FOR EACH ROW`'s `WHEN` guard, if present.
    pub when: Option<Expr>,
    /// The statements run by the trigger body, in order. Only
    /// `SELECT`/`INSERT`/`UPDATE`/`DELETE` are legal here; the parser
    /// rejects anything else.
    pub body: Vec<Statement>,
    /// Source range of the whole `BEGIN ... END` block.
    pub body_span: Span,
    /// Source range of the whole statement.
    pub span: Span,
}

/// `ALTER TABLE name action`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlterTable {
    /// The table being altered.
    pub name: ObjectName,
    /// The alteration to apply.
    pub action: AlterTableAction,
    /// Source range of the whole statement.
    pub span: Span,
}

/// One `ALTER TABLE` action.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlterTableAction {
    /// `RENAME TO new_name`.
    RenameTable {
        /// The table's new name.
        new_name: ObjectName,
    },
    /// `RENAME COLUMN old TO new` (the `COLUMN` keyword is optional in SQLite).
    RenameColumn {
        /// The column's current name.
        old_name: Ident,
        /// The column's new name.
        new_name: Ident,
    },
    /// `ADD [COLUMN] coldef`.
    AddColumn {
        /// The new column's definition.
        column: ColumnDef,
    },
    /// `DROP [COLUMN] name`.
    DropColumn {
        /// The column being dropped.
        name: Ident,
    },
}

/// What kind of object a `DROP` statement removes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DropObjectKind {
    /// `DROP TABLE`.
    Table,
    /// `DROP INDEX`.
    Index,
    /// `DROP VIEW`.
    View,
    /// `DROP TRIGGER`.
    Trigger,
}

/// `DROP {TABLE|INDEX|VIEW|TRIGGER} [IF EXISTS] name`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropObject {
    /// The kind of object being dropped.
    pub kind: DropObjectKind,
    /// Whether `IF EXISTS` was specified.
    pub if_exists: bool,
    /// The object's name.
    pub name: ObjectName,
    /// Source range of the whole statement.
    pub span: Span,
}

/// `REINDEX [name]`, applying to either a table (reindexing all its indexes)
/// or a single index; which one is resolved against the catalog at
/// schema-evolution time rather than by the parser.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReIndex {
    /// The table or index name, if given; bare `REINDEX` rebuilds everything.
    pub name: Option<ObjectName>,
    /// Source range of the whole statement.
    pub span: Span,
}

/// `PRAGMA name [= value | (value)]`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pragma {
    /// The pragma's name.
    pub name: Ident,
    /// The pragma's value, if one was given.
    pub value: Option<Expr>,
    /// Source range of the whole statement.
    pub span: Span,
}

macro_rules! impl_spanned {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Spanned for $ty {
                fn span(&self) -> Span {
                    self.span
                }
            }
        )*
    };
}

impl_spanned!(
    ColumnDef,
    CreateTable,
    CreateIndex,
    CreateView,
    CreateTrigger,
    AlterTable,
    DropObject,
    ReIndex,
    Pragma,
);
