use sqlc_diagnostics::{Span, Spanned};

use crate::expr::Expr;
use crate::name::{Ident, ObjectName};
use crate::query::{Select, With};

/// The conflict-resolution strategy of an `INSERT OR ...`/`ON CONFLICT`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConflictAction {
    /// `ROLLBACK`.
    Rollback,
    /// `ABORT` (SQLite's default).
    Abort,
    /// `FAIL`.
    Fail,
    /// `IGNORE`.
    Ignore,
    /// `REPLACE`.
    Replace,
}

/// The source of values for an `INSERT`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InsertSource {
    /// `VALUES (expr, ...), (expr, ...), ...`.
    Values(Vec<Vec<Expr>>),
    /// `SELECT ...`.
    Query(Box<Select>),
    /// `DEFAULT VALUES`.
    DefaultValues,
}

/// An `ON CONFLICT (target) DO UPDATE SET ... [WHERE ...]` / `DO NOTHING` clause.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OnConflict {
    /// The conflict target columns, if explicitly given.
    pub target: Vec<Ident>,
    /// The partial-unique-index target predicate, if given alongside `target`.
    pub target_where: Option<Expr>,
    /// The resolution to apply.
    pub action: OnConflictAction,
}

/// What to do when an `ON CONFLICT` target is hit.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OnConflictAction {
    /// `DO NOTHING`.
    DoNothing,
    /// `DO UPDATE SET ... [WHERE ...]`.
    DoUpdate {
        /// The assignments to apply.
        assignments: Vec<Assignment>,
        /// The optional guard on whether to apply the update.
        selection: Option<Expr>,
    },
}

/// One item of a `RETURNING` clause: an expression with its optional
/// `AS alias` (or implicit trailing-identifier alias, both accepted by
/// SQLite's grammar).
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReturningItem {
    /// The returned expression (`*` parses as [`Expr::Wildcard`]).
    pub expr: Expr,
    /// The explicit alias, if given.
    pub alias: Option<Ident>,
}

/// `INSERT [OR action] INTO table (cols) {VALUES ... | SELECT ...} [ON CONFLICT ...] [RETURNING ...]`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insert {
    /// The leading `WITH` clause, if present.
    pub with: Option<With>,
    /// The `INSERT OR <action>` conflict shorthand, if given.
    pub or_action: Option<ConflictAction>,
    /// The target table.
    pub table: ObjectName,
    /// The explicit target column list, if given; empty means "all columns,
    /// in schema order".
    pub columns: Vec<Ident>,
    /// The row source.
    pub source: InsertSource,
    /// The `ON CONFLICT` clause, if present.
    pub on_conflict: Option<OnConflict>,
    /// The `RETURNING` projection, if present.
    pub returning: Vec<ReturningItem>,
    /// Source range of the whole statement.
    pub span: Span,
}

/// One assignment inside a `SET` clause: the scalar `col = expr` form or the
/// tuple `(col, ...) = (expr, ...)` form.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Assignment {
    /// `col = expr`.
    Single {
        /// The column being assigned.
        column: Ident,
        /// The new value.
        value: Expr,
    },
    /// `(col, ...) = (expr, ...)`; the columns and values are positionally
    /// paired, and must have equal length.
    Tuple {
        /// The columns being assigned, in order.
        columns: Vec<Ident>,
        /// The new values, in the same order.
        values: Vec<Expr>,
    },
}

/// `UPDATE [OR action] table SET assignments [FROM ...] [WHERE ...] [RETURNING ...]`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Update {
    /// The leading `WITH` clause, if present.
    pub with: Option<With>,
    /// The `UPDATE OR <action>` conflict shorthand, if given.
    pub or_action: Option<ConflictAction>,
    /// The target table.
    pub table: ObjectName,
    /// The column assignments.
    pub assignments: Vec<Assignment>,
    /// The `WHERE` clause, if present.
    pub selection: Option<Expr>,
    /// The `RETURNING` projection, if present.
    pub returning: Vec<ReturningItem>,
    /// Source range of the whole statement.
    pub span: Span,
}

/// `DELETE FROM table [WHERE ...] [RETURNING ...]`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delete {
    /// The leading `WITH` clause, if present.
    pub with: Option<With>,
    /// The target table.
    pub table: ObjectName,
    /// The `WHERE` clause, if present.
    pub selection: Option<Expr>,
    /// The `RETURNING` projection, if present.
    pub returning: Vec<ReturningItem>,
    /// Source range of the whole statement.
    pub span: Span,
}

impl Spanned for Insert {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for Update {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for Delete {
    fn span(&self) -> Span {
        self.span
    }
}
