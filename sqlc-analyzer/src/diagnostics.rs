use std::path::PathBuf;

use sqlc_diagnostics::{Diagnostic, Span};
use thiserror::Error;

/// The analysis-phase error/warning catalog (spec.md §4.4/§4.5/§7). Every
/// variant maps to exactly one [`Diagnostic`] severity; none of these stop
/// analysis of the rest of the statement — the offending (sub)expression is
/// simply typed `Error` and the walk continues.
#[derive(Clone, Debug, Error)]
pub enum AnalyzerError {
    /// Two types could not be unified.
    #[error("unable to unify types '{left}' and '{right}'")]
    Unify {
        /// The left side's type, rendered.
        left: String,
        /// The right side's type, rendered.
        right: String,
    },
    /// An unqualified or qualified column reference resolved to nothing.
    #[error("column '{name}' does not exist")]
    ColumnNotFound {
        /// The column name as referenced.
        name: String,
    },
    /// An unqualified column reference resolved to more than one in-scope
    /// column.
    #[error("'{name}' is ambiguous in the current context")]
    Ambiguous {
        /// The ambiguous name.
        name: String,
    },
    /// A table/schema reference resolved to nothing.
    #[error("table '{name}' does not exist")]
    TableNotFound {
        /// The table name as referenced.
        name: String,
    },
    /// A function call's name/arity pair has no catalog entry.
    #[error("function '{name}' with arity {arity} not found")]
    FunctionNotFound {
        /// The function name as called.
        name: String,
        /// The number of arguments it was called with.
        arity: usize,
    },
    /// An operator has no catalog entry (should not happen for any operator
    /// the grammar can produce, but kept so a lookup failure is diagnosed
    /// rather than panicking).
    #[error("operator '{symbol}' not found")]
    OperatorNotFound {
        /// The operator's surface symbol.
        symbol: String,
    },
    /// A catalog function call, valid but worth flagging (e.g. `strftime`).
    #[error("{0}")]
    CatalogAdvisory(&'static str),
    /// `a / b` where both operands resolved to `INTEGER`.
    #[error("integer division of two INTEGER operands truncates; cast one side to REAL for an exact result")]
    IntegerDivision,
    /// An `INSERT`/`UPDATE` targeted a generated column.
    #[error("column '{name}' is generated and not able to be set")]
    GeneratedColumnSet {
        /// The generated column's name.
        name: String,
    },
    /// A non-boolean expression was used where a boolean is required
    /// (`WHERE`, `HAVING`, a join's `ON`).
    #[error("expression does not have a boolean type")]
    NotBoolean,
    /// A compound `SELECT`'s arms have different column counts.
    #[error("SELECTs to the left and right of {op} do not have the same number of result columns")]
    CompoundArityMismatch {
        /// The set operator whose arms mismatched (`UNION`, `INTERSECT`, ...).
        op: String,
    },
    /// A `VALUES` row, tuple assignment, or `INSERT`'s value source didn't
    /// have as many elements as the shape it's being matched against.
    #[error("{context} has {found} value(s), expected {expected}")]
    ColumnCountMismatch {
        /// What was being matched (e.g. `"VALUES row"`, `"SET"`, `"INSERT"`).
        context: String,
        /// The number of values actually supplied.
        found: usize,
        /// The number of values expected.
        expected: usize,
    },
    /// A `CREATE TABLE` was missing `STRICT` while `require_strict_tables`
    /// is active.
    #[error("missing STRICT table option")]
    MissingStrict,
    /// A column's declared type name is not in the STRICT set, either
    /// because the table is `STRICT` or `require_strict_tables` is active.
    #[error("invalid type '{name}'")]
    InvalidType {
        /// The offending type name, as written.
        name: String,
    },
    /// A table declared a primary key both as a column constraint and as a
    /// table-level constraint.
    #[error("a table may declare a primary key only once, as either a column or a table constraint")]
    DuplicatePrimaryKey,
}

impl AnalyzerError {
    /// Whether this should be reported as a warning rather than an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, AnalyzerError::CatalogAdvisory(_) | AnalyzerError::IntegerDivision)
    }

    /// Renders this error as a [`Diagnostic`] at `span` in `file`.
    pub fn into_diagnostic(self, file: impl Into<PathBuf>, span: Span) -> Diagnostic {
        let message = self.to_string();
        if self.is_warning() {
            Diagnostic::warning(file, span, message)
        } else {
            Diagnostic::error(file, span, message)
        }
    }
}
