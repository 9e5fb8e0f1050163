use sqlc_ast::{Expr, IndexedColumn, ObjectName};
use sqlc_diagnostics::{Span, Spanned};

/// A catalog entry for `CREATE INDEX`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Index {
    /// The index's possibly schema-qualified name.
    pub name: ObjectName,
    /// The table it indexes.
    pub table: ObjectName,
    /// Whether `UNIQUE` was specified.
    pub unique: bool,
    /// Whether `IF NOT EXISTS` was specified; read once by `Schema::create_index`.
    pub if_not_exists: bool,
    /// The indexed columns/expressions.
    pub columns: Vec<IndexedColumn>,
    /// The partial-index `WHERE` predicate, if present.
    pub predicate: Option<Expr>,
    /// Source range of the statement that introduced this index.
    pub span: Span,
}

impl Spanned for Index {
    fn span(&self) -> Span {
        self.span
    }
}
