use sqlc_ast::{Expr, ObjectName, TriggerEvent, TriggerTiming};
use sqlc_diagnostics::{Span, Spanned};

/// A catalog entry for `CREATE TRIGGER`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trigger {
    /// The trigger's possibly schema-qualified name.
    pub name: ObjectName,
    /// Whether `IF NOT EXISTS` was specified; read once by `Schema::create_trigger`.
    pub if_not_exists: bool,
    /// When it fires.
    pub timing: TriggerTiming,
    /// What it fires on.
    pub event: TriggerEvent,
    /// The table it is attached to; `DROP TABLE` on this table is diagnosed.
    pub table: ObjectName,
    /// The `WHEN` guard, if present.
    pub when: Option<Expr>,
    /// Span of the `BEGIN ... END` block, kept for diagnostics that point
    /// at the trigger body as a whole. Table-reference validation of the
    /// body statements happens during folding, against `CreateTrigger::body`
    /// directly — this catalog entry doesn't retain the body statements.
    pub body_span: Span,
    /// Source range of the whole statement.
    pub span: Span,
}

impl Spanned for Trigger {
    fn span(&self) -> Span {
        self.span
    }
}
