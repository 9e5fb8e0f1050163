use indexmap::IndexMap;
use sqlc_ast::{Expr, Ident, ObjectName};
use sqlc_diagnostics::Span;

use crate::column::Column;
use crate::index::Index;
use crate::pragma::{pragma_bool, PragmaSettings};
use crate::table::Table;
use crate::trigger::Trigger;

/// A structural schema-evolution problem: a duplicate or missing name. These
/// are always non-fatal (spec.md §7) — the caller pushes one into a shared
/// sink and the mutation either applies partially or is skipped, but the
/// fold over statements continues regardless.
#[derive(Clone, Debug, thiserror::Error)]
pub enum SchemaError {
    /// `CREATE TABLE` (without `IF NOT EXISTS`) named an existing table.
    #[error("table '{name}' already exists")]
    DuplicateTable {
        /// The table's canonical name.
        name: String,
        /// Span of the offending `CREATE TABLE`.
        span: Span,
    },
    /// An `ALTER TABLE`/`DROP TABLE`/column op named a table that doesn't exist.
    #[error("table '{name}' does not exist")]
    TableNotFound {
        /// The table's canonical name.
        name: String,
        /// Span of the reference.
        span: Span,
    },
    /// `CREATE INDEX` (without `IF NOT EXISTS`) named an existing index.
    #[error("index '{name}' already exists")]
    DuplicateIndex {
        /// The index's canonical name.
        name: String,
        /// Span of the offending `CREATE INDEX`.
        span: Span,
    },
    /// `DROP INDEX`/`REINDEX` named an index that doesn't exist.
    #[error("index '{name}' does not exist")]
    IndexNotFound {
        /// The index's canonical name.
        name: String,
        /// Span of the reference.
        span: Span,
    },
    /// `CREATE TRIGGER` (without `IF NOT EXISTS`) named an existing trigger.
    #[error("trigger '{name}' already exists")]
    DuplicateTrigger {
        /// The trigger's canonical name.
        name: String,
        /// Span of the offending `CREATE TRIGGER`.
        span: Span,
    },
    /// `DROP TRIGGER` named a trigger that doesn't exist.
    #[error("trigger '{name}' does not exist")]
    TriggerNotFound {
        /// The trigger's canonical name.
        name: String,
        /// Span of the reference.
        span: Span,
    },
    /// An `ALTER TABLE`/`ADD`/`RENAME`/`DROP COLUMN` named a column that
    /// doesn't exist (or is itself ambiguous, in the rename-source case).
    #[error("column '{name}' does not exist")]
    ColumnNotFound {
        /// The column's canonical name.
        name: String,
        /// Span of the reference.
        span: Span,
    },
    /// A column rename's target name already exists on the table.
    #[error("column '{name}' already exists")]
    DuplicateColumn {
        /// The column's canonical name.
        name: String,
        /// Span of the offending rename.
        span: Span,
    },
    /// `DROP TABLE` on a table referenced by a trigger's body.
    #[error("table referenced in statements of trigger '{trigger}'")]
    TableReferencedByTrigger {
        /// The referencing trigger's canonical name.
        trigger: String,
        /// Span of the `DROP TABLE`.
        span: Span,
    },
    /// `REINDEX name` where `name` is neither a known table nor a known index.
    #[error("no such table or index: '{name}'")]
    ReindexTargetNotFound {
        /// The requested canonical name.
        name: String,
        /// Span of the `REINDEX`.
        span: Span,
    },
}

impl SchemaError {
    /// The source range this error concerns.
    pub fn span(&self) -> Span {
        match self {
            SchemaError::DuplicateTable { span, .. }
            | SchemaError::TableNotFound { span, .. }
            | SchemaError::DuplicateIndex { span, .. }
            | SchemaError::IndexNotFound { span, .. }
            | SchemaError::DuplicateTrigger { span, .. }
            | SchemaError::TriggerNotFound { span, .. }
            | SchemaError::ColumnNotFound { span, .. }
            | SchemaError::DuplicateColumn { span, .. }
            | SchemaError::TableReferencedByTrigger { span, .. }
            | SchemaError::ReindexTargetNotFound { span, .. } => *span,
        }
    }
}

/// The accumulating catalog: tables, indexes, triggers and pragma state,
/// folded in order from a sequence of DDL statements. See spec.md §4.3 for
/// the exact transition each mutator implements.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    /// Tables, keyed by canonical qualified name, in insertion order.
    pub tables: IndexMap<String, Table>,
    /// Indexes, keyed by canonical name.
    pub indexes: IndexMap<String, Index>,
    /// Triggers, keyed by canonical name.
    pub triggers: IndexMap<String, Trigger>,
    /// Active compile-directive state.
    pub pragmas: PragmaSettings,
}

impl Schema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// `CREATE TABLE`. A duplicate name with `IF NOT EXISTS` is a silent
    /// no-op; without it, the first definition wins and a diagnostic is
    /// pushed.
    pub fn create_table(&mut self, table: Table, if_not_exists: bool, diagnostics: &mut Vec<SchemaError>) {
        let key = table.name.canonical();
        if self.tables.contains_key(&key) {
            if !if_not_exists {
                diagnostics.push(SchemaError::DuplicateTable { name: key, span: table.span });
            }
            return;
        }
        self.tables.insert(key, table);
    }

    /// `ALTER TABLE ... RENAME TO`. References to the old name elsewhere are
    /// not rewritten, matching spec's explicit note that a later reference
    /// to the old name is left to be diagnosed as a missing table.
    pub fn rename_table(
        &mut self,
        old: &ObjectName,
        new_name: ObjectName,
        span: Span,
        diagnostics: &mut Vec<SchemaError>,
    ) {
        let old_key = old.canonical();
        match self.tables.shift_remove(&old_key) {
            Some(mut table) => {
                table.name = new_name;
                self.tables.insert(table.name.canonical(), table);
            }
            None => diagnostics.push(SchemaError::TableNotFound { name: old_key, span }),
        }
    }

    /// `ALTER TABLE ... ADD [COLUMN]`.
    pub fn add_column(
        &mut self,
        table: &ObjectName,
        column: Column,
        span: Span,
        diagnostics: &mut Vec<SchemaError>,
    ) {
        match self.tables.get_mut(&table.canonical()) {
            Some(t) => {
                t.columns.push(column);
            }
            None => diagnostics.push(SchemaError::TableNotFound { name: table.canonical(), span }),
        }
    }

    /// `ALTER TABLE ... DROP [COLUMN]`.
    pub fn drop_column(
        &mut self,
        table: &ObjectName,
        name: &Ident,
        span: Span,
        diagnostics: &mut Vec<SchemaError>,
    ) {
        let Some(t) = self.tables.get_mut(&table.canonical()) else {
            diagnostics.push(SchemaError::TableNotFound { name: table.canonical(), span });
            return;
        };
        match t.columns.positions_of(&name.canonical()).first().copied() {
            Some(position) => {
                t.columns.remove(position);
            }
            None => diagnostics.push(SchemaError::ColumnNotFound { name: name.canonical(), span }),
        }
    }

    /// `ALTER TABLE ... RENAME [COLUMN] a TO b`, preserving column order.
    pub fn rename_column(
        &mut self,
        table: &ObjectName,
        old: &Ident,
        new_name: Ident,
        span: Span,
        diagnostics: &mut Vec<SchemaError>,
    ) {
        let Some(t) = self.tables.get_mut(&table.canonical()) else {
            diagnostics.push(SchemaError::TableNotFound { name: table.canonical(), span });
            return;
        };
        let positions = t.columns.positions_of(&old.canonical()).to_vec();
        let position = match positions.as_slice() {
            [position] => *position,
            _ => {
                diagnostics.push(SchemaError::ColumnNotFound { name: old.canonical(), span });
                return;
            }
        };
        if !t.columns.positions_of(&new_name.canonical()).is_empty() {
            diagnostics.push(SchemaError::DuplicateColumn { name: new_name.canonical(), span });
        }
        t.columns.rename(position, new_name);
    }

    /// `DROP TABLE`. A table still referenced by a trigger's body yields an
    /// additional diagnostic but the drop still proceeds.
    pub fn drop_table(&mut self, name: &ObjectName, span: Span, diagnostics: &mut Vec<SchemaError>) {
        let key = name.canonical();
        for trigger in self.triggers.values() {
            if trigger.table.canonical() == key {
                diagnostics.push(SchemaError::TableReferencedByTrigger {
                    trigger: trigger.name.canonical(),
                    span,
                });
            }
        }
        if self.tables.shift_remove(&key).is_none() {
            diagnostics.push(SchemaError::TableNotFound { name: key, span });
        }
    }

    /// `CREATE [UNIQUE] INDEX`.
    pub fn create_index(&mut self, index: Index, diagnostics: &mut Vec<SchemaError>) {
        let key = index.name.canonical();
        if self.indexes.contains_key(&key) {
            if !index.if_not_exists {
                diagnostics.push(SchemaError::DuplicateIndex { name: key, span: index.span });
            }
            return;
        }
        if !self.tables.contains_key(&index.table.canonical()) {
            diagnostics.push(SchemaError::TableNotFound {
                name: index.table.canonical(),
                span: index.span,
            });
        }
        self.indexes.insert(key, index);
    }

    /// `DROP INDEX`.
    pub fn drop_index(&mut self, name: &ObjectName, span: Span, diagnostics: &mut Vec<SchemaError>) {
        if self.indexes.shift_remove(&name.canonical()).is_none() {
            diagnostics.push(SchemaError::IndexNotFound { name: name.canonical(), span });
        }
    }

    /// `CREATE TRIGGER`.
    pub fn create_trigger(&mut self, trigger: Trigger, diagnostics: &mut Vec<SchemaError>) {
        let key = trigger.name.canonical();
        if self.triggers.contains_key(&key) {
            if !trigger.if_not_exists {
                diagnostics.push(SchemaError::DuplicateTrigger { name: key, span: trigger.span });
            }
            return;
        }
        if !self.tables.contains_key(&trigger.table.canonical()) {
            diagnostics.push(SchemaError::TableNotFound {
                name: trigger.table.canonical(),
                span: trigger.span,
            });
        }
        self.triggers.insert(key, trigger);
    }

    /// `DROP TRIGGER`.
    pub fn drop_trigger(&mut self, name: &ObjectName, span: Span, diagnostics: &mut Vec<SchemaError>) {
        if self.triggers.shift_remove(&name.canonical()).is_none() {
            diagnostics.push(SchemaError::TriggerNotFound { name: name.canonical(), span });
        }
    }

    /// `REINDEX [name]`. A bare `REINDEX` rebuilds everything and has no
    /// name to validate; a named one must resolve to either a table or an
    /// index.
    pub fn reindex(&mut self, name: Option<&ObjectName>, span: Span, diagnostics: &mut Vec<SchemaError>) {
        let Some(name) = name else { return };
        let key = name.canonical();
        if !self.tables.contains_key(&key) && !self.indexes.contains_key(&key) {
            diagnostics.push(SchemaError::ReindexTargetNotFound { name: key, span });
        }
    }

    /// `PRAGMA name [= value]`. Unrecognized pragma names are accepted and
    /// ignored.
    pub fn set_pragma(&mut self, name: &Ident, value: Option<&Expr>) {
        match name.canonical().as_str() {
            "require_strict_tables" => self.pragmas.require_strict_tables = pragma_bool(value),
            "foreign_keys" => self.pragmas.foreign_keys = pragma_bool(value),
            _ => {}
        }
    }

    /// Looks up a table by its possibly schema-qualified name.
    pub fn table(&self, name: &ObjectName) -> Option<&Table> {
        self.tables.get(&name.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableKind;
    use sqlc_diagnostics::Span;

    fn object_name(name: &str) -> ObjectName {
        ObjectName::simple(Ident::new(name, Span::empty_at(0)))
    }

    fn table(name: &str) -> Table {
        Table::new(object_name(name), TableKind::Normal, Span::empty_at(0))
    }

    #[test]
    fn duplicate_create_table_without_if_not_exists_keeps_the_first() {
        let mut schema = Schema::new();
        let mut diags = Vec::new();
        schema.create_table(table("foo"), false, &mut diags);
        let mut second = table("foo");
        second.strict = true;
        schema.create_table(second, false, &mut diags);
        assert_eq!(diags.len(), 1);
        assert!(matches!(diags[0], SchemaError::DuplicateTable { .. }));
        assert!(!schema.table(&object_name("foo")).unwrap().strict);
    }

    #[test]
    fn duplicate_create_table_with_if_not_exists_is_silent() {
        let mut schema = Schema::new();
        let mut diags = Vec::new();
        schema.create_table(table("foo"), false, &mut diags);
        schema.create_table(table("foo"), true, &mut diags);
        assert!(diags.is_empty());
    }

    #[test]
    fn drop_table_referenced_by_trigger_still_drops_but_warns() {
        let mut schema = Schema::new();
        let mut diags = Vec::new();
        schema.create_table(table("t"), false, &mut diags);
        schema.create_trigger(
            Trigger {
                name: object_name("trg"),
                if_not_exists: false,
                timing: sqlc_ast::TriggerTiming::After,
                event: sqlc_ast::TriggerEvent::Insert,
                table: object_name("t"),
                when: None,
                body_span: Span::empty_at(0),
                span: Span::empty_at(0),
            },
            &mut diags,
        );
        diags.clear();
        schema.drop_table(&object_name("t"), Span::empty_at(0), &mut diags);
        assert!(schema.table(&object_name("t")).is_none());
        assert!(matches!(diags[0], SchemaError::TableReferencedByTrigger { .. }));
    }

    #[test]
    fn drop_nonexistent_table_is_diagnosed() {
        let mut schema = Schema::new();
        let mut diags = Vec::new();
        schema.drop_table(&object_name("missing"), Span::empty_at(0), &mut diags);
        assert!(matches!(diags[0], SchemaError::TableNotFound { .. }));
    }

    #[test]
    fn rename_table_rekeys_catalog() {
        let mut schema = Schema::new();
        let mut diags = Vec::new();
        schema.create_table(table("old"), false, &mut diags);
        schema.rename_table(&object_name("old"), object_name("new"), Span::empty_at(0), &mut diags);
        assert!(diags.is_empty());
        assert!(schema.table(&object_name("old")).is_none());
        assert_eq!(schema.table(&object_name("new")).unwrap().name.name().value, "new");
    }

    #[test]
    fn reindex_accepts_table_or_index_but_not_unknown_names() {
        let mut schema = Schema::new();
        let mut diags = Vec::new();
        schema.create_table(table("t"), false, &mut diags);
        schema.reindex(Some(&object_name("t")), Span::empty_at(0), &mut diags);
        assert!(diags.is_empty());
        schema.reindex(Some(&object_name("ghost")), Span::empty_at(0), &mut diags);
        assert!(matches!(diags[0], SchemaError::ReindexTargetNotFound { .. }));
        schema.reindex(None, Span::empty_at(0), &mut diags);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn set_pragma_updates_recognized_directives_and_ignores_unknown() {
        let mut schema = Schema::new();
        let value = Expr::Literal(sqlc_ast::Literal {
            value: sqlc_ast::LiteralValue::True,
            span: Span::empty_at(0),
        });
        schema.set_pragma(&Ident::new("require_strict_tables", Span::empty_at(0)), Some(&value));
        assert!(schema.pragmas.require_strict_tables);
        schema.set_pragma(&Ident::new("journal_mode", Span::empty_at(0)), Some(&value));
    }
}
