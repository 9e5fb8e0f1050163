use std::collections::HashMap;

use sqlc_ast::{DataType, Expr, ForeignKeyClause, Ident};
use sqlc_diagnostics::{Span, Spanned};

/// A `GENERATED ALWAYS AS (expr) [STORED|VIRTUAL]` / `AS (expr) [STORED|VIRTUAL]` clause.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedColumn {
    /// The generating expression.
    pub expr: Expr,
    /// Whether the value is materialized (`STORED`) or computed on read (`VIRTUAL`).
    pub stored: bool,
}

/// A column as it exists in the catalog after `CREATE TABLE`/`ALTER TABLE`
/// have been folded, carrying every constraint `sqlc_ast::ColumnConstraint`
/// can express but resolved into named fields rather than left as a list.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    /// The column's name.
    pub name: Ident,
    /// The declared type as written, if any. SQLite permits typeless
    /// columns; the nominal `Type` this maps to is resolved by the type
    /// system from `declared_type.name`, not stored here.
    pub declared_type: Option<DataType>,
    /// Whether the column accepts `NULL`. Defaults to `true`; cleared by an
    /// explicit `NOT NULL` constraint or an integer `PRIMARY KEY` (the
    /// SQLite rowid alias, which can never be null).
    pub nullable: bool,
    /// Whether this column is (part of) the table's primary key.
    pub primary_key: bool,
    /// Whether `AUTOINCREMENT` was specified on a `PRIMARY KEY` column.
    pub autoincrement: bool,
    /// The `GENERATED ALWAYS AS`/`AS` clause, if this column is generated.
    pub generated: Option<GeneratedColumn>,
    /// The `DEFAULT` expression, if given.
    pub default: Option<Expr>,
    /// `CHECK (expr)` constraints attached directly to this column.
    pub checks: Vec<Expr>,
    /// The `COLLATE` sequence name, if given.
    pub collation: Option<Ident>,
    /// `REFERENCES` clauses attached directly to this column.
    pub foreign_keys: Vec<ForeignKeyClause>,
    /// Source range of the originating column definition, used for
    /// diagnostics that point back at a specific column.
    pub span: Span,
}

impl Column {
    /// Whether this column can be targeted by an `INSERT`/`UPDATE` column
    /// list; generated columns cannot.
    pub fn is_settable(&self) -> bool {
        self.generated.is_none()
    }
}

impl Spanned for Column {
    fn span(&self) -> Span {
        self.span
    }
}

/// An append-only, insertion-ordered column list that permits duplicate
/// names: a joined row can carry two columns with the same name (e.g.
/// `user.id` and `pet.id` after a join), which rules out a plain
/// `IndexMap<String, Column>`. Lookup by canonical name returns every
/// position that name occupies, in insertion order.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnList {
    columns: Vec<Column>,
    #[cfg_attr(feature = "serde", serde(skip))]
    positions: HashMap<String, Vec<usize>>,
}

impl ColumnList {
    /// An empty column list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column, returning its position.
    pub fn push(&mut self, column: Column) -> usize {
        let index = self.columns.len();
        self.positions
            .entry(column.name.canonical())
            .or_default()
            .push(index);
        self.columns.push(column);
        index
    }

    /// Removes the column at `index`, shifting later columns down and
    /// rebuilding the position index. `O(n)`, which is acceptable: schema
    /// mutation is driver-side bookkeeping, not a hot loop.
    pub fn remove(&mut self, index: usize) -> Column {
        let removed = self.columns.remove(index);
        self.rebuild_positions();
        removed
    }

    fn rebuild_positions(&mut self) {
        self.positions.clear();
        for (index, column) in self.columns.iter().enumerate() {
            self.positions
                .entry(column.name.canonical())
                .or_default()
                .push(index);
        }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates columns in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// The column at `index`.
    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// A mutable reference to the column at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Column> {
        self.columns.get_mut(index)
    }

    /// All positions a canonical name occupies, in insertion order. Empty if
    /// the name is not present.
    pub fn positions_of(&self, canonical_name: &str) -> &[usize] {
        self.positions
            .get(canonical_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The single column named `canonical_name`, if it occupies exactly one
    /// position; `None` if absent or ambiguous.
    pub fn unique(&self, canonical_name: &str) -> Option<&Column> {
        match self.positions_of(canonical_name) {
            [index] => self.columns.get(*index),
            _ => None,
        }
    }

    /// True if `canonical_name` occupies more than one position.
    pub fn is_ambiguous(&self, canonical_name: &str) -> bool {
        self.positions_of(canonical_name).len() > 1
    }

    /// Renames the column at `index` in place, preserving its position and
    /// updating the side index.
    pub fn rename(&mut self, index: usize, new_name: Ident) {
        if let Some(column) = self.columns.get_mut(index) {
            column.name = new_name;
        }
        self.rebuild_positions();
    }
}

impl<'a> IntoIterator for &'a ColumnList {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlc_diagnostics::Span;

    fn column(name: &str) -> Column {
        Column {
            name: Ident::new(name, Span::empty_at(0)),
            declared_type: None,
            nullable: true,
            primary_key: false,
            autoincrement: false,
            generated: None,
            default: None,
            checks: Vec::new(),
            collation: None,
            foreign_keys: Vec::new(),
            span: Span::empty_at(0),
        }
    }

    #[test]
    fn duplicate_names_are_both_retained_and_marked_ambiguous() {
        let mut list = ColumnList::new();
        list.push(column("id"));
        list.push(column("name"));
        list.push(column("id"));
        assert_eq!(list.len(), 3);
        assert!(list.is_ambiguous("id"));
        assert_eq!(list.positions_of("id"), &[0, 2]);
        assert!(list.unique("id").is_none());
        assert_eq!(list.unique("name").unwrap().name.value, "name");
    }

    #[test]
    fn remove_rebuilds_positions() {
        let mut list = ColumnList::new();
        list.push(column("a"));
        list.push(column("b"));
        list.push(column("c"));
        list.remove(0);
        assert_eq!(list.len(), 2);
        assert_eq!(list.positions_of("a"), &[] as &[usize]);
        assert_eq!(list.unique("b").unwrap().name.value, "b");
        assert_eq!(list.positions_of("c"), &[1]);
    }

    #[test]
    fn rename_preserves_position_and_updates_index() {
        let mut list = ColumnList::new();
        list.push(column("a"));
        list.push(column("b"));
        list.rename(0, Ident::new("renamed", Span::empty_at(0)));
        assert_eq!(list.positions_of("a"), &[] as &[usize]);
        assert_eq!(list.get(0).unwrap().name.value, "renamed");
        assert_eq!(list.positions_of("renamed"), &[0]);
    }
}
