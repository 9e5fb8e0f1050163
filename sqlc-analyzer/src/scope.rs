use sqlc_types::Type;

/// One table visible in a `FROM` clause at some point during `SELECT`
/// analysis: its columns, under whatever alias it was introduced as.
#[derive(Clone, Debug)]
pub struct ScopeTable {
    /// The alias (or bare table name) this table is visible under.
    pub alias: String,
    /// The table's qualified name, if it is a base table (as opposed to a
    /// derived subquery/CTE, which has none).
    pub qualified_name: Option<String>,
    /// The table's columns, in order.
    pub columns: Vec<ScopeColumn>,
    /// Whether this table sits on the nullable side of an outer join, so
    /// the row as a whole (not just each column) may be entirely absent.
    pub nullable: bool,
}

/// One column of a [`ScopeTable`].
#[derive(Clone, Debug)]
pub struct ScopeColumn {
    /// The column's name.
    pub name: String,
    /// The column's type, with `Optional` already applied if the column's
    /// table is on the nullable side of an outer join.
    pub ty: Type,
}

impl ScopeTable {
    /// Wraps every column's type in `Optional` (the nullable side of an
    /// outer join), idempotently.
    pub fn make_nullable(&mut self) {
        self.nullable = true;
        for column in &mut self.columns {
            column.ty = column.ty.clone().optional();
        }
    }
}

/// The set of tables visible while type-checking one `SELECT` level. Wraps
/// a `Vec<ScopeTable>` rather than a single flat map so qualified
/// (`table.column`) lookups and `table.*`/bare `*` expansion can still find
/// which table a column came from.
#[derive(Clone, Debug, Default)]
pub struct RowScope {
    /// The tables currently in scope, in `FROM`-clause order.
    pub tables: Vec<ScopeTable>,
}

impl RowScope {
    /// An empty scope (e.g. a `VALUES (...)` row source, or `SELECT 1`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table to the scope.
    pub fn push(&mut self, table: ScopeTable) {
        self.tables.push(table);
    }

    /// Finds the table visible under `alias`.
    pub fn find_table(&self, alias: &str) -> Option<&ScopeTable> {
        self.tables.iter().find(|t| t.alias.eq_ignore_ascii_case(alias))
    }
}
