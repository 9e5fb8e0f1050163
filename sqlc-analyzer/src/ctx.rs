use std::collections::BTreeSet;
use std::path::PathBuf;

use sqlc_diagnostics::Diagnostic;
use sqlc_schema::Schema;
use sqlc_types::{Environment, Unifier};

use crate::params::ParamCollector;
use crate::scope::RowScope;

/// Everything threaded through the analysis of a single statement: the
/// (read-only, per spec.md §3's ownership note) schema it is checked
/// against, the substitution it accumulates type variables into, the
/// lexical environment and table-alias scope stack for column resolution,
/// the bind-parameter collector, the touched-table set, and the
/// diagnostics sink.
pub struct Ctx<'a> {
    /// The schema in effect for this statement. Borrowed read-only: DML/
    /// query statements never mutate it (only DDL does, in the schema-
    /// evolution fold that runs before query analysis).
    pub schema: &'a Schema,
    /// The file this statement came from, for diagnostic spans.
    pub file: PathBuf,
    /// The union-find substitution for this statement's inference.
    pub unifier: Unifier,
    /// The column/table lexical environment, one scope per `SELECT` level.
    pub env: Environment,
    /// The table-alias registry mirroring `env`'s scope stack, for
    /// qualified (`table.column`) and `table.*` resolution.
    pub scopes: Vec<RowScope>,
    /// The statement's bind parameters, discovered in source order.
    pub params: ParamCollector,
    /// Canonical names of every base table this statement touched, via
    /// `FROM`, a join, or a `RETURNING` target (spec.md §4.7).
    pub observed_tables: BTreeSet<String>,
    /// Diagnostics accumulated while checking this statement.
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Ctx<'a> {
    /// A fresh context for checking one statement against `schema`.
    pub fn new(schema: &'a Schema, file: impl Into<PathBuf>) -> Self {
        Self {
            schema,
            file: file.into(),
            unifier: Unifier::new(),
            env: Environment::new(),
            scopes: vec![RowScope::new()],
            params: ParamCollector::new(),
            observed_tables: BTreeSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Pushes a fresh, empty row scope (entering a `SELECT` level).
    pub fn push_scope(&mut self) {
        self.env.push_scope();
        self.scopes.push(RowScope::new());
    }

    /// Pops the innermost row scope (leaving a `SELECT` level).
    pub fn pop_scope(&mut self) {
        self.env.pop_scope();
        self.scopes.pop();
    }

    /// The innermost row scope.
    pub fn current_scope(&self) -> &RowScope {
        self.scopes.last().expect("ctx always has a scope")
    }

    /// The innermost row scope, mutably.
    pub fn current_scope_mut(&mut self) -> &mut RowScope {
        self.scopes.last_mut().expect("ctx always has a scope")
    }

    /// Adds `table` to the innermost row scope and defines each of its
    /// columns in the lexical environment (spec.md §4.4's environment
    /// discipline: duplicates across tables become ambiguous automatically,
    /// since [`Environment::define`] flags a repeated key rather than
    /// overwriting it).
    pub fn install_table(&mut self, table: crate::scope::ScopeTable) {
        for column in &table.columns {
            self.env.define(
                column.name.clone(),
                sqlc_types::TypeScheme::monomorphic(column.ty.clone()),
            );
        }
        if let Some(qualified_name) = &table.qualified_name {
            self.observed_tables.insert(qualified_name.clone());
        }
        self.current_scope_mut().push(table);
    }

    /// Records a diagnostic from an [`crate::diagnostics::AnalyzerError`].
    pub fn report(&mut self, error: crate::diagnostics::AnalyzerError, span: sqlc_diagnostics::Span) {
        self.diagnostics.push(error.into_diagnostic(self.file.clone(), span));
    }
}
