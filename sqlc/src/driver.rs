use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sqlc_ast::QueryDef;
use sqlc_diagnostics::{sort_stable, Diagnostic};
use sqlc_ir::Ir;
use sqlc_parser::Parser;
use sqlc_schema::Schema;
use thiserror::Error;

/// The manifest fields described in spec.md §6, as a plain typed carrier.
/// Populating this from an actual manifest file (TOML, YAML, whatever an
/// embedder chooses) is the embedder's job; this crate never reads one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestFields {
    /// Directory containing migration files, applied in filename order.
    pub migrations: PathBuf,
    /// Directory containing query files.
    pub queries: PathBuf,
    /// Where the generated code should be written. `None` means stdout.
    pub output: Option<PathBuf>,
    /// The generated database handle type's name.
    pub database_name: String,
    /// Extra import lines the generated code should carry verbatim.
    pub additional_imports: Vec<String>,
}

impl Default for ManifestFields {
    fn default() -> Self {
        Self {
            migrations: PathBuf::new(),
            queries: PathBuf::new(),
            output: None,
            database_name: "DB".to_string(),
            additional_imports: Vec::new(),
        }
    }
}

/// One migration file's path and already-read text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationSource {
    /// The file this text was read from, used for diagnostics and for the
    /// `(file_index, span.start)` ordering guarantee.
    pub path: PathBuf,
    /// The file's full text.
    pub text: String,
}

/// One query file's path and already-read text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySource {
    /// The file this text was read from.
    pub path: PathBuf,
    /// The file's full text.
    pub text: String,
}

/// The input to one [`compile_project`] run.
///
/// Callers must sort `migrations` by filename themselves (spec.md §5's
/// schema-building ordering guarantee); this crate does no filesystem
/// scanning and so has no directory listing to sort.
#[derive(Clone, Debug, Default)]
pub struct CompileInput {
    /// Migration files, in the order they should be folded into the schema.
    pub migrations: Vec<MigrationSource>,
    /// Query files to type-check against the folded schema.
    pub queries: Vec<QuerySource>,
}

/// A fatal driver-level failure: something that stops compilation before a
/// usable [`Ir`] exists, as opposed to a [`Diagnostic`] (which is always
/// attached to a still-returned, partially-analyzed result).
#[derive(Debug, Error)]
pub enum DriverError {
    /// Two query definitions across the project share a name; a code
    /// generator has no way to disambiguate the generated function/type
    /// names that would result.
    #[error("query '{name}' is defined in both {first} and {second}")]
    DuplicateQueryName {
        /// The colliding name.
        name: String,
        /// The file it was first seen in.
        first: PathBuf,
        /// The file the collision was found in.
        second: PathBuf,
    },
}

/// Slices `source`'s text covering `def`'s bare statement, excluding the
/// `name:`/`DEFINE QUERY ... AS` wrapper, for embedding in the IR's
/// `source_text` field (spec.md §6).
fn statement_text<'a>(source: &'a str, def: &QueryDef) -> &'a str {
    let span = def.statement.span();
    let start = span.start as usize;
    let end = span.end as usize;
    source.get(start..end).unwrap_or(source)
}

/// Compiles one project: folds every migration into a schema in order, then
/// type-checks every query against the resulting schema, returning the
/// frozen [`Ir`] plus every diagnostic produced, stably sorted by
/// `(file_index, span.start)` across the whole project (spec.md §5).
///
/// Performs no I/O; `input` must already hold every file's full text. A
/// migration or query file whose parser rejects the source outright is
/// skipped (with its failure reported as an `Error`-severity diagnostic
/// against that file) rather than aborting the whole run, matching the
/// non-fatal propagation discipline spec.md §7 requires for every bucket
/// except configuration/IO.
pub fn compile_project(input: CompileInput) -> Result<(Ir, Vec<Diagnostic>), DriverError> {
    log::debug!(
        "compiling project: {} migration file(s), {} query file(s)",
        input.migrations.len(),
        input.queries.len()
    );

    let mut schema = Schema::new();
    let mut diagnostics = Vec::new();
    let mut file_order: Vec<PathBuf> = Vec::new();

    for source in &input.migrations {
        file_order.push(source.path.clone());
        match Parser::new_with_source(&source.text).and_then(|mut p| p.parse_migration_file()) {
            Ok(migration) => {
                diagnostics.extend(sqlc_analyzer::analyze_migration_file(&mut schema, &source.path, &migration));
            }
            Err(err) => {
                diagnostics.push(Diagnostic::error(source.path.clone(), err.span(), err.to_string()));
            }
        }
    }

    let tables = sqlc_analyzer::freeze_tables(&schema);

    let mut seen_names: HashMap<String, PathBuf> = HashMap::new();
    let mut queries = Vec::new();
    for source in &input.queries {
        file_order.push(source.path.clone());
        match Parser::new_with_source(&source.text).and_then(|mut p| p.parse_query_file()) {
            Ok(file) => {
                for def in &file.queries {
                    if let Some(first) = seen_names.get(&def.name.value) {
                        return Err(DriverError::DuplicateQueryName {
                            name: def.name.value.clone(),
                            first: first.clone(),
                            second: source.path.clone(),
                        });
                    }
                    seen_names.insert(def.name.value.clone(), source.path.clone());

                    let text = statement_text(&source.text, def);
                    let (ir, query_diagnostics) = sqlc_analyzer::analyze_query(&schema, source.path.clone(), def, text);
                    diagnostics.extend(query_diagnostics);
                    queries.push(ir);
                }
            }
            Err(err) => {
                diagnostics.push(Diagnostic::error(source.path.clone(), err.span(), err.to_string()));
            }
        }
    }

    let order = |path: &Path| file_order.iter().position(|p| p.as_path() == path).unwrap_or(usize::MAX);
    sort_stable(&mut diagnostics, order);

    Ok((Ir { tables, queries }, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(path: &str, text: &str) -> MigrationSource {
        MigrationSource { path: PathBuf::from(path), text: text.to_string() }
    }

    fn query(path: &str, text: &str) -> QuerySource {
        QuerySource { path: PathBuf::from(path), text: text.to_string() }
    }

    #[test]
    fn compiles_a_table_and_a_query_against_it() {
        let input = CompileInput {
            migrations: vec![source(
                "migrations/0001_init.sql",
                "CREATE TABLE foo (id INTEGER PRIMARY KEY, name TEXT NOT NULL);",
            )],
            queries: vec![query("queries/foo.sql", "get_foo: SELECT * FROM foo WHERE id = ?;")],
        };
        let (ir, diagnostics) = compile_project(input).expect("compiles");
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        assert_eq!(ir.tables.len(), 1);
        assert_eq!(ir.tables[0].name, "foo");
        assert_eq!(ir.queries.len(), 1);
        assert_eq!(ir.queries[0].name, "get_foo");
    }

    #[test]
    fn diagnostics_are_sorted_by_file_then_position() {
        let input = CompileInput {
            migrations: vec![
                source("migrations/0001_init.sql", "CREATE TABLE foo (id INTEGER PRIMARY KEY);"),
                source("migrations/0002_bar.sql", "CREATE TABLE bar (id INTEGER PRIMARY KEY, fk INTEGER REFERENCES missing(id));"),
            ],
            queries: vec![query("queries/foo.sql", "bad: SELECT nope FROM foo;")],
        };
        let (_, diagnostics) = compile_project(input).expect("compiles");
        assert!(!diagnostics.is_empty());
        let files: Vec<&Path> = diagnostics.iter().map(|d| d.file.as_path()).collect();
        let mut sorted = files.clone();
        sorted.sort();
        // Not a strict equality check (file ordering is by project position,
        // not lexical order) -- just confirm every diagnostic from an
        // earlier file precedes every diagnostic from a later one.
        let first_bar = files.iter().position(|f| f.ends_with("0002_bar.sql"));
        let first_foo = files.iter().position(|f| f.ends_with("foo.sql"));
        if let (Some(bar_index), Some(foo_index)) = (first_bar, first_foo) {
            assert!(bar_index < foo_index);
        }
    }

    #[test]
    fn duplicate_query_name_across_files_is_a_driver_error() {
        let input = CompileInput {
            migrations: vec![source("migrations/0001_init.sql", "CREATE TABLE foo (id INTEGER PRIMARY KEY);")],
            queries: vec![
                query("queries/a.sql", "get_foo: SELECT * FROM foo;"),
                query("queries/b.sql", "get_foo: SELECT * FROM foo;"),
            ],
        };
        let err = compile_project(input).unwrap_err();
        assert!(matches!(err, DriverError::DuplicateQueryName { .. }));
    }

    #[test]
    fn unparsable_migration_is_reported_as_a_diagnostic_not_aborted() {
        let input = CompileInput {
            migrations: vec![source("migrations/0001_init.sql", "CREATE TABLE (;")],
            queries: vec![],
        };
        let (ir, diagnostics) = compile_project(input).expect("still compiles");
        assert!(ir.tables.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn manifest_fields_default_database_name_is_db() {
        assert_eq!(ManifestFields::default().database_name, "DB");
    }
}
