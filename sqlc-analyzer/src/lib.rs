//! # sqlc-analyzer
//!
//! The semantic core of the compiler: folds a migration's DDL statements
//! into a [`Schema`], then type-checks each named query against that
//! schema and freezes the result into [`sqlc_ir::QueryIr`]. Nothing here
//! touches the filesystem or a project layout — that is the driver
//! crate's job; this crate only ever sees already-parsed ASTs and already
//! read source text.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod bridge;
mod cardinality;
mod ctx;
mod ddl;
mod diagnostics;
mod dml;
mod expr;
mod params;
mod scope;
mod select;

use std::path::{Path, PathBuf};

use sqlc_ast::{MigrationFile, QueryDef, Statement};
use sqlc_diagnostics::Diagnostic;
use sqlc_ir::{Cardinality, Chunk, ChunkColumn, QueryIr};
use sqlc_schema::Schema;
use sqlc_types::Unifier;

pub use bridge::{data_type_to_type, is_strict_type_name, literal_to_type};
pub use cardinality::{delete_cardinality, insert_cardinality, select_cardinality, update_cardinality};
pub use ctx::Ctx;
pub use ddl::{
    fold_alter_table, fold_create_index, fold_create_table, fold_create_trigger, fold_create_view, fold_drop,
    fold_reindex, fold_statement,
};
pub use diagnostics::AnalyzerError;
pub use dml::{check_delete, check_insert, check_update};
pub use params::{NameHint, ParamCollector};
pub use scope::{RowScope, ScopeColumn, ScopeTable};
pub use select::{assemble_chunks, check_select, OutputColumn};

/// Folds every statement of `migration` into `schema`, in order, returning
/// every diagnostic produced (spec.md §4.3). `schema` is mutated in place;
/// statements are applied even after an earlier one fails, since each
/// failure is non-fatal and later statements may still be analyzable.
pub fn analyze_migration_file(schema: &mut Schema, file: impl AsRef<Path>, migration: &MigrationFile) -> Vec<Diagnostic> {
    let file = file.as_ref();
    log::debug!("folding {} statement(s) from {}", migration.statements.len(), file.display());
    migration.statements.iter().flat_map(|stmt| ddl::fold_statement(schema, file, stmt)).collect()
}

/// Converts a fully-evolved schema's tables into their frozen IR shape
/// (spec.md §4.7/§6), in schema-insertion order.
pub fn freeze_tables(schema: &Schema) -> Vec<sqlc_ir::Table> {
    schema
        .tables
        .values()
        .map(|table| sqlc_ir::Table {
            name: table.name.canonical(),
            columns: table
                .columns
                .iter()
                .map(|column| sqlc_ir::Column {
                    name: column.name.canonical(),
                    ty: dml::column_type(column).strip_optional().clone(),
                    nullable: column.nullable,
                })
                .collect(),
        })
        .collect()
}

/// Strips trailing `--`/`/* */` comments and collapses whitespace runs, for
/// embedding a query's source text in its IR (spec.md §6's `source_text`
/// field: "sanitized (comments stripped, whitespace normalized)").
pub fn sanitize_source_text(source: &str) -> String {
    let mut stripped = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' && chars.peek() == Some(&'-') {
            while chars.peek().is_some_and(|&next| next != '\n') {
                chars.next();
            }
            continue;
        }
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            while let Some(next) = chars.next() {
                if next == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    break;
                }
            }
            continue;
        }
        stripped.push(c);
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn resolve_chunks(unifier: &mut Unifier, chunks: Vec<Chunk>) -> Vec<Chunk> {
    chunks
        .into_iter()
        .map(|chunk| Chunk {
            columns: chunk
                .columns
                .into_iter()
                .map(|column| ChunkColumn { name: column.name, ty: unifier.resolve_deep(&column.ty) })
                .collect(),
            source_table: chunk.source_table,
            nullable_as_whole: chunk.nullable_as_whole,
        })
        .collect()
}

/// Type-checks one [`QueryDef`] against `schema` and freezes the result
/// into a [`QueryIr`] plus the diagnostics produced. `source_text` is the
/// exact source slice this query definition was parsed from (its statement
/// only, without the `name:`/`DEFINE QUERY ... AS` wrapper), used verbatim
/// except for the sanitization spec.md §6 requires.
pub fn analyze_query(
    schema: &Schema,
    file: impl Into<PathBuf>,
    def: &QueryDef,
    source_text: &str,
) -> (QueryIr, Vec<Diagnostic>) {
    log::debug!("analyzing query '{}'", def.name.value);
    let mut ctx = Ctx::new(schema, file);
    let (output, statement_cardinality) = match def.statement.as_ref() {
        Statement::Select(select) => {
            (select::check_select(&mut ctx, select), cardinality::select_cardinality(schema, select))
        }
        Statement::Insert(insert) => {
            (dml::check_insert(&mut ctx, insert), cardinality::insert_cardinality(insert))
        }
        Statement::Update(update) => {
            (dml::check_update(&mut ctx, update), cardinality::update_cardinality(schema, update))
        }
        Statement::Delete(delete) => {
            (dml::check_delete(&mut ctx, delete), cardinality::delete_cardinality(schema, delete))
        }
        _ => (Vec::new(), Cardinality::None),
    };
    let chunks = select::assemble_chunks(&output);

    let Ctx { params, mut unifier, diagnostics, observed_tables, .. } = ctx;
    let parameters = params.finish(&mut unifier);
    let output_chunks = resolve_chunks(&mut unifier, chunks);

    let ir = QueryIr {
        name: def.name.value.clone(),
        input_type_name: def.hint.as_ref().and_then(|hint| hint.input.as_ref()).map(|dt| dt.name.value.clone()),
        output_type_name: def.hint.as_ref().and_then(|hint| hint.output.as_ref()).map(|dt| dt.name.value.clone()),
        parameters,
        output_chunks,
        observed_tables,
        cardinality: statement_cardinality,
        source_text: sanitize_source_text(source_text),
    };
    (ir, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlc_ir::Cardinality;
    use sqlc_parser::Parser;
    use sqlc_types::Type;
    use std::path::PathBuf;

    fn schema_from(migration_source: &str) -> (Schema, Vec<Diagnostic>) {
        let migration =
            Parser::new_with_source(migration_source).and_then(|mut p| p.parse_migration_file()).expect("migration parses");
        let mut schema = Schema::new();
        let diagnostics = analyze_migration_file(&mut schema, PathBuf::from("migrations/0001.sql"), &migration);
        (schema, diagnostics)
    }

    fn query_def_from(source: &str) -> QueryDef {
        let file =
            Parser::new_with_source(source).and_then(|mut p| p.parse_query_file()).expect("query file parses");
        let mut queries = file.queries;
        assert_eq!(queries.len(), 1);
        queries.remove(0)
    }

    fn analyze(schema: &Schema, query_source: &str, statement_source: &str) -> (QueryIr, Vec<Diagnostic>) {
        let def = query_def_from(query_source);
        analyze_query(schema, PathBuf::from("queries/q.sql"), &def, statement_source)
    }

    #[test]
    fn simple_select_pins_the_primary_key_and_carries_the_adapter() {
        let (schema, diags) =
            schema_from("CREATE TABLE foo (id INTEGER PRIMARY KEY, bar INTEGER AS Bool, baz TEXT NOT NULL);");
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        let (ir, diags) = analyze(&schema, "q: SELECT * FROM foo WHERE id = ?;", "SELECT * FROM foo WHERE id = ?");
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        assert_eq!(ir.parameters.len(), 1);
        assert_eq!(ir.parameters[0].index, 1);
        assert_eq!(ir.parameters[0].name, "id");
        assert_eq!(ir.parameters[0].ty, Type::integer());
        assert!(!ir.parameters[0].nullable);

        assert_eq!(ir.output_chunks.len(), 1);
        let chunk = &ir.output_chunks[0];
        assert_eq!(chunk.source_table.as_deref(), Some("foo"));
        let names: Vec<&str> = chunk.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "bar", "baz"]);
        assert_eq!(chunk.columns[0].ty, Type::integer());
        assert_eq!(
            chunk.columns[1].ty,
            Type::Nominal { name: "Bool".to_string(), adapter: None }.optional()
        );
        assert_eq!(chunk.columns[2].ty, Type::text());

        assert_eq!(ir.cardinality, Cardinality::Single);
    }

    #[test]
    fn in_list_parameter_is_named_and_pluralized_and_variadic() {
        let (schema, _) = schema_from("CREATE TABLE foo (id INTEGER PRIMARY KEY);");
        let (ir, diags) = analyze(&schema, "q: SELECT * FROM foo WHERE id IN ?;", "SELECT * FROM foo WHERE id IN ?");
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
        assert_eq!(ir.parameters.len(), 1);
        assert_eq!(ir.parameters[0].name, "ids");
        assert!(ir.parameters[0].variadic);
        assert_eq!(ir.parameters[0].ty, Type::integer());
        assert_eq!(ir.cardinality, Cardinality::Many);
    }

    #[test]
    fn bare_ambiguous_column_is_diagnosed_and_cardinality_is_many() {
        let (schema, _) = schema_from("CREATE TABLE user(id INTEGER, name TEXT); CREATE TABLE pet(id INTEGER, name TEXT);");
        let (ir, diags) = analyze(
            &schema,
            "q: SELECT id FROM user JOIN pet ON user.id = pet.id;",
            "SELECT id FROM user JOIN pet ON user.id = pet.id",
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("'id' is ambiguous in the current context"));
        assert_eq!(ir.cardinality, Cardinality::Many);
    }

    #[test]
    fn missing_strict_under_pragma_still_keeps_the_partial_table() {
        let (schema, diags) = schema_from(
            "PRAGMA require_strict_tables = TRUE; CREATE TABLE baz (foo DECIMAL, PRIMARY KEY (foo, bar));",
        );
        let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("missing STRICT table option")));
        assert!(messages.iter().any(|m| m.contains("invalid type 'DECIMAL'")));
        assert!(messages.iter().any(|m| m.contains("column 'bar' does not exist")));

        let table = schema.tables.get("baz").expect("table is still added");
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns.get(0).unwrap().name.value, "foo");
    }

    #[test]
    fn left_outer_join_marks_the_nullable_sides_chunk() {
        let (schema, diags) = schema_from(
            "CREATE TABLE parent (id INTEGER PRIMARY KEY, name TEXT);\
             CREATE TABLE child (id INTEGER PRIMARY KEY, parent_id INTEGER, label TEXT);",
        );
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        let sql = "SELECT parent.*, child.* FROM parent LEFT OUTER JOIN child ON child.parent_id = parent.id";
        let (ir, diags) = analyze(&schema, &format!("q: {sql};"), sql);
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        assert_eq!(ir.output_chunks.len(), 2);
        assert!(!ir.output_chunks[0].nullable_as_whole);
        assert!(ir.output_chunks[1].nullable_as_whole);
        assert_eq!(ir.output_chunks[1].source_table.as_deref(), Some("child"));
    }

    #[test]
    fn insert_returning_reports_the_generated_column_and_freezes_the_row() {
        let (schema, diags) = schema_from(
            "CREATE TABLE u(id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, age INTEGER NOT NULL DEFAULT 0,\
             description TEXT GENERATED ALWAYS AS (name || ' is a user'));",
        );
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        let sql = "INSERT INTO u (id, name) VALUES (?,?) RETURNING *";
        let (ir, diags) = analyze(&schema, &format!("q: {sql};"), sql);
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");

        assert_eq!(ir.parameters.len(), 2);
        assert_eq!(ir.parameters[0].name, "id");
        assert_eq!(ir.parameters[0].ty, Type::integer());
        assert_eq!(ir.parameters[1].name, "name");
        assert!(ir.parameters[1].nullable);

        assert_eq!(ir.output_chunks.len(), 1);
        let names: Vec<&str> = ir.output_chunks[0].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "name", "age", "description"]);

        let bad_sql = "INSERT INTO u (id, description) VALUES (?,?)";
        let (_, diags) = analyze(&schema, &format!("q: {bad_sql};"), bad_sql);
        assert!(diags.iter().any(|d| d.message.contains("is generated and not able to be set")));
    }

    #[test]
    fn source_text_is_sanitized() {
        let sanitized = sanitize_source_text("SELECT  1 -- a comment\n  FROM  /* inline */ foo");
        assert_eq!(sanitized, "SELECT 1 FROM foo");
    }

    #[test]
    fn both_query_surface_forms_are_accepted_in_one_file() {
        let source = "a: SELECT 1;\nDEFINE QUERY b AS SELECT 2;\n";
        let file = Parser::new_with_source(source).and_then(|mut p| p.parse_query_file()).expect("parses");
        assert_eq!(file.queries.len(), 2);
        assert!(!file.queries[0].is_define_query_form);
        assert!(file.queries[1].is_define_query_form);
    }
}
