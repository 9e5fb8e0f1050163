use sqlc_ast::{
    Assignment, Delete, Insert, InsertSource, OnConflictAction, ReturningItem, Update,
};
use sqlc_diagnostics::{Span, Spanned};
use sqlc_schema::{Column, Table};
use sqlc_types::Type;

use crate::bridge::data_type_to_type;
use crate::ctx::Ctx;
use crate::diagnostics::AnalyzerError;
use crate::expr::{check_expr, check_expr_with_hint};
use crate::params::NameHint;
use crate::scope::{ScopeColumn, ScopeTable};
use crate::select::{check_with, push_table_columns, OutputColumn};

pub(crate) fn column_type(column: &Column) -> Type {
    let base = column.declared_type.as_ref().map(data_type_to_type).unwrap_or_else(Type::any);
    if column.nullable {
        base.optional()
    } else {
        base
    }
}

pub(crate) fn scope_table_for(table: &Table, alias: &str) -> ScopeTable {
    let columns = table
        .columns
        .iter()
        .map(|c| ScopeColumn { name: c.name.canonical(), ty: column_type(c) })
        .collect();
    ScopeTable { alias: alias.to_string(), qualified_name: Some(table.name.canonical()), columns, nullable: false }
}

/// Resolves `name`, reporting and returning `None` if it does not exist.
fn resolve_table<'a>(ctx: &mut Ctx<'a>, name: &sqlc_ast::ObjectName) -> Option<&'a Table> {
    match ctx.schema.table(name) {
        Some(table) => Some(table),
        None => {
            ctx.report(AnalyzerError::TableNotFound { name: name.canonical() }, name.span());
            None
        }
    }
}

/// Settable columns of `table`, in declared order, filtering out generated
/// columns (spec.md §4.5's implicit-column-list rule).
fn settable_columns(table: &Table) -> Vec<&Column> {
    table.columns.iter().filter(|c| c.is_settable()).collect()
}

fn check_returning(ctx: &mut Ctx<'_>, returning: &[ReturningItem]) -> Vec<OutputColumn> {
    let mut output = Vec::new();
    for item in returning {
        match &item.expr {
            sqlc_ast::Expr::Wildcard { .. } => {
                for table in ctx.current_scope().tables.clone() {
                    push_table_columns(&mut output, &table);
                }
            }
            sqlc_ast::Expr::QualifiedWildcard { table, .. } => {
                match ctx.current_scope().find_table(&table.canonical()).cloned() {
                    Some(found) => push_table_columns(&mut output, &found),
                    None => ctx.report(AnalyzerError::TableNotFound { name: table.canonical() }, table.span()),
                }
            }
            expr => {
                let ty = check_expr(ctx, expr);
                let name = item
                    .alias
                    .as_ref()
                    .map(|a| a.value.clone())
                    .or_else(|| expr.as_column_ref().and_then(|parts| parts.last()).map(|i| i.value.clone()));
                output.push(OutputColumn { name, ty, table_chunk: None, table_nullable: false });
            }
        }
    }
    output
}

/// Looks up `name` among `table`'s columns, reporting `ColumnNotFound`/
/// `GeneratedColumnSet` as appropriate. Returns the column's type.
fn check_target_column(ctx: &mut Ctx<'_>, table: &Table, name: &sqlc_ast::Ident, span: Span) -> Type {
    let Some(column) = table.columns.unique(&name.canonical()) else {
        ctx.report(AnalyzerError::ColumnNotFound { name: name.value.clone() }, span);
        return Type::Error;
    };
    if !column.is_settable() {
        ctx.report(AnalyzerError::GeneratedColumnSet { name: name.value.clone() }, span);
    }
    column_type(column)
}

fn check_assignments(ctx: &mut Ctx<'_>, table: &Table, assignments: &[Assignment]) {
    for assignment in assignments {
        match assignment {
            Assignment::Single { column, value } => {
                let column_ty = check_target_column(ctx, table, column, value.span());
                let hint = NameHint::Column(column.canonical());
                let value_ty = check_expr_with_hint(ctx, value, hint);
                if ctx.unifier.unify(&column_ty, &value_ty).is_err() {
                    ctx.report(
                        AnalyzerError::Unify { left: column_ty.to_string(), right: value_ty.to_string() },
                        value.span(),
                    );
                }
            }
            Assignment::Tuple { columns, values } => {
                if columns.len() != values.len() {
                    let span = values.first().map(|v| v.span()).unwrap_or_else(|| Span::empty_at(0));
                    ctx.report(
                        AnalyzerError::ColumnCountMismatch {
                            context: "SET".to_string(),
                            found: values.len(),
                            expected: columns.len(),
                        },
                        span,
                    );
                    continue;
                }
                for (column, value) in columns.iter().zip(values) {
                    let column_ty = check_target_column(ctx, table, column, value.span());
                    let hint = NameHint::Column(column.canonical());
                    let value_ty = check_expr_with_hint(ctx, value, hint);
                    if ctx.unifier.unify(&column_ty, &value_ty).is_err() {
                        ctx.report(
                            AnalyzerError::Unify { left: column_ty.to_string(), right: value_ty.to_string() },
                            value.span(),
                        );
                    }
                }
            }
        }
    }
}

/// Type-checks an `INSERT`, returning its `RETURNING` output row (empty if
/// there is none).
pub fn check_insert(ctx: &mut Ctx<'_>, insert: &Insert) -> Vec<OutputColumn> {
    if let Some(with) = &insert.with {
        check_with(ctx, with);
    }
    ctx.push_scope();
    let Some(table) = resolve_table(ctx, &insert.table) else {
        ctx.pop_scope();
        return Vec::new();
    };
    let table = table.clone();
    ctx.install_table(scope_table_for(&table, &insert.table.name().canonical()));

    let target_columns: Vec<Column> = if insert.columns.is_empty() {
        settable_columns(&table).into_iter().cloned().collect()
    } else {
        insert
            .columns
            .iter()
            .filter_map(|ident| match table.columns.unique(&ident.canonical()) {
                Some(column) => {
                    if !column.is_settable() {
                        ctx.report(AnalyzerError::GeneratedColumnSet { name: ident.value.clone() }, ident.span());
                    }
                    Some(column.clone())
                }
                None => {
                    ctx.report(AnalyzerError::ColumnNotFound { name: ident.value.clone() }, ident.span());
                    None
                }
            })
            .collect()
    };

    match &insert.source {
        InsertSource::Values(rows) => {
            for (row_index, row) in rows.iter().enumerate() {
                if row.len() != target_columns.len() {
                    let span = row.first().map(|e| e.span()).unwrap_or(insert.span);
                    ctx.report(
                        AnalyzerError::ColumnCountMismatch {
                            context: "VALUES row".to_string(),
                            found: row.len(),
                            expected: target_columns.len(),
                        },
                        span,
                    );
                    continue;
                }
                for (column, value) in target_columns.iter().zip(row) {
                    let column_ty = column_type(column);
                    let base_name = column.name.canonical();
                    let name = if row_index == 0 { base_name } else { format!("{base_name}{}", row_index + 1) };
                    let value_ty = check_expr_with_hint(ctx, value, NameHint::Column(name));
                    if ctx.unifier.unify(&column_ty, &value_ty).is_err() {
                        ctx.report(
                            AnalyzerError::Unify { left: column_ty.to_string(), right: value_ty.to_string() },
                            value.span(),
                        );
                    }
                }
            }
        }
        InsertSource::Query(select) => {
            let rows = crate::select::check_select(ctx, select);
            if rows.len() != target_columns.len() {
                ctx.report(
                    AnalyzerError::ColumnCountMismatch {
                        context: "INSERT ... SELECT".to_string(),
                        found: rows.len(),
                        expected: target_columns.len(),
                    },
                    select.span(),
                );
            } else {
                for (column, row) in target_columns.iter().zip(&rows) {
                    let column_ty = column_type(column);
                    if ctx.unifier.unify(&column_ty, &row.ty).is_err() {
                        ctx.report(
                            AnalyzerError::Unify { left: column_ty.to_string(), right: row.ty.to_string() },
                            insert.span,
                        );
                    }
                }
            }
        }
        InsertSource::DefaultValues => {}
    }

    if let Some(on_conflict) = &insert.on_conflict {
        for target in &on_conflict.target {
            if table.columns.unique(&target.canonical()).is_none() {
                ctx.report(AnalyzerError::ColumnNotFound { name: target.value.clone() }, target.span());
            }
        }
        if let Some(target_where) = &on_conflict.target_where {
            check_expr(ctx, target_where);
        }
        if let OnConflictAction::DoUpdate { assignments, selection } = &on_conflict.action {
            ctx.install_table(scope_table_for(&table, "excluded"));
            check_assignments(ctx, &table, assignments);
            if let Some(selection) = selection {
                let ty = check_expr(ctx, selection);
                if ctx.unifier.unify(&ty, &Type::bool_literal()).is_err() {
                    ctx.report(AnalyzerError::NotBoolean, selection.span());
                }
            }
        }
    }

    let output = check_returning(ctx, &insert.returning);
    ctx.pop_scope();
    output
}

/// Type-checks an `UPDATE`, returning its `RETURNING` output row (empty if
/// there is none).
pub fn check_update(ctx: &mut Ctx<'_>, update: &Update) -> Vec<OutputColumn> {
    if let Some(with) = &update.with {
        check_with(ctx, with);
    }
    ctx.push_scope();
    let Some(table) = resolve_table(ctx, &update.table) else {
        ctx.pop_scope();
        return Vec::new();
    };
    let table = table.clone();
    ctx.install_table(scope_table_for(&table, &update.table.name().canonical()));

    check_assignments(ctx, &table, &update.assignments);

    if let Some(selection) = &update.selection {
        let ty = check_expr(ctx, selection);
        if ctx.unifier.unify(&ty, &Type::bool_literal()).is_err() {
            ctx.report(AnalyzerError::NotBoolean, selection.span());
        }
    }

    let output = check_returning(ctx, &update.returning);
    ctx.pop_scope();
    output
}

/// Type-checks a `DELETE`, returning its `RETURNING` output row (empty if
/// there is none).
pub fn check_delete(ctx: &mut Ctx<'_>, delete: &Delete) -> Vec<OutputColumn> {
    if let Some(with) = &delete.with {
        check_with(ctx, with);
    }
    ctx.push_scope();
    let Some(table) = resolve_table(ctx, &delete.table) else {
        ctx.pop_scope();
        return Vec::new();
    };
    let table = table.clone();
    ctx.install_table(scope_table_for(&table, &delete.table.name().canonical()));

    if let Some(selection) = &delete.selection {
        let ty = check_expr(ctx, selection);
        if ctx.unifier.unify(&ty, &Type::bool_literal()).is_err() {
            ctx.report(AnalyzerError::NotBoolean, selection.span());
        }
    }

    let output = check_returning(ctx, &delete.returning);
    ctx.pop_scope();
    output
}
