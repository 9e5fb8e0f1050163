use std::path::Path;

use sqlc_ast::{
    AlterTable, AlterTableAction, ColumnConstraint, ColumnDef, CreateIndex, CreateTable,
    CreateTableBody, CreateTrigger, CreateView, DropObject, DropObjectKind, ForeignKeyClause,
    FromItem, Ident, ObjectName, ReIndex, Select, SelectCore, Statement, TableConstraint,
    TableFactor, TriggerEvent,
};
use sqlc_diagnostics::{Diagnostic, Span, Spanned};
use sqlc_schema::{Column, GeneratedColumn, Index, Schema, SchemaError, Table, TableKind, Trigger};

use crate::bridge::{data_type_to_type, is_strict_type_name};
use crate::ctx::Ctx;
use crate::diagnostics::AnalyzerError;
use crate::dml::{column_type, scope_table_for};
use crate::expr::check_expr;
use crate::select::{check_select, require_boolean};

/// Folds one statement into `schema`, mutating it in place and returning the
/// diagnostics produced. A non-DDL statement (see [`Statement::is_ddl`]) is
/// a no-op, since those are analyzed as queries, not schema mutations.
pub fn fold_statement(schema: &mut Schema, file: &Path, stmt: &Statement) -> Vec<Diagnostic> {
    match stmt {
        Statement::CreateTable(create) => fold_create_table(schema, file, create),
        Statement::AlterTable(alter) => fold_alter_table(schema, file, alter),
        Statement::Drop(drop) => fold_drop(schema, file, drop),
        Statement::CreateIndex(create) => fold_create_index(schema, file, create),
        Statement::CreateView(create) => fold_create_view(schema, file, create),
        Statement::CreateTrigger(create) => fold_create_trigger(schema, file, create),
        Statement::Pragma(pragma) => {
            schema.set_pragma(&pragma.name, pragma.value.as_ref());
            Vec::new()
        }
        Statement::ReIndex(reindex) => fold_reindex(schema, file, reindex),
        Statement::Select(_) | Statement::Insert(_) | Statement::Update(_) | Statement::Delete(_) => Vec::new(),
    }
}

fn to_diagnostic(file: &Path, error: &SchemaError) -> Diagnostic {
    Diagnostic::error(file.to_path_buf(), error.span(), error.to_string())
}

fn report(diagnostics: &mut Vec<Diagnostic>, file: &Path, error: AnalyzerError, span: Span) {
    diagnostics.push(error.into_diagnostic(file.to_path_buf(), span));
}

/// Resolves the named constraints of a single [`ColumnDef`] into a
/// [`Column`], dropping conflict-resolution clauses (`ON CONFLICT ...`)
/// that the schema crate has no field for — they affect runtime behavior,
/// not the static shape this compiler reasons about.
fn column_from_def(def: &ColumnDef) -> Column {
    let mut column = Column {
        name: def.name.clone(),
        declared_type: def.data_type.clone(),
        nullable: true,
        primary_key: false,
        autoincrement: false,
        generated: None,
        default: None,
        checks: Vec::new(),
        collation: None,
        foreign_keys: Vec::new(),
        span: def.span,
    };
    for constraint in &def.constraints {
        match constraint {
            ColumnConstraint::PrimaryKey { autoincrement, .. } => {
                column.primary_key = true;
                column.autoincrement = *autoincrement;
                column.nullable = false;
            }
            ColumnConstraint::NotNull { .. } => column.nullable = false,
            ColumnConstraint::Null => column.nullable = true,
            ColumnConstraint::Unique { .. } => {}
            ColumnConstraint::Check(expr) => column.checks.push(expr.clone()),
            ColumnConstraint::Default(expr) => column.default = Some(expr.clone()),
            ColumnConstraint::Collate(ident) => column.collation = Some(ident.clone()),
            ColumnConstraint::ForeignKey(fk) => column.foreign_keys.push(fk.clone()),
            ColumnConstraint::GeneratedAs { expr, stored } => {
                column.generated = Some(GeneratedColumn { expr: expr.clone(), stored: *stored });
            }
        }
    }
    column
}

fn check_type_name(diagnostics: &mut Vec<Diagnostic>, file: &Path, column: &Column, strict_required: bool) {
    if !strict_required {
        return;
    }
    if let Some(data_type) = &column.declared_type {
        if !is_strict_type_name(&data_type.name.value) {
            report(
                diagnostics,
                file,
                AnalyzerError::InvalidType { name: data_type.name.value.clone() },
                data_type.span(),
            );
        }
    }
}

fn check_foreign_key(schema: &Schema, file: &Path, fk: &ForeignKeyClause, diagnostics: &mut Vec<Diagnostic>) {
    match schema.table(&fk.table) {
        Some(target) => {
            for column in &fk.columns {
                if target.columns.unique(&column.canonical()).is_none() {
                    report(
                        diagnostics,
                        file,
                        AnalyzerError::ColumnNotFound { name: column.value.clone() },
                        column.span(),
                    );
                }
            }
        }
        None => report(
            diagnostics,
            file,
            AnalyzerError::TableNotFound { name: fk.table.canonical() },
            fk.table.span(),
        ),
    }
}

fn check_columns_exist(schema_table: &Table, columns: &[Ident], diagnostics: &mut Vec<Diagnostic>, file: &Path) {
    for column in columns {
        if schema_table.columns.unique(&column.canonical()).is_none() {
            report(diagnostics, file, AnalyzerError::ColumnNotFound { name: column.value.clone() }, column.span());
        }
    }
}

/// Type-checks every `GENERATED`/`DEFAULT`/`CHECK` expression of a
/// freshly-built table against the table's own columns (spec.md §4.3).
fn check_construction_expressions(
    schema: &Schema,
    file: &Path,
    table: &Table,
    table_constraints: &[TableConstraint],
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut ctx = Ctx::new(schema, file);
    ctx.install_table(scope_table_for(table, &table.name.canonical()));
    for column in table.columns.iter() {
        if let Some(generated) = &column.generated {
            let expr_ty = check_expr(&mut ctx, &generated.expr);
            if let Some(declared) = &column.declared_type {
                let declared_ty = data_type_to_type(declared);
                if ctx.unifier.unify(&declared_ty, &expr_ty).is_err() {
                    ctx.report(
                        AnalyzerError::Unify { left: declared_ty.to_string(), right: expr_ty.to_string() },
                        generated.expr.span(),
                    );
                }
            }
        }
        if let Some(default) = &column.default {
            let default_ty = check_expr(&mut ctx, default);
            let declared_ty = column_type(column);
            if ctx.unifier.unify(&declared_ty, &default_ty).is_err() {
                ctx.report(
                    AnalyzerError::Unify { left: declared_ty.to_string(), right: default_ty.to_string() },
                    default.span(),
                );
            }
        }
        for check in &column.checks {
            require_boolean(&mut ctx, check);
        }
    }
    for constraint in table_constraints {
        if let TableConstraint::Check { expr } = constraint {
            require_boolean(&mut ctx, expr);
        }
    }
    diagnostics.extend(ctx.diagnostics);
}

fn build_columns_table(
    schema: &Schema,
    file: &Path,
    name: &ObjectName,
    column_defs: &[ColumnDef],
    table_constraints: &[TableConstraint],
    without_rowid: bool,
    strict: bool,
    span: Span,
) -> (Table, Vec<Diagnostic>) {
    let mut table = Table::new(name.clone(), TableKind::Normal, span);
    table.without_rowid = without_rowid;
    table.strict = strict;
    let mut diagnostics = Vec::new();
    let strict_required = strict || schema.pragmas.require_strict_tables;
    if schema.pragmas.require_strict_tables && !strict {
        report(&mut diagnostics, file, AnalyzerError::MissingStrict, span);
    }

    let mut column_primary_key: Option<String> = None;
    for def in column_defs {
        let column = column_from_def(def);
        check_type_name(&mut diagnostics, file, &column, strict_required);
        if column.primary_key {
            column_primary_key = Some(column.name.canonical());
        }
        table.columns.push(column);
    }

    let mut table_primary_key: Option<Vec<String>> = None;
    for constraint in table_constraints {
        match constraint {
            TableConstraint::PrimaryKey { columns } => {
                check_columns_exist(&table, columns, &mut diagnostics, file);
                table_primary_key = Some(columns.iter().map(Ident::canonical).collect());
            }
            TableConstraint::Unique { columns } => {
                check_columns_exist(&table, columns, &mut diagnostics, file);
            }
            TableConstraint::ForeignKey { columns, references } => {
                check_columns_exist(&table, columns, &mut diagnostics, file);
                check_foreign_key(schema, file, references, &mut diagnostics);
            }
            TableConstraint::Check { .. } => {}
        }
    }
    if column_primary_key.is_some() && table_primary_key.is_some() {
        report(&mut diagnostics, file, AnalyzerError::DuplicatePrimaryKey, span);
    }
    table.primary_key = table_primary_key
        .or_else(|| column_primary_key.map(|name| vec![name]))
        .unwrap_or_default();

    for column in table.columns.iter() {
        for fk in &column.foreign_keys {
            check_foreign_key(schema, file, fk, &mut diagnostics);
        }
    }

    check_construction_expressions(schema, file, &table, table_constraints, &mut diagnostics);
    (table, diagnostics)
}

fn build_select_table(schema: &Schema, file: &Path, name: &ObjectName, select: &Select, span: Span) -> (Table, Vec<Diagnostic>) {
    let mut ctx = Ctx::new(schema, file);
    let output = check_select(&mut ctx, select);
    let mut table = Table::new(name.clone(), TableKind::Normal, span);
    for (index, column) in output.into_iter().enumerate() {
        let column_name = column.name.unwrap_or_else(|| format!("column{}", index + 1));
        table.columns.push(Column {
            name: Ident::new(column_name, select.span()),
            declared_type: None,
            nullable: column.ty.is_optional(),
            primary_key: false,
            autoincrement: false,
            generated: None,
            default: None,
            checks: Vec::new(),
            collation: None,
            foreign_keys: Vec::new(),
            span: select.span(),
        });
    }
    (table, ctx.diagnostics)
}

/// Folds a `CREATE TABLE` into `schema` (spec.md §4.3): builds the table
/// from either a column list or `AS SELECT`, runs DDL-time validation, then
/// inserts it (subject to the `IF NOT EXISTS`/duplicate-name rule).
pub fn fold_create_table(schema: &mut Schema, file: &Path, create: &CreateTable) -> Vec<Diagnostic> {
    let (table, mut diagnostics) = match &create.body {
        CreateTableBody::Columns { columns, constraints, without_rowid, strict } => {
            build_columns_table(schema, file, &create.name, columns, constraints, *without_rowid, *strict, create.span)
        }
        CreateTableBody::AsSelect(select) => build_select_table(schema, file, &create.name, select, create.span),
    };
    let mut schema_errors = Vec::new();
    schema.create_table(table, create.if_not_exists, &mut schema_errors);
    diagnostics.extend(schema_errors.iter().map(|e| to_diagnostic(file, e)));
    diagnostics
}

/// Folds a `CREATE VIEW` into `schema`: its shape is the defining query's
/// output row, optionally renamed by an explicit column list.
pub fn fold_create_view(schema: &mut Schema, file: &Path, create: &CreateView) -> Vec<Diagnostic> {
    let (mut table, mut diagnostics) = build_select_table(schema, file, &create.name, &create.query, create.span);
    table.kind = TableKind::View;
    if !create.columns.is_empty() {
        if create.columns.len() != table.columns.len() {
            report(
                &mut diagnostics,
                file,
                AnalyzerError::ColumnCountMismatch {
                    context: "CREATE VIEW column list".to_string(),
                    found: create.columns.len(),
                    expected: table.columns.len(),
                },
                create.span,
            );
        } else {
            for (index, name) in create.columns.iter().enumerate() {
                table.columns.rename(index, name.clone());
            }
        }
    }
    let mut schema_errors = Vec::new();
    schema.create_table(table, create.if_not_exists, &mut schema_errors);
    diagnostics.extend(schema_errors.iter().map(|e| to_diagnostic(file, e)));
    diagnostics
}

/// Folds a `CREATE INDEX`, type-checking the indexed expressions and partial
/// predicate against the target table's columns.
pub fn fold_create_index(schema: &mut Schema, file: &Path, create: &CreateIndex) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if let Some(target) = schema.table(&create.table) {
        let mut ctx = Ctx::new(schema, file);
        ctx.install_table(scope_table_for(target, &create.table.name().canonical()));
        for indexed in &create.columns {
            check_expr(&mut ctx, &indexed.expr);
        }
        if let Some(predicate) = &create.predicate {
            require_boolean(&mut ctx, predicate);
        }
        diagnostics.extend(ctx.diagnostics);
    } else {
        report(&mut diagnostics, file, AnalyzerError::TableNotFound { name: create.table.canonical() }, create.table.span());
    }
    let index = Index {
        name: create.name.clone(),
        table: create.table.clone(),
        unique: create.unique,
        if_not_exists: create.if_not_exists,
        columns: create.columns.clone(),
        predicate: create.predicate.clone(),
        span: create.span,
    };
    let mut schema_errors = Vec::new();
    schema.create_index(index, &mut schema_errors);
    diagnostics.extend(schema_errors.iter().map(|e| to_diagnostic(file, e)));
    diagnostics
}

/// Folds a `CREATE TRIGGER`. Its body is not itself type-checked (the
/// parser only records its span, to avoid a cyclic module dependency on
/// `dml`/`query_def`); the `WHEN` guard is checked against `old`/`new`
/// aliases of the target table, following which of those the triggering
/// event makes available.
pub fn fold_create_trigger(schema: &mut Schema, file: &Path, create: &CreateTrigger) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if let Some(target) = schema.table(&create.table) {
        if let Some(when) = &create.when {
            let mut ctx = Ctx::new(schema, file);
            match &create.event {
                TriggerEvent::Insert => ctx.install_table(scope_table_for(target, "new")),
                TriggerEvent::Delete => ctx.install_table(scope_table_for(target, "old")),
                TriggerEvent::Update { .. } => {
                    ctx.install_table(scope_table_for(target, "old"));
                    ctx.install_table(scope_table_for(target, "new"));
                }
            }
            require_boolean(&mut ctx, when);
            diagnostics.extend(ctx.diagnostics);
        }
    } else {
        report(&mut diagnostics, file, AnalyzerError::TableNotFound { name: create.table.canonical() }, create.table.span());
    }
    for stmt in &create.body {
        for name in trigger_body_table_refs(stmt) {
            if schema.table(name).is_none() {
                report(&mut diagnostics, file, AnalyzerError::TableNotFound { name: name.canonical() }, name.span());
            }
        }
    }
    let trigger = Trigger {
        name: create.name.clone(),
        if_not_exists: create.if_not_exists,
        timing: create.timing,
        event: create.event.clone(),
        table: create.table.clone(),
        when: create.when.clone(),
        body_span: create.body_span,
        span: create.span,
    };
    let mut schema_errors = Vec::new();
    schema.create_trigger(trigger, &mut schema_errors);
    diagnostics.extend(schema_errors.iter().map(|e| to_diagnostic(file, e)));
    diagnostics
}

/// Collects the table names a trigger body statement directly references:
/// an INSERT/UPDATE/DELETE's target table, or a SELECT's top-level `FROM`
/// items (including joins, but not the contents of derived tables or
/// table-valued function calls). This is lightweight table-existence
/// validation, not full type-checking of the body.
fn trigger_body_table_refs(stmt: &Statement) -> Vec<&ObjectName> {
    match stmt {
        Statement::Insert(insert) => vec![&insert.table],
        Statement::Update(update) => vec![&update.table],
        Statement::Delete(delete) => vec![&delete.table],
        Statement::Select(select) => select_table_refs(select),
        _ => Vec::new(),
    }
}

fn select_table_refs(select: &Select) -> Vec<&ObjectName> {
    let mut refs = Vec::new();
    push_core_table_refs(&select.body, &mut refs);
    for set_op in &select.set_ops {
        push_core_table_refs(&set_op.core, &mut refs);
    }
    refs
}

fn push_core_table_refs<'a>(core: &'a SelectCore, refs: &mut Vec<&'a ObjectName>) {
    if let SelectCore::Select { from, .. } = core {
        for item in from {
            push_from_item_table_refs(item, refs);
        }
    }
}

fn push_from_item_table_refs<'a>(item: &'a FromItem, refs: &mut Vec<&'a ObjectName>) {
    push_table_factor_refs(&item.relation, refs);
    for join in &item.joins {
        push_table_factor_refs(&join.relation, refs);
    }
}

fn push_table_factor_refs<'a>(factor: &'a TableFactor, refs: &mut Vec<&'a ObjectName>) {
    match factor {
        TableFactor::Table { name, .. } => refs.push(name),
        TableFactor::NestedJoin { item } => push_from_item_table_refs(item, refs),
        TableFactor::Derived { .. } | TableFactor::TableFunction { .. } => {}
    }
}

/// Folds an `ALTER TABLE`, delegating structural bookkeeping to `Schema`'s
/// mutators; `ADD COLUMN` additionally runs the STRICT-set check against
/// the target table's own strictness.
pub fn fold_alter_table(schema: &mut Schema, file: &Path, alter: &AlterTable) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut schema_errors = Vec::new();
    match &alter.action {
        AlterTableAction::RenameTable { new_name } => {
            schema.rename_table(&alter.name, new_name.clone(), alter.span, &mut schema_errors);
        }
        AlterTableAction::RenameColumn { old_name, new_name } => {
            schema.rename_column(&alter.name, old_name, new_name.clone(), alter.span, &mut schema_errors);
        }
        AlterTableAction::AddColumn { column } => {
            let new_column = column_from_def(column);
            if let Some(target) = schema.table(&alter.name) {
                let strict_required = target.strict || schema.pragmas.require_strict_tables;
                check_type_name(&mut diagnostics, file, &new_column, strict_required);
            }
            schema.add_column(&alter.name, new_column, alter.span, &mut schema_errors);
        }
        AlterTableAction::DropColumn { name } => {
            schema.drop_column(&alter.name, name, alter.span, &mut schema_errors);
        }
    }
    diagnostics.extend(schema_errors.iter().map(|e| to_diagnostic(file, e)));
    diagnostics
}

/// Folds a `DROP TABLE|INDEX|VIEW|TRIGGER`; `IF EXISTS` suppresses the
/// missing-name diagnostic that would otherwise result.
pub fn fold_drop(schema: &mut Schema, file: &Path, drop: &DropObject) -> Vec<Diagnostic> {
    let mut schema_errors = Vec::new();
    match drop.kind {
        DropObjectKind::Table | DropObjectKind::View => schema.drop_table(&drop.name, drop.span, &mut schema_errors),
        DropObjectKind::Index => schema.drop_index(&drop.name, drop.span, &mut schema_errors),
        DropObjectKind::Trigger => schema.drop_trigger(&drop.name, drop.span, &mut schema_errors),
    }
    if drop.if_exists {
        schema_errors.retain(|e| {
            !matches!(
                e,
                SchemaError::TableNotFound { .. } | SchemaError::IndexNotFound { .. } | SchemaError::TriggerNotFound { .. }
            )
        });
    }
    schema_errors.iter().map(|e| to_diagnostic(file, e)).collect()
}

/// Folds a `REINDEX [name]`.
pub fn fold_reindex(schema: &mut Schema, file: &Path, reindex: &ReIndex) -> Vec<Diagnostic> {
    let mut schema_errors = Vec::new();
    schema.reindex(reindex.name.as_ref(), reindex.span, &mut schema_errors);
    schema_errors.iter().map(|e| to_diagnostic(file, e)).collect()
}
