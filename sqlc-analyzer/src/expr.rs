use sqlc_ast::{BinaryOp, Expr, FunctionArgs, Ident, UnaryOp};
use sqlc_types::Type;

use crate::bridge::{data_type_to_type, literal_to_type};
use crate::ctx::Ctx;
use crate::diagnostics::AnalyzerError;
use crate::params::NameHint;

fn binary_op_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Plus => "+",
        BinaryOp::Minus => "-",
        BinaryOp::Multiply => "*",
        BinaryOp::Divide => "/",
        BinaryOp::Modulo => "%",
        BinaryOp::Concat => "||",
        BinaryOp::Arrow => "->",
        BinaryOp::DoubleArrow => "->>",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::Eq => "=",
        BinaryOp::NotEq => "<>",
        BinaryOp::And => "AND",
        BinaryOp::Or => "OR",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::ShiftLeft => "<<",
        BinaryOp::ShiftRight => ">>",
        BinaryOp::Like => "LIKE",
        BinaryOp::Glob => "GLOB",
        BinaryOp::Regexp => "REGEXP",
        BinaryOp::Match => "MATCH",
    }
}

fn unary_op_symbol(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Minus => "UNARY-",
        UnaryOp::Plus => "UNARY+",
        UnaryOp::BitNot => "~",
        UnaryOp::Not => "NOT",
    }
}

/// A bare column name, if `expr` is an unqualified or qualified column
/// reference, used to derive bind-parameter names from sibling operands.
fn column_name_hint(expr: &Expr) -> Option<String> {
    expr.as_column_ref().and_then(|parts| parts.last()).map(|ident: &Ident| ident.value.clone())
}

fn is_integer(ty: &Type) -> bool {
    matches!(ty.strip_optional(), Type::Nominal { name, adapter: None } if name.eq_ignore_ascii_case("INTEGER"))
}

/// Type-checks `expr`, with no naming hint for any bind parameter found at
/// its top level.
pub fn check_expr(ctx: &mut Ctx<'_>, expr: &Expr) -> Type {
    check_expr_with_hint(ctx, expr, NameHint::None)
}

/// Type-checks `expr`. `hint` only affects a `BindParam` appearing directly
/// as `expr` itself; it is not propagated into subexpressions (each
/// recursive call computes its own hint from its own siblings).
pub fn check_expr_with_hint(ctx: &mut Ctx<'_>, expr: &Expr, hint: NameHint) -> Type {
    match expr {
        Expr::Literal(lit) => literal_to_type(lit, &mut ctx.unifier),
        Expr::BindParam(param) => {
            let ty = ctx.params.record(param, hint, &mut ctx.unifier);
            if ty.is_optional() {
                ctx.params.mark_nullable(param);
            }
            ty
        }
        Expr::ColumnRef { parts } => check_column_ref(ctx, parts, expr.span()),
        Expr::Wildcard { .. } | Expr::QualifiedWildcard { .. } => Type::Error,
        Expr::Nested { expr, .. } => check_expr(ctx, expr),
        Expr::UnaryOp { op, expr: operand, span } => {
            let operand_ty = check_expr(ctx, operand);
            apply_operator(ctx, unary_op_symbol(*op), &[operand_ty], *span)
        }
        Expr::BinaryOp { left, op, right, span } => check_binary_op(ctx, left, *op, right, *span),
        Expr::Like { expr: subject, pattern, escape, .. } => {
            check_expr(ctx, subject);
            check_expr(ctx, pattern);
            if let Some(escape) = escape {
                check_expr(ctx, escape);
            }
            Type::bool_literal()
        }
        Expr::IsNull { expr: subject, .. } | Expr::PostfixNullTest { expr: subject, .. } => {
            check_expr(ctx, subject);
            Type::bool_literal()
        }
        Expr::IsDistinctFrom { left, right, span, .. } => {
            let left_ty = check_expr(ctx, left);
            let right_ty = check_expr(ctx, right);
            if ctx.unifier.unify(&left_ty, &right_ty).is_err() {
                ctx.report(
                    AnalyzerError::Unify { left: left_ty.to_string(), right: right_ty.to_string() },
                    *span,
                );
            }
            Type::bool_literal()
        }
        Expr::InList { expr: subject, list, span, .. } => check_in_list(ctx, subject, list, *span),
        Expr::InSubquery { expr: subject, subquery, .. } => {
            let subject_ty = check_expr(ctx, subject);
            let row = crate::select::check_select(ctx, subquery);
            if let Some(first) = row.first() {
                let _ = ctx.unifier.unify(&subject_ty, &first.ty);
            }
            Type::bool_literal()
        }
        Expr::Between { expr: subject, low, high, span, .. } => {
            let subject_hint = column_name_hint(subject);
            let subject_ty = check_expr(ctx, subject);
            let low_hint = subject_hint.clone().map(NameHint::BetweenLower).unwrap_or(NameHint::None);
            let high_hint = subject_hint.map(NameHint::BetweenUpper).unwrap_or(NameHint::None);
            let low_ty = check_expr_with_hint(ctx, low, low_hint);
            let high_ty = check_expr_with_hint(ctx, high, high_hint);
            if ctx.unifier.unify(&subject_ty, &low_ty).is_err()
                || ctx.unifier.unify(&subject_ty, &high_ty).is_err()
            {
                ctx.report(
                    AnalyzerError::Unify {
                        left: subject_ty.to_string(),
                        right: low_ty.to_string(),
                    },
                    *span,
                );
            }
            Type::bool_literal()
        }
        Expr::Case { operand, when_then, else_result, span } => {
            let operand_ty = operand.as_ref().map(|e| check_expr(ctx, e));
            let mut result_ty: Option<Type> = None;
            for clause in when_then {
                let condition_ty = check_expr(ctx, &clause.condition);
                match &operand_ty {
                    Some(op_ty) => {
                        let _ = ctx.unifier.unify(op_ty, &condition_ty);
                    }
                    None => {
                        if ctx.unifier.unify(&condition_ty, &Type::bool_literal()).is_err() {
                            ctx.report(AnalyzerError::NotBoolean, clause.condition.span());
                        }
                    }
                }
                let result = check_expr(ctx, &clause.result);
                result_ty = Some(match result_ty {
                    Some(acc) => ctx.unifier.unify(&acc, &result).unwrap_or(Type::Error),
                    None => result,
                });
            }
            if let Some(else_result) = else_result {
                let else_ty = check_expr(ctx, else_result);
                result_ty = Some(match result_ty {
                    Some(acc) => ctx.unifier.unify(&acc, &else_ty).unwrap_or(Type::Error),
                    None => else_ty,
                });
            }
            result_ty.unwrap_or_else(|| {
                let _ = span;
                ctx.unifier.new_var()
            })
        }
        Expr::Collate { expr: subject, .. } => check_expr(ctx, subject),
        Expr::Cast { data_type, .. } => data_type_to_type(data_type),
        Expr::Exists { subquery, .. } => {
            crate::select::check_select(ctx, subquery);
            Type::bool_literal()
        }
        Expr::Subquery { subquery, span } => {
            let row = crate::select::check_select(ctx, subquery);
            match row.first() {
                Some(col) if row.len() == 1 => col.ty.clone(),
                _ => {
                    let _ = span;
                    Type::any()
                }
            }
        }
        Expr::Function { name, args, filter, .. } => {
            if let Some(filter) = filter {
                let filter_ty = check_expr(ctx, filter);
                if ctx.unifier.unify(&filter_ty, &Type::bool_literal()).is_err() {
                    ctx.report(AnalyzerError::NotBoolean, filter.span());
                }
            }
            check_function_call(ctx, name, args, expr.span())
        }
    }
}

fn check_column_ref(ctx: &mut Ctx<'_>, parts: &[Ident], span: sqlc_diagnostics::Span) -> Type {
    if parts.len() == 1 {
        let name = parts[0].canonical();
        return match ctx.env.lookup(&name) {
            Some(scheme) if scheme.ambiguous => {
                ctx.report(AnalyzerError::Ambiguous { name: parts[0].value.clone() }, span);
                Type::Error
            }
            Some(scheme) => scheme.ty.clone(),
            None => {
                ctx.report(AnalyzerError::ColumnNotFound { name: parts[0].value.clone() }, span);
                Type::Error
            }
        };
    }
    let column = &parts[parts.len() - 1];
    let table_key = parts[parts.len() - 2].canonical();
    let table = ctx
        .current_scope()
        .find_table(&table_key)
        .cloned()
        .or_else(|| ctx.scopes.iter().rev().find_map(|s| s.find_table(&table_key).cloned()));
    match table {
        Some(table) => {
            let column_name = column.canonical();
            match table.columns.iter().find(|c| c.name == column_name) {
                Some(found) => found.ty.clone(),
                None => {
                    ctx.report(AnalyzerError::ColumnNotFound { name: column.value.clone() }, span);
                    Type::Error
                }
            }
        }
        None => {
            ctx.report(AnalyzerError::TableNotFound { name: parts[parts.len() - 2].value.clone() }, span);
            Type::Error
        }
    }
}

fn apply_operator(ctx: &mut Ctx<'_>, symbol: &str, operand_types: &[Type], span: sqlc_diagnostics::Span) -> Type {
    let Some(builder) = sqlc_types::lookup_operator(symbol) else {
        ctx.report(AnalyzerError::OperatorNotFound { symbol: symbol.to_string() }, span);
        return Type::Error;
    };
    let scheme = builder(&mut ctx.unifier);
    let Type::Fn { params, ret, .. } = scheme.ty else {
        return Type::Error;
    };
    if params.len() != operand_types.len() {
        ctx.report(AnalyzerError::OperatorNotFound { symbol: symbol.to_string() }, span);
        return Type::Error;
    }
    for (param, operand) in params.iter().zip(operand_types) {
        if ctx.unifier.unify(param, operand).is_err() {
            ctx.report(
                AnalyzerError::Unify { left: param.to_string(), right: operand.to_string() },
                span,
            );
            return Type::Error;
        }
    }
    ctx.unifier.resolve_deep(&ret)
}

fn check_binary_op(ctx: &mut Ctx<'_>, left: &Expr, op: BinaryOp, right: &Expr, span: sqlc_diagnostics::Span) -> Type {
    let column_hint = |other: &Expr| column_name_hint(other).map(NameHint::Column).unwrap_or(NameHint::None);
    let (left_ty, right_ty) = match (matches!(left, Expr::BindParam(_)), matches!(right, Expr::BindParam(_))) {
        (true, false) => {
            let right_ty = check_expr(ctx, right);
            let left_ty = check_expr_with_hint(ctx, left, column_hint(right));
            (left_ty, right_ty)
        }
        _ => {
            let left_ty = check_expr(ctx, left);
            let right_ty = check_expr_with_hint(ctx, right, column_hint(left));
            (left_ty, right_ty)
        }
    };
    if op == BinaryOp::Divide && is_integer(&left_ty) && is_integer(&right_ty) {
        ctx.report(AnalyzerError::IntegerDivision, span);
    }
    apply_operator(ctx, binary_op_symbol(op), &[left_ty, right_ty], span)
}

fn check_in_list(ctx: &mut Ctx<'_>, subject: &Expr, list: &[Expr], span: sqlc_diagnostics::Span) -> Type {
    let subject_hint = column_name_hint(subject);
    let subject_ty = check_expr(ctx, subject);
    if let [Expr::BindParam(param)] = list {
        let hint = subject_hint.map(NameHint::InList).unwrap_or(NameHint::None);
        let element_ty = ctx.params.record(param, hint, &mut ctx.unifier);
        ctx.params.mark_variadic(param);
        let _ = ctx.unifier.unify(&subject_ty, &element_ty);
        return Type::bool_literal();
    }
    for item in list {
        let item_ty = check_expr(ctx, item);
        if ctx.unifier.unify(&subject_ty, &item_ty).is_err() {
            ctx.report(
                AnalyzerError::Unify { left: subject_ty.to_string(), right: item_ty.to_string() },
                span,
            );
        }
    }
    Type::bool_literal()
}

fn check_function_call(
    ctx: &mut Ctx<'_>,
    name: &sqlc_ast::ObjectName,
    args: &FunctionArgs,
    span: sqlc_diagnostics::Span,
) -> Type {
    let fn_name = name.name().value.clone();
    let arg_types: Vec<Type> = match args {
        FunctionArgs::Wildcard => Vec::new(),
        FunctionArgs::List { args, .. } => args.iter().map(|a| check_expr(ctx, a)).collect(),
    };
    let arity = arg_types.len();
    match sqlc_types::lookup_function(&fn_name, arity) {
        Some(entry) => {
            if let Some(warning) = entry.warning {
                ctx.report(AnalyzerError::CatalogAdvisory(warning), span);
            }
            let scheme = (entry.scheme)(&mut ctx.unifier);
            let Some(expected_params) = scheme.params_for_arity(arity) else {
                ctx.report(AnalyzerError::FunctionNotFound { name: fn_name, arity }, span);
                return Type::Error;
            };
            for (param, arg) in expected_params.iter().zip(arg_types.iter()) {
                if ctx.unifier.unify(param, arg).is_err() {
                    ctx.report(
                        AnalyzerError::Unify { left: param.to_string(), right: arg.to_string() },
                        span,
                    );
                    return Type::Error;
                }
            }
            let Type::Fn { ret, .. } = scheme.ty else {
                return Type::Error;
            };
            ctx.unifier.resolve_deep(&ret)
        }
        None => {
            ctx.report(AnalyzerError::FunctionNotFound { name: fn_name, arity }, span);
            Type::Error
        }
    }
}
