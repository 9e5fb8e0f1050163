use sqlc_ast::{BinaryOp, BindParam, BindParamKind, Expr, FunctionArgs, UnaryOp, WhenClause};
use sqlc_lexer::{Keyword, TokenKind};

use crate::{error::ParseError, parser::Parser};

// Precedence ladder, lowest to highest binding power. `OR` binds loosest;
// postfix `COLLATE`/`ISNULL`/`NOTNULL`/`IS NULL` bind tightest.
const OR_PREC: u16 = 10;
const AND_PREC: u16 = 20;
const NOT_PREC: u16 = 30;
const EQ_PREC: u16 = 40;
const CMP_PREC: u16 = 50;
const BIT_OR_PREC: u16 = 60;
const BIT_AND_PREC: u16 = 70;
const SHIFT_PREC: u16 = 80;
const ADD_PREC: u16 = 90;
const MUL_PREC: u16 = 100;
const CONCAT_PREC: u16 = 110;
const UNARY_PREC: u16 = 120;
const POSTFIX_PREC: u16 = 130;

impl Parser {
    /// Parses a full expression.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_subexpr(0)
    }

    /// Parses tokens until an operator of precedence `<= precedence` is seen.
    pub fn parse_subexpr(&mut self, precedence: u16) -> Result<Expr, ParseError> {
        let mut expr = self.parse_prefix()?;
        loop {
            let next_precedence = self.next_precedence()?;
            if precedence >= next_precedence {
                break;
            }
            expr = self.parse_infix(expr, next_precedence)?;
        }
        Ok(expr)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let token = match self.peek_token() {
            Some(token) => token.clone(),
            None => return self.expected("an expression"),
        };
        match token.kind {
            TokenKind::Number(_) | TokenKind::String(_) | TokenKind::Blob(_) => {
                Ok(Expr::Literal(self.parse_literal()?))
            }
            TokenKind::Keyword(Keyword::NULL)
            | TokenKind::Keyword(Keyword::TRUE)
            | TokenKind::Keyword(Keyword::FALSE)
            | TokenKind::Keyword(Keyword::CURRENT_TIME)
            | TokenKind::Keyword(Keyword::CURRENT_DATE)
            | TokenKind::Keyword(Keyword::CURRENT_TIMESTAMP) => {
                Ok(Expr::Literal(self.parse_literal()?))
            }
            TokenKind::BindAnonymous | TokenKind::BindIndexed(_) | TokenKind::BindNamed(_, _) => {
                self.parse_bind_param()
            }
            TokenKind::Keyword(Keyword::NOT) => {
                self.next_token();
                if self.parse_keyword(Keyword::EXISTS) {
                    self.parse_exists(token.span, true)
                } else {
                    let expr = self.parse_subexpr(NOT_PREC)?;
                    let span = token.span.to(expr.span());
                    Ok(Expr::UnaryOp {
                        op: UnaryOp::Not,
                        expr: Box::new(expr),
                        span,
                    })
                }
            }
            TokenKind::Keyword(Keyword::EXISTS) => {
                self.next_token();
                self.parse_exists(token.span, false)
            }
            TokenKind::Keyword(Keyword::CASE) => self.parse_case(),
            TokenKind::Keyword(Keyword::CAST) => self.parse_cast(),
            TokenKind::Minus => {
                self.next_token();
                let expr = self.parse_subexpr(UNARY_PREC)?;
                let span = token.span.to(expr.span());
                Ok(Expr::UnaryOp {
                    op: UnaryOp::Minus,
                    expr: Box::new(expr),
                    span,
                })
            }
            TokenKind::Plus => {
                self.next_token();
                let expr = self.parse_subexpr(UNARY_PREC)?;
                let span = token.span.to(expr.span());
                Ok(Expr::UnaryOp {
                    op: UnaryOp::Plus,
                    expr: Box::new(expr),
                    span,
                })
            }
            TokenKind::Tilde => {
                self.next_token();
                let expr = self.parse_subexpr(UNARY_PREC)?;
                let span = token.span.to(expr.span());
                Ok(Expr::UnaryOp {
                    op: UnaryOp::BitNot,
                    expr: Box::new(expr),
                    span,
                })
            }
            TokenKind::Asterisk => {
                self.next_token();
                Ok(Expr::Wildcard { span: token.span })
            }
            TokenKind::LeftParen => {
                self.next_token();
                let expr = if self.next_is_query() {
                    let select = self.parse_select()?;
                    let close = self.current_span();
                    Expr::Subquery {
                        subquery: Box::new(select),
                        span: token.span.to(close),
                    }
                } else {
                    let inner = self.parse_expr()?;
                    let close = self.current_span();
                    Expr::Nested {
                        expr: Box::new(inner),
                        span: token.span.to(close),
                    }
                };
                self.expect_token(&TokenKind::RightParen)?;
                Ok(expr)
            }
            TokenKind::Ident(_) | TokenKind::Keyword(_) => self.parse_column_or_function(),
            _ => self.expected("an expression"),
        }
    }

    fn parse_bind_param(&mut self) -> Result<Expr, ParseError> {
        let token = self.next_token().expect("checked by caller");
        let (kind, name) = match token.kind {
            TokenKind::BindAnonymous => (BindParamKind::Anonymous, None),
            TokenKind::BindIndexed(n) => (BindParamKind::Indexed(n), None),
            TokenKind::BindNamed(_, name) => (BindParamKind::Named, Some(name)),
            _ => unreachable!("checked by caller"),
        };
        Ok(Expr::BindParam(BindParam {
            kind,
            name,
            span: token.span,
        }))
    }

    /// Parses a dotted column reference, qualified wildcard, or function call
    /// starting at an identifier (or unreserved keyword used as one).
    fn parse_column_or_function(&mut self) -> Result<Expr, ParseError> {
        let mut parts = vec![self.parse_identifier()?];
        loop {
            if !self.next_token_if_is(&TokenKind::Period) {
                break;
            }
            if self.next_token_if_is(&TokenKind::Asterisk) {
                let star_span = parts
                    .last()
                    .map(|p| p.span)
                    .unwrap_or_else(|| self.current_span());
                let span = parts[0].span.to(star_span);
                return Ok(Expr::QualifiedWildcard {
                    table: sqlc_ast::ObjectName { parts },
                    span,
                });
            }
            parts.push(self.parse_identifier()?);
        }
        if self.peek_token().map(|t| t.kind == TokenKind::LeftParen) == Some(true) {
            return self.parse_function_call(sqlc_ast::ObjectName { parts });
        }
        Ok(Expr::ColumnRef { parts })
    }

    fn parse_function_call(&mut self, name: sqlc_ast::ObjectName) -> Result<Expr, ParseError> {
        let start = name.parts[0].span;
        self.expect_token(&TokenKind::LeftParen)?;
        let args = if self.next_token_if_is(&TokenKind::Asterisk) {
            FunctionArgs::Wildcard
        } else if self.peek_token().map(|t| t.kind == TokenKind::RightParen) == Some(true) {
            FunctionArgs::List {
                distinct: false,
                args: Vec::new(),
            }
        } else {
            let distinct = self.parse_keyword(Keyword::DISTINCT);
            let args = self.parse_comma_separated(Parser::parse_expr)?;
            FunctionArgs::List { distinct, args }
        };
        let mut end_span = self.current_span();
        self.expect_token(&TokenKind::RightParen)?;

        let filter = if self.parse_keyword(Keyword::FILTER) {
            self.expect_token(&TokenKind::LeftParen)?;
            self.expect_keyword(Keyword::WHERE)?;
            let expr = self.parse_expr()?;
            end_span = self.current_span();
            self.expect_token(&TokenKind::RightParen)?;
            Some(Box::new(expr))
        } else {
            None
        };

        let over = if self.parse_keyword(Keyword::OVER) {
            if self.next_token_if_is(&TokenKind::LeftParen) {
                end_span = self.skip_balanced_parens()?;
            } else {
                let window_name = self.parse_identifier()?;
                end_span = window_name.span;
            }
            true
        } else {
            false
        };

        Ok(Expr::Function {
            name,
            args,
            filter,
            over,
            span: start.to(end_span),
        })
    }

    fn parse_exists(&mut self, start: sqlc_diagnostics::Span, negated: bool) -> Result<Expr, ParseError> {
        self.expect_token(&TokenKind::LeftParen)?;
        let select = self.parse_select()?;
        let close = self.current_span();
        self.expect_token(&TokenKind::RightParen)?;
        Ok(Expr::Exists {
            subquery: Box::new(select),
            negated,
            span: start.to(close),
        })
    }

    fn parse_case(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        self.next_token(); // CASE
        let operand = if self.peek_token().map(|t| t.kind.is_keyword(Keyword::WHEN)) == Some(true)
        {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        let mut when_then = Vec::new();
        while self.parse_keyword(Keyword::WHEN) {
            let condition = self.parse_expr()?;
            self.expect_keyword(Keyword::THEN)?;
            let result = self.parse_expr()?;
            when_then.push(WhenClause { condition, result });
        }
        if when_then.is_empty() {
            return self.expected("at least one WHEN clause");
        }
        let else_result = if self.parse_keyword(Keyword::ELSE) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let end_span = self.current_span();
        self.expect_keyword(Keyword::END)?;
        Ok(Expr::Case {
            operand,
            when_then,
            else_result,
            span: start.to(end_span),
        })
    }

    fn parse_cast(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();
        self.next_token(); // CAST
        self.expect_token(&TokenKind::LeftParen)?;
        let expr = self.parse_expr()?;
        self.expect_keyword(Keyword::AS)?;
        let data_type = self.parse_data_type()?;
        let close = self.current_span();
        self.expect_token(&TokenKind::RightParen)?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
            span: start.to(close),
        })
    }

    fn next_is_query(&mut self) -> bool {
        matches!(
            self.peek_token().map(|t| &t.kind),
            Some(TokenKind::Keyword(Keyword::SELECT))
                | Some(TokenKind::Keyword(Keyword::WITH))
                | Some(TokenKind::Keyword(Keyword::VALUES))
        )
    }

    fn next_precedence(&mut self) -> Result<u16, ParseError> {
        let precedence = match self.peek_next_token().map(|t| &t.kind) {
            Some(TokenKind::Keyword(Keyword::OR)) => OR_PREC,
            Some(TokenKind::Keyword(Keyword::AND)) => AND_PREC,
            Some(TokenKind::Keyword(Keyword::NOT)) => match self.peek_next_token().map(|t| &t.kind)
            {
                Some(TokenKind::Keyword(Keyword::IN))
                | Some(TokenKind::Keyword(Keyword::BETWEEN))
                | Some(TokenKind::Keyword(Keyword::LIKE))
                | Some(TokenKind::Keyword(Keyword::GLOB))
                | Some(TokenKind::Keyword(Keyword::REGEXP))
                | Some(TokenKind::Keyword(Keyword::MATCH)) => EQ_PREC,
                _ => 0,
            },
            Some(TokenKind::Keyword(Keyword::IS))
            | Some(TokenKind::Keyword(Keyword::IN))
            | Some(TokenKind::Keyword(Keyword::BETWEEN))
            | Some(TokenKind::Keyword(Keyword::LIKE))
            | Some(TokenKind::Keyword(Keyword::GLOB))
            | Some(TokenKind::Keyword(Keyword::REGEXP))
            | Some(TokenKind::Keyword(Keyword::MATCH)) => EQ_PREC,
            Some(TokenKind::Keyword(Keyword::ISNULL))
            | Some(TokenKind::Keyword(Keyword::NOTNULL))
            | Some(TokenKind::Keyword(Keyword::COLLATE)) => POSTFIX_PREC,
            Some(TokenKind::Equal)
            | Some(TokenKind::NotEqual)
            | Some(TokenKind::LessThan)
            | Some(TokenKind::LessThanOrEqual)
            | Some(TokenKind::GreaterThan)
            | Some(TokenKind::GreaterThanOrEqual) => CMP_PREC,
            Some(TokenKind::Pipe) => BIT_OR_PREC,
            Some(TokenKind::Ampersand) => BIT_AND_PREC,
            Some(TokenKind::LeftShift) | Some(TokenKind::RightShift) => SHIFT_PREC,
            Some(TokenKind::Plus) | Some(TokenKind::Minus) => ADD_PREC,
            Some(TokenKind::Asterisk) | Some(TokenKind::Slash) | Some(TokenKind::Percent) => {
                MUL_PREC
            }
            Some(TokenKind::Concat) | Some(TokenKind::Arrow) | Some(TokenKind::DoubleArrow) => {
                CONCAT_PREC
            }
            _ => 0,
        };
        self.reset_peek_cursor();
        Ok(precedence)
    }

    fn parse_infix(&mut self, expr: Expr, precedence: u16) -> Result<Expr, ParseError> {
        let token = self.next_token().expect("next_precedence said an operator follows");
        match token.kind {
            TokenKind::Keyword(Keyword::AND) => self.mk_binary(expr, BinaryOp::And, precedence),
            TokenKind::Keyword(Keyword::OR) => self.mk_binary(expr, BinaryOp::Or, precedence),
            TokenKind::Plus => self.mk_binary(expr, BinaryOp::Plus, precedence),
            TokenKind::Minus => self.mk_binary(expr, BinaryOp::Minus, precedence),
            TokenKind::Asterisk => self.mk_binary(expr, BinaryOp::Multiply, precedence),
            TokenKind::Slash => self.mk_binary(expr, BinaryOp::Divide, precedence),
            TokenKind::Percent => self.mk_binary(expr, BinaryOp::Modulo, precedence),
            TokenKind::Concat => self.mk_binary(expr, BinaryOp::Concat, precedence),
            TokenKind::Arrow => self.mk_binary(expr, BinaryOp::Arrow, precedence),
            TokenKind::DoubleArrow => self.mk_binary(expr, BinaryOp::DoubleArrow, precedence),
            TokenKind::Equal => self.mk_binary(expr, BinaryOp::Eq, precedence),
            TokenKind::NotEqual => self.mk_binary(expr, BinaryOp::NotEq, precedence),
            TokenKind::LessThan => self.mk_binary(expr, BinaryOp::Lt, precedence),
            TokenKind::LessThanOrEqual => self.mk_binary(expr, BinaryOp::LtEq, precedence),
            TokenKind::GreaterThan => self.mk_binary(expr, BinaryOp::Gt, precedence),
            TokenKind::GreaterThanOrEqual => self.mk_binary(expr, BinaryOp::GtEq, precedence),
            TokenKind::Ampersand => self.mk_binary(expr, BinaryOp::BitAnd, precedence),
            TokenKind::Pipe => self.mk_binary(expr, BinaryOp::BitOr, precedence),
            TokenKind::LeftShift => self.mk_binary(expr, BinaryOp::ShiftLeft, precedence),
            TokenKind::RightShift => self.mk_binary(expr, BinaryOp::ShiftRight, precedence),
            TokenKind::Keyword(Keyword::GLOB) => self.mk_binary(expr, BinaryOp::Glob, precedence),
            TokenKind::Keyword(Keyword::REGEXP) => {
                self.mk_binary(expr, BinaryOp::Regexp, precedence)
            }
            TokenKind::Keyword(Keyword::MATCH) => self.mk_binary(expr, BinaryOp::Match, precedence),
            TokenKind::Keyword(Keyword::LIKE) => self.parse_like(expr, false),
            TokenKind::Keyword(Keyword::IN) => self.parse_in(expr, false),
            TokenKind::Keyword(Keyword::BETWEEN) => self.parse_between(expr, false),
            TokenKind::Keyword(Keyword::ISNULL) => Ok(Expr::PostfixNullTest {
                span: expr.span().to(token.span),
                expr: Box::new(expr),
                negated: false,
            }),
            TokenKind::Keyword(Keyword::NOTNULL) => Ok(Expr::PostfixNullTest {
                span: expr.span().to(token.span),
                expr: Box::new(expr),
                negated: true,
            }),
            TokenKind::Keyword(Keyword::COLLATE) => {
                let collation = self.parse_identifier()?;
                let span = expr.span().to(collation.span);
                Ok(Expr::Collate {
                    expr: Box::new(expr),
                    collation,
                    span,
                })
            }
            TokenKind::Keyword(Keyword::IS) => {
                let negated = self.parse_keyword(Keyword::NOT);
                if self.parse_keyword(Keyword::NULL) {
                    let span = expr.span().to(self.current_span());
                    Ok(Expr::IsNull {
                        expr: Box::new(expr),
                        negated,
                        span,
                    })
                } else if self.parse_keywords(&[Keyword::DISTINCT, Keyword::FROM]) {
                    let right = self.parse_subexpr(precedence)?;
                    let span = expr.span().to(right.span());
                    Ok(Expr::IsDistinctFrom {
                        left: Box::new(expr),
                        negated,
                        right: Box::new(right),
                        span,
                    })
                } else {
                    self.expected("NULL or DISTINCT FROM after IS")
                }
            }
            TokenKind::Keyword(Keyword::NOT) => {
                match self.parse_one_of_keywords(&[
                    Keyword::IN,
                    Keyword::BETWEEN,
                    Keyword::LIKE,
                    Keyword::GLOB,
                    Keyword::REGEXP,
                    Keyword::MATCH,
                ]) {
                    Some(Keyword::IN) => self.parse_in(expr, true),
                    Some(Keyword::BETWEEN) => self.parse_between(expr, true),
                    Some(Keyword::LIKE) => self.parse_like(expr, true),
                    Some(Keyword::GLOB) => self.mk_negated_binary(expr, BinaryOp::Glob, precedence),
                    Some(Keyword::REGEXP) => {
                        self.mk_negated_binary(expr, BinaryOp::Regexp, precedence)
                    }
                    Some(Keyword::MATCH) => {
                        self.mk_negated_binary(expr, BinaryOp::Match, precedence)
                    }
                    _ => self.expected("IN, BETWEEN, LIKE, GLOB, REGEXP or MATCH after NOT"),
                }
            }
            other => Err(ParseError::Expected {
                expected: "an operator".into(),
                found: Some(other.to_string()),
                span: token.span,
            }),
        }
    }

    fn mk_binary(&mut self, left: Expr, op: BinaryOp, precedence: u16) -> Result<Expr, ParseError> {
        let right = self.parse_subexpr(precedence)?;
        let span = left.span().to(right.span());
        Ok(Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span,
        })
    }

    fn mk_negated_binary(
        &mut self,
        left: Expr,
        op: BinaryOp,
        precedence: u16,
    ) -> Result<Expr, ParseError> {
        let binop = self.mk_binary(left, op, precedence)?;
        let span = binop.span();
        Ok(Expr::UnaryOp {
            op: UnaryOp::Not,
            expr: Box::new(binop),
            span,
        })
    }

    fn parse_in(&mut self, expr: Expr, negated: bool) -> Result<Expr, ParseError> {
        self.expect_token(&TokenKind::LeftParen)?;
        if self.next_is_query() {
            let select = self.parse_select()?;
            let close = self.current_span();
            self.expect_token(&TokenKind::RightParen)?;
            let span = expr.span().to(close);
            Ok(Expr::InSubquery {
                expr: Box::new(expr),
                negated,
                subquery: Box::new(select),
                span,
            })
        } else {
            let list = self.parse_comma_separated(Parser::parse_expr)?;
            let close = self.current_span();
            self.expect_token(&TokenKind::RightParen)?;
            let span = expr.span().to(close);
            Ok(Expr::InList {
                expr: Box::new(expr),
                negated,
                list,
                span,
            })
        }
    }

    fn parse_between(&mut self, expr: Expr, negated: bool) -> Result<Expr, ParseError> {
        let low = self.parse_subexpr(EQ_PREC)?;
        self.expect_keyword(Keyword::AND)?;
        let high = self.parse_subexpr(EQ_PREC)?;
        let span = expr.span().to(high.span());
        Ok(Expr::Between {
            expr: Box::new(expr),
            negated,
            low: Box::new(low),
            high: Box::new(high),
            span,
        })
    }

    fn parse_like(&mut self, expr: Expr, negated: bool) -> Result<Expr, ParseError> {
        let pattern = self.parse_subexpr(EQ_PREC)?;
        let escape = if self.parse_keyword(Keyword::ESCAPE) {
            Some(Box::new(self.parse_subexpr(EQ_PREC)?))
        } else {
            None
        };
        let end = escape.as_ref().map(|e| e.span()).unwrap_or(pattern.span());
        let span = expr.span().to(end);
        Ok(Expr::Like {
            expr: Box::new(expr),
            negated,
            pattern: Box::new(pattern),
            escape,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use sqlc_ast::{BindParamKind, LiteralValue};

    use super::*;
    use crate::parser::Parser;

    fn parse(sql: &str) -> Expr {
        Parser::new_with_source(sql)
            .and_then(|mut p| p.parse_expr())
            .unwrap_or_else(|e| panic!("failed to parse `{sql}`: {e}"))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse("1 + 2 * 3");
        match expr {
            Expr::BinaryOp { op: BinaryOp::Plus, right, .. } => {
                assert!(matches!(*right, Expr::BinaryOp { op: BinaryOp::Multiply, .. }));
            }
            other => panic!("expected a `+` at the top, got {other:?}"),
        }
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expr = parse("a OR b AND c");
        match expr {
            Expr::BinaryOp { op: BinaryOp::Or, right, .. } => {
                assert!(matches!(*right, Expr::BinaryOp { op: BinaryOp::And, .. }));
            }
            other => panic!("expected `OR` at the top, got {other:?}"),
        }
    }

    #[test]
    fn unary_minus_binds_tighter_than_multiply() {
        let expr = parse("-a * b");
        match expr {
            Expr::BinaryOp { op: BinaryOp::Multiply, left, .. } => {
                assert!(matches!(*left, Expr::UnaryOp { op: UnaryOp::Minus, .. }));
            }
            other => panic!("expected `*` at the top, got {other:?}"),
        }
    }

    #[test]
    fn postfix_isnull_binds_tighter_than_and() {
        let expr = parse("a ISNULL AND b");
        match expr {
            Expr::BinaryOp { op: BinaryOp::And, left, .. } => {
                assert!(matches!(*left, Expr::PostfixNullTest { negated: false, .. }));
            }
            other => panic!("expected `AND` at the top, got {other:?}"),
        }
    }

    #[test]
    fn not_in_desugars_to_negated_in_list() {
        let expr = parse("x NOT IN (1, 2, 3)");
        match expr {
            Expr::InList { negated: true, list, .. } => assert_eq!(list.len(), 3),
            other => panic!("expected a negated `InList`, got {other:?}"),
        }
    }

    #[test]
    fn not_glob_desugars_to_not_of_glob() {
        let expr = parse("x NOT GLOB 'a*'");
        match expr {
            Expr::UnaryOp { op: UnaryOp::Not, expr, .. } => {
                assert!(matches!(*expr, Expr::BinaryOp { op: BinaryOp::Glob, .. }));
            }
            other => panic!("expected `NOT (x GLOB ...)`, got {other:?}"),
        }
    }

    #[test]
    fn between_parses_low_and_high() {
        let expr = parse("x BETWEEN 1 AND 10");
        assert!(matches!(expr, Expr::Between { negated: false, .. }));
    }

    #[test]
    fn is_distinct_from_parses() {
        let expr = parse("a IS NOT DISTINCT FROM b");
        assert!(matches!(expr, Expr::IsDistinctFrom { negated: true, .. }));
    }

    #[test]
    fn qualified_wildcard_parses() {
        let expr = parse("t.*");
        match expr {
            Expr::QualifiedWildcard { table, .. } => assert_eq!(table.parts.len(), 1),
            other => panic!("expected a qualified wildcard, got {other:?}"),
        }
    }

    #[test]
    fn dotted_column_ref_parses() {
        let expr = parse("t.c");
        match expr {
            Expr::ColumnRef { parts } => {
                assert_eq!(parts.len(), 2);
                assert_eq!(parts[0].value, "t");
                assert_eq!(parts[1].value, "c");
            }
            other => panic!("expected a column reference, got {other:?}"),
        }
    }

    #[test]
    fn function_call_with_filter_and_distinct() {
        let expr = parse("count(DISTINCT x) FILTER (WHERE x > 0)");
        match expr {
            Expr::Function { name, args, filter, over, .. } => {
                assert_eq!(name.parts[0].value, "count");
                assert!(matches!(args, FunctionArgs::List { distinct: true, .. }));
                assert!(filter.is_some());
                assert!(!over);
            }
            other => panic!("expected a function call, got {other:?}"),
        }
    }

    #[test]
    fn window_function_over_clause_is_skipped_opaquely() {
        let expr = parse("row_number() OVER (PARTITION BY a ORDER BY b)");
        match expr {
            Expr::Function { over, .. } => assert!(over),
            other => panic!("expected a function call, got {other:?}"),
        }
    }

    #[test]
    fn bind_params_of_every_kind() {
        assert!(matches!(
            parse("?"),
            Expr::BindParam(BindParam { kind: BindParamKind::Anonymous, name: None, .. })
        ));
        assert!(matches!(
            parse("?3"),
            Expr::BindParam(BindParam { kind: BindParamKind::Indexed(3), .. })
        ));
        assert!(matches!(
            parse(":user_id"),
            Expr::BindParam(BindParam { kind: BindParamKind::Named, name: Some(n), .. }) if n == "user_id"
        ));
    }

    #[test]
    fn case_expression_requires_at_least_one_when() {
        let expr = parse("CASE x WHEN 1 THEN 'one' ELSE 'other' END");
        match expr {
            Expr::Case { operand, when_then, else_result, .. } => {
                assert!(operand.is_some());
                assert_eq!(when_then.len(), 1);
                assert!(else_result.is_some());
            }
            other => panic!("expected a CASE expression, got {other:?}"),
        }
    }

    #[test]
    fn cast_parses_target_type() {
        let expr = parse("CAST(x AS INTEGER)");
        match expr {
            Expr::Cast { data_type, .. } => assert_eq!(data_type.name.value, "INTEGER"),
            other => panic!("expected a CAST expression, got {other:?}"),
        }
    }

    #[test]
    fn literal_integer_vs_real() {
        match parse("1") {
            Expr::Literal(lit) => assert!(matches!(lit.value, LiteralValue::Integer(_))),
            other => panic!("expected a literal, got {other:?}"),
        }
        match parse("1.5") {
            Expr::Literal(lit) => assert!(matches!(lit.value, LiteralValue::Real(_))),
            other => panic!("expected a literal, got {other:?}"),
        }
    }

    #[test]
    fn nested_paren_expr_unwraps_to_inner_precedence() {
        let expr = parse("(1 + 2) * 3");
        match expr {
            Expr::BinaryOp { op: BinaryOp::Multiply, left, .. } => {
                assert!(matches!(*left, Expr::Nested { .. }));
            }
            other => panic!("expected `*` at the top, got {other:?}"),
        }
    }
}
