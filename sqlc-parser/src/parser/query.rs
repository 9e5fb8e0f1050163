use sqlc_ast::{
    CommonTableExpr, FromItem, GroupByClause, Join, JoinConstraint, JoinKind, NullsOrder,
    OrderByExpr, OrderDirection, Select, SelectCore, SelectItem, SetOperation, SetOperator,
    TableFactor, With,
};
use sqlc_diagnostics::Span;
use sqlc_lexer::{Keyword, TokenKind};

use crate::{error::ParseError, parser::Parser};

impl Parser {
    /// Parses a full `SELECT` statement: optional `WITH`, the compound body,
    /// and the trailing `ORDER BY`/`LIMIT`/`OFFSET`.
    pub fn parse_select(&mut self) -> Result<Select, ParseError> {
        let start = self.current_span();
        let with = self.parse_with_clause()?;
        self.parse_select_with(with, start)
    }

    /// Parses the body of a `SELECT` statement whose leading `WITH` clause
    /// (if any) has already been consumed by the caller.
    pub fn parse_select_with(&mut self, with: Option<With>, start: Span) -> Result<Select, ParseError> {
        let body = self.parse_select_core()?;

        let mut set_ops = Vec::new();
        loop {
            let op = match self.parse_one_of_keywords(&[
                Keyword::UNION,
                Keyword::INTERSECT,
                Keyword::EXCEPT,
            ]) {
                Some(Keyword::UNION) => {
                    if self.parse_keyword(Keyword::ALL) {
                        SetOperator::UnionAll
                    } else {
                        SetOperator::Union
                    }
                }
                Some(Keyword::INTERSECT) => SetOperator::Intersect,
                Some(Keyword::EXCEPT) => SetOperator::Except,
                _ => break,
            };
            let core = self.parse_select_core()?;
            set_ops.push(SetOperation { op, core });
        }

        let order_by = self.parse_order_by_clause()?;
        let limit = if self.parse_keyword(Keyword::LIMIT) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let offset = if self.parse_keyword(Keyword::OFFSET) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let end = self.current_span();

        Ok(Select {
            with,
            body,
            set_ops,
            order_by,
            limit,
            offset,
            span: start.to(end),
        })
    }

    fn parse_select_core(&mut self) -> Result<SelectCore, ParseError> {
        let values_start = self.current_span();
        if self.parse_keyword(Keyword::VALUES) {
            let rows = self.parse_comma_separated(Parser::parse_values_row)?;
            let end = rows
                .last()
                .and_then(|row| row.last())
                .map(|e| e.span())
                .unwrap_or(values_start);
            return Ok(SelectCore::Values {
                rows,
                span: values_start.to(end),
            });
        }

        let start = self.current_span();
        self.expect_keyword(Keyword::SELECT)?;
        let distinct = if self.parse_keyword(Keyword::DISTINCT) {
            true
        } else {
            self.parse_keyword(Keyword::ALL);
            false
        };
        let projection = self.parse_comma_separated(Parser::parse_select_item)?;

        let from = if self.parse_keyword(Keyword::FROM) {
            self.parse_comma_separated(Parser::parse_from_item)?
        } else {
            Vec::new()
        };

        let selection = if self.parse_keyword(Keyword::WHERE) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let group_by = if self.parse_keywords(&[Keyword::GROUP, Keyword::BY]) {
            Some(GroupByClause {
                exprs: self.parse_comma_separated(Parser::parse_expr)?,
            })
        } else {
            None
        };

        let having = if group_by.is_some() && self.parse_keyword(Keyword::HAVING) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let end = self.current_span();
        Ok(SelectCore::Select {
            distinct,
            projection,
            from,
            selection,
            group_by,
            having,
            span: start.to(end),
        })
    }

    fn parse_values_row(&mut self) -> Result<Vec<sqlc_ast::Expr>, ParseError> {
        self.expect_token(&TokenKind::LeftParen)?;
        let row = self.parse_comma_separated(Parser::parse_expr)?;
        self.expect_token(&TokenKind::RightParen)?;
        Ok(row)
    }

    fn parse_select_item(&mut self) -> Result<SelectItem, ParseError> {
        match self.parse_expr()? {
            sqlc_ast::Expr::Wildcard { .. } => Ok(SelectItem::Wildcard),
            sqlc_ast::Expr::QualifiedWildcard { table, .. } => {
                Ok(SelectItem::QualifiedWildcard { table })
            }
            expr => {
                let alias = if self.parse_keyword(Keyword::AS) {
                    Some(self.parse_identifier()?)
                } else if matches!(self.peek_token().map(|t| &t.kind), Some(TokenKind::Ident(_))) {
                    Some(self.parse_identifier()?)
                } else {
                    None
                };
                Ok(SelectItem::Expr { expr, alias })
            }
        }
    }

    /// Parses an optional leading `WITH [RECURSIVE]` clause.
    pub fn parse_with_clause(&mut self) -> Result<Option<With>, ParseError> {
        if !self.parse_keyword(Keyword::WITH) {
            return Ok(None);
        }
        let recursive = self.parse_keyword(Keyword::RECURSIVE);
        let mut ctes = self.parse_comma_separated(Parser::parse_cte)?;
        // `RECURSIVE` is a clause-level modifier in this dialect; it applies
        // uniformly to every binding in the `WITH` list.
        for cte in &mut ctes {
            cte.recursive = recursive;
        }
        Ok(Some(With { recursive, ctes }))
    }

    fn parse_cte(&mut self) -> Result<CommonTableExpr, ParseError> {
        let name = self.parse_identifier()?;
        let columns = if self.next_token_if_is(&TokenKind::LeftParen) {
            let cols = self.parse_comma_separated(Parser::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            cols
        } else {
            Vec::new()
        };
        self.expect_keyword(Keyword::AS)?;
        self.expect_token(&TokenKind::LeftParen)?;
        let query = self.parse_select()?;
        self.expect_token(&TokenKind::RightParen)?;
        Ok(CommonTableExpr {
            name,
            columns,
            recursive: false,
            query: Box::new(query),
        })
    }

    fn parse_from_item(&mut self) -> Result<FromItem, ParseError> {
        let relation = self.parse_table_factor()?;
        let mut joins = Vec::new();
        while let Some(join) = self.parse_join()? {
            joins.push(join);
        }
        Ok(FromItem { relation, joins })
    }

    fn parse_table_factor(&mut self) -> Result<TableFactor, ParseError> {
        if self.next_token_if_is(&TokenKind::LeftParen) {
            if self.peek_token().map(|t| t.kind.is_keyword(Keyword::SELECT))
                == Some(true)
                || self.peek_token().map(|t| t.kind.is_keyword(Keyword::WITH)) == Some(true)
                || self.peek_token().map(|t| t.kind.is_keyword(Keyword::VALUES)) == Some(true)
            {
                let subquery = self.parse_select()?;
                self.expect_token(&TokenKind::RightParen)?;
                let alias = self.parse_optional_table_alias()?;
                return Ok(TableFactor::Derived {
                    subquery: Box::new(subquery),
                    alias,
                });
            }
            let item = self.parse_from_item()?;
            self.expect_token(&TokenKind::RightParen)?;
            return Ok(TableFactor::NestedJoin {
                item: Box::new(item),
            });
        }

        let name = self.parse_object_name()?;
        if self.next_token_if_is(&TokenKind::LeftParen) {
            let args = if self.peek_token().map(|t| t.kind == TokenKind::RightParen) == Some(true)
            {
                Vec::new()
            } else {
                self.parse_comma_separated(Parser::parse_expr)?
            };
            self.expect_token(&TokenKind::RightParen)?;
            let alias = self.parse_optional_table_alias()?;
            return Ok(TableFactor::TableFunction { name, args, alias });
        }
        let alias = self.parse_optional_table_alias()?;
        Ok(TableFactor::Table { name, alias })
    }

    fn parse_optional_table_alias(&mut self) -> Result<Option<sqlc_ast::Ident>, ParseError> {
        if self.parse_keyword(Keyword::AS) {
            Ok(Some(self.parse_identifier()?))
        } else if matches!(self.peek_token().map(|t| &t.kind), Some(TokenKind::Ident(_))) {
            Ok(Some(self.parse_identifier()?))
        } else {
            Ok(None)
        }
    }

    fn parse_join(&mut self) -> Result<Option<Join>, ParseError> {
        if self.next_token_if_is(&TokenKind::Comma) {
            let relation = self.parse_table_factor()?;
            return Ok(Some(Join {
                kind: JoinKind::Inner,
                relation,
                constraint: JoinConstraint::None,
            }));
        }

        let natural = self.parse_keyword(Keyword::NATURAL);
        if self.parse_keyword(Keyword::CROSS) {
            self.expect_keyword(Keyword::JOIN)?;
            let relation = self.parse_table_factor()?;
            return Ok(Some(Join {
                kind: JoinKind::Cross,
                relation,
                constraint: JoinConstraint::None,
            }));
        }

        let kind = match self.parse_one_of_keywords(&[
            Keyword::JOIN,
            Keyword::INNER,
            Keyword::LEFT,
            Keyword::RIGHT,
            Keyword::FULL,
        ]) {
            Some(Keyword::JOIN) | Some(Keyword::INNER) => {
                self.parse_keyword(Keyword::JOIN);
                JoinKind::Inner
            }
            Some(Keyword::LEFT) => {
                self.parse_keyword(Keyword::OUTER);
                self.expect_keyword(Keyword::JOIN)?;
                JoinKind::Left
            }
            Some(Keyword::RIGHT) => {
                self.parse_keyword(Keyword::OUTER);
                self.expect_keyword(Keyword::JOIN)?;
                JoinKind::Right
            }
            Some(Keyword::FULL) => {
                self.parse_keyword(Keyword::OUTER);
                self.expect_keyword(Keyword::JOIN)?;
                JoinKind::Full
            }
            _ if natural => return self.expected("a join type after NATURAL"),
            _ => return Ok(None),
        };

        let relation = self.parse_table_factor()?;
        let constraint = if natural {
            JoinConstraint::None
        } else if self.parse_keyword(Keyword::ON) {
            JoinConstraint::On(self.parse_expr()?)
        } else if self.parse_keyword(Keyword::USING) {
            self.expect_token(&TokenKind::LeftParen)?;
            let cols = self.parse_comma_separated(Parser::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            JoinConstraint::Using(cols)
        } else {
            JoinConstraint::None
        };

        Ok(Some(Join {
            kind,
            relation,
            constraint,
        }))
    }

    fn parse_order_by_clause(&mut self) -> Result<Vec<OrderByExpr>, ParseError> {
        if !self.parse_keywords(&[Keyword::ORDER, Keyword::BY]) {
            return Ok(Vec::new());
        }
        self.parse_comma_separated(Parser::parse_order_by_expr)
    }

    fn parse_order_by_expr(&mut self) -> Result<OrderByExpr, ParseError> {
        let expr = self.parse_expr()?;
        let direction = if self.parse_keyword(Keyword::DESC) {
            OrderDirection::Desc
        } else {
            self.parse_keyword(Keyword::ASC);
            OrderDirection::Asc
        };
        let nulls = if self.parse_keywords(&[Keyword::NULLS, Keyword::FIRST]) {
            Some(NullsOrder::First)
        } else if self.parse_keywords(&[Keyword::NULLS, Keyword::LAST]) {
            Some(NullsOrder::Last)
        } else {
            None
        };
        Ok(OrderByExpr {
            expr,
            direction,
            nulls,
        })
    }
}

#[cfg(test)]
mod tests {
    use sqlc_ast::SelectCore;

    use super::*;
    use crate::parser::Parser;

    fn parse(sql: &str) -> Select {
        Parser::new_with_source(sql)
            .and_then(|mut p| p.parse_select())
            .unwrap_or_else(|e| panic!("failed to parse `{sql}`: {e}"))
    }

    fn core(select: &Select) -> &SelectCore {
        &select.body
    }

    #[test]
    fn simple_select_star() {
        let select = parse("SELECT * FROM users");
        match core(&select) {
            SelectCore::Select { projection, from, .. } => {
                assert_eq!(projection.len(), 1);
                assert!(matches!(projection[0], SelectItem::Wildcard));
                assert_eq!(from.len(), 1);
            }
            other => panic!("expected a SELECT core, got {other:?}"),
        }
    }

    #[test]
    fn select_distinct_with_alias() {
        let select = parse("SELECT DISTINCT a AS x, b FROM t");
        match core(&select) {
            SelectCore::Select { distinct, projection, .. } => {
                assert!(distinct);
                assert_eq!(projection.len(), 2);
                match &projection[0] {
                    SelectItem::Expr { alias: Some(alias), .. } => assert_eq!(alias.value, "x"),
                    other => panic!("expected an aliased expr, got {other:?}"),
                }
            }
            other => panic!("expected a SELECT core, got {other:?}"),
        }
    }

    #[test]
    fn where_group_by_having() {
        let select = parse("SELECT a, count(*) FROM t WHERE a > 0 GROUP BY a HAVING count(*) > 1");
        match core(&select) {
            SelectCore::Select { selection, group_by, having, .. } => {
                assert!(selection.is_some());
                assert!(group_by.is_some());
                assert!(having.is_some());
            }
            other => panic!("expected a SELECT core, got {other:?}"),
        }
    }

    #[test]
    fn having_without_group_by_is_not_consumed() {
        // HAVING is only recognized once a GROUP BY clause is present; this
        // dialect otherwise leaves it for the caller (here: a parse error).
        let err = Parser::new_with_source("SELECT a FROM t HAVING a > 0")
            .and_then(|mut p| p.parse_select())
            .unwrap_err();
        let _ = err; // any error is acceptable: HAVING is not a valid trailing clause here
    }

    #[test]
    fn inner_join_on() {
        let select = parse("SELECT * FROM a JOIN b ON a.id = b.a_id");
        match core(&select) {
            SelectCore::Select { from, .. } => {
                let joins = &from[0].joins;
                assert_eq!(joins.len(), 1);
                assert_eq!(joins[0].kind, JoinKind::Inner);
                assert!(matches!(joins[0].constraint, JoinConstraint::On(_)));
            }
            other => panic!("expected a SELECT core, got {other:?}"),
        }
    }

    #[test]
    fn left_outer_join_using() {
        let select = parse("SELECT * FROM a LEFT OUTER JOIN b USING (id)");
        match core(&select) {
            SelectCore::Select { from, .. } => {
                let joins = &from[0].joins;
                assert_eq!(joins[0].kind, JoinKind::Left);
                match &joins[0].constraint {
                    JoinConstraint::Using(cols) => assert_eq!(cols.len(), 1),
                    other => panic!("expected a USING constraint, got {other:?}"),
                }
            }
            other => panic!("expected a SELECT core, got {other:?}"),
        }
    }

    #[test]
    fn comma_join_is_implicit_inner_cross() {
        let select = parse("SELECT * FROM a, b");
        match core(&select) {
            SelectCore::Select { from, .. } => {
                assert_eq!(from.len(), 1);
                assert_eq!(from[0].joins.len(), 1);
                assert_eq!(from[0].joins[0].kind, JoinKind::Inner);
                assert!(matches!(from[0].joins[0].constraint, JoinConstraint::None));
            }
            other => panic!("expected a SELECT core, got {other:?}"),
        }
    }

    #[test]
    fn derived_table_with_alias() {
        let select = parse("SELECT * FROM (SELECT 1) AS sub");
        match core(&select) {
            SelectCore::Select { from, .. } => match &from[0].relation {
                TableFactor::Derived { alias: Some(alias), .. } => assert_eq!(alias.value, "sub"),
                other => panic!("expected a derived table, got {other:?}"),
            },
            other => panic!("expected a SELECT core, got {other:?}"),
        }
    }

    #[test]
    fn table_function_relation() {
        let select = parse("SELECT * FROM json_each(x)");
        match core(&select) {
            SelectCore::Select { from, .. } => match &from[0].relation {
                TableFactor::TableFunction { name, args, .. } => {
                    assert_eq!(name.parts[0].value, "json_each");
                    assert_eq!(args.len(), 1);
                }
                other => panic!("expected a table function, got {other:?}"),
            },
            other => panic!("expected a SELECT core, got {other:?}"),
        }
    }

    #[test]
    fn recursive_cte_propagates_to_every_binding() {
        let select = parse(
            "WITH RECURSIVE cnt(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM cnt) SELECT x FROM cnt",
        );
        let with = select.with.expect("expected a WITH clause");
        assert!(with.recursive);
        assert_eq!(with.ctes.len(), 1);
        assert!(with.ctes[0].recursive);
    }

    #[test]
    fn union_all_produces_a_set_operation() {
        let select = parse("SELECT 1 UNION ALL SELECT 2");
        assert_eq!(select.set_ops.len(), 1);
        assert_eq!(select.set_ops[0].op, SetOperator::UnionAll);
    }

    #[test]
    fn values_clause_as_select_core() {
        let select = parse("VALUES (1, 2), (3, 4)");
        match core(&select) {
            SelectCore::Values { rows, .. } => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].len(), 2);
            }
            other => panic!("expected a VALUES core, got {other:?}"),
        }
    }

    #[test]
    fn order_by_limit_offset() {
        let select = parse("SELECT a FROM t ORDER BY a DESC NULLS LAST LIMIT 10 OFFSET 5");
        assert_eq!(select.order_by.len(), 1);
        assert_eq!(select.order_by[0].direction, OrderDirection::Desc);
        assert_eq!(select.order_by[0].nulls, Some(NullsOrder::Last));
        assert!(select.limit.is_some());
        assert!(select.offset.is_some());
    }
}
