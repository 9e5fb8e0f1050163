use sqlc_ast::{DataType, Ident, Literal, LiteralValue, ObjectName};
use sqlc_lexer::{Keyword, TokenKind};

use crate::{error::ParseError, parser::Parser};

impl Parser {
    /// Parses a single (possibly keyword-derived) identifier.
    pub fn parse_identifier(&mut self) -> Result<Ident, ParseError> {
        let token = self.next_token().ok_or(ParseError::Expected {
            expected: "an identifier".into(),
            found: None,
            span: self.eof_span,
        })?;
        match token.kind {
            TokenKind::Ident(ident) => Ok(Ident {
                value: ident.value,
                quote: ident.quote,
                span: token.span,
            }),
            TokenKind::Keyword(kw) => Ok(Ident {
                value: kw.to_string(),
                quote: None,
                span: token.span,
            }),
            other => Err(ParseError::Expected {
                expected: "an identifier".into(),
                found: Some(other.to_string()),
                span: token.span,
            }),
        }
    }

    /// Parses a `name` or dotted `schema.name` object name.
    pub fn parse_object_name(&mut self) -> Result<ObjectName, ParseError> {
        let mut parts = vec![self.parse_identifier()?];
        while self.next_token_if_is(&TokenKind::Period) {
            parts.push(self.parse_identifier()?);
        }
        Ok(ObjectName { parts })
    }

    /// Parses a literal value.
    pub fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        let token = self.next_token().ok_or(ParseError::Expected {
            expected: "a literal".into(),
            found: None,
            span: self.eof_span,
        })?;
        let value = match token.kind {
            TokenKind::Number(s) => {
                if s.contains('.') || s.contains(['e', 'E']) && !s.starts_with("0x") {
                    LiteralValue::Real(s)
                } else {
                    LiteralValue::Integer(s)
                }
            }
            TokenKind::String(s) => LiteralValue::String(s),
            TokenKind::Blob(s) => LiteralValue::Blob(s),
            TokenKind::Keyword(Keyword::NULL) => LiteralValue::Null,
            TokenKind::Keyword(Keyword::TRUE) => LiteralValue::True,
            TokenKind::Keyword(Keyword::FALSE) => LiteralValue::False,
            TokenKind::Keyword(Keyword::CURRENT_TIME) => LiteralValue::CurrentTime,
            TokenKind::Keyword(Keyword::CURRENT_DATE) => LiteralValue::CurrentDate,
            TokenKind::Keyword(Keyword::CURRENT_TIMESTAMP) => LiteralValue::CurrentTimestamp,
            other => {
                return Err(ParseError::Expected {
                    expected: "a literal".into(),
                    found: Some(other.to_string()),
                    span: token.span,
                })
            }
        };
        Ok(Literal {
            value,
            span: token.span,
        })
    }

    /// Parses an annotated column type: `NAME [(args...)] [AS Host] [USING Adapter]`.
    pub fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let name = self.parse_identifier()?;
        let mut args = Vec::new();
        let mut end_span = name.span;
        if self.next_token_if_is(&TokenKind::LeftParen) {
            args = self.parse_comma_separated(|p| {
                let tok = p.next_token().ok_or(ParseError::Expected {
                    expected: "a type argument".into(),
                    found: None,
                    span: p.eof_span,
                })?;
                match tok.kind {
                    TokenKind::Number(n) => Ok(n),
                    other => Err(ParseError::Expected {
                        expected: "a numeric type argument".into(),
                        found: Some(other.to_string()),
                        span: tok.span,
                    }),
                }
            })?;
            let close = self.current_span();
            self.expect_token(&TokenKind::RightParen)?;
            end_span = close;
        }
        let host_type = if self.parse_keyword(Keyword::AS) {
            let ident = self.parse_identifier()?;
            end_span = ident.span;
            Some(ident)
        } else {
            None
        };
        let adapter = if self.parse_keyword(Keyword::USING) {
            let ident = self.parse_identifier()?;
            end_span = ident.span;
            Some(ident)
        } else {
            None
        };
        Ok(DataType {
            span: name.span.to(end_span),
            name,
            args,
            host_type,
            adapter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parse_type(sql: &str) -> DataType {
        Parser::new_with_source(sql)
            .and_then(|mut p| p.parse_data_type())
            .unwrap_or_else(|e| panic!("failed to parse `{sql}`: {e}"))
    }

    #[test]
    fn plain_type_name() {
        let ty = parse_type("INTEGER");
        assert_eq!(ty.name.value, "INTEGER");
        assert!(ty.args.is_empty());
        assert!(ty.host_type.is_none());
        assert!(ty.adapter.is_none());
    }

    #[test]
    fn type_with_numeric_arguments() {
        let ty = parse_type("DECIMAL(10, 2)");
        assert_eq!(ty.args, vec!["10".to_string(), "2".to_string()]);
    }

    #[test]
    fn type_with_host_and_adapter_annotations() {
        let ty = parse_type("TEXT AS Email USING EmailAdapter");
        assert_eq!(ty.host_type.as_ref().unwrap().value, "Email");
        assert_eq!(ty.adapter.as_ref().unwrap().value, "EmailAdapter");
    }

    #[test]
    fn dotted_object_name() {
        let name = Parser::new_with_source("schema.table")
            .and_then(|mut p| p.parse_object_name())
            .expect("should parse");
        assert_eq!(name.parts.len(), 2);
        assert_eq!(name.parts[0].value, "schema");
        assert_eq!(name.parts[1].value, "table");
    }

    #[test]
    fn keyword_used_as_identifier() {
        // Unreserved-in-context keywords like ACTION are reclassified back
        // to plain identifiers when an identifier is expected.
        let ident = Parser::new_with_source("action")
            .and_then(|mut p| p.parse_identifier())
            .expect("should parse");
        assert_eq!(ident.value, "ACTION");
    }

    #[test]
    fn literal_variants() {
        let parse_lit = |sql: &str| {
            Parser::new_with_source(sql)
                .and_then(|mut p| p.parse_literal())
                .unwrap_or_else(|e| panic!("failed to parse `{sql}`: {e}"))
        };
        assert!(matches!(parse_lit("42").value, LiteralValue::Integer(_)));
        assert!(matches!(parse_lit("3.14").value, LiteralValue::Real(_)));
        assert!(matches!(parse_lit("'hi'").value, LiteralValue::String(_)));
        assert!(matches!(parse_lit("NULL").value, LiteralValue::Null));
        assert!(matches!(parse_lit("TRUE").value, LiteralValue::True));
        assert!(matches!(parse_lit("CURRENT_TIMESTAMP").value, LiteralValue::CurrentTimestamp));
    }
}
