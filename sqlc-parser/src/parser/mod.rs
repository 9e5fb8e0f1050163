mod ddl;
mod dml;
mod expr;
mod query;
mod query_def;
mod types;

use std::fmt::Display;

use sqlc_diagnostics::Span;
use sqlc_lexer::{Keyword, Lexer, Token, TokenKind};

use crate::{cursor::TokenCursor, error::ParseError};

/// Recursive-descent / Pratt parser over a token stream, producing
/// `sqlc-ast` syntax trees.
pub struct Parser {
    iter: TokenCursor,
    eof_span: Span,
}

impl Parser {
    /// Creates a new parser over an already-lexed token stream.
    pub fn new_with_tokens(tokens: Vec<Token>) -> Self {
        let eof_span = tokens
            .iter()
            .find(|t| t.is_eof())
            .map(|t| t.span)
            .unwrap_or_else(|| Span::empty_at(0));
        Self {
            iter: TokenCursor::new(tokens),
            eof_span,
        }
    }

    /// Lexes `source` and creates a parser over the resulting tokens.
    pub fn new_with_source(source: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::new_with_tokens(tokens))
    }

    /// Parses a comma-separated list of one or more items accepted by `f`.
    pub fn parse_comma_separated<T, F>(&mut self, mut f: F) -> Result<Vec<T>, ParseError>
    where
        F: FnMut(&mut Parser) -> Result<T, ParseError>,
    {
        let mut values = vec![f(self)?];
        while self.next_token_if_is(&TokenKind::Comma) {
            values.push(f(self)?);
        }
        Ok(values)
    }

    /// Builds an "expected X, found Y" error at the current position.
    pub fn expected<R>(&mut self, expected: impl Display) -> Result<R, ParseError> {
        let found = self.peek_token().cloned();
        match found {
            Some(token) if !token.is_eof() => Err(ParseError::Expected {
                expected: expected.to_string(),
                found: Some(token.kind.to_string()),
                span: token.span,
            }),
            Some(token) => Err(ParseError::Expected {
                expected: expected.to_string(),
                found: None,
                span: token.span,
            }),
            None => Err(ParseError::Expected {
                expected: expected.to_string(),
                found: None,
                span: self.eof_span,
            }),
        }
    }

    /// Consumes the next token if it is the given keyword, else errors.
    pub fn expect_keyword(&mut self, expected: Keyword) -> Result<(), ParseError> {
        if self.parse_keyword(expected) {
            Ok(())
        } else {
            self.expected(expected)
        }
    }

    /// Consumes each keyword in sequence, or errors.
    pub fn expect_keywords(&mut self, expected: &[Keyword]) -> Result<(), ParseError> {
        for &kw in expected {
            self.expect_keyword(kw)?;
        }
        Ok(())
    }

    /// Consumes the next token if it is the given keyword.
    pub fn parse_keyword(&mut self, keyword: Keyword) -> bool {
        self.next_token_if(|token| token.kind.is_keyword(keyword))
            .is_some()
    }

    /// Consumes the given keyword sequence only if every keyword matches;
    /// otherwise consumes nothing.
    pub fn parse_keywords(&mut self, keywords: &[Keyword]) -> bool {
        for &keyword in keywords {
            match self.peek_next_token() {
                Some(token) if token.kind.is_keyword(keyword) => {}
                _ => {
                    self.reset_peek_cursor();
                    return false;
                }
            }
        }
        for _ in 0..keywords.len() {
            self.next_token();
        }
        true
    }

    /// Consumes the next token if it is one of the given keywords, and
    /// returns which one matched.
    pub fn parse_one_of_keywords(&mut self, keywords: &[Keyword]) -> Option<Keyword> {
        let matched = match &self.peek_token()?.kind {
            TokenKind::Keyword(kw) if keywords.contains(kw) => Some(*kw),
            _ => None,
        }?;
        self.next_token();
        Some(matched)
    }

    /// Consumes the next token if it matches `expected`, else errors.
    pub fn expect_token(&mut self, expected: &TokenKind) -> Result<(), ParseError> {
        if self.next_token_if_is(expected) {
            Ok(())
        } else {
            self.expected(expected)
        }
    }

    /// Peeks the next token without consuming it.
    pub fn peek_token(&mut self) -> Option<&Token> {
        self.iter.peek()
    }

    /// Like `peek_token`, but can be called repeatedly to look further
    /// ahead; the lookahead cursor resets on the next `next_token` call.
    pub fn peek_next_token(&mut self) -> Option<&Token> {
        self.iter.peek_next()
    }

    /// Resets the lookahead cursor used by `peek_next_token`.
    pub fn reset_peek_cursor(&mut self) {
        self.iter.reset_cursor();
    }

    /// Consumes and returns the next token.
    pub fn next_token(&mut self) -> Option<Token> {
        self.iter.next()
    }

    /// Consumes and returns the next token if `func` accepts it.
    pub fn next_token_if(&mut self, func: impl FnOnce(&Token) -> bool) -> Option<Token> {
        self.iter.next_if(func)
    }

    /// Consumes and returns the next token if its kind equals `expected`.
    pub fn next_token_if_is(&mut self, expected: &TokenKind) -> bool {
        self.iter.next_if(|t| &t.kind == expected).is_some()
    }

    /// The span of the most recently peeked token, or of EOF.
    pub fn current_span(&mut self) -> Span {
        self.peek_token().map(|t| t.span).unwrap_or(self.eof_span)
    }

    /// Consumes tokens up to and including the matching `)`, assuming the
    /// opening `(` has already been consumed. Used for window-function
    /// specifications, whose contents are not otherwise analyzed. Returns
    /// the span of the closing paren.
    pub fn skip_balanced_parens(&mut self) -> Result<Span, ParseError> {
        let mut depth = 1usize;
        loop {
            let token = self.next_token().ok_or(ParseError::Expected {
                expected: "a closing ')'".into(),
                found: None,
                span: self.eof_span,
            })?;
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(token.span);
                    }
                }
                _ => {}
            }
        }
    }
}
