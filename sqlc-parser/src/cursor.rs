use std::collections::VecDeque;

use sqlc_lexer::Token;

/// Lookahead buffer over an already-lexed token stream. `peek` always
/// looks at the token under the current lookahead cursor; `peek_next`
/// advances that cursor without consuming, so a caller can look several
/// tokens ahead (e.g. matching a multi-keyword phrase) before deciding
/// whether to actually consume anything. Consuming a token (`next`)
/// resets the cursor back to the front of the buffer.
pub(crate) struct TokenCursor {
    tokens: std::vec::IntoIter<Token>,
    buf: VecDeque<Token>,
    index: usize,
}

impl TokenCursor {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            buf: VecDeque::new(),
            index: 0,
        }
    }

    fn fill_to_cursor(&mut self) -> Option<&Token> {
        if self.index >= self.buf.len() {
            let token = self.tokens.next()?;
            self.buf.push_back(token);
        }
        self.buf.get(self.index)
    }

    /// Returns the token under the current lookahead cursor without
    /// consuming it.
    pub(crate) fn peek(&mut self) -> Option<&Token> {
        self.fill_to_cursor()
    }

    /// Looks at the token under the cursor, then advances the cursor one
    /// position further ahead. Repeated calls walk forward through the
    /// buffer without consuming anything; `reset_cursor` (or `next`) puts
    /// the cursor back at the front.
    pub(crate) fn peek_next(&mut self) -> Option<&Token> {
        let found = self.fill_to_cursor().is_some();
        if found {
            self.index += 1;
            self.buf.get(self.index - 1)
        } else {
            None
        }
    }

    /// Puts the lookahead cursor back at the front of the buffer.
    pub(crate) fn reset_cursor(&mut self) {
        self.index = 0;
    }

    /// Consumes and returns the token at the front of the buffer (or the
    /// next unread token if the buffer is empty), resetting the lookahead
    /// cursor.
    pub(crate) fn next(&mut self) -> Option<Token> {
        self.index = 0;
        self.buf.pop_front().or_else(|| self.tokens.next())
    }

    /// Consumes and returns the front token if `func` accepts it.
    pub(crate) fn next_if(&mut self, func: impl FnOnce(&Token) -> bool) -> Option<Token> {
        match self.peek() {
            Some(token) if func(token) => self.next(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlc_diagnostics::Span;
    use sqlc_lexer::TokenKind;

    fn token(kind: TokenKind) -> Token {
        Token { kind, span: Span::empty_at(0) }
    }

    fn tokens(kinds: Vec<TokenKind>) -> TokenCursor {
        TokenCursor::new(kinds.into_iter().map(token).collect())
    }

    #[test]
    fn peek_next_advances_cursor_not_the_stream() {
        let mut cursor = tokens(vec![TokenKind::Comma, TokenKind::SemiColon, TokenKind::Eof]);
        assert_eq!(cursor.peek().map(|t| &t.kind), Some(&TokenKind::Comma));
        assert_eq!(cursor.peek_next().map(|t| &t.kind), Some(&TokenKind::Comma));
        assert_eq!(cursor.peek_next().map(|t| &t.kind), Some(&TokenKind::SemiColon));
        assert_eq!(cursor.next().map(|t| t.kind), Some(TokenKind::Comma));
        assert_eq!(cursor.next().map(|t| t.kind), Some(TokenKind::SemiColon));
        assert_eq!(cursor.next().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn next_if_consumes_only_on_match() {
        let mut cursor = tokens(vec![TokenKind::Comma, TokenKind::SemiColon]);
        assert!(cursor.next_if(|t| t.kind == TokenKind::Comma).is_some());
        assert!(cursor.next_if(|t| t.kind == TokenKind::Comma).is_none());
        assert_eq!(cursor.next().map(|t| t.kind), Some(TokenKind::SemiColon));
    }

    #[test]
    fn reset_cursor_rewinds_lookahead_without_consuming() {
        let mut cursor = tokens(vec![TokenKind::Comma, TokenKind::SemiColon]);
        cursor.peek_next();
        cursor.reset_cursor();
        assert_eq!(cursor.peek().map(|t| &t.kind), Some(&TokenKind::Comma));
    }
}
