// ============================================================================
// Token Navigation
// ============================================================================

use egram_lexer::{LexerError, Span, Token, TokenKind};

use crate::error::{ParseError, ParseResult};
use crate::Parser;

impl<'src> Parser<'src> {
    pub(crate) fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn current_kind(&self) -> Option<&TokenKind> {
        self.current().map(|t| &t.kind)
    }

    /// Kind of the first token at or after the cursor that is not a newline
    pub(crate) fn peek_past_newlines(&self) -> Option<&TokenKind> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .map(|t| &t.kind)
            .find(|k| !matches!(k, TokenKind::Newline))
    }

    /// Span of the current token, or an empty span at the end of input
    pub(crate) fn current_span(&self) -> Span {
        self.current()
            .map(|t| t.span)
            .unwrap_or(Span::new(self.source.len(), self.source.len()))
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or(Span::new(0, 0))
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn advance(&mut self) -> Option<&Token> {
        if self.is_eof() {
            return None;
        }
        self.pos += 1;
        self.tokens.get(self.pos - 1)
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    /// Consume the current token if it is `kind`
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<Span> {
        if self.check(&kind) {
            let span = self.current_span();
            self.pos += 1;
            Ok(span)
        } else {
            Err(self.unexpected(&format!("'{}'", kind)))
        }
    }

    /// Expect the closer of a construct opened at `open`. Running out of
    /// input is reported as an unterminated construct.
    pub(crate) fn expect_closing(
        &mut self,
        kind: TokenKind,
        construct: &'static str,
        closer: &'static str,
        open: Span,
    ) -> ParseResult<Span> {
        if self.is_eof() {
            return Err(ParseError::UnterminatedConstruct {
                construct,
                closer,
                span: open,
            });
        }
        self.expect(kind)
    }

    pub(crate) fn skip_newlines(&mut self) {
        while matches!(self.current_kind(), Some(TokenKind::Newline)) {
            self.pos += 1;
        }
    }

    /// Skip statement separators: newlines and `;`
    pub(crate) fn skip_separators(&mut self) {
        while matches!(
            self.current_kind(),
            Some(TokenKind::Newline) | Some(TokenKind::Semi)
        ) {
            self.pos += 1;
        }
    }

    /// True when the current token starts exactly where the previous one
    /// ended, e.g. the `[` in `$a[0]` but not in `notice [0]`.
    pub(crate) fn is_adjacent(&self) -> bool {
        let Some(prev) = self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) else {
            return false;
        };
        if matches!(prev.kind, TokenKind::Newline) {
            return false;
        }
        self.current()
            .map(|t| t.span.start == prev.span.end)
            .unwrap_or(false)
    }

    /// Human readable description of the current token for diagnostics
    pub(crate) fn found_text(&self) -> String {
        match self.current() {
            None => "end of input".to_string(),
            Some(Token {
                kind: TokenKind::Error,
                span,
            }) => self.describe_invalid_input(*span),
            Some(token) => format!("{}", token.kind),
        }
    }

    fn describe_invalid_input(&self, span: Span) -> String {
        let lex_error = self
            .lex_errors
            .iter()
            .find(|e| e.position() == span.start);
        match lex_error {
            Some(LexerError::UnterminatedString(_)) => "an unterminated string".to_string(),
            Some(LexerError::UnterminatedBlockComment(_)) => {
                "an unterminated block comment".to_string()
            }
            Some(LexerError::UnexpectedCharacter(_, c)) => format!("invalid character '{}'", c),
            None => format!(
                "invalid input `{}`",
                self.source.get(span.start..span.end).unwrap_or("")
            ),
        }
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.found_text(),
            span: self.current_span(),
        }
    }
}
