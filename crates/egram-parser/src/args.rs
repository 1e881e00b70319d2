//! Argument lists
//!
//! Two shapes share one entry point: parenthesized lists after a callee
//! (`foo(1, 2,)`) and the unparenthesized lists of statement calls
//! (`notice 1, 2`).

use egram_ast::Expr;
use egram_lexer::TokenKind;
use tracing::trace;

use crate::error::{ParseError, ParseResult};
use crate::Parser;

/// How an argument list is delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiting {
    /// `( a, b, )` - newlines are insignificant, trailing comma allowed
    Parenthesized,
    /// `a, b` - ends at the first expression not followed by a comma
    Bare,
}

impl<'src> Parser<'src> {
    /// Parse an argument list. For `Parenthesized` the cursor must be on `(`.
    pub fn parse_args(&mut self, delimiting: Delimiting) -> ParseResult<Vec<Expr>> {
        let args = match delimiting {
            Delimiting::Parenthesized => self.parse_parenthesized_args()?,
            Delimiting::Bare => self.parse_bare_args()?,
        };
        trace!(?delimiting, count = args.len(), "parsed argument list");
        Ok(args)
    }

    fn parse_parenthesized_args(&mut self) -> ParseResult<Vec<Expr>> {
        let open = self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        self.skip_newlines();

        loop {
            match self.current_kind() {
                None => return Err(unterminated_args(open)),
                Some(TokenKind::RParen) => break,
                Some(TokenKind::Comma) => {
                    // `(,` or `,,`
                    return Err(ParseError::IllegalCommaList {
                        span: self.current_span(),
                    });
                }
                Some(_) => {}
            }

            args.push(self.parse_expression()?);
            self.skip_newlines();

            match self.current_kind() {
                None => return Err(unterminated_args(open)),
                Some(TokenKind::RParen) => break,
                Some(TokenKind::Comma) => {
                    self.advance();
                    self.skip_newlines();
                }
                Some(_) => return Err(self.unexpected("',' or ')'")),
            }
        }

        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_bare_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = vec![self.parse_expression()?];

        while self.check(&TokenKind::Comma) {
            let comma = self.current_span();
            self.advance();
            self.skip_newlines();

            if self.check(&TokenKind::Comma) {
                return Err(ParseError::IllegalCommaList {
                    span: self.current_span(),
                });
            }
            if self.at_statement_end() {
                return Err(ParseError::IllegalCommaList { span: comma });
            }
            args.push(self.parse_expression()?);
        }

        Ok(args)
    }

    /// End of input, a newline, `;` or a closing `}`
    pub(crate) fn at_statement_end(&self) -> bool {
        matches!(
            self.current_kind(),
            None | Some(TokenKind::Semi) | Some(TokenKind::RBrace) | Some(TokenKind::Newline)
        )
    }
}

fn unterminated_args(open: egram_lexer::Span) -> ParseError {
    ParseError::UnterminatedConstruct {
        construct: "argument list",
        closer: ")",
        span: open,
    }
}
