//! Lambda blocks: `|| { ... }`, `|$x, $y| { ... }`

use egram_ast::{Ident, Lambda};
use egram_lexer::{Span, TokenKind};
use tracing::trace;

use crate::error::{ParseError, ParseResult};
use crate::Parser;

impl<'src> Parser<'src> {
    /// Parse a lambda if the cursor is on `|` or `||`
    pub(crate) fn parse_optional_lambda(&mut self) -> ParseResult<Option<Lambda>> {
        match self.current_kind() {
            Some(TokenKind::Pipe) | Some(TokenKind::PipePipe) => Ok(Some(self.parse_lambda()?)),
            _ => Ok(None),
        }
    }

    /// Parse `|params| { body }` or `|| { body }` with the cursor on the
    /// opening pipe. The body may start on the line after the parameters.
    pub fn parse_lambda(&mut self) -> ParseResult<Lambda> {
        let start = self.current_span();

        let params = match self.current_kind() {
            Some(TokenKind::PipePipe) => {
                self.advance();
                Vec::new()
            }
            Some(TokenKind::Pipe) => {
                self.advance();
                self.parse_lambda_params(start)?
            }
            _ => return Err(self.unexpected("a lambda ('|' or '||')")),
        };

        self.skip_newlines();
        let body = self.parse_brace_block("lambda body")?;
        trace!(params = params.len(), stmts = body.stmts.len(), "parsed lambda");

        Ok(Lambda {
            params,
            body,
            span: start.merge(self.previous_span()),
        })
    }

    /// `$x, $y|` with the cursor just past the opening `|`
    fn parse_lambda_params(&mut self, open: Span) -> ParseResult<Vec<Ident>> {
        let mut params = Vec::new();

        loop {
            self.skip_newlines();
            match self.current_kind() {
                Some(TokenKind::Pipe) => break,
                Some(TokenKind::Variable(name)) => {
                    params.push(Ident::new(name.clone(), self.current_span()));
                    self.advance();
                }
                None => return Err(unterminated_params(open)),
                Some(_) => return Err(self.unexpected("a lambda parameter")),
            }

            self.skip_newlines();
            match self.current_kind() {
                Some(TokenKind::Comma) => {
                    self.advance();
                }
                Some(TokenKind::Pipe) => break,
                None => return Err(unterminated_params(open)),
                Some(_) => return Err(self.unexpected("',' or '|'")),
            }
        }

        self.expect(TokenKind::Pipe)?;
        Ok(params)
    }
}

fn unterminated_params(open: Span) -> ParseError {
    ParseError::UnterminatedConstruct {
        construct: "lambda parameter list",
        closer: "|",
        span: open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseErrorKind;
    use pretty_assertions::assert_eq;

    fn lambda(source: &str) -> ParseResult<Lambda> {
        Parser::new(source).parse_lambda()
    }

    fn param_names(lambda: &Lambda) -> Vec<&str> {
        lambda.params.iter().map(|p| p.node.as_str()).collect()
    }

    #[test]
    fn test_empty_params() {
        let parsed = lambda("|| { }").unwrap();
        assert!(parsed.params.is_empty());
        assert!(parsed.body.is_empty());
    }

    #[test]
    fn test_params_without_sigil() {
        let parsed = lambda("|$x, $y| { }").unwrap();
        assert_eq!(param_names(&parsed), vec!["x", "y"]);
        assert_eq!(parsed.params[1].span, Span::new(5, 7));
    }

    #[test]
    fn test_trailing_comma_and_newlines() {
        let parsed = lambda("|$x,\n $y,\n| {\n}").unwrap();
        assert_eq!(param_names(&parsed), vec!["x", "y"]);
    }

    #[test]
    fn test_body_statements() {
        let parsed = lambda("|$x| { $b = $x\n notice $b }").unwrap();
        assert_eq!(parsed.body.stmts.len(), 2);
        assert_eq!(parsed.span, Span::new(0, 27));
    }

    #[test]
    fn test_errors() {
        assert_eq!(lambda("|x| { }").unwrap_err().kind(), ParseErrorKind::UnexpectedToken);
        assert_eq!(lambda("|$x $y| { }").unwrap_err().kind(), ParseErrorKind::UnexpectedToken);
        assert_eq!(lambda("|$x").unwrap_err().kind(), ParseErrorKind::UnterminatedConstruct);
        assert_eq!(lambda("|$x| {").unwrap_err().kind(), ParseErrorKind::UnterminatedConstruct);
        assert_eq!(lambda("|$x| $x").unwrap_err().kind(), ParseErrorKind::UnexpectedToken);
    }
}
