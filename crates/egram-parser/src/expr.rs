//! Expressions
//!
//! Binding-power loop for binary operators, then unary operators, postfix
//! operators (method chains, adjacent `[` access) and primaries. Newlines
//! are skipped after binary operators and inside brackets.

use egram_ast::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
use egram_lexer::{Span, TokenKind};

use crate::error::{ParseError, ParseResult};
use crate::Parser;

impl<'src> Parser<'src> {
    /// Parse a full expression in expression position
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_expr_bp(0)
    }

    /// Continue an already parsed primary with postfix and binary operators
    pub(crate) fn continue_expression(&mut self, primary: Expr) -> ParseResult<Expr> {
        let expr = self.parse_postfix_rest(primary)?;
        self.parse_binary_rest(expr, 0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let lhs = self.parse_unary()?;
        self.parse_binary_rest(lhs, min_bp)
    }

    fn parse_binary_rest(&mut self, mut lhs: Expr, min_bp: u8) -> ParseResult<Expr> {
        while let Some((op, l_bp, r_bp)) = self.infix_op() {
            if l_bp < min_bp {
                break;
            }
            self.advance();
            self.skip_newlines();

            let rhs = self.parse_expr_bp(r_bp)?;
            let span = lhs.span.merge(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    /// Lowest to highest: `or`, `and`, comparison, `in`, additive,
    /// multiplicative. All left associative.
    fn infix_op(&self) -> Option<(BinaryOp, u8, u8)> {
        let op = match self.current_kind()? {
            TokenKind::Or => (BinaryOp::Or, 1, 2),
            TokenKind::And => (BinaryOp::And, 3, 4),
            TokenKind::EqEq => (BinaryOp::Eq, 5, 6),
            TokenKind::NotEq => (BinaryOp::NotEq, 5, 6),
            TokenKind::Lt => (BinaryOp::Lt, 5, 6),
            TokenKind::Gt => (BinaryOp::Gt, 5, 6),
            TokenKind::LtEq => (BinaryOp::LtEq, 5, 6),
            TokenKind::GtEq => (BinaryOp::GtEq, 5, 6),
            TokenKind::In => (BinaryOp::In, 7, 8),
            TokenKind::Plus => (BinaryOp::Add, 9, 10),
            TokenKind::Minus => (BinaryOp::Sub, 9, 10),
            TokenKind::Star => (BinaryOp::Mul, 11, 12),
            TokenKind::Slash => (BinaryOp::Div, 11, 12),
            TokenKind::Percent => (BinaryOp::Mod, 11, 12),
            _ => return None,
        };
        Some(op)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();

        let op = match self.current_kind() {
            Some(TokenKind::Minus) => UnaryOp::Neg,
            Some(TokenKind::Bang) => UnaryOp::Not,
            _ => {
                let primary = self.parse_primary()?;
                return self.parse_postfix_rest(primary);
            }
        };

        self.advance();
        let operand = self.parse_unary()?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    pub(crate) fn parse_postfix_rest(&mut self, mut expr: Expr) -> ParseResult<Expr> {
        loop {
            match self.current_kind() {
                Some(TokenKind::Dot) => {
                    expr = self.parse_method_chain(expr)?;
                }
                Some(TokenKind::LBracket) if self.is_adjacent() => {
                    let open = self.current_span();
                    self.advance();
                    let keys = self.parse_expr_list(TokenKind::RBracket, "access", "]", open)?;
                    if keys.is_empty() {
                        return Err(ParseError::UnexpectedToken {
                            expected: "an access key".to_string(),
                            found: "']'".to_string(),
                            span: self.previous_span(),
                        });
                    }
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Access {
                            target: Box::new(expr),
                            keys,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();

        let literal = match self.current_kind() {
            Some(TokenKind::Integer(s)) => Some(Literal::Integer(s.clone())),
            Some(TokenKind::Float(s)) => Some(Literal::Float(s.clone())),
            Some(TokenKind::SingleQuoted(s)) | Some(TokenKind::DoubleQuoted(s)) => {
                Some(Literal::String(s.clone()))
            }
            Some(TokenKind::True) => Some(Literal::Boolean(true)),
            Some(TokenKind::False) => Some(Literal::Boolean(false)),
            Some(TokenKind::Undef) => Some(Literal::Undef),
            _ => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(Expr::new(ExprKind::Literal(literal), start));
        }

        match self.current_kind().cloned() {
            Some(TokenKind::Variable(name)) => {
                self.advance();
                Ok(Expr::new(ExprKind::Variable(name), start))
            }
            Some(TokenKind::ClassRef(name)) => {
                self.advance();
                Ok(Expr::new(ExprKind::ClassRef(name), start))
            }
            Some(TokenKind::Name(_)) => self.parse_call_expression(),
            Some(TokenKind::LBracket) => {
                self.advance();
                let items = self.parse_expr_list(TokenKind::RBracket, "array", "]", start)?;
                Ok(Expr::new(
                    ExprKind::Array(items),
                    start.merge(self.previous_span()),
                ))
            }
            Some(TokenKind::LBrace) => self.parse_hash(),
            Some(TokenKind::LParen) => {
                self.advance();
                self.skip_newlines();
                let inner = self.parse_expression()?;
                self.skip_newlines();
                // `(a, b)` is a list, and no call owns it
                if self.check(&TokenKind::Comma) {
                    return Err(ParseError::IllegalCommaList {
                        span: self.current_span(),
                    });
                }
                self.expect_closing(
                    TokenKind::RParen,
                    "parenthesized expression",
                    ")",
                    start,
                )?;
                Ok(Expr::new(inner.kind, start.merge(self.previous_span())))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// Comma separated expressions up to `closer`, cursor just past the
    /// opener. A trailing comma is allowed, an empty list too.
    fn parse_expr_list(
        &mut self,
        closer: TokenKind,
        construct: &'static str,
        closer_text: &'static str,
        open: Span,
    ) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        self.skip_newlines();

        while !self.check(&closer) {
            if self.is_eof() {
                break;
            }
            if self.check(&TokenKind::Comma) {
                return Err(ParseError::IllegalCommaList {
                    span: self.current_span(),
                });
            }
            items.push(self.parse_expression()?);
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }

        self.expect_closing(closer, construct, closer_text, open)?;
        Ok(items)
    }

    /// `{ key => value, ... }`
    fn parse_hash(&mut self) -> ParseResult<Expr> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut entries = Vec::new();
        self.skip_newlines();

        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            if self.check(&TokenKind::Comma) {
                return Err(ParseError::IllegalCommaList {
                    span: self.current_span(),
                });
            }
            let key = self.parse_expression()?;
            self.skip_newlines();
            self.expect(TokenKind::FatArrow)?;
            self.skip_newlines();
            let value = self.parse_expression()?;
            entries.push((key, value));
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }

        self.expect_closing(TokenKind::RBrace, "hash", "}", open)?;
        Ok(Expr::new(
            ExprKind::Hash(entries),
            open.merge(self.previous_span()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseErrorKind;
    use egram_ast::dump::dump;
    use pretty_assertions::assert_eq;

    fn expr(source: &str) -> String {
        let mut parser = Parser::new(source);
        let expr = parser.parse_expression().unwrap();
        assert!(parser.is_eof(), "trailing input in {:?}", source);
        dump(&expr)
    }

    fn expr_err(source: &str) -> ParseErrorKind {
        Parser::new(source).parse_expression().unwrap_err().kind()
    }

    #[test]
    fn test_literals() {
        assert_eq!(expr("42"), "42");
        assert_eq!(expr("3.5"), "3.5");
        assert_eq!(expr("'text'"), "'text'");
        assert_eq!(expr("\"text\""), "'text'");
        assert_eq!(expr("true"), "true");
        assert_eq!(expr("undef"), "undef");
        assert_eq!(expr("File"), "File");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(expr("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(expr("1 - 2 - 3"), "(- (- 1 2) 3)");
        assert_eq!(expr("$a or $b and $c"), "(|| $a (&& $b $c))");
        assert_eq!(expr("$a == 1 and $b != 2"), "(&& (== $a 1) (!= $b 2))");
        assert_eq!(expr("$x in $list == true"), "(== (in $x $list) true)");
        assert_eq!(expr("(1 + 2) * 3"), "(* (+ 1 2) 3)");
    }

    #[test]
    fn test_unary() {
        assert_eq!(expr("!$a"), "(! $a)");
        assert_eq!(expr("-$a.foo"), "(- (call-method (. $a foo)))");
        assert_eq!(expr("!foo(1) and $b"), "(&& (! (call foo 1)) $b)");
    }

    #[test]
    fn test_newline_after_operator() {
        assert_eq!(expr("1 +\n  2"), "(+ 1 2)");
    }

    #[test]
    fn test_collections() {
        assert_eq!(expr("[1, 2,]"), "([] 1 2)");
        assert_eq!(expr("[]"), "([])");
        assert_eq!(expr("{ 'a' => 1,\n 'b' => $x }"), "({} (=> 'a' 1) (=> 'b' $x))");
        assert_eq!(expr("{}"), "({})");
    }

    #[test]
    fn test_access() {
        assert_eq!(expr("$h['k']"), "(slice $h 'k')");
        assert_eq!(expr("$a[1, 2][0]"), "(slice (slice $a 1 2) 0)");
        assert_eq!(expr("$a[0].foo"), "(call-method (. (slice $a 0) foo))");
    }

    #[test]
    fn test_names_in_expression_position() {
        assert_eq!(expr("foo"), "foo");
        assert_eq!(expr("foo(bar)"), "(call foo bar)");
        assert_eq!(expr("[foo(), bar]"), "([] (call foo) bar)");
    }

    #[test]
    fn test_errors() {
        assert_eq!(expr_err("[1,,2]"), ParseErrorKind::IllegalCommaList);
        assert_eq!(expr_err("(10, 3)"), ParseErrorKind::IllegalCommaList);
        assert_eq!(expr_err("{1 => 2,,}"), ParseErrorKind::IllegalCommaList);
        assert_eq!(expr_err("{, 1 => 2}"), ParseErrorKind::IllegalCommaList);
        assert_eq!(expr_err("[1, 2"), ParseErrorKind::UnterminatedConstruct);
        assert_eq!(expr_err("(1 + 2"), ParseErrorKind::UnterminatedConstruct);
        assert_eq!(expr_err("{ 'a' => 1"), ParseErrorKind::UnterminatedConstruct);
        assert_eq!(expr_err("{ 'a' 1 }"), ParseErrorKind::UnexpectedToken);
        assert_eq!(expr_err("$a[]"), ParseErrorKind::UnexpectedToken);
        assert_eq!(expr_err("1 +"), ParseErrorKind::UnexpectedToken);
        assert_eq!(expr_err("@"), ParseErrorKind::UnexpectedToken);
    }
}
