//! Call disambiguation
//!
//! A leading name can become four different nodes depending on where it
//! appears and what follows it:
//!
//! | position   | next token                 | result                          |
//! |------------|----------------------------|---------------------------------|
//! | any        | `(`                        | `Call` (statement: `Invoke`)    |
//! | statement  | start of a bare argument   | `Invoke` with bare arguments    |
//! | statement  | anything else              | `BareWord`, maybe continued     |
//! | expression | anything but `(`           | `BareWord`                      |
//!
//! Method chains (`$a.foo(1) |$x| { }`) are parsed here as well.

use egram_ast::{Expr, ExprKind, Ident, Stmt, StmtKind};
use egram_lexer::TokenKind;
use tracing::debug;

use crate::args::Delimiting;
use crate::error::{ParseError, ParseResult};
use crate::Parser;

/// Where a name is being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The result is discarded
    Statement,
    /// The result is used as a value
    Expression,
}

/// Outcome of [`Parser::parse_callable`]
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    /// A statement-level invocation (statement position only)
    Statement(Stmt),
    Value(Expr),
}

impl<'src> Parser<'src> {
    /// Parse the name under the cursor and whatever call syntax belongs to it.
    ///
    /// In statement position the returned value is a complete statement
    /// expression (binary operators and method chains included); in
    /// expression position it is a primary and the caller continues it.
    pub fn parse_callable(&mut self, position: Position) -> ParseResult<Callable> {
        if position == Position::Expression {
            return self.parse_call_expression().map(Callable::Value);
        }

        let callee = self.expect_name("a name")?;

        // A `(` after a name is always an argument list.
        if self.check(&TokenKind::LParen) {
            let call = self.finish_call(callee)?;
            return self.call_statement(call);
        }

        if self.can_start_bare_argument() {
            return self.invoke_with_bare_args(callee).map(Callable::Statement);
        }

        debug!(callee = %callee.node, "classified as bare word");
        let bare_word = Expr::new(ExprKind::BareWord(callee.node), callee.span);
        Ok(Callable::Value(self.continue_expression(bare_word)?))
    }

    /// A name used as a value: `name(args) [lambda]` or a bare word
    pub(crate) fn parse_call_expression(&mut self) -> ParseResult<Expr> {
        let callee = self.expect_name("a name")?;
        if self.check(&TokenKind::LParen) {
            debug!(callee = %callee.node, "classified as call");
            return self.finish_call(callee);
        }
        Ok(Expr::new(ExprKind::BareWord(callee.node), callee.span))
    }

    /// `name(args) [lambda]` with the cursor on `(`
    fn finish_call(&mut self, callee: Ident) -> ParseResult<Expr> {
        let args = self.parse_args(Delimiting::Parenthesized)?;
        let lambda = self.parse_optional_lambda()?;
        let span = callee.span.merge(self.previous_span());
        Ok(Expr::new(
            ExprKind::Call {
                callee,
                args,
                lambda,
            },
            span,
        ))
    }

    /// A parenthesized call in statement position is an `Invoke` unless it
    /// is the operand of something larger (`foo(1) + 2`, `foo().bar`).
    fn call_statement(&mut self, call: Expr) -> ParseResult<Callable> {
        let expr = self.continue_expression(call)?;
        match expr {
            Expr {
                kind:
                    ExprKind::Call {
                        callee,
                        args,
                        lambda,
                    },
                span,
            } if !self.check(&TokenKind::Eq) => {
                debug!(callee = %callee.node, args = args.len(), "classified as invoke");
                Ok(Callable::Statement(Stmt::new(
                    StmtKind::Invoke {
                        callee,
                        args,
                        lambda,
                    },
                    span,
                )))
            }
            other => {
                debug!("parenthesized call continues as an expression");
                Ok(Callable::Value(other))
            }
        }
    }

    fn invoke_with_bare_args(&mut self, callee: Ident) -> ParseResult<Stmt> {
        let args = self.parse_args(Delimiting::Bare)?;
        let span = callee.span.merge(self.previous_span());

        if args.len() > 1 && !self.config.is_statement_call(&callee.node) {
            debug!(callee = %callee.node, args = args.len(), "argument list needs parentheses");
            return Err(ParseError::IllegalArgumentList {
                name: callee.node,
                span,
            });
        }

        debug!(callee = %callee.node, args = args.len(), "classified as invoke");
        Ok(Stmt::new(
            StmtKind::Invoke {
                callee,
                args,
                lambda: None,
            },
            span,
        ))
    }

    /// Tokens that may open an unparenthesized argument. `{` and `-` are
    /// excluded: `foo {` and `foo - 1` keep `foo` a bare word.
    fn can_start_bare_argument(&self) -> bool {
        match self.current_kind() {
            Some(TokenKind::Name(_))
            | Some(TokenKind::ClassRef(_))
            | Some(TokenKind::Variable(_))
            | Some(TokenKind::Integer(_))
            | Some(TokenKind::Float(_))
            | Some(TokenKind::SingleQuoted(_))
            | Some(TokenKind::DoubleQuoted(_))
            | Some(TokenKind::True)
            | Some(TokenKind::False)
            | Some(TokenKind::Undef)
            | Some(TokenKind::Bang) => true,
            // `foo[1]` is an access, `foo [1]` passes an array
            Some(TokenKind::LBracket) => !self.is_adjacent(),
            _ => false,
        }
    }

    /// Parse `.name [(args)] [lambda]` segments for as long as `.` follows
    pub(crate) fn parse_method_chain(&mut self, receiver: Expr) -> ParseResult<Expr> {
        let mut expr = receiver;

        while self.eat(&TokenKind::Dot) {
            let method = self.expect_name("a method name after '.'")?;
            let args = if self.check(&TokenKind::LParen) {
                self.parse_args(Delimiting::Parenthesized)?
            } else {
                Vec::new()
            };
            let lambda = self.parse_optional_lambda()?;
            let span = expr.span.merge(self.previous_span());

            debug!(method = %method.node, args = args.len(), lambda = lambda.is_some(), "method call");
            expr = Expr::new(
                ExprKind::CallMethod {
                    receiver: Box::new(expr),
                    method,
                    args,
                    lambda,
                },
                span,
            );
        }

        Ok(expr)
    }

    pub(crate) fn expect_name(&mut self, expected: &str) -> ParseResult<Ident> {
        match self.current_kind() {
            Some(TokenKind::Name(name)) => {
                let ident = Ident::new(name.clone(), self.current_span());
                self.advance();
                Ok(ident)
            }
            _ => Err(self.unexpected(expected)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseErrorKind, ParserConfig};
    use egram_ast::dump::dump;
    use pretty_assertions::assert_eq;

    fn callable(source: &str, position: Position) -> ParseResult<Callable> {
        Parser::new(source).parse_callable(position)
    }

    fn dump_callable(callable: &Callable) -> String {
        match callable {
            Callable::Statement(stmt) => dump(stmt),
            Callable::Value(expr) => dump(expr),
        }
    }

    #[test]
    fn test_parenthesized_call_by_position() {
        let value = callable("f(a, b)", Position::Expression).unwrap();
        assert!(matches!(&value, Callable::Value(Expr { kind: ExprKind::Call { .. }, .. })));
        assert_eq!(dump_callable(&value), "(call f a b)");

        let stmt = callable("f(a, b)", Position::Statement).unwrap();
        assert!(matches!(&stmt, Callable::Statement(Stmt { kind: StmtKind::Invoke { .. }, .. })));
        assert_eq!(dump_callable(&stmt), "(invoke f a b)");
    }

    #[test]
    fn test_space_before_paren_is_still_a_call() {
        let stmt = callable("foo (1)", Position::Statement).unwrap();
        assert_eq!(dump_callable(&stmt), "(invoke foo 1)");
    }

    #[test]
    fn test_call_continued_in_statement_position() {
        let value = callable("foo(1) + 2", Position::Statement).unwrap();
        assert!(matches!(value, Callable::Value(_)));
        assert_eq!(dump_callable(&value), "(+ (call foo 1) 2)");

        let chained = callable("foo().bar", Position::Statement).unwrap();
        assert_eq!(dump_callable(&chained), "(call-method (. (call foo) bar))");
    }

    #[test]
    fn test_expression_position_leaves_trailing_tokens() {
        let mut parser = Parser::new("foo bar");
        let value = parser.parse_callable(Position::Expression).unwrap();
        assert_eq!(dump_callable(&value), "foo");
        assert!(matches!(parser.current_kind(), Some(TokenKind::Name(n)) if n == "bar"));
    }

    #[test]
    fn test_single_bare_argument_needs_no_whitelist() {
        let stmt = callable("foo bar", Position::Statement).unwrap();
        assert_eq!(dump_callable(&stmt), "(invoke foo bar)");
    }

    #[test]
    fn test_bare_argument_list_needs_whitelist() {
        let err = callable("foo 10, 3", Position::Statement).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::IllegalArgumentList);
        assert!(err.to_string().contains("'foo'"));

        let ok = callable("notice 10, 3", Position::Statement).unwrap();
        assert_eq!(dump_callable(&ok), "(invoke notice 10 3)");
    }

    #[test]
    fn test_injected_whitelist() {
        let config = ParserConfig::with_statement_calls(["foo"]);
        let stmt = Parser::with_config("foo 10, 3", config.clone())
            .parse_callable(Position::Statement)
            .unwrap();
        assert_eq!(dump_callable(&stmt), "(invoke foo 10 3)");

        let err = Parser::with_config("notice 10, 3", config)
            .parse_callable(Position::Statement)
            .unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::IllegalArgumentList);
    }

    #[test]
    fn test_bare_word_continues_in_statement_position() {
        let value = callable("foo == 1", Position::Statement).unwrap();
        assert_eq!(dump_callable(&value), "(== foo 1)");

        let value = callable("foo - 1", Position::Statement).unwrap();
        assert_eq!(dump_callable(&value), "(- foo 1)");

        let value = callable("foo.bar", Position::Statement).unwrap();
        assert_eq!(dump_callable(&value), "(call-method (. foo bar))");
    }

    #[test]
    fn test_bracket_adjacency() {
        let access = callable("foo[1]", Position::Statement).unwrap();
        assert_eq!(dump_callable(&access), "(slice foo 1)");

        let array_arg = callable("foo [1]", Position::Statement).unwrap();
        assert_eq!(dump_callable(&array_arg), "(invoke foo ([] 1))");
    }

    #[test]
    fn test_call_with_lambda() {
        let stmt = callable("each($xs) |$x| { notice $x }", Position::Statement).unwrap();
        insta::assert_snapshot!(dump_callable(&stmt), @r"
(invoke each $xs (lambda (parameters x) (block
  (invoke notice $x)
)))
");
    }

    #[test]
    fn test_method_chain_left_associates() {
        let mut parser = Parser::new("$a.foo.bar(1)");
        let receiver = parser.parse_expression().unwrap();
        assert_eq!(dump(&receiver), "(call-method (. (call-method (. $a foo)) bar) 1)");
    }

    #[test]
    fn test_method_name_required() {
        let mut parser = Parser::new("$a.");
        let err = parser.parse_expression().unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnexpectedToken);
        assert_eq!(
            err.to_string(),
            "unexpected token: expected a method name after '.', found end of input"
        );
    }
}
