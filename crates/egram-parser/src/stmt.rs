//! Statements
//!
//! Statements are separated by newlines, `;`, or nothing at all
//! (`$a = foo bar` is two statements). A comma after a complete statement
//! is always an error.

use egram_ast::{Block, Expr, ExprKind, Program, Stmt, StmtKind};
use egram_lexer::TokenKind;
use tracing::debug;

use crate::calls::{Callable, Position};
use crate::error::{ParseError, ParseResult};
use crate::Parser;

impl<'src> Parser<'src> {
    /// Parse the entire source unit
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let start = self.current_span();
        let stmts = self.parse_statements()?;

        if !self.is_eof() {
            // only a stray `}` stops the statement loop early
            return Err(self.unexpected("a statement"));
        }

        let span = if stmts.is_empty() {
            start
        } else {
            start.merge(self.previous_span())
        };
        debug!(statements = stmts.len(), "parsed program");
        Ok(Program {
            body: Block::new(stmts, span),
        })
    }

    /// Statements up to end of input or a closing `}` (not consumed)
    fn parse_statements(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();

        loop {
            self.skip_separators();
            if self.is_eof() || self.check(&TokenKind::RBrace) {
                break;
            }

            stmts.push(self.parse_statement()?);

            if self.check(&TokenKind::Comma) {
                return Err(ParseError::IllegalCommaList {
                    span: self.current_span(),
                });
            }
        }

        Ok(stmts)
    }

    /// `{ statements }`
    pub(crate) fn parse_brace_block(&mut self, construct: &'static str) -> ParseResult<Block> {
        let open = self.expect(TokenKind::LBrace)?;
        let stmts = self.parse_statements()?;
        self.expect_closing(TokenKind::RBrace, construct, "}", open)?;
        Ok(Block::new(stmts, open.merge(self.previous_span())))
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.current_kind() {
            Some(TokenKind::If) => self.parse_if(),
            Some(TokenKind::Unless) => self.parse_unless(),
            // a list element with nothing before it
            Some(TokenKind::Comma) => Err(ParseError::IllegalCommaList {
                span: self.current_span(),
            }),
            Some(TokenKind::Name(_)) => match self.parse_callable(Position::Statement)? {
                Callable::Statement(stmt) => Ok(stmt),
                Callable::Value(expr) => self.finish_expression_statement(expr),
            },
            _ => {
                let expr = self.parse_expression()?;
                self.finish_expression_statement(expr)
            }
        }
    }

    /// An expression statement, or an assignment when `=` follows
    fn finish_expression_statement(&mut self, expr: Expr) -> ParseResult<Stmt> {
        if !self.check(&TokenKind::Eq) {
            let span = expr.span;
            return Ok(Stmt::new(StmtKind::Expr(expr), span));
        }

        if !matches!(expr.kind, ExprKind::Variable(_) | ExprKind::Access { .. }) {
            return Err(ParseError::UnexpectedToken {
                expected: "a variable or access expression before '='".to_string(),
                found: self.found_text(),
                span: expr.span,
            });
        }

        self.advance();
        self.skip_newlines();
        let value = self.parse_expression()?;
        let span = expr.span.merge(value.span);
        Ok(Stmt::new(
            StmtKind::Assign {
                target: expr,
                value,
            },
            span,
        ))
    }

    /// `if cond { } (elsif cond { })* (else { })?`, cursor on `if` or `elsif`
    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span();
        self.advance();

        let condition = self.parse_expression()?;
        let then_branch = self.parse_brace_block("if body")?;

        let else_branch = match self.peek_past_newlines() {
            Some(TokenKind::Elsif) => {
                self.skip_newlines();
                let nested = self.parse_if()?;
                let span = nested.span;
                Some(Block::new(vec![nested], span))
            }
            Some(TokenKind::Else) => {
                self.skip_newlines();
                self.advance();
                Some(self.parse_brace_block("else body")?)
            }
            _ => None,
        };

        let span = start.merge(self.previous_span());
        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    /// `unless cond { } (else { })?`
    fn parse_unless(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(TokenKind::Unless)?;

        let condition = self.parse_expression()?;
        let then_branch = self.parse_brace_block("unless body")?;

        let else_branch = if matches!(self.peek_past_newlines(), Some(TokenKind::Else)) {
            self.skip_newlines();
            self.advance();
            Some(self.parse_brace_block("else body")?)
        } else {
            None
        };

        let span = start.merge(self.previous_span());
        Ok(Stmt::new(
            StmtKind::Unless {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }
}
