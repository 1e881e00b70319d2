//! Parse errors
//!
//! Every error is terminal for the parse unit and carries the span of the
//! offending input.

use egram_lexer::Span;
use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Parser error type with detailed, helpful error messages
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    #[error("illegal comma separated argument list")]
    #[diagnostic(
        code(egram::parse::illegal_comma),
        help("commas only separate call arguments; remove the extra comma or add parentheses")
    )]
    IllegalCommaList { span: Span },

    #[error(
        "attempt to pass argument list to the function '{name}' which cannot be called without parentheses"
    )]
    #[diagnostic(
        code(egram::parse::illegal_argument_list),
        help("wrap the arguments in parentheses, or add the function to `parser.statement_calls`")
    )]
    IllegalArgumentList { name: SmolStr, span: Span },

    #[error("unexpected token: expected {expected}, found {found}")]
    #[diagnostic(code(egram::parse::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unterminated {construct}: expected '{closer}'")]
    #[diagnostic(
        code(egram::parse::unterminated),
        help("the input ended before this was closed")
    )]
    UnterminatedConstruct {
        construct: &'static str,
        closer: &'static str,
        span: Span,
    },
}

/// The category of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    IllegalCommaList,
    IllegalArgumentList,
    UnexpectedToken,
    UnterminatedConstruct,
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::IllegalCommaList { .. } => ParseErrorKind::IllegalCommaList,
            ParseError::IllegalArgumentList { .. } => ParseErrorKind::IllegalArgumentList,
            ParseError::UnexpectedToken { .. } => ParseErrorKind::UnexpectedToken,
            ParseError::UnterminatedConstruct { .. } => ParseErrorKind::UnterminatedConstruct,
        }
    }

    /// Location of the offending input
    pub fn span(&self) -> Span {
        match self {
            ParseError::IllegalCommaList { span }
            | ParseError::IllegalArgumentList { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::UnterminatedConstruct { span, .. } => *span,
        }
    }
}

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;
