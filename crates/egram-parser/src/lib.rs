//! egram Parser
//!
//! Recursive descent parser that produces an AST from the token stream.
//! Its main job is telling apart the forms a bare name can take: a
//! statement-level `Invoke` with unparenthesized arguments, a parenthesized
//! `Call`, a `CallMethod` chain, or a plain `BareWord`.
//!
//! ```
//! use egram_ast::dump::dump;
//!
//! let program = egram_parser::parse("notice fqdn_rand(30)").unwrap();
//! assert_eq!(dump(&program), "(invoke notice (call fqdn_rand 30))");
//! ```

mod args;
mod calls;
mod config;
mod cursor;
mod error;
mod expr;
mod lambda;
mod stmt;

pub use args::Delimiting;
pub use calls::{Callable, Position};
pub use config::{ParserConfig, ParserSettings, DEFAULT_STATEMENT_CALLS};
pub use error::{ParseError, ParseErrorKind, ParseResult};

use egram_ast::Program;
use egram_lexer::{Lexer, LexerError, Token};
use tracing::trace;

/// Parser state
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    lex_errors: Vec<LexerError>,
    config: ParserConfig,
}

impl<'src> Parser<'src> {
    /// Create a new parser with the default configuration
    pub fn new(source: &'src str) -> Self {
        Self::with_config(source, ParserConfig::default())
    }

    /// Create a new parser with an injected configuration
    pub fn with_config(source: &'src str, config: ParserConfig) -> Self {
        let (tokens, lex_errors) = Lexer::new(source).tokenize_filtered();
        trace!(
            tokens = tokens.len(),
            lex_errors = lex_errors.len(),
            "tokenized source"
        );

        Self {
            source,
            tokens,
            pos: 0,
            lex_errors,
            config,
        }
    }
}

/// Parse a source unit with the default configuration
pub fn parse(source: &str) -> ParseResult<Program> {
    Parser::new(source).parse_program()
}

/// Parse a source unit with an injected configuration
pub fn parse_with_config(source: &str, config: ParserConfig) -> ParseResult<Program> {
    Parser::with_config(source, config).parse_program()
}
