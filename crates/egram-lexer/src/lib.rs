//! egram Lexer
//!
//! Tokenizes egram source text. Uses the `logos` crate for lexing.
//! Newlines are kept as tokens because they terminate statements;
//! spaces and tabs are skipped.

use logos::Logos;
use smol_str::SmolStr;
use std::fmt;
use std::ops::Range;

/// Source span representing a range in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A token with its kind and source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Consumes a `/* ... */` comment. Fails when the closing `*/` is missing.
fn block_comment_callback(lex: &mut logos::Lexer<TokenKind>) -> Option<SmolStr> {
    let remainder = lex.remainder();
    let end_idx = remainder.find("*/")?;
    let content = &remainder[..end_idx];
    lex.bump(end_idx + 2);
    Some(SmolStr::new(content))
}

/// Strips the surrounding quotes and resolves escapes.
///
/// Single quoted strings only know `\\` and `\'`; double quoted strings
/// also resolve `\n`, `\t`, `\r`, `\"` and `\$`. Unknown escapes are kept
/// verbatim.
fn unquote(raw: &str, quote: char) -> SmolStr {
    let inner = &raw[1..raw.len() - 1];
    if !inner.contains('\\') {
        return SmolStr::new(inner);
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match (chars.next(), quote) {
            (Some('\\'), _) => out.push('\\'),
            (Some(q), _) if q == quote => out.push(q),
            (Some('n'), '"') => out.push('\n'),
            (Some('t'), '"') => out.push('\t'),
            (Some('r'), '"') => out.push('\r'),
            (Some('$'), '"') => out.push('$'),
            (Some(other), _) => {
                out.push('\\');
                out.push(other);
            }
            (None, _) => out.push('\\'),
        }
    }
    SmolStr::new(out)
}

/// All token types in the egram language
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip whitespace (but not newlines)
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("if")]
    If,
    #[token("elsif")]
    Elsif,
    #[token("else")]
    Else,
    #[token("unless")]
    Unless,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("undef")]
    Undef,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("in")]
    In,

    // ========== Operators ==========
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("=>")]
    FatArrow,

    // ========== Delimiters ==========
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    /// Lambda parameter delimiter: `|$x|`
    #[token("|")]
    Pipe,
    /// Empty lambda parameter list: `||`
    #[token("||")]
    PipePipe,

    // ========== Literals ==========
    #[regex(r"[0-9]+", |lex| SmolStr::new(lex.slice()))]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| SmolStr::new(lex.slice()))]
    Integer(SmolStr),

    #[regex(r"[0-9]+\.[0-9]+(?:[eE][+-]?[0-9]+)?", |lex| SmolStr::new(lex.slice()))]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| SmolStr::new(lex.slice()))]
    Float(SmolStr),

    /// Single quoted string, quotes stripped and escapes resolved
    #[regex(r"'(?:[^'\\]|\\.)*'", |lex| unquote(lex.slice(), '\''))]
    SingleQuoted(SmolStr),

    /// Double quoted string, quotes stripped and escapes resolved
    #[regex(r#""(?:[^"\\]|\\.)*""#, |lex| unquote(lex.slice(), '"'))]
    DoubleQuoted(SmolStr),

    // ========== Names ==========
    /// Lowercase, optionally qualified name: `notice`, `apache::vhost`, `::top`
    #[regex(r"(?:::)?[a-z][a-zA-Z0-9_]*(?:::[a-z][a-zA-Z0-9_]*)*", |lex| SmolStr::new(lex.slice()))]
    Name(SmolStr),

    /// Capitalized, optionally qualified reference: `File`, `Apache::Vhost`
    #[regex(r"(?:::)?[A-Z][a-zA-Z0-9_]*(?:::[A-Z][a-zA-Z0-9_]*)*", |lex| SmolStr::new(lex.slice()))]
    ClassRef(SmolStr),

    /// Variable reference; the payload excludes the `$`
    #[regex(r"\$(?:::)?[a-zA-Z0-9_]+(?:::[a-zA-Z0-9_]+)*", |lex| SmolStr::new(&lex.slice()[1..]))]
    Variable(SmolStr),

    // ========== Comments ==========
    #[regex(r"#[^\n]*", |lex| SmolStr::new(lex.slice()))]
    LineComment(SmolStr),

    #[token("/*", block_comment_callback)]
    BlockComment(SmolStr),

    // ========== Whitespace ==========
    /// Newline (terminates statements)
    #[token("\n")]
    Newline,

    // ========== Error ==========
    /// Lexer error - unrecognized input
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::If => write!(f, "if"),
            TokenKind::Elsif => write!(f, "elsif"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::Unless => write!(f, "unless"),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::Undef => write!(f, "undef"),
            TokenKind::And => write!(f, "and"),
            TokenKind::Or => write!(f, "or"),
            TokenKind::In => write!(f, "in"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::FatArrow => write!(f, "=>"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semi => write!(f, ";"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::PipePipe => write!(f, "||"),
            TokenKind::Integer(s) => write!(f, "integer `{}`", s),
            TokenKind::Float(s) => write!(f, "float `{}`", s),
            TokenKind::SingleQuoted(s) => write!(f, "string '{}'", s),
            TokenKind::DoubleQuoted(s) => write!(f, "string \"{}\"", s),
            TokenKind::Name(s) => write!(f, "name `{}`", s),
            TokenKind::ClassRef(s) => write!(f, "reference `{}`", s),
            TokenKind::Variable(s) => write!(f, "variable `${}`", s),
            TokenKind::LineComment(_) => write!(f, "comment"),
            TokenKind::BlockComment(_) => write!(f, "block comment"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Error => write!(f, "invalid input"),
        }
    }
}

impl TokenKind {
    /// Check if this token is a comment
    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment(_) | TokenKind::BlockComment(_))
    }
}

/// Lexer error type with detailed error messages
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Unexpected character '{1}' at position {0}")]
    UnexpectedCharacter(usize, char),

    #[error("Unterminated string literal starting at position {0}")]
    UnterminatedString(usize),

    #[error("Unterminated block comment starting at position {0} - expected closing '*/'")]
    UnterminatedBlockComment(usize),
}

impl LexerError {
    /// Byte offset where the error starts
    pub fn position(&self) -> usize {
        match self {
            LexerError::UnexpectedCharacter(pos, _)
            | LexerError::UnterminatedString(pos)
            | LexerError::UnterminatedBlockComment(pos) => *pos,
        }
    }
}

/// Lexer for egram source code
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, TokenKind>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            inner: TokenKind::lexer(source),
        }
    }

    fn classify_error(source: &str, span: &Range<usize>) -> LexerError {
        let text = &source[span.clone()];
        if text.starts_with("/*") {
            return LexerError::UnterminatedBlockComment(span.start);
        }
        let bad_char = text.chars().next().unwrap_or('?');
        match bad_char {
            '\'' | '"' => LexerError::UnterminatedString(span.start),
            _ => LexerError::UnexpectedCharacter(span.start, bad_char),
        }
    }

    /// Tokenize the entire source into a vector of tokens.
    ///
    /// Invalid input becomes a `TokenKind::Error` token plus a matching
    /// entry in the error list, so the parser can report it in place.
    pub fn tokenize(self) -> (Vec<Token>, Vec<LexerError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        for (result, span) in self.inner.spanned() {
            match result {
                Ok(kind) => tokens.push(Token::new(kind, Span::from(span))),
                Err(_) => {
                    errors.push(Self::classify_error(self.source, &span));
                    tokens.push(Token::new(TokenKind::Error, Span::from(span)));
                }
            }
        }

        (tokens, errors)
    }

    /// Tokenize, filtering out comments (newlines are kept)
    pub fn tokenize_filtered(self) -> (Vec<Token>, Vec<LexerError>) {
        let (tokens, errors) = self.tokenize();
        let filtered: Vec<Token> = tokens
            .into_iter()
            .filter(|t| !t.kind.is_comment())
            .collect();
        (filtered, errors)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = std::result::Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|result| {
            let span = self.inner.span();
            result
                .map(|kind| Token::new(kind, Span::from(span.clone())))
                .map_err(|_| Self::classify_error(self.source, &span))
        })
    }
}
