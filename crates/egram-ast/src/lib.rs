//! egram Abstract Syntax Tree
//!
//! Defines the AST node types produced by `egram-parser`. Statements and
//! expressions are separate types: a statement-level `Invoke` can never be
//! nested inside an expression.

pub mod dump;

// Re-export common types for use by other crates
pub use egram_lexer::Span;
pub use smol_str::SmolStr;

/// A spanned value - wraps any value with source location info
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    pub fn dummy(node: T) -> Self {
        Self {
            node,
            span: Span::dummy(),
        }
    }
}

/// Identifier (function names, method names, lambda parameters)
pub type Ident = Spanned<SmolStr>;

// ============================================================================
// Program Structure
// ============================================================================

/// A complete egram source unit
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Block,
}

/// Ordered statement sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

/// Lambda block attached to a call: `|$x, $y| { ... }` or `|| { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    /// Parameter names, without the leading `$`
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Statement-level call, result discarded: `notice 'hi'`, `foo(1)`
    Invoke {
        callee: Ident,
        args: Vec<Expr>,
        lambda: Option<Lambda>,
    },

    /// Assignment: `$a = expr`, `$h['k'] = expr`
    Assign { target: Expr, value: Expr },

    /// `if cond { ... } elsif cond { ... } else { ... }`
    ///
    /// An `elsif` is an `If` nested as the sole statement of `else_branch`.
    If {
        condition: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },

    /// `unless cond { ... } else { ... }`
    Unless {
        condition: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },

    /// Expression in statement position
    Expr(Expr),
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Function call with a parenthesized argument list: `foo(1, 2)`
    Call {
        callee: Ident,
        args: Vec<Expr>,
        lambda: Option<Lambda>,
    },

    /// Method call: `$a.foo`, `$a.foo(1) |$x| { ... }`
    CallMethod {
        receiver: Box<Expr>,
        method: Ident,
        args: Vec<Expr>,
        lambda: Option<Lambda>,
    },

    /// Identifier with no call syntax
    BareWord(SmolStr),

    /// Capitalized reference: `File`, `Apache::Vhost`
    ClassRef(SmolStr),

    /// Variable reference, name without the `$`
    Variable(SmolStr),

    Literal(Literal),

    /// `[a, b, c]`
    Array(Vec<Expr>),

    /// `{ k => v, ... }`
    Hash(Vec<(Expr, Expr)>),

    /// `target[key, ...]` (the `[` must touch the target)
    Access {
        target: Box<Expr>,
        keys: Vec<Expr>,
    },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
}

/// Literal values. Numbers keep their source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(SmolStr),
    Float(SmolStr),
    String(SmolStr),
    Boolean(bool),
    Undef,
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Logical
    And,
    Or,

    // Other
    In,
}

impl BinaryOp {
    /// Operator symbol as printed by the dumper
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::In => "in",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}
