//! Tree dumper
//!
//! Renders AST nodes as parenthesized prefix forms, e.g.
//! `(invoke notice (call fqdn_rand 30))`. The output is used by tests and
//! by `egram parse`, so its layout is kept stable.
//!
//! A node is first lowered to a tree of [`Part`]s and then formatted.
//! Lists are parenthesized and their elements separated by one space,
//! except after `(` or whitespace and before `)`. A [`Part::Break`]
//! starts a new line indented by two spaces per open [`Part::Indent`].

use crate::*;

/// Layout tree produced by [`Dump::to_part`]
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    List(Vec<Part>),
    Break,
    Indent,
    Dedent,
}

impl Part {
    fn text(s: impl Into<String>) -> Part {
        Part::Text(s.into())
    }

    fn empty() -> Part {
        Part::List(Vec::new())
    }
}

/// Nodes that can be rendered by [`dump`]
pub trait Dump {
    fn to_part(&self) -> Part;
}

/// Render a node in the parenthesized dump format
pub fn dump<T: Dump + ?Sized>(node: &T) -> String {
    format(&node.to_part())
}

/// Format a layout tree into its textual form
pub fn format(part: &Part) -> String {
    let mut pieces = Vec::new();
    let mut indent = 0usize;
    flatten(part, &mut indent, &mut pieces);

    let mut out = String::new();
    for (i, piece) in pieces.iter().enumerate() {
        if i > 0 && needs_space(&pieces[i - 1], piece) {
            out.push(' ');
        }
        out.push_str(piece);
    }
    out
}

fn flatten(part: &Part, indent: &mut usize, out: &mut Vec<String>) {
    match part {
        Part::Text(s) => out.push(s.clone()),
        Part::List(items) => {
            out.push("(".to_string());
            for item in items {
                flatten(item, indent, out);
            }
            out.push(")".to_string());
        }
        Part::Break => out.push(format!("\n{}", "  ".repeat(*indent))),
        Part::Indent => *indent += 1,
        Part::Dedent => *indent = indent.saturating_sub(1),
    }
}

fn needs_space(prev: &str, next: &str) -> bool {
    next != ")"
        && !prev.ends_with(|c: char| c.is_whitespace() || c == '(')
        && !next.starts_with(char::is_whitespace)
}

/// `(block` + one statement per line + `)` on its own line
fn block_part(block: &Block) -> Part {
    let mut parts = vec![Part::text("block"), Part::Indent];
    for stmt in &block.stmts {
        parts.push(Part::Break);
        parts.push(stmt.to_part());
    }
    parts.push(Part::Dedent);
    parts.push(Part::Break);
    Part::List(parts)
}

/// Empty → `()`, one statement → the statement, more → a block
fn compact_part(block: &Block) -> Part {
    match block.stmts.as_slice() {
        [] => Part::empty(),
        [single] => single.to_part(),
        _ => block_part(block),
    }
}

fn conditional_part(
    keyword: &str,
    condition: &Expr,
    then_branch: &Block,
    else_branch: Option<&Block>,
) -> Part {
    let mut parts = vec![
        Part::text(keyword),
        condition.to_part(),
        Part::Indent,
        Part::Break,
        Part::List(vec![
            Part::text("then"),
            Part::Indent,
            compact_part(then_branch),
            Part::Dedent,
        ]),
    ];
    if let Some(else_branch) = else_branch {
        parts.push(Part::Break);
        parts.push(Part::List(vec![
            Part::text("else"),
            Part::Indent,
            compact_part(else_branch),
            Part::Dedent,
        ]));
    }
    parts.push(Part::Dedent);
    Part::List(parts)
}

fn call_part(head: &str, callee: Part, args: &[Expr], lambda: Option<&Lambda>) -> Part {
    let mut parts = vec![Part::text(head), callee];
    parts.extend(args.iter().map(Dump::to_part));
    if let Some(lambda) = lambda {
        parts.push(lambda.to_part());
    }
    Part::List(parts)
}

impl Dump for Program {
    fn to_part(&self) -> Part {
        compact_part(&self.body)
    }
}

impl Dump for Block {
    fn to_part(&self) -> Part {
        block_part(self)
    }
}

impl Dump for Lambda {
    fn to_part(&self) -> Part {
        let mut parts = vec![Part::text("lambda")];
        if !self.params.is_empty() {
            let mut params = vec![Part::text("parameters")];
            params.extend(self.params.iter().map(|p| Part::text(p.node.as_str())));
            parts.push(Part::List(params));
        }
        if self.body.is_empty() {
            parts.push(Part::empty());
        } else {
            parts.push(block_part(&self.body));
        }
        Part::List(parts)
    }
}

impl Dump for Stmt {
    fn to_part(&self) -> Part {
        match &self.kind {
            StmtKind::Invoke {
                callee,
                args,
                lambda,
            } => call_part(
                "invoke",
                Part::text(callee.node.as_str()),
                args,
                lambda.as_ref(),
            ),
            StmtKind::Assign { target, value } => {
                Part::List(vec![Part::text("="), target.to_part(), value.to_part()])
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => conditional_part("if", condition, then_branch, else_branch.as_ref()),
            StmtKind::Unless {
                condition,
                then_branch,
                else_branch,
            } => conditional_part("unless", condition, then_branch, else_branch.as_ref()),
            StmtKind::Expr(expr) => expr.to_part(),
        }
    }
}

impl Dump for Expr {
    fn to_part(&self) -> Part {
        match &self.kind {
            ExprKind::Call {
                callee,
                args,
                lambda,
            } => call_part(
                "call",
                Part::text(callee.node.as_str()),
                args,
                lambda.as_ref(),
            ),
            ExprKind::CallMethod {
                receiver,
                method,
                args,
                lambda,
            } => {
                let functor = Part::List(vec![
                    Part::text("."),
                    receiver.to_part(),
                    Part::text(method.node.as_str()),
                ]);
                call_part("call-method", functor, args, lambda.as_ref())
            }
            ExprKind::BareWord(name) | ExprKind::ClassRef(name) => Part::text(name.as_str()),
            ExprKind::Variable(name) => Part::text(format!("${}", name)),
            ExprKind::Literal(literal) => literal.to_part(),
            ExprKind::Array(items) => {
                let mut parts = vec![Part::text("[]")];
                parts.extend(items.iter().map(Dump::to_part));
                Part::List(parts)
            }
            ExprKind::Hash(entries) => {
                let mut parts = vec![Part::text("{}")];
                parts.extend(entries.iter().map(|(k, v)| {
                    Part::List(vec![Part::text("=>"), k.to_part(), v.to_part()])
                }));
                Part::List(parts)
            }
            ExprKind::Access { target, keys } => {
                let mut parts = vec![Part::text("slice"), target.to_part()];
                parts.extend(keys.iter().map(Dump::to_part));
                Part::List(parts)
            }
            ExprKind::Binary { op, left, right } => {
                Part::List(vec![Part::text(op.as_str()), left.to_part(), right.to_part()])
            }
            ExprKind::Unary { op, operand } => {
                Part::List(vec![Part::text(op.as_str()), operand.to_part()])
            }
        }
    }
}

impl Dump for Literal {
    fn to_part(&self) -> Part {
        match self {
            Literal::Integer(text) | Literal::Float(text) => Part::text(text.as_str()),
            Literal::String(value) => Part::text(format!("'{}'", value)),
            Literal::Boolean(true) => Part::text("true"),
            Literal::Boolean(false) => Part::text("false"),
            Literal::Undef => Part::text("undef"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ident(name: &str) -> Ident {
        Spanned::dummy(SmolStr::new(name))
    }

    fn expr(kind: ExprKind) -> Expr {
        Expr::new(kind, Span::dummy())
    }

    fn var(name: &str) -> Expr {
        expr(ExprKind::Variable(name.into()))
    }

    fn bare(name: &str) -> Expr {
        expr(ExprKind::BareWord(name.into()))
    }

    fn int(text: &str) -> Expr {
        expr(ExprKind::Literal(Literal::Integer(text.into())))
    }

    fn stmt(kind: StmtKind) -> Stmt {
        Stmt::new(kind, Span::dummy())
    }

    fn assign(target: Expr, value: Expr) -> Stmt {
        stmt(StmtKind::Assign { target, value })
    }

    fn block(stmts: Vec<Stmt>) -> Block {
        Block::new(stmts, Span::dummy())
    }

    fn program(stmts: Vec<Stmt>) -> Program {
        Program { body: block(stmts) }
    }

    fn method(receiver: Expr, name: &str, lambda: Option<Lambda>) -> Expr {
        expr(ExprKind::CallMethod {
            receiver: Box::new(receiver),
            method: ident(name),
            args: Vec::new(),
            lambda,
        })
    }

    #[test]
    fn test_format_spacing_rules() {
        let part = Part::List(vec![
            Part::text("a"),
            Part::List(vec![Part::text("b"), Part::text("c")]),
            Part::empty(),
        ]);
        assert_eq!(format(&part), "(a (b c) ())");
    }

    #[test]
    fn test_format_break_indents() {
        let part = Part::List(vec![
            Part::text("x"),
            Part::Indent,
            Part::Break,
            Part::text("y"),
            Part::Dedent,
            Part::Break,
        ]);
        assert_eq!(format(&part), "(x\n  y\n)");
    }

    #[test]
    fn test_atoms() {
        assert_eq!(dump(&var("a")), "$a");
        assert_eq!(dump(&bare("foo")), "foo");
        assert_eq!(dump(&expr(ExprKind::ClassRef("File".into()))), "File");
        assert_eq!(dump(&int("30")), "30");
        assert_eq!(
            dump(&expr(ExprKind::Literal(Literal::String("hi there".into())))),
            "'hi there'"
        );
        assert_eq!(dump(&expr(ExprKind::Literal(Literal::Boolean(true)))), "true");
        assert_eq!(dump(&expr(ExprKind::Literal(Literal::Undef))), "undef");
    }

    #[test]
    fn test_invoke_and_call() {
        let call = expr(ExprKind::Call {
            callee: ident("fqdn_rand"),
            args: vec![int("30")],
            lambda: None,
        });
        let invoke = stmt(StmtKind::Invoke {
            callee: ident("notice"),
            args: vec![call],
            lambda: None,
        });
        assert_eq!(dump(&invoke), "(invoke notice (call fqdn_rand 30))");

        let bare_invoke = stmt(StmtKind::Invoke {
            callee: ident("foo"),
            args: Vec::new(),
            lambda: None,
        });
        assert_eq!(dump(&bare_invoke), "(invoke foo)");
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(dump(&program(Vec::new())), "()");
    }

    #[test]
    fn test_program_with_several_statements_is_a_block() {
        let p = program(vec![
            assign(var("a"), bare("foo")),
            stmt(StmtKind::Expr(bare("bar"))),
        ]);
        assert_eq!(dump(&p), "(block\n  (= $a foo)\n  bar\n)");
    }

    #[test]
    fn test_method_call_forms() {
        assert_eq!(dump(&method(var("a"), "foo", None)), "(call-method (. $a foo))");

        let empty = Lambda {
            params: Vec::new(),
            body: block(Vec::new()),
            span: Span::dummy(),
        };
        assert_eq!(
            dump(&method(var("a"), "foo", Some(empty))),
            "(call-method (. $a foo) (lambda ()))"
        );

        let with_param = Lambda {
            params: vec![ident("x")],
            body: block(Vec::new()),
            span: Span::dummy(),
        };
        assert_eq!(
            dump(&method(var("a"), "foo", Some(with_param))),
            "(call-method (. $a foo) (lambda (parameters x) ()))"
        );
    }

    #[test]
    fn test_lambda_body_is_always_a_block() {
        let lambda = Lambda {
            params: vec![ident("x")],
            body: block(vec![assign(var("b"), var("x"))]),
            span: Span::dummy(),
        };
        insta::assert_snapshot!(dump(&method(var("a"), "foo", Some(lambda))), @r"
(call-method (. $a foo) (lambda (parameters x) (block
  (= $b $x)
)))
");
    }

    #[test]
    fn test_if_then_else() {
        let invoke_foo = stmt(StmtKind::Invoke {
            callee: ident("foo"),
            args: Vec::new(),
            lambda: None,
        });
        let if_only = stmt(StmtKind::If {
            condition: expr(ExprKind::Literal(Literal::Boolean(true))),
            then_branch: block(vec![invoke_foo.clone()]),
            else_branch: None,
        });
        assert_eq!(dump(&if_only), "(if true\n  (then (invoke foo)))");

        let with_else = stmt(StmtKind::Unless {
            condition: var("x"),
            then_branch: block(Vec::new()),
            else_branch: Some(block(vec![invoke_foo])),
        });
        assert_eq!(
            dump(&with_else),
            "(unless $x\n  (then ())\n  (else (invoke foo)))"
        );
    }

    #[test]
    fn test_nested_block_indentation() {
        let inner = stmt(StmtKind::If {
            condition: var("x"),
            then_branch: block(vec![
                stmt(StmtKind::Expr(bare("a"))),
                stmt(StmtKind::Expr(bare("b"))),
            ]),
            else_branch: None,
        });
        insta::assert_snapshot!(dump(&inner), @r"
(if $x
  (then (block
      a
      b
    )))
");
    }

    #[test]
    fn test_collections_and_operators() {
        let array = expr(ExprKind::Array(vec![int("1"), int("2")]));
        assert_eq!(dump(&array), "([] 1 2)");

        let hash = expr(ExprKind::Hash(vec![(
            expr(ExprKind::Literal(Literal::String("k".into()))),
            var("v"),
        )]));
        assert_eq!(dump(&hash), "({} (=> 'k' $v))");

        let access = expr(ExprKind::Access {
            target: Box::new(var("h")),
            keys: vec![int("0")],
        });
        assert_eq!(dump(&access), "(slice $h 0)");

        let and = expr(ExprKind::Binary {
            op: BinaryOp::And,
            left: Box::new(var("a")),
            right: Box::new(expr(ExprKind::Unary {
                op: UnaryOp::Not,
                operand: Box::new(var("b")),
            })),
        });
        assert_eq!(dump(&and), "(&& $a (! $b))");
    }
}
