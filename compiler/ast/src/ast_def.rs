//! AST datatypes
//!
//! Every node records the source line it started on.

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Program {
    pub func: Func,
    pub line: usize,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Func {
    pub ident: String,
    pub body: Stmt,
    pub line: usize,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Stmt {
    Return { expr: Expr, line: usize },
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: usize,
}

impl Expr {
    pub fn new(kind: ExprKind, line: usize) -> Self {
        Self { kind, line }
    }

    pub fn constant(val: i32, line: usize) -> Self {
        Self::new(ExprKind::Constant(val), line)
    }

    pub fn unary(op: UnaryOp, expr: Expr, line: usize) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
            line,
        )
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum ExprKind {
    Constant(i32),
    /// The operator shares the expression's line
    Unary { op: UnaryOp, expr: Box<Expr> },
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum UnaryOp {
    Complement,
    Negate,
}
