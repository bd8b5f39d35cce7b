use std::fmt::{Display, Formatter, Result};

use crate::ast_def::*;

/// Renders the tree one node per line, each level indented by one `-`
impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Program, ln {}", self.line)?;
        write_func(f, &self.func, 1)
    }
}

fn write_func(f: &mut Formatter<'_>, func: &Func, depth: usize) -> Result {
    writeln!(f, "{}Function({}), ln {}", indent(depth), func.ident, func.line)?;
    write_stmt(f, &func.body, depth + 1)
}

fn write_stmt(f: &mut Formatter<'_>, stmt: &Stmt, depth: usize) -> Result {
    match stmt {
        Stmt::Return { expr, line } => {
            writeln!(f, "{}Return, ln {}", indent(depth), line)?;
            write_expr(f, expr, depth + 1)
        }
    }
}

fn write_expr(f: &mut Formatter<'_>, expr: &Expr, depth: usize) -> Result {
    match &expr.kind {
        ExprKind::Constant(val) => {
            writeln!(f, "{}Constant({}), ln {}", indent(depth), val, expr.line)
        }
        ExprKind::Unary { op, expr: inner } => {
            writeln!(f, "{}{}, ln {}", indent(depth), op, expr.line)?;
            write_expr(f, inner, depth + 1)
        }
    }
}

fn indent(depth: usize) -> String {
    "-".repeat(depth)
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            UnaryOp::Complement => write!(f, "Complement"),
            UnaryOp::Negate => write!(f, "Negate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn nested_unary_tree() {
        let program = Program {
            func: Func {
                ident: "main".to_string(),
                body: Stmt::Return {
                    expr: Expr::unary(
                        UnaryOp::Negate,
                        Expr::unary(UnaryOp::Complement, Expr::constant(4, 2), 2),
                        2,
                    ),
                    line: 2,
                },
                line: 1,
            },
            line: 1,
        };

        let expected = indoc! {"
            Program, ln 1
            -Function(main), ln 1
            --Return, ln 2
            ---Negate, ln 2
            ----Complement, ln 2
            -----Constant(4), ln 2
        "};

        assert_eq!(program.to_string(), expected);
    }
}
