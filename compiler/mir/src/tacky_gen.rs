use unique_ident::NameGen;

use crate::tacky;

pub fn gen_tacky(ast: &ast::Program) -> tacky::TranslationUnit {
    tacky::TranslationUnit {
        func: tacky_func(&ast.func),
    }
}

fn tacky_func(func: &ast::Func) -> tacky::Func {
    // temporaries are numbered per function
    let mut names = NameGen::new();

    tacky::Func {
        name: func.ident.clone(),
        instructions: tacky_stmt(&func.body, &mut names),
    }
}

fn tacky_stmt(stmt: &ast::Stmt, names: &mut NameGen) -> Vec<tacky::Instruction> {
    match stmt {
        ast::Stmt::Return { expr, .. } => {
            let (mut instructions, value) = tacky_expr(expr, names);

            instructions.push(tacky::Instruction::Return(value));

            instructions
        }
    }
}

fn tacky_expr(expr: &ast::Expr, names: &mut NameGen) -> (Vec<tacky::Instruction>, tacky::Val) {
    match &expr.kind {
        ast::ExprKind::Constant(val) => (vec![], tacky::Val::Constant(*val)),
        ast::ExprKind::Unary { op, expr } => {
            let (mut instructions, inner) = tacky_expr(expr, names);
            let dest = tacky::Val::Var(names.make_temp());

            instructions.push(tacky::Instruction::Unary {
                op: tacky_unop(*op),
                src: inner,
                dest: dest.clone(),
            });

            (instructions, dest)
        }
    }
}

fn tacky_unop(op: ast::UnaryOp) -> tacky::UnaryOp {
    match op {
        ast::UnaryOp::Complement => tacky::UnaryOp::Complement,
        ast::UnaryOp::Negate => tacky::UnaryOp::Negate,
    }
}
