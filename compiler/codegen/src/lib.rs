use lir::*;
use mir::tacky;

pub use crate::codegen_err::{CodeGenError, CodeGenResult};
pub use crate::fix_instructions::fix_invalid_instructions;
pub use crate::replace_pseudoregisters::replace_pseudos;

mod codegen_err;
mod fix_instructions;
mod replace_pseudoregisters;

/// Lowers TACKY to assembly with every operand resolved to a concrete location
pub fn gen_assm(tacky: &tacky::TranslationUnit) -> CodeGenResult<Program> {
    let selected = select_instructions(tacky)?;

    let (replaced, stack_size) = replace_pseudos(&selected)?;

    fix_invalid_instructions(&replaced, stack_size)
}

/// Translates each TACKY instruction on its own, leaving temporaries as pseudos
pub fn select_instructions(tacky: &tacky::TranslationUnit) -> CodeGenResult<Program> {
    Ok(Program {
        func: gen_func(&tacky.func)?,
    })
}

fn gen_func(func: &tacky::Func) -> CodeGenResult<Function> {
    Ok(Function {
        name: func.name.clone(),
        instructions: gen_instructions(&func.instructions)?,
    })
}

fn gen_instructions(instructions: &[tacky::Instruction]) -> CodeGenResult<Vec<Instruction>> {
    let mut assm_instr = vec![];

    for i in instructions {
        match i {
            tacky::Instruction::Return(val) => {
                assm_instr.push(Instruction::Mov {
                    src: gen_operand(val),
                    dest: Operand::Register(Register::AX),
                });
                assm_instr.push(Instruction::Ret);
            }
            tacky::Instruction::Unary { op, src, dest } => {
                let dest = match dest {
                    tacky::Val::Var(_) => gen_operand(dest),
                    tacky::Val::Constant(_) => {
                        return Err(CodeGenError::new(
                            "Unary destination must be a variable",
                            i,
                        ))
                    }
                };

                // always copied first, even when the source is already in place
                assm_instr.push(Instruction::Mov {
                    src: gen_operand(src),
                    dest: dest.clone(),
                });
                assm_instr.push(Instruction::Unary {
                    op: gen_unary(op),
                    dest,
                });
            }
        }
    }

    Ok(assm_instr)
}

fn gen_unary(operator: &tacky::UnaryOp) -> UnaryOp {
    match operator {
        tacky::UnaryOp::Complement => UnaryOp::Not,
        tacky::UnaryOp::Negate => UnaryOp::Neg,
    }
}

fn gen_operand(operand: &tacky::Val) -> Operand {
    match operand {
        tacky::Val::Constant(val) => Operand::Imm(*val),
        tacky::Val::Var(var) => Operand::Pseudo(var.clone()),
    }
}
