use lir::*;

use crate::{CodeGenError, CodeGenResult};

/// Reserves the stack frame and rewrites instructions x86-64 cannot encode
pub fn fix_invalid_instructions(assm_ast: &Program, stack_size: i32) -> CodeGenResult<Program> {
    Ok(Program {
        func: fix_func(&assm_ast.func, stack_size)?,
    })
}

fn fix_func(func: &Function, stack_size: i32) -> CodeGenResult<Function> {
    let mut fixed_instr = Vec::with_capacity(func.instructions.len() + 1);

    if stack_size > 0 {
        fixed_instr.push(Instruction::AllocateStack(stack_size));
    }

    for instruction in &func.instructions {
        fix_instruction(instruction, &mut fixed_instr)?;
    }

    Ok(Function {
        name: func.name.clone(),
        instructions: fixed_instr,
    })
}

fn fix_instruction(instruction: &Instruction, fixed_instr: &mut Vec<Instruction>) -> CodeGenResult<()> {
    match instruction {
        // mov can't have a memory address as both source and destination
        Instruction::Mov {
            src: src @ Operand::Stack(_),
            dest: dest @ Operand::Stack(_),
        } => {
            fixed_instr.push(Instruction::Mov {
                src: src.clone(),
                dest: Operand::Register(Register::R10),
            });
            fixed_instr.push(Instruction::Mov {
                src: Operand::Register(Register::R10),
                dest: dest.clone(),
            });
        }
        Instruction::Unary {
            dest: Operand::Imm(_),
            ..
        } => {
            return Err(CodeGenError::new(
                "Unary operation cannot write to an immediate",
                instruction,
            ));
        }
        _ => fixed_instr.push(instruction.clone()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn program(instructions: Vec<Instruction>) -> Program {
        Program {
            func: Function {
                name: "main".to_string(),
                instructions,
            },
        }
    }

    #[test]
    fn stack_to_stack_goes_through_r10() {
        let fixed = fix_invalid_instructions(
            &program(vec![Instruction::Mov {
                src: Operand::Stack(-4),
                dest: Operand::Stack(-8),
            }]),
            8,
        )
        .unwrap();

        assert_eq!(
            fixed.func.instructions,
            vec![
                Instruction::AllocateStack(8),
                Instruction::Mov {
                    src: Operand::Stack(-4),
                    dest: Operand::Register(Register::R10),
                },
                Instruction::Mov {
                    src: Operand::Register(Register::R10),
                    dest: Operand::Stack(-8),
                },
            ]
        );
    }

    #[test]
    fn valid_moves_are_untouched() {
        let instructions = vec![
            Instruction::Mov {
                src: Operand::Imm(5),
                dest: Operand::Stack(-4),
            },
            Instruction::Mov {
                src: Operand::Stack(-4),
                dest: Operand::Register(Register::AX),
            },
            Instruction::Ret,
        ];

        let fixed = fix_invalid_instructions(&program(instructions.clone()), 0).unwrap();

        assert_eq!(fixed.func.instructions, instructions);
    }

    #[test]
    fn unary_on_immediate_is_an_error() {
        let err = fix_invalid_instructions(
            &program(vec![Instruction::Unary {
                op: UnaryOp::Neg,
                dest: Operand::Imm(3),
            }]),
            0,
        )
        .unwrap_err();

        assert_eq!(err.message(), "Unary operation cannot write to an immediate");
    }
}
