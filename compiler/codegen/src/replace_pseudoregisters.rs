use std::collections::HashMap;

use lir::*;

use crate::{CodeGenError, CodeGenResult};

/// Every temporary is a 32-bit int
const SLOT_SIZE: i32 = 4;

/// Stack slots handed out while resolving a single function
#[derive(Debug, Default)]
struct PseudoReplacer {
    // Offset from rbp of the last slot handed out
    current_offset: i32,
    offset_map: HashMap<String, i32>,
}

/// Replaces every pseudo-register with a stack slot, returning the resolved
/// program and the number of bytes of stack it needs
pub fn replace_pseudos(assm_ast: &Program) -> CodeGenResult<(Program, i32)> {
    let (func, stack_size) = replace_func(&assm_ast.func)?;

    Ok((Program { func }, stack_size))
}

fn replace_func(func: &Function) -> CodeGenResult<(Function, i32)> {
    let mut state = PseudoReplacer::default();

    let instructions = func
        .instructions
        .iter()
        .map(|instr| state.replace_instruction(instr))
        .collect::<CodeGenResult<Vec<_>>>()?;

    Ok((
        Function {
            name: func.name.clone(),
            instructions,
        },
        -state.current_offset,
    ))
}

impl PseudoReplacer {
    fn replace_instruction(&mut self, instruction: &Instruction) -> CodeGenResult<Instruction> {
        match instruction {
            Instruction::Mov { src, dest } => Ok(Instruction::Mov {
                src: self.replace_operand(src)?,
                dest: self.replace_operand(dest)?,
            }),
            Instruction::Unary { op, dest } => Ok(Instruction::Unary {
                op: *op,
                dest: self.replace_operand(dest)?,
            }),
            Instruction::AllocateStack(_) => Err(CodeGenError::new(
                "Stack already allocated before pseudo-register replacement",
                instruction,
            )),
            Instruction::Ret => Ok(Instruction::Ret),
        }
    }

    fn replace_operand(&mut self, operand: &Operand) -> CodeGenResult<Operand> {
        match operand {
            Operand::Pseudo(var) => {
                let offset = match self.offset_map.get(var) {
                    // Already assigned operand a stack slot
                    Some(offset) => *offset,
                    None => {
                        self.current_offset -= SLOT_SIZE;
                        self.offset_map.insert(var.clone(), self.current_offset);
                        self.current_offset
                    }
                };

                Ok(Operand::Stack(offset))
            }
            Operand::Stack(_) => Err(CodeGenError::new(
                "Operand already resolved to a stack slot",
                operand,
            )),
            Operand::Imm(_) | Operand::Register(_) => Ok(operand.clone()),
        }
    }
}
