use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use itertools::Itertools;
use lir::*;

type IOResult = std::io::Result<()>;

/// Writes the listing for `assm` to a new file at `path`
pub fn output(path: impl AsRef<Path>, assm: &Program) -> IOResult {
    let output = File::create(path)?;
    let mut writer = BufWriter::new(output);

    emit_program(&mut writer, assm)?;

    writer.flush()
}

/// Renders `assm` into an in-memory listing
pub fn assembly_text(assm: &Program) -> std::io::Result<String> {
    let mut buf = Vec::new();
    emit_program(&mut buf, assm)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Renders a fully resolved program as GNU assembler text
pub fn emit_program<W: Write>(writer: &mut W, assm: &Program) -> IOResult {
    emit_func(writer, &assm.func)?;
    emit_stack_note(writer)
}

fn emit_func<W: Write>(writer: &mut W, func: &Function) -> IOResult {
    writeln!(writer, "\t.globl {}", func.name)?;
    writeln!(writer, "{}:", func.name)?;
    writeln!(writer, "\tpushq %rbp")?;
    writeln!(writer, "\tmovq %rsp, %rbp")?;

    for instruction in &func.instructions {
        emit_instruction(writer, instruction)?;
    }

    Ok(())
}

fn emit_instruction<W: Write>(writer: &mut W, instruction: &Instruction) -> IOResult {
    match instruction {
        Instruction::Mov { src, dest } => emit_insn(writer, "movl", &[src, dest]),
        Instruction::Unary { op, dest } => emit_insn(writer, show_unary(op), &[dest]),
        Instruction::AllocateStack(amt) => writeln!(writer, "\tsubq ${}, %rsp", amt),
        Instruction::Ret => {
            writeln!(writer, "\tmovq %rbp, %rsp")?;
            writeln!(writer, "\tpopq %rbp")?;
            writeln!(writer, "\tret")
        }
    }
}

fn emit_insn<W: Write>(writer: &mut W, mnemonic: &str, operands: &[&Operand]) -> IOResult {
    let operands = operands.iter().map(|op| show_operand(op)).join(", ");

    writeln!(writer, "\t{} {}", mnemonic, operands)
}

fn show_unary(op: &UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "negl",
        UnaryOp::Not => "notl",
    }
}

fn show_operand(op: &Operand) -> String {
    match op {
        Operand::Register(reg) => show_register(reg).to_string(),
        Operand::Stack(offset) => format!("{}(%rbp)", offset),
        Operand::Imm(val) => format!("${}", val),
        Operand::Pseudo(name) => panic!(
            "Internal error: pseudo-register '{}' reached emission unresolved",
            name
        ),
    }
}

fn show_register(reg: &Register) -> &'static str {
    match reg {
        Register::AX => "%eax",
        Register::R10 => "%r10d",
    }
}

fn emit_stack_note<W: Write>(writer: &mut W) -> IOResult {
    writeln!(writer, ".section .note.GNU-stack,\"\",@progbits")
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use mir::tacky;

    fn render(program: &Program) -> String {
        assembly_text(program).unwrap()
    }

    fn program(instructions: Vec<Instruction>) -> Program {
        Program {
            func: Function {
                name: "main".to_string(),
                instructions,
            },
        }
    }

    #[test]
    fn return_zero() {
        let assm = program(vec![
            Instruction::Mov {
                src: Operand::Imm(0),
                dest: Operand::Register(Register::AX),
            },
            Instruction::Ret,
        ]);

        let expected = indoc! {r#"
            	.globl main
            main:
            	pushq %rbp
            	movq %rsp, %rbp
            	movl $0, %eax
            	movq %rbp, %rsp
            	popq %rbp
            	ret
            .section .note.GNU-stack,"",@progbits
        "#};

        assert_eq!(render(&assm), expected);
    }

    #[test]
    fn stack_operands_and_unary() {
        let tacky = tacky::TranslationUnit {
            func: tacky::Func {
                name: "main".to_string(),
                instructions: vec![
                    tacky::Instruction::Unary {
                        op: tacky::UnaryOp::Complement,
                        src: tacky::Val::Constant(2),
                        dest: tacky::Val::Var("tmp.0".to_string()),
                    },
                    tacky::Instruction::Unary {
                        op: tacky::UnaryOp::Negate,
                        src: tacky::Val::Var("tmp.0".to_string()),
                        dest: tacky::Val::Var("tmp.1".to_string()),
                    },
                    tacky::Instruction::Return(tacky::Val::Var("tmp.1".to_string())),
                ],
            },
        };
        let assm = codegen::gen_assm(&tacky).unwrap();

        let expected = indoc! {r#"
            	.globl main
            main:
            	pushq %rbp
            	movq %rsp, %rbp
            	subq $8, %rsp
            	movl $2, -4(%rbp)
            	notl -4(%rbp)
            	movl -4(%rbp), %r10d
            	movl %r10d, -8(%rbp)
            	negl -8(%rbp)
            	movl -8(%rbp), %eax
            	movq %rbp, %rsp
            	popq %rbp
            	ret
            .section .note.GNU-stack,"",@progbits
        "#};

        assert_eq!(render(&assm), expected);
    }

    #[test]
    fn negative_immediate() {
        let assm = program(vec![
            Instruction::Mov {
                src: Operand::Imm(-7),
                dest: Operand::Register(Register::AX),
            },
            Instruction::Ret,
        ]);

        assert!(render(&assm).contains("\tmovl $-7, %eax\n"));
    }

    #[test]
    #[should_panic(expected = "pseudo-register 'tmp.0'")]
    fn unresolved_pseudo_panics() {
        let assm = program(vec![Instruction::Unary {
            op: UnaryOp::Neg,
            dest: Operand::Pseudo("tmp.0".to_string()),
        }]);

        render(&assm);
    }
}
