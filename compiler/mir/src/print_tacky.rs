use std::io::Write;

use crate::tacky::*;

type IOResult = std::io::Result<()>;

pub fn write_tacky<W: Write>(writer: &mut W, program: &TranslationUnit) -> IOResult {
    print_func(writer, &program.func)?;

    writer.flush()
}

fn print_func<W: Write>(writer: &mut W, func: &Func) -> IOResult {
    writeln!(writer, "{}:", func.name)?;

    for instruction in &func.instructions {
        print_instruction(writer, instruction)?;
    }

    Ok(())
}

fn print_instruction<W: Write>(writer: &mut W, instr: &Instruction) -> IOResult {
    match instr {
        Instruction::Return(val) => {
            writeln!(writer, "\tReturn({})", format_val(val))
        }
        Instruction::Unary { op, src, dest } => {
            writeln!(
                writer,
                "\t{} = {}{}",
                format_val(dest),
                format_unary(op),
                format_val(src)
            )
        }
    }
}

fn format_val(val: &Val) -> String {
    match val {
        Val::Constant(c) => c.to_string(),
        Val::Var(var) => var.clone(),
    }
}

fn format_unary(op: &UnaryOp) -> &'static str {
    match op {
        UnaryOp::Complement => "~",
        UnaryOp::Negate => "-",
    }
}
