/// Defines assembly tree datatypes
///
/// Instruction selection produces `Pseudo` operands; pseudo resolution turns
/// every one of them into a `Stack` slot before emission.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub func: Function,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Mov { src: Operand, dest: Operand },
    Unary { op: UnaryOp, dest: Operand },
    /// Bytes to reserve below the frame pointer
    AllocateStack(i32),
    Ret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Imm(i32),
    Register(Register),
    Pseudo(String),
    /// Offset from rbp, always negative
    Stack(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    AX,
    R10,
}
