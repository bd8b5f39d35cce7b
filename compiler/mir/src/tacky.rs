#[derive(Debug, Eq, PartialEq, Clone)]
pub struct TranslationUnit {
    pub func: Func,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Func {
    pub name: String,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Instruction {
    Return(Val),
    Unary { op: UnaryOp, src: Val, dest: Val },
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Val {
    Constant(i32),
    Var(String),
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum UnaryOp {
    Complement,
    Negate,
}
