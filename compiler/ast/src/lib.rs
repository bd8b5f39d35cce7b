pub use ast_def::*;

mod ast_def;
mod print_ast;
