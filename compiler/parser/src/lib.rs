pub use parser::*;

mod parser;
