pub use lex::*;

mod cursor;
mod lex;
