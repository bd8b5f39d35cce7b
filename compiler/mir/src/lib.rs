pub use print_tacky::*;
pub use tacky_gen::*;

mod print_tacky;
pub mod tacky;
mod tacky_gen;
