mod codegen;
mod registers;

pub use codegen::*;
pub use registers::*;
