mod instruction;
mod intermediate_code;

pub use instruction::*;
pub use intermediate_code::*;
