mod parser;
mod program;

pub use parser::*;
pub use program::*;
