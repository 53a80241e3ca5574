pub mod analyzer;
pub mod codegen;
pub mod compilation;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod parser;

pub use compilation::Compilation;

/// Runs scan, parse and code generation over `user_input`.
pub fn compile(user_input: &str) -> Compilation {
    Compilation::run(user_input)
}
