mod symbol_table;
mod ty;

pub use symbol_table::*;
pub use ty::*;
