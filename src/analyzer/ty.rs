use std::fmt;

/// Types a variable can be declared with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ty {
    Int,
    Float,
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => f.pad("int"),
            Ty::Float => f.pad("float"),
        }
    }
}
