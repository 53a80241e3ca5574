use crate::{analyzer::Ty, ir::Operand};

/// What the parser recognised, statement by statement. Each entry records
/// the values its reduction produced; the instructions themselves live in
/// the IC buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program(pub Vec<Stmt>);

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Declaration {
        ty: Ty,
        name: String,
    },
    Assign {
        name: String,
        value: Operand,
    },
    Print(Operand),
    If {
        cond: Operand,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    While {
        cond: Operand,
        body: Vec<Stmt>,
    },
    Block(Vec<Stmt>),
}
