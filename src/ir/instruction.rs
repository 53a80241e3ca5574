use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq)]
#[error("cannot read instruction from '{0}'")]
pub struct ParseInstructionError(pub String);

/// A value an instruction reads: a variable or temporary, or a literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Name(String),
    Int(i64),
    Float(f64),
}

impl Operand {
    pub fn name(&self) -> Option<&str> {
        match self {
            Operand::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Name(name) => write!(f, "{}", name),
            Operand::Int(n) => write!(f, "{}", n),
            // Debug keeps the decimal point, so `2.0` reads back as a float.
            Operand::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl FromStr for Operand {
    type Err = ParseInstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first = s
            .chars()
            .next()
            .ok_or_else(|| ParseInstructionError(s.to_string()))?;
        if first.is_ascii_alphabetic() || first == '_' {
            return Ok(Operand::Name(s.to_string()));
        }
        if let Ok(n) = s.parse() {
            return Ok(Operand::Int(n));
        }
        s.parse()
            .map(Operand::Float)
            .map_err(|_| ParseInstructionError(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl BinOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Mod => "%",
            BinOpKind::LessThan => "<",
            BinOpKind::LessEqual => "<=",
            BinOpKind::GreaterThan => ">",
            BinOpKind::GreaterEqual => ">=",
            BinOpKind::Equal => "==",
            BinOpKind::NotEqual => "!=",
        }
    }
}

impl FromStr for BinOpKind {
    type Err = ParseInstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "+" => BinOpKind::Add,
            "-" => BinOpKind::Sub,
            "*" => BinOpKind::Mul,
            "/" => BinOpKind::Div,
            "%" => BinOpKind::Mod,
            "<" => BinOpKind::LessThan,
            "<=" => BinOpKind::LessEqual,
            ">" => BinOpKind::GreaterThan,
            ">=" => BinOpKind::GreaterEqual,
            "==" => BinOpKind::Equal,
            "!=" => BinOpKind::NotEqual,
            _ => return Err(ParseInstructionError(s.to_string())),
        })
    }
}

/// One three-address instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Copy {
        dest: String,
        src: Operand,
    },
    Binary {
        op: BinOpKind,
        dest: String,
        left: Operand,
        right: Operand,
    },
    Print {
        value: Operand,
    },
    Label {
        name: String,
    },
    Goto {
        target: String,
    },
    IfFalse {
        cond: Operand,
        target: String,
    },
    ScopeEnter {
        scope: String,
    },
    ScopeExit {
        scope: String,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Copy { dest, src } => write!(f, "{} = {}", dest, src),
            Instruction::Binary {
                op,
                dest,
                left,
                right,
            } => write!(f, "{} = {} {} {}", dest, left, op.symbol(), right),
            Instruction::Print { value } => write!(f, "print {}", value),
            Instruction::Label { name } => write!(f, "label {}", name),
            Instruction::Goto { target } => write!(f, "goto {}", target),
            Instruction::IfFalse { cond, target } => {
                write!(f, "if_false {} goto {}", cond, target)
            }
            Instruction::ScopeEnter { scope } => write!(f, "{} enter", scope),
            Instruction::ScopeExit { scope } => write!(f, "{} exit", scope),
        }
    }
}

impl FromStr for Instruction {
    type Err = ParseInstructionError;

    /// Reads back the unnumbered form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseInstructionError(s.to_string());
        let words: Vec<&str> = s.split_whitespace().collect();

        let inst = match words.as_slice() {
            [dest, "=", src] => Instruction::Copy {
                dest: dest.to_string(),
                src: src.parse()?,
            },
            [dest, "=", left, op, right] => Instruction::Binary {
                op: op.parse()?,
                dest: dest.to_string(),
                left: left.parse()?,
                right: right.parse()?,
            },
            ["print", value] => Instruction::Print {
                value: value.parse()?,
            },
            ["label", name] => Instruction::Label {
                name: name.to_string(),
            },
            ["goto", target] => Instruction::Goto {
                target: target.to_string(),
            },
            ["if_false", cond, "goto", target] => Instruction::IfFalse {
                cond: cond.parse()?,
                target: target.to_string(),
            },
            [scope, "enter"] => Instruction::ScopeEnter {
                scope: scope.to_string(),
            },
            [scope, "exit"] => Instruction::ScopeExit {
                scope: scope.to_string(),
            },
            _ => return Err(err()),
        };
        Ok(inst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands() {
        assert_eq!("t3".parse(), Ok(Operand::Name("t3".into())));
        assert_eq!("42".parse(), Ok(Operand::Int(42)));
        assert_eq!("2.0".parse(), Ok(Operand::Float(2.0)));
        assert_eq!(Operand::Float(2.0).to_string(), "2.0");
        assert!("".parse::<Operand>().is_err());
        assert!("4x".parse::<Operand>().is_err());
    }

    #[test]
    fn display() {
        let inst = Instruction::Binary {
            op: BinOpKind::LessEqual,
            dest: "t1".into(),
            left: Operand::Name("x".into()),
            right: Operand::Int(10),
        };
        assert_eq!(inst.to_string(), "t1 = x <= 10");
        assert_eq!(
            Instruction::IfFalse {
                cond: Operand::Name("t1".into()),
                target: "L2".into()
            }
            .to_string(),
            "if_false t1 goto L2"
        );
        assert_eq!(
            Instruction::ScopeExit {
                scope: "local1".into()
            }
            .to_string(),
            "local1 exit"
        );
    }

    #[test]
    fn malformed() {
        assert!("x = 1 ^ 2".parse::<Instruction>().is_err());
        assert!("jump L1".parse::<Instruction>().is_err());
    }
}
