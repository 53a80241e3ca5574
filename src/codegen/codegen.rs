use log::{debug, log_enabled, trace, Level};

use crate::{
    analyzer::SymbolTable,
    ir::{BinOpKind, Instruction, IntermediateCode, Operand},
};

use super::{RegisterMap, SCRATCH_REGISTER};

fn mnemonic(op: BinOpKind) -> &'static str {
    match op {
        BinOpKind::Add => "ADD",
        BinOpKind::Sub => "SUB",
        BinOpKind::Mul => "MUL",
        BinOpKind::Div => "DIV",
        BinOpKind::Mod => "MOD",
        BinOpKind::LessThan => "SLT",
        BinOpKind::LessEqual => "SLE",
        BinOpKind::GreaterThan => "SGT",
        BinOpKind::GreaterEqual => "SGE",
        BinOpKind::Equal => "SEQ",
        BinOpKind::NotEqual => "SNE",
    }
}

fn immediate(op: &Operand) -> String {
    format!("#{}", op)
}

/// Translates the finished IC buffer into assembly in one forward pass.
pub struct CodeGenerator<'a> {
    ic: &'a IntermediateCode,
    symbol_table: &'a SymbolTable,
    registers: RegisterMap,
    asm: Vec<String>,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(ic: &'a IntermediateCode, symbol_table: &'a SymbolTable) -> Self {
        Self {
            ic,
            symbol_table,
            registers: RegisterMap::new(),
            asm: vec![],
        }
    }

    pub fn generate(&mut self) -> String {
        self.registers = RegisterMap::new();
        self.asm = vec!["; --- CODE ---".to_string()];

        for inst in self.ic.instructions() {
            self.gen_instruction(inst);
        }

        debug!(
            "generated {} lines, {} names in registers",
            self.asm.len(),
            self.registers.len()
        );
        self.asm.join("\n")
    }

    /// Register bound to `name` by the last `generate` call.
    pub fn register_of(&self, name: &str) -> Option<&'static str> {
        self.registers.binding(name)
    }

    fn emit(&mut self, s: String) {
        self.asm.push(format!("    {}", s));
    }

    fn kind_of(&self, name: &str) -> String {
        match self.symbol_table.lookup(name) {
            Some(symbol) => symbol.ty.to_string(),
            None => "temporary".to_string(),
        }
    }

    fn reg(&mut self, name: &str) -> &'static str {
        if let Some(reg) = self.registers.binding(name) {
            return reg;
        }
        let reg = self.registers.get(name);
        if log_enabled!(Level::Trace) {
            trace!("{} ({}) -> {}", name, self.kind_of(name), reg);
        }
        reg
    }

    /// Register for a name, `#value` for a literal.
    fn operand(&mut self, op: &Operand) -> String {
        match op {
            Operand::Name(name) => self.reg(name).to_string(),
            _ => immediate(op),
        }
    }

    /// Like `operand`, but literals are first moved into the scratch register.
    fn operand_in_register(&mut self, op: &Operand) -> String {
        match op {
            Operand::Name(name) => self.reg(name).to_string(),
            _ => {
                self.emit(format!("MOV {}, {}", SCRATCH_REGISTER, immediate(op)));
                SCRATCH_REGISTER.to_string()
            }
        }
    }

    fn gen_instruction(&mut self, inst: &Instruction) {
        match inst {
            Instruction::Copy { dest, src } => {
                let src = self.operand(src);
                let dest = self.reg(dest);
                self.emit(format!("MOV {}, {}", dest, src));
            }
            Instruction::Binary {
                op,
                dest,
                left,
                right,
            } => self.gen_binary(*op, dest, left, right),
            Instruction::Print { value } => {
                let r = self.operand_in_register(value);
                self.emit(format!("OUT {}", r));
            }
            Instruction::Label { name } => self.asm.push(format!("{}:", name)),
            Instruction::Goto { target } => self.emit(format!("JMP {}", target)),
            Instruction::IfFalse { cond, target } => {
                let r = self.operand_in_register(cond);
                self.emit(format!("CMP {}, #0", r));
                self.emit(format!("JE {}", target));
            }
            Instruction::ScopeEnter { scope } => {
                self.asm.push(format!("; -- enter scope {}", scope))
            }
            Instruction::ScopeExit { scope } => self.asm.push(format!("; -- exit scope {}", scope)),
        }
    }

    /// dest = left op right, computed in place in dest's register.
    fn gen_binary(&mut self, op: BinOpKind, dest: &str, left: &Operand, right: &Operand) {
        let left = self.operand(left);
        let right_name = right.name().map(|name| self.reg(name));
        let dest = self.reg(dest);

        if left != dest {
            self.emit(format!("MOV {}, {}", dest, left));
        }
        let right = match right_name {
            Some(r) => r.to_string(),
            None => self.operand_in_register(right),
        };
        self.emit(format!("{} {}, {}", mnemonic(op), dest, right));
    }
}
