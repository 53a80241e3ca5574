use log::trace;

use super::{Instruction, ParseInstructionError};

/// Hands out `prefix1`, `prefix2`, ... Names are never reused.
#[derive(Clone, Debug)]
pub struct NameGenerator {
    prefix: &'static str,
    count: usize,
}

impl NameGenerator {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, count: 0 }
    }

    pub fn next_name(&mut self) -> String {
        self.count += 1;
        format!("{}{}", self.prefix, self.count)
    }
}

/// Append-only buffer of three-address instructions for one compilation.
#[derive(Clone, Debug)]
pub struct IntermediateCode {
    code: Vec<Instruction>,
    temps: NameGenerator,
    labels: NameGenerator,
}

impl Default for IntermediateCode {
    fn default() -> Self {
        Self::new()
    }
}

impl IntermediateCode {
    pub fn new() -> Self {
        Self {
            code: vec![],
            temps: NameGenerator::new("t"),
            labels: NameGenerator::new("L"),
        }
    }

    pub fn new_temp(&mut self) -> String {
        self.temps.next_name()
    }

    pub fn new_label(&mut self) -> String {
        self.labels.next_name()
    }

    pub fn emit(&mut self, inst: Instruction) {
        trace!("{:03}. {}", self.code.len() + 1, inst);
        self.code.push(inst);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Numbered listing, one instruction per line: `001. t1 = y * 2`.
    pub fn render(&self) -> String {
        self.code
            .iter()
            .enumerate()
            .map(|(i, inst)| format!("{:03}. {}", i + 1, inst))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Reads a listing produced by `render` back into instructions. Line
    /// numbers must run 1, 2, 3, ... in order.
    pub fn parse_listing(listing: &str) -> Result<Vec<Instruction>, ParseInstructionError> {
        listing
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(i, line)| {
                let err = || ParseInstructionError(line.to_string());
                let (number, body) = line.split_once(". ").ok_or_else(err)?;
                if number.trim().parse::<usize>().ok() != Some(i + 1) {
                    return Err(err());
                }
                body.parse()
            })
            .collect()
    }
}
