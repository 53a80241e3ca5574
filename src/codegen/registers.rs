use std::collections::HashMap;

use log::warn;

pub const REGISTERS: [&str; 8] = ["R1", "R2", "R3", "R4", "R5", "R6", "R7", "R8"];

/// Holds literals on their way into an instruction that wants a register.
pub const SCRATCH_REGISTER: &str = "TMP";

/// Binds each name to a register the first time it is seen and keeps that
/// binding. There is no liveness tracking: the ninth distinct name wraps
/// around to `R1` and shares it with the first.
#[derive(Clone, Debug, Default)]
pub struct RegisterMap {
    map: HashMap<String, &'static str>,
    count: usize,
}

impl RegisterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, name: &str) -> &'static str {
        if let Some(reg) = self.map.get(name) {
            return reg;
        }

        let reg = REGISTERS[self.count % REGISTERS.len()];
        if self.count >= REGISTERS.len() {
            warn!("register pool exhausted: '{}' shares {}", name, reg);
        }
        self.count += 1;
        self.map.insert(name.to_string(), reg);
        reg
    }

    pub fn binding(&self, name: &str) -> Option<&'static str> {
        self.map.get(name).copied()
    }

    /// Number of distinct names bound so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
