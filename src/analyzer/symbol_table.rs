use std::collections::HashMap;

use log::trace;

use crate::error::SemanticError;

use super::Ty;

pub const GLOBAL_SCOPE: &str = "global";

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Ty,
    pub scope: String,
    /// Array length. Reserved: no declaration form fills it in yet.
    pub size: Option<usize>,
    /// Variable holding the array length. Reserved like `size`.
    pub size_var: Option<String>,
    pub line: Option<usize>,
    pub use_lines: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    table: HashMap<(String, String), usize>,
    scopes: Vec<String>,
    scope_counter: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: vec![],
            table: HashMap::new(),
            scopes: vec![GLOBAL_SCOPE.to_string()],
            scope_counter: 0,
        }
    }

    pub fn current_scope(&self) -> &str {
        self.scopes.last().map_or(GLOBAL_SCOPE, |s| s.as_str())
    }

    /// Active scopes, outermost first.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Pushes a fresh scope and returns its name. Scopes opened directly
    /// under `global` are `localN`, deeper ones `blockN`.
    pub fn enter_scope(&mut self) -> String {
        self.scope_counter += 1;
        let name = if self.scopes.len() == 1 {
            format!("local{}", self.scope_counter)
        } else {
            format!("block{}", self.scope_counter)
        };
        trace!("enter scope {}", name);
        self.scopes.push(name.clone());
        name
    }

    /// Pops the innermost scope. `global` is never popped: `None` then.
    pub fn exit_scope(&mut self) -> Option<String> {
        if self.scopes.len() > 1 {
            let name = self.scopes.pop();
            trace!("exit scope {:?}", name);
            name
        } else {
            None
        }
    }

    pub fn declare_var(&mut self, name: &str, ty: Ty, line: usize) -> Result<(), SemanticError> {
        self.add_symbol(name, ty, None, None, Some(line))
    }

    pub fn add_symbol(
        &mut self,
        name: &str,
        ty: Ty,
        size: Option<usize>,
        size_var: Option<String>,
        line: Option<usize>,
    ) -> Result<(), SemanticError> {
        let scope = self.current_scope().to_string();
        let key = (name.to_string(), scope.clone());
        if self.table.contains_key(&key) {
            return Err(SemanticError::Redeclaration {
                name: name.to_string(),
                scope,
            });
        }

        trace!("declare {} {} in {}", ty, name, scope);
        self.table.insert(key, self.symbols.len());
        self.symbols.push(Symbol {
            name: name.to_string(),
            ty,
            scope,
            size,
            size_var,
            line,
            use_lines: vec![],
        });
        Ok(())
    }

    fn lookup_index(&self, name: &str) -> Option<usize> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| self.table.get(&(name.to_string(), scope.clone())))
            .copied()
    }

    /// Resolves `name` innermost scope first, so inner declarations shadow
    /// outer ones.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.lookup_index(name).map(|i| &self.symbols[i])
    }

    /// Appends `line` to the uses of whatever `name` resolves to. Unresolved
    /// names are ignored.
    pub fn record_use(&mut self, name: &str, line: usize) {
        if let Some(i) = self.lookup_index(name) {
            self.symbols[i].use_lines.push(line);
        }
    }

    pub fn get_all(&self) -> &[Symbol] {
        &self.symbols
    }

    /// One line per symbol: `name type scope:<scope>`.
    pub fn render(&self) -> String {
        self.symbols
            .iter()
            .map(|s| format!("{:<12} {:<8} scope:{}", s.name, s.ty, s.scope))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
