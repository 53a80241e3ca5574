use log::info;

use crate::{
    analyzer::SymbolTable,
    codegen::CodeGenerator,
    error::{LexError, ParseError, SemanticError, SyntaxError},
    ir::IntermediateCode,
    lexer::{Lexer, Token, TokenKind},
    parser::{Parser, Program},
};

/// Everything one run of the pipeline produced: the scan, the parse with
/// its side tables, the assembly, and the three error channels.
#[derive(Debug)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub symbol_table: SymbolTable,
    pub ic: IntermediateCode,
    pub asm: String,
    pub lex_errors: Vec<LexError>,
    pub syntax_errors: Vec<SyntaxError>,
    pub semantic_errors: Vec<SemanticError>,
}

impl Compilation {
    pub fn run(source: &str) -> Self {
        let (tokens, lex_errors) = Lexer::tokenize(source);

        let mut symbol_table = SymbolTable::new();
        let mut ic = IntermediateCode::new();
        let (program, parse_errors) =
            Parser::new(&mut symbol_table, &mut ic).parse_tokens(tokens.clone());

        let mut syntax_errors = vec![];
        let mut semantic_errors = vec![];
        for e in parse_errors {
            match e {
                ParseError::Syntax(e) => syntax_errors.push(e),
                ParseError::Semantic(e) => semantic_errors.push(e),
            }
        }

        let asm = CodeGenerator::new(&ic, &symbol_table).generate();

        let compilation = Self {
            tokens,
            program,
            symbol_table,
            ic,
            asm,
            lex_errors,
            syntax_errors,
            semantic_errors,
        };
        info!(
            "compiled {} instructions with {} errors",
            compilation.ic.len(),
            compilation.errors().len()
        );
        compilation
    }

    /// Lexical, then syntactic, then semantic messages.
    pub fn errors(&self) -> Vec<String> {
        let lex = self.lex_errors.iter().map(|e| e.to_string());
        let syntax = self.syntax_errors.iter().map(|e| e.to_string());
        let semantic = self.semantic_errors.iter().map(|e| e.to_string());
        lex.chain(syntax).chain(semantic).collect()
    }

    pub fn is_success(&self) -> bool {
        self.lex_errors.is_empty() && self.syntax_errors.is_empty() && self.semantic_errors.is_empty()
    }

    pub fn render_tokens(&self) -> String {
        if self.tokens.is_empty() {
            return "(no tokens)".to_string();
        }
        self.tokens
            .iter()
            .map(|t| {
                let value = match &t.kind {
                    TokenKind::Str(s) => format!("\"{}\"", s),
                    _ => t.value().to_string(),
                };
                format!("{:<12} {:<20} (line {})", t.kind.category(), value, t.line)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_symbols(&self) -> String {
        if self.symbol_table.get_all().is_empty() {
            return "(no symbols)".to_string();
        }
        self.symbol_table.render()
    }

    pub fn render_ir(&self) -> String {
        if self.ic.is_empty() {
            return "(no intermediate code)".to_string();
        }
        self.ic.render()
    }

    pub fn render_errors(&self) -> String {
        if self.is_success() {
            return "No errors. Compilation successful!".to_string();
        }
        self.errors().join("\n")
    }
}
