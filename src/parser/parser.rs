use log::{debug, trace};

use crate::{
    analyzer::{SymbolTable, Ty, GLOBAL_SCOPE},
    error::{ParseError, SemanticError, SyntaxError},
    ir::{BinOpKind, Instruction, IntermediateCode, Operand},
    lexer::{Lexer, Token, TokenKind},
};

use super::{Program, Stmt};

/// Deepest combined nesting of parentheses and blocks the parser descends into.
pub const MAX_NESTING: usize = 256;

/// Single-pass parser. Instructions are emitted into the IC buffer and
/// declarations into the symbol table as each rule is recognised.
#[derive(Debug)]
pub struct Parser<'a> {
    symbol_table: &'a mut SymbolTable,
    ic: &'a mut IntermediateCode,
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
    nesting: usize,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(symbol_table: &'a mut SymbolTable, ic: &'a mut IntermediateCode) -> Self {
        Self {
            symbol_table,
            ic,
            tokens: vec![],
            index: 0,
            depth: 0,
            nesting: 0,
            errors: vec![],
        }
    }

    /// Scans and parses `source`. Lexical errors are not repeated here; get
    /// them from `Lexer::tokenize`.
    pub fn parse(&mut self, source: &str) -> (Program, Vec<ParseError>) {
        let (tokens, _) = Lexer::tokenize(source);
        self.parse_tokens(tokens)
    }

    pub fn parse_tokens(&mut self, tokens: Vec<Token>) -> (Program, Vec<ParseError>) {
        self.tokens = tokens;
        self.index = 0;
        self.depth = 0;
        self.nesting = 0;
        self.errors.clear();

        let program = self.parse_program();
        debug!(
            "parsed {} statements into {} instructions, {} errors",
            program.0.len(),
            self.ic.len(),
            self.errors.len()
        );
        (program, std::mem::take(&mut self.errors))
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.index).map(|t| &t.kind)
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.peek() != Some(kind) {
            return false;
        }
        self.index += 1;
        true
    }

    fn unexpected(&self) -> SyntaxError {
        match self.tokens.get(self.index) {
            Some(t) => SyntaxError::UnexpectedToken {
                value: t.value().to_string(),
                line: t.line,
            },
            None => SyntaxError::UnexpectedEof,
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), SyntaxError> {
        if self.consume(kind) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_ident(&mut self) -> Result<String, SyntaxError> {
        if let Some(TokenKind::Ident(name)) = self.peek() {
            let name = name.clone();
            self.index += 1;
            return Ok(name);
        }
        Err(self.unexpected())
    }

    fn too_deep(&self) -> SyntaxError {
        match self.tokens.get(self.index) {
            Some(t) => SyntaxError::NestingTooDeep {
                value: t.value().to_string(),
                line: t.line,
                limit: MAX_NESTING,
            },
            None => SyntaxError::UnexpectedEof,
        }
    }

    /// Skips the `{ ... }` group starting at the current token, inner groups
    /// included.
    fn skip_group(&mut self) {
        let mut open = 0usize;
        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::OpenCurlyBrace => open += 1,
                TokenKind::CloseCurlyBrace => {
                    open -= 1;
                    if open == 0 {
                        self.index += 1;
                        return;
                    }
                }
                _ => {}
            }
            self.index += 1;
        }
    }

    fn current_line(&self) -> usize {
        self.tokens
            .get(self.index)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn syntax_error(&mut self, e: SyntaxError) {
        // Unwinding out of nested blocks at end of input reports EOF once.
        if e == SyntaxError::UnexpectedEof
            && self.errors.last() == Some(&ParseError::Syntax(SyntaxError::UnexpectedEof))
        {
            return;
        }
        trace!("{}", e);
        self.errors.push(e.into());
    }

    fn semantic_error(&mut self, e: SemanticError) {
        trace!("{}", e);
        self.errors.push(e.into());
    }

    /// Skips past the next `;`, or up to the `}` closing the current block.
    /// A `}` with no open block is skipped and ends the recovery.
    fn synchronize(&mut self) {
        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::SemiColon => {
                    self.index += 1;
                    return;
                }
                TokenKind::CloseCurlyBrace => {
                    if self.depth == 0 {
                        self.index += 1;
                    }
                    return;
                }
                _ => self.index += 1,
            }
        }
    }

    /// program = stmt*
    fn parse_program(&mut self) -> Program {
        Program(self.parse_stmt_list())
    }

    fn parse_stmt_list(&mut self) -> Vec<Stmt> {
        let mut stmts = vec![];
        loop {
            match self.peek() {
                None => break,
                Some(TokenKind::CloseCurlyBrace) if self.depth > 0 => break,
                _ => {}
            }
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    self.syntax_error(e);
                    self.synchronize();
                }
            }
        }
        stmts
    }

    /// stmt = decl ";"
    ///      | assign ";"
    ///      | print ";"
    ///      | if
    ///      | while
    ///      | block
    fn parse_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let stmt = match self.peek() {
            Some(TokenKind::Int | TokenKind::Float) => self.parse_declaration()?,
            Some(TokenKind::Ident(_)) => self.parse_assign()?,
            Some(TokenKind::Print) => self.parse_print()?,
            Some(TokenKind::If) => return self.parse_if(),
            Some(TokenKind::While) => return self.parse_while(),
            Some(TokenKind::OpenCurlyBrace) => return Ok(Stmt::Block(self.parse_block()?)),
            _ => return Err(self.unexpected()),
        };
        self.expect(&TokenKind::SemiColon)?;
        Ok(stmt)
    }

    /// block = "{" stmt* "}"
    ///
    /// The scope is pushed right after `{` and popped right before `}`. Once
    /// `{` is consumed the pop happens even if the block is cut short.
    ///
    /// A block nested too deeply is reported and skipped whole, so parsing
    /// goes on right after its `}`.
    fn parse_block(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        if self.peek() != Some(&TokenKind::OpenCurlyBrace) {
            return Err(self.unexpected());
        }
        if self.nesting >= MAX_NESTING {
            let e = self.too_deep();
            self.syntax_error(e);
            self.skip_group();
            return Ok(vec![]);
        }
        self.index += 1;
        let scope = self.symbol_table.enter_scope();
        self.ic.emit(Instruction::ScopeEnter { scope });

        self.depth += 1;
        self.nesting += 1;
        let stmts = self.parse_stmt_list();
        self.nesting -= 1;
        self.depth -= 1;

        let scope = self
            .symbol_table
            .exit_scope()
            .unwrap_or_else(|| GLOBAL_SCOPE.to_string());
        self.ic.emit(Instruction::ScopeExit { scope });

        self.expect(&TokenKind::CloseCurlyBrace)?;
        Ok(stmts)
    }

    /// decl = ("int" | "float") ident
    fn parse_declaration(&mut self) -> Result<Stmt, SyntaxError> {
        let ty = if self.consume(&TokenKind::Int) {
            Ty::Int
        } else if self.consume(&TokenKind::Float) {
            Ty::Float
        } else {
            return Err(self.unexpected());
        };
        let line = self.current_line();
        let name = self.expect_ident()?;

        if let Err(e) = self.symbol_table.declare_var(&name, ty, line) {
            self.semantic_error(e);
        }
        Ok(Stmt::Declaration { ty, name })
    }

    /// assign = ident "=" expr
    fn parse_assign(&mut self) -> Result<Stmt, SyntaxError> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Equal)?;
        let value = self.parse_expr()?;

        self.check_declared(&name);
        self.ic.emit(Instruction::Copy {
            dest: name.clone(),
            src: value.clone(),
        });
        Ok(Stmt::Assign { name, value })
    }

    /// print = "print" "(" expr ")"
    fn parse_print(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect(&TokenKind::Print)?;
        self.expect(&TokenKind::OpenParen)?;
        let value = self.parse_expr()?;
        self.expect(&TokenKind::CloseParen)?;

        self.ic.emit(Instruction::Print {
            value: value.clone(),
        });
        Ok(Stmt::Print(value))
    }

    /// if = "if" "(" expr ")" block ("else" block)?
    fn parse_if(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::OpenParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::CloseParen)?;

        let false_label = self.ic.new_label();
        self.ic.emit(Instruction::IfFalse {
            cond: cond.clone(),
            target: false_label.clone(),
        });
        let then_branch = self.parse_block()?;

        let else_branch = if self.consume(&TokenKind::Else) {
            let end_label = self.ic.new_label();
            self.ic.emit(Instruction::Goto {
                target: end_label.clone(),
            });
            self.ic.emit(Instruction::Label { name: false_label });
            let else_branch = self.parse_block()?;
            self.ic.emit(Instruction::Label { name: end_label });
            Some(else_branch)
        } else {
            self.ic.emit(Instruction::Label { name: false_label });
            None
        };

        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    /// while = "while" "(" expr ")" block
    fn parse_while(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::OpenParen)?;

        let start_label = self.ic.new_label();
        let end_label = self.ic.new_label();
        // The condition is evaluated after the start label, on every iteration.
        self.ic.emit(Instruction::Label {
            name: start_label.clone(),
        });
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::CloseParen)?;

        self.ic.emit(Instruction::IfFalse {
            cond: cond.clone(),
            target: end_label.clone(),
        });
        let body = self.parse_block()?;
        self.ic.emit(Instruction::Goto {
            target: start_label,
        });
        self.ic.emit(Instruction::Label { name: end_label });

        Ok(Stmt::While { cond, body })
    }

    fn emit_binary(&mut self, op: BinOpKind, left: Operand, right: Operand) -> Operand {
        let dest = self.ic.new_temp();
        self.ic.emit(Instruction::Binary {
            op,
            dest: dest.clone(),
            left,
            right,
        });
        Operand::Name(dest)
    }

    /// expr = mul ("+" mul | "-" mul)*
    fn parse_expr(&mut self) -> Result<Operand, SyntaxError> {
        let mut left = self.parse_mul()?;
        loop {
            let op = if self.consume(&TokenKind::Plus) {
                BinOpKind::Add
            } else if self.consume(&TokenKind::Minus) {
                BinOpKind::Sub
            } else {
                return Ok(left);
            };
            let right = self.parse_mul()?;
            left = self.emit_binary(op, left, right);
        }
    }

    /// mul = relational ("*" relational | "/" relational | "%" relational)*
    fn parse_mul(&mut self) -> Result<Operand, SyntaxError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = if self.consume(&TokenKind::Star) {
                BinOpKind::Mul
            } else if self.consume(&TokenKind::Slash) {
                BinOpKind::Div
            } else if self.consume(&TokenKind::Percent) {
                BinOpKind::Mod
            } else {
                return Ok(left);
            };
            let right = self.parse_relational()?;
            left = self.emit_binary(op, left, right);
        }
    }

    fn parse_relational_op(&mut self) -> Option<BinOpKind> {
        let op = match self.peek()? {
            TokenKind::LessThan => BinOpKind::LessThan,
            TokenKind::LessEqual => BinOpKind::LessEqual,
            TokenKind::GreaterThan => BinOpKind::GreaterThan,
            TokenKind::GreaterEqual => BinOpKind::GreaterEqual,
            TokenKind::DoubleEqual => BinOpKind::Equal,
            TokenKind::NotEqual => BinOpKind::NotEqual,
            _ => return None,
        };
        self.index += 1;
        Some(op)
    }

    /// relational = primary (("<" | "<=" | ">" | ">=" | "==" | "!=") primary)?
    ///
    /// Comparisons do not chain: `a < b < c` is rejected at the second `<`.
    fn parse_relational(&mut self) -> Result<Operand, SyntaxError> {
        let left = self.parse_primary()?;
        let Some(op) = self.parse_relational_op() else {
            return Ok(left);
        };
        let right = self.parse_primary()?;
        let result = self.emit_binary(op, left, right);

        let next = self.index;
        if self.parse_relational_op().is_some() {
            self.index = next;
            return Err(self.unexpected());
        }
        Ok(result)
    }

    /// primary = num
    ///         | ident
    ///         | "(" expr ")"
    fn parse_primary(&mut self) -> Result<Operand, SyntaxError> {
        let operand = match self.peek() {
            Some(TokenKind::Num(n)) => Operand::Int(*n),
            Some(TokenKind::FloatNum(x)) => Operand::Float(*x),
            Some(TokenKind::Ident(name)) => {
                let name = name.clone();
                self.index += 1;
                self.check_declared(&name);
                return Ok(Operand::Name(name));
            }
            Some(TokenKind::OpenParen) => {
                if self.nesting >= MAX_NESTING {
                    return Err(self.too_deep());
                }
                self.index += 1;
                self.nesting += 1;
                let operand = self.parse_expr();
                self.nesting -= 1;
                let operand = operand?;
                self.expect(&TokenKind::CloseParen)?;
                return Ok(operand);
            }
            _ => return Err(self.unexpected()),
        };
        self.index += 1;
        Ok(operand)
    }

    fn check_declared(&mut self, name: &str) {
        if self.symbol_table.lookup(name).is_none() {
            self.semantic_error(SemanticError::Undeclared {
                name: name.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (Program, Vec<ParseError>, SymbolTable, IntermediateCode) {
        let mut symbol_table = SymbolTable::new();
        let mut ic = IntermediateCode::new();
        let (program, errors) = Parser::new(&mut symbol_table, &mut ic).parse(source);
        (program, errors, symbol_table, ic)
    }

    fn messages(errors: &[ParseError]) -> Vec<String> {
        errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn precedence() {
        let (_, errors, _, ic) = parse("int x; int y; x = 1 + y * 2 - 3;");
        assert!(errors.is_empty());
        assert_eq!(
            ic.render(),
            "001. t1 = y * 2\n002. t2 = 1 + t1\n003. t3 = t2 - 3\n004. x = t3"
        );
    }

    #[test]
    fn parentheses_reset_precedence() {
        let (_, errors, _, ic) = parse("int x; x = (x + 1) * 2;");
        assert!(errors.is_empty());
        assert_eq!(ic.render(), "001. t1 = x + 1\n002. t2 = t1 * 2\n003. x = t2");
    }

    #[test]
    fn comparisons_bind_tightest() {
        let (_, errors, _, ic) = parse("int a; a = a + 1 < 2;");
        assert!(errors.is_empty());
        assert_eq!(ic.render(), "001. t1 = 1 < 2\n002. t2 = a + t1\n003. a = t2");
    }

    #[test]
    fn comparisons_do_not_chain() {
        let (_, errors, _, _) = parse("int a; a = a < 1 < 2;\nprint(a);");
        assert_eq!(messages(&errors), vec!["Syntax error at '<' (line 1)"]);
    }

    #[test]
    fn if_else_layout() {
        let (program, errors, _, ic) = parse("int x; if (x) { x = 1; } else { x = 2; }");
        assert!(errors.is_empty());
        assert_eq!(
            ic.render(),
            "\
001. if_false x goto L1
002. local1 enter
003. x = 1
004. local1 exit
005. goto L2
006. label L1
007. local2 enter
008. x = 2
009. local2 exit
010. label L2"
        );
        let Stmt::If { else_branch, .. } = &program.0[1] else {
            panic!();
        };
        assert_eq!(else_branch.as_ref().map(|b| b.len()), Some(1));
    }

    #[test]
    fn if_without_else() {
        let (_, errors, _, ic) = parse("int x; if (x == 0) { print(1); }");
        assert!(errors.is_empty());
        assert_eq!(
            ic.render(),
            "\
001. t1 = x == 0
002. if_false t1 goto L1
003. local1 enter
004. print 1
005. local1 exit
006. label L1"
        );
    }

    #[test]
    fn nested_scopes_resolve_innermost_first() {
        let (_, errors, table, _) =
            parse("int x; { float x; { x = 1.5; int y; } y = 2; } x = 3;");
        assert_eq!(messages(&errors), vec!["Undeclared variable 'y'"]);
        let scopes: Vec<_> = table.get_all().iter().map(|s| s.scope.as_str()).collect();
        assert_eq!(scopes, vec!["global", "local1", "block2"]);
    }

    #[test]
    fn redeclaration_in_same_scope_only() {
        let (_, errors, table, _) = parse("int x; float x; { int x; }");
        assert_eq!(
            messages(&errors),
            vec!["Redeclaration error: 'x' already declared in global"]
        );
        assert_eq!(table.get_all().len(), 2);
        assert_eq!(table.get_all()[0].ty, Ty::Int);
    }

    #[test]
    fn undeclared_errors_in_reduction_order() {
        let (_, errors, _, ic) = parse("z = a + b;");
        assert_eq!(
            messages(&errors),
            vec![
                "Undeclared variable 'a'",
                "Undeclared variable 'b'",
                "Undeclared variable 'z'"
            ]
        );
        assert_eq!(ic.render(), "001. t1 = a + b\n002. z = t1");
    }

    #[test]
    fn reserved_words_are_syntax_errors() {
        let (_, errors, _, _) = parse("int x;\nreturn x;\nx = 1;");
        assert_eq!(messages(&errors), vec!["Syntax error at 'return' (line 2)"]);
    }

    #[test]
    fn recovers_after_bad_statement() {
        let (program, errors, _, ic) = parse("int x; x = ; print(x); x = 2 3; x = 4;");
        assert_eq!(
            messages(&errors),
            vec!["Syntax error at ';' (line 1)", "Syntax error at '3' (line 1)"]
        );
        assert_eq!(program.0.len(), 3);
        assert_eq!(ic.instructions().last().map(|i| i.to_string()).as_deref(), Some("x = 4"));
    }

    #[test]
    fn stray_close_brace_at_top_level() {
        let (_, errors, _, ic) = parse("} print(1);");
        assert_eq!(messages(&errors), vec!["Syntax error at '}' (line 1)"]);
        assert_eq!(ic.render(), "001. print 1");
    }

    #[test]
    fn missing_close_brace_reports_eof_once() {
        let (_, errors, _, ic) = parse("int x; while (x) { if (x) { x = 1;");
        assert_eq!(errors, vec![ParseError::Syntax(SyntaxError::UnexpectedEof)]);

        let enters = ic
            .instructions()
            .iter()
            .filter(|i| matches!(i, Instruction::ScopeEnter { .. }))
            .count();
        let exits = ic
            .instructions()
            .iter()
            .filter(|i| matches!(i, Instruction::ScopeExit { .. }))
            .count();
        assert_eq!(enters, 2);
        assert_eq!(exits, 2);
    }

    #[test]
    fn missing_semicolon_at_end() {
        let (_, errors, _, _) = parse("int x");
        assert_eq!(errors, vec![ParseError::Syntax(SyntaxError::UnexpectedEof)]);
    }

    #[test]
    fn empty_input() {
        let (program, errors, _, ic) = parse("  // nothing\n");
        assert!(program.0.is_empty());
        assert!(errors.is_empty());
        assert!(ic.is_empty());
    }

    #[test]
    fn deep_parentheses_are_reported_not_overflowed() {
        let at_limit = format!(
            "int x; x = {}1{};",
            "(".repeat(MAX_NESTING),
            ")".repeat(MAX_NESTING)
        );
        let (_, errors, _, ic) = parse(&at_limit);
        assert!(errors.is_empty());
        assert_eq!(ic.render(), "001. x = 1");

        let source = format!(
            "int x;\nx = {}1{};\nprint(x);",
            "(".repeat(10_000),
            ")".repeat(10_000)
        );
        let (program, errors, _, ic) = parse(&source);
        assert_eq!(
            messages(&errors),
            vec!["Syntax error at '(' (line 2): nesting deeper than 256 levels"]
        );
        assert_eq!(program.0.len(), 2);
        assert_eq!(ic.render(), "001. print x");
    }

    #[test]
    fn deep_blocks_are_skipped_whole() {
        let source = format!(
            "int x;\n{}x = 1;{}\nprint(x);",
            "{".repeat(10_000),
            "}".repeat(10_000)
        );
        let (_, errors, table, ic) = parse(&source);
        assert_eq!(
            messages(&errors),
            vec!["Syntax error at '{' (line 2): nesting deeper than 256 levels"]
        );
        assert_eq!(table.current_scope(), GLOBAL_SCOPE);

        let enters = ic
            .instructions()
            .iter()
            .filter(|i| matches!(i, Instruction::ScopeEnter { .. }))
            .count();
        let exits = ic
            .instructions()
            .iter()
            .filter(|i| matches!(i, Instruction::ScopeExit { .. }))
            .count();
        assert_eq!(enters, MAX_NESTING);
        assert_eq!(exits, MAX_NESTING);
        assert_eq!(ic.instructions().last().map(|i| i.to_string()).as_deref(), Some("print x"));
    }

    #[test]
    fn declaration_records_line() {
        let (_, _, table, _) = parse("\n\nint\nx;");
        assert_eq!(table.lookup("x").unwrap().line, Some(4));
    }
}
