use minicc::analyzer::SymbolTable;
use minicc::codegen::{CodeGenerator, REGISTERS};
use minicc::ir::IntermediateCode;
use minicc::parser::Parser;

fn build(source: &str) -> (SymbolTable, IntermediateCode) {
    let mut symbol_table = SymbolTable::new();
    let mut ic = IntermediateCode::new();
    let (_, errors) = Parser::new(&mut symbol_table, &mut ic).parse(source);
    assert!(errors.is_empty(), "{:?}", errors);
    (symbol_table, ic)
}

#[test]
fn ninth_name_aliases_first_register() {
    let names = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
    let mut source = String::new();
    for name in names {
        source += &format!("int {}; ", name);
    }
    for (n, name) in names.iter().enumerate() {
        source += &format!("{} = {}; ", name, n + 1);
    }

    let (symbol_table, ic) = build(&source);
    let mut codegen = CodeGenerator::new(&ic, &symbol_table);
    let asm = codegen.generate();

    for (name, reg) in names.iter().zip(REGISTERS) {
        assert_eq!(codegen.register_of(name), Some(reg));
    }
    assert_eq!(codegen.register_of("i"), Some("R1"));
    assert_eq!(asm.lines().nth(1), Some("    MOV R1, #1"));
    assert_eq!(asm.lines().last(), Some("    MOV R1, #9"));
}

#[test]
fn while_loop_assembly() {
    let (symbol_table, ic) = build("int x; while (x < 10) { x = x + 1; }");
    let asm = CodeGenerator::new(&ic, &symbol_table).generate();
    assert_eq!(
        asm,
        "\
; --- CODE ---
L1:
    MOV R2, R1
    MOV TMP, #10
    SLT R2, TMP
    CMP R2, #0
    JE L2
; -- enter scope local1
    MOV R3, R1
    MOV TMP, #1
    ADD R3, TMP
    MOV R1, R3
; -- exit scope local1
    JMP L1
L2:"
    );
}

#[test]
fn if_else_assembly() {
    let (symbol_table, ic) = build("float f; if (1) { print(f); } else { print(2.5); }");
    let asm = CodeGenerator::new(&ic, &symbol_table).generate();
    assert_eq!(
        asm,
        "\
; --- CODE ---
    MOV TMP, #1
    CMP TMP, #0
    JE L1
; -- enter scope local1
    OUT R1
; -- exit scope local1
    JMP L2
L1:
; -- enter scope local2
    MOV TMP, #2.5
    OUT TMP
; -- exit scope local2
L2:"
    );
}

#[test]
fn generate_is_repeatable() {
    let (symbol_table, ic) = build("int a; int b; a = b / 4;");
    let mut codegen = CodeGenerator::new(&ic, &symbol_table);
    let first = codegen.generate();
    let second = codegen.generate();
    assert_eq!(first, second);
    assert!(first.contains("    DIV R2, TMP"));
    assert_eq!(codegen.register_of("a"), Some("R3"));
}
