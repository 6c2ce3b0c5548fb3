//! Boundary-condition sweeps for the bytecode emitter (§8.1): every
//! `NotYetImplemented` trigger point, constant-pool behavior across mixed
//! literal types, and deep expression nesting.

#[cfg(test)]
mod tests {
    use faxc_par::{Ast, Parser};
    use faxc_sem::symbol::SymbolTable;
    use faxc_sem::Analyzer;

    use crate::{EmitError, Emitter};

    fn analyze(src: &str) -> (Ast, SymbolTable) {
        let mut a = Analyzer::new(std::env::temp_dir().join("faxc-gen-edge-nonexistent"), |_: &str| true).unwrap();
        let ast = Parser::parse_source(src).unwrap();
        let ast = a.analyze_program(ast).unwrap();
        (ast, a.symbols)
    }

    fn emit(src: &str) -> Result<String, EmitError> {
        let (ast, symbols) = analyze(src);
        Emitter::new(&symbols).emit_program(&ast)
    }

    // ==== empty / trivial programs ====

    #[test]
    fn test_empty_program_emits_empty_sections() {
        let out = emit("").unwrap();
        assert_eq!(out, ".data\n.ops\n");
    }

    // ==== constant pool across mixed types ====

    #[test]
    fn test_constant_pool_keeps_distinct_literals_with_the_same_text_apart() {
        // "1" the int literal and a variable named "1" can't collide in this
        // language, but two distinct int literals sharing text must dedup.
        let out = emit("mostra 1 mostra 2 mostra 1").unwrap();
        let data = out.split(".data\n").nth(1).unwrap().split(".ops\n").next().unwrap();
        assert_eq!(data.lines().collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn test_constant_pool_assigns_indices_in_first_insertion_order() {
        let out = emit("var a: int = 3 var b: real = 1.5").unwrap();
        let data = out.split(".data\n").nth(1).unwrap().split(".ops\n").next().unwrap();
        assert_eq!(data.lines().collect::<Vec<_>>(), vec!["3", "a", "1.5", "b"]);
    }

    #[test]
    fn test_global_of_every_supported_primitive_type_emits_matching_type_code() {
        let out = emit("var a: int = 1 var b: real = 1.0 var c: bool = verdadeiro var d: texto = \"s\"").unwrap();
        let ops = out.split(".ops\n").nth(1).unwrap();
        let def_globals: Vec<_> = ops.lines().filter(|l| l.starts_with("9 ")).collect();
        assert_eq!(def_globals.len(), 4);
        let type_codes: Vec<_> = def_globals
            .iter()
            .map(|l| l.split_whitespace().nth(2).unwrap())
            .collect();
        assert_eq!(type_codes, vec!["0", "1", "2", "3"]);
    }

    // ==== deep nesting ====

    #[test]
    fn test_deeply_nested_binop_chain_emits_without_recursion_overflow() {
        let mut src = String::from("mostra 1");
        for _ in 0..300 {
            src.push_str(" + 1");
        }
        let out = emit(&src).unwrap();
        let ops = out.split(".ops\n").nth(1).unwrap();
        assert_eq!(ops.lines().filter(|l| *l == "2").count(), 300, "one OP_ADD per '+'");
    }

    #[test]
    fn test_deeply_nested_blocks_emit_every_mostra() {
        let mut src = String::new();
        for _ in 0..100 {
            src.push('{');
        }
        src.push_str(" mostra 1 ");
        for _ in 0..100 {
            src.push('}');
        }
        let out = emit(&src).unwrap();
        assert!(out.contains(".ops\n1 0\n0\n"));
    }

    // ==== NotYetImplemented coverage ====

    #[test]
    fn test_escolha_is_not_yet_implemented() {
        let err = emit("escolha 1 { caso 1: mostra 1 }").unwrap_err();
        assert!(matches!(err, EmitError::NotYetImplemented(_)));
    }

    #[test]
    fn test_enquanto_is_not_yet_implemented() {
        let err = emit("enquanto verdadeiro { mostra 1 }").unwrap_err();
        assert!(matches!(err, EmitError::NotYetImplemented(_)));
    }

    #[test]
    fn test_para_is_not_yet_implemented() {
        let err = emit("para i de 0 ate 10 { mostra i }").unwrap_err();
        assert!(matches!(err, EmitError::NotYetImplemented(_)));
    }

    #[test]
    fn test_function_decl_is_not_yet_implemented() {
        let err = emit("func f(): vazio { mostra 1 }").unwrap_err();
        assert!(matches!(err, EmitError::NotYetImplemented(_)));
    }

    #[test]
    fn test_comparison_operator_is_not_yet_implemented() {
        let err = emit("mostra 1 == 1").unwrap_err();
        assert!(matches!(err, EmitError::NotYetImplemented(_)));
    }

    #[test]
    fn test_retorna_outside_emittable_context_is_not_yet_implemented() {
        let err = emit("func f(): int { retorna 1 }").unwrap_err();
        assert!(matches!(err, EmitError::NotYetImplemented(_)));
    }

    // ==== error message content ====

    #[test]
    fn test_not_yet_implemented_error_carries_a_non_empty_description() {
        match emit("enquanto verdadeiro { mostra 1 }") {
            Err(EmitError::NotYetImplemented(msg)) => assert!(!msg.is_empty()),
            Ok(_) => panic!("expected NotYetImplemented"),
        }
    }
}
