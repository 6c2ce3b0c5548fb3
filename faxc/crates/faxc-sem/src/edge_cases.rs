//! Boundary-condition sweeps for `faxc-sem` (§8.1): empty scopes, deep
//! nesting, shadowing. Denser than the inline unit tests beside each module;
//! this file is allowed to assume those modules already work.

#[cfg(test)]
mod tests {
    use faxc_util::{DefId, Symbol, Type};

    use crate::scope::ScopeTree;
    use crate::symbol::{Sym, SymbolTable, VariableSymbol};
    use crate::Analyzer;

    fn sym(s: &str) -> Symbol {
        Symbol::intern(s)
    }

    fn var(name: &str, ty: Type) -> Sym {
        Sym::Variable(VariableSymbol {
            name: Symbol::intern(name),
            out_id: name.to_string(),
            ty,
            is_global: false,
            is_property: false,
        })
    }

    // ==== empty scopes ====

    #[test]
    fn test_empty_scope_tree_resolves_nothing() {
        let tree = ScopeTree::new();
        assert_eq!(tree.resolve(tree.global(), sym("x")), None);
    }

    #[test]
    fn test_empty_scope_has_no_locals() {
        let tree = ScopeTree::new();
        assert!(tree.locals(tree.global()).is_empty());
    }

    #[test]
    fn test_empty_scope_count_is_zero() {
        let tree = ScopeTree::new();
        assert_eq!(tree.count(tree.global()), 0);
    }

    #[test]
    fn test_empty_symbol_table_stays_empty_until_inserted() {
        let mut table = SymbolTable::new();
        let id = table.insert(var("x", Type::Int));
        assert_eq!(id, DefId(0), "first insertion gets DefId(0)");
    }

    // ==== deep nesting ====

    #[test]
    fn test_deeply_nested_scopes_resolve_outer_binding() {
        let mut tree = ScopeTree::new();
        let g = tree.global();
        tree.define(g, sym("root"), DefId(0)).unwrap();

        let mut current = g;
        for _ in 0..200 {
            current = tree.enter_child_of(current);
        }
        assert_eq!(tree.resolve(current, sym("root")), Some(DefId(0)));
        assert_eq!(tree.depth(current), 200);
    }

    #[test]
    fn test_deeply_nested_scopes_do_not_leak_downward() {
        let mut tree = ScopeTree::new();
        let g = tree.global();
        let mut current = g;
        for depth in 0..50 {
            current = tree.enter_scope();
            tree.define(current, sym(&format!("v{depth}")), DefId(depth)).unwrap();
        }
        // A binding made at the deepest scope is invisible from the root.
        assert_eq!(tree.get(g, sym("v49")), None);
        assert_eq!(tree.resolve(current, sym("v49")), Some(DefId(49)));
    }

    #[test]
    fn test_deeply_nested_promotion_lattice_chain() {
        // Int -> Real -> Indef is the only two-step promotion chain the
        // lattice supports; nothing promotes past Indef.
        let step1 = Type::Int.promote_to(&Type::Real).unwrap();
        assert_eq!(step1, Type::Real);
        let step2 = step1.promote_to(&Type::Indef).unwrap();
        assert_eq!(step2, Type::Indef);
        assert_eq!(step2.promote_to(&Type::Int), Some(Type::Int));
    }

    // ==== shadowing ====

    #[test]
    fn test_shadowing_inner_scope_wins() {
        let mut tree = ScopeTree::new();
        let g = tree.global();
        tree.define(g, sym("x"), DefId(0)).unwrap();
        let child = tree.enter_scope();
        tree.define(child, sym("x"), DefId(1)).unwrap();
        assert_eq!(tree.resolve(child, sym("x")), Some(DefId(1)));
    }

    #[test]
    fn test_shadowing_does_not_mutate_outer_binding() {
        let mut tree = ScopeTree::new();
        let g = tree.global();
        tree.define(g, sym("x"), DefId(0)).unwrap();
        let child = tree.enter_scope();
        tree.define(child, sym("x"), DefId(1)).unwrap();
        tree.exit_scope();
        assert_eq!(tree.resolve(g, sym("x")), Some(DefId(0)));
    }

    #[test]
    fn test_duplicate_definition_in_same_scope_fails() {
        let mut tree = ScopeTree::new();
        let g = tree.global();
        tree.define(g, sym("x"), DefId(0)).unwrap();
        assert_eq!(tree.define(g, sym("x"), DefId(1)), Err(DefId(0)));
    }

    #[test]
    fn test_sibling_scopes_do_not_see_each_other() {
        let mut tree = ScopeTree::new();
        let g = tree.global();
        let a = tree.enter_child_of(g);
        tree.define(a, sym("only_in_a"), DefId(0)).unwrap();
        let b = tree.enter_child_of(g);
        assert_eq!(tree.resolve(b, sym("only_in_a")), None);
    }

    // ==== end-to-end analyzer boundary cases ====

    fn analyze(src: &str) -> Result<(faxc_par::Ast, crate::Analyzer), crate::CompileError> {
        let mut a = Analyzer::new(std::env::temp_dir().join("faxc-sem-edge-nonexistent"), |_: &str| true)?;
        let ast = faxc_par::Parser::parse_source(src).expect("source parses");
        let ast = a.analyze_program(ast)?;
        Ok((ast, a))
    }

    #[test]
    fn test_empty_program_analyzes_to_empty_decls() {
        let (ast, _) = analyze("").unwrap();
        assert!(ast.is_empty());
    }

    #[test]
    fn test_deeply_nested_blocks_do_not_overflow() {
        let mut src = String::new();
        for _ in 0..100 {
            src.push_str("se verdadeiro { ");
        }
        src.push_str("mostra 1");
        for _ in 0..100 {
            src.push_str(" }");
        }
        analyze(&src).unwrap();
    }

    #[test]
    fn test_redeclaring_a_variable_in_the_same_scope_is_an_error() {
        let err = analyze("var x: int = 1 var x: int = 2").unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_shadowing_in_nested_block_is_allowed() {
        analyze("var x: int = 1 { var x: real = 2.0 }").unwrap();
    }
}
