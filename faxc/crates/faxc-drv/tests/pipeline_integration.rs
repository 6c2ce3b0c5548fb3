//! End-to-end pipeline tests — the six scenarios a complete run of
//! parse → analyze → emit must satisfy. Each scenario drives the real
//! `faxc-par` parser rather than a hand-built AST, since a working
//! recursive-descent parser already exists in this workspace and exercises
//! the same node shapes more realistically than a synthetic tree would.

use faxc_gen::Emitter;
use faxc_par::ast::{Decl, ExprKind, Stmt};
use faxc_par::Parser;
use faxc_sem::symbol::Sym;
use faxc_sem::Analyzer;
use faxc_util::Type;

fn analyzer() -> Analyzer {
    Analyzer::new(std::env::temp_dir().join("faxc-drv-pipeline-no-stdlib"), |_: &str| true).unwrap()
}

// ==== Scenario 1: integer arithmetic with promotion ====

#[test]
fn test_scenario_1_promotion_emits_expected_ops() {
    let mut a = analyzer();
    let ast = Parser::parse_source("var x: real = 1 + 2").unwrap();
    let ast = a.analyze_program(ast).unwrap();

    let Decl::Var(v) = &ast[0] else { panic!("expected var decl") };
    assert_eq!(v.eval_type, Some(Type::Real));
    let init = v.init.as_ref().unwrap();
    assert_eq!(init.eval_type, Some(Type::Int));
    assert_eq!(init.prom_type, Some(Type::Real));

    let out = Emitter::new(&a.symbols).emit_program(&ast).unwrap();
    let ops = out.split(".ops\n").nth(1).unwrap();
    assert_eq!(ops.lines().collect::<Vec<_>>(), vec!["1 0", "1 1", "2", "9 2 1"]);
}

// ==== Scenario 2: cyclic import ====

#[test]
fn test_scenario_2_cyclic_import_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.ama"), "usa \"b.ama\"").unwrap();
    std::fs::write(dir.path().join("b.ama"), "usa \"a.ama\"").unwrap();

    let mut a = analyzer();
    let entry = dir.path().join("a.ama");
    let source = std::fs::read_to_string(&entry).unwrap();
    let err = a.analyze_file(entry, &source).unwrap_err();
    assert!(err.message.contains("inclusão cíclica detectada"));
}

// ==== Scenario 3: select desugaring ====

#[test]
fn test_scenario_3_escolha_desugars_to_chained_se() {
    let mut a = analyzer();
    let ast = Parser::parse_source(
        "var x: int = 1 escolha x { caso 1: mostra 10 caso 2: mostra 20 por omissão: mostra 0 }",
    )
    .unwrap();
    let ast = a.analyze_program(ast).unwrap();

    let Decl::Stmt(Stmt::Se(se)) = &ast[1] else { panic!("expected a Se, got {:?}", ast.get(1)) };
    assert!(matches!(se.condition.kind, ExprKind::BinOp { op: faxc_par::ast::BinOpKind::Eq, .. }));
    assert_eq!(se.elifs.len(), 1);
    assert!(matches!(se.elifs[0].0.kind, ExprKind::BinOp { op: faxc_par::ast::BinOpKind::Eq, .. }));
    assert!(se.else_branch.is_some());
}

// ==== Scenario 4: non-void missing return ====

#[test]
fn test_scenario_4_missing_return_is_rejected() {
    let mut a = analyzer();
    let ast = Parser::parse_source("func f(): int { se verdadeiro { retorna 1 } }").unwrap();
    let err = a.analyze_program(ast).unwrap_err();
    assert!(err.message.contains("não possui a instrução 'retorna'"));
}

// ==== Scenario 5: list intrinsic ====

#[test]
fn test_scenario_5_lista_intrinsic_eval_type() {
    let mut a = analyzer();
    let ast = Parser::parse_source("mostra lista(int, 5)").unwrap();
    let ast = a.analyze_program(ast).unwrap();

    let Decl::Stmt(Stmt::Mostra(m)) = &ast[0] else { panic!("expected mostra") };
    assert_eq!(m.expr.eval_type, Some(Type::List(Box::new(Type::Int), 1)));
    let ExprKind::Call { args, .. } = &m.expr.kind else { panic!("expected call") };
    assert_eq!(args.len(), 2);
    assert_eq!(args[1].eval_type, Some(Type::Int));
}

// ==== Scenario 6: constructor synthesis ====

#[test]
fn test_scenario_6_constructor_matches_field_declaration_order() {
    let mut a = analyzer();
    let ast = Parser::parse_source("classe Ponto { var x: int var y: int func soma(): int { retorna eu.x } }").unwrap();
    let ast = a.analyze_program(ast).unwrap();

    let Decl::Class(c) = &ast[0] else { panic!("expected class decl") };
    let class_id = c.symbol.unwrap();
    let Sym::Class(class_sym) = a.symbols.get(class_id) else { panic!("expected class symbol") };
    let ctor_id = class_sym.constructor.unwrap();
    let Sym::Function(ctor) = a.symbols.get(ctor_id) else { panic!("expected function symbol") };

    assert_eq!(ctor.arity(), 2);
    let names: Vec<_> = ctor.params.keys().map(|s| s.as_str().to_string()).collect();
    assert_eq!(names, vec!["x", "y"]);
}
