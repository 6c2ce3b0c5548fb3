//! Bytecode Emitter (§4.4) — a second tree walker over the analyzed AST that
//! produces the two-section textual bytecode format. A straight port of the
//! original `ByteGen`/`OpCode` pair (`amanda/bytec.py`): deliberately partial,
//! covering only the node kinds that file implements and failing loudly on
//! the rest rather than silently no-opping.

use indexmap::IndexMap;

use faxc_par::ast::{BinOpKind, Block, Decl, Expr, ExprKind, Stmt, UnaryOpKind, VarDecl};
use faxc_par::Ast;
use faxc_sem::symbol::{Sym, SymbolTable};

use crate::error::{EmitError, EmitResult};
use crate::opcode::{type_code, OpCode};

pub struct Emitter<'a> {
    symbols: &'a SymbolTable,
    depth: i32,
    const_table: IndexMap<String, usize>,
    ops: String,
}

impl<'a> Emitter<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            depth: -1,
            const_table: IndexMap::new(),
            ops: String::new(),
        }
    }

    /// Emits a whole analyzed module, returning the `.data`/`.ops` text.
    pub fn emit_program(mut self, ast: &Ast) -> EmitResult<String> {
        self.emit_decls(ast)?;
        let mut out = String::from(".data\n");
        for literal in self.const_table.keys() {
            out.push_str(literal);
            out.push('\n');
        }
        out.push_str(".ops\n");
        out.push_str(&self.ops);
        Ok(out)
    }

    fn define_constant(&mut self, literal: impl Into<String>) -> usize {
        let literal = literal.into();
        let next = self.const_table.len();
        *self.const_table.entry(literal).or_insert(next)
    }

    fn write_op(&mut self, op: OpCode, args: &[usize]) {
        self.ops.push_str(&op.to_string());
        for arg in args {
            self.ops.push(' ');
            self.ops.push_str(&arg.to_string());
        }
        self.ops.push('\n');
    }

    fn out_id_of(&self, def_id: faxc_util::DefId) -> EmitResult<&str> {
        match self.symbols.get(def_id) {
            Sym::Variable(v) => Ok(&v.out_id),
            _ => Err(EmitError::NotYetImplemented("referência a símbolo não-variável".to_string())),
        }
    }

    fn emit_decls(&mut self, decls: &[Decl]) -> EmitResult<()> {
        self.depth += 1;
        for decl in decls {
            self.emit_decl(decl)?;
        }
        self.depth -= 1;
        Ok(())
    }

    fn emit_decl(&mut self, decl: &Decl) -> EmitResult<()> {
        match decl {
            Decl::Var(v) => self.emit_var_decl(v),
            Decl::Stmt(s) => self.emit_stmt(s),
            Decl::Function(_) => Err(EmitError::NotYetImplemented("func".to_string())),
            Decl::Class(_) => Err(EmitError::NotYetImplemented("classe".to_string())),
            Decl::Use(_) => Err(EmitError::NotYetImplemented("usa".to_string())),
        }
    }

    fn emit_block(&mut self, block: &Block) -> EmitResult<()> {
        self.depth += 1;
        for stmt in &block.stmts {
            self.emit_stmt(stmt)?;
        }
        self.depth -= 1;
        Ok(())
    }

    fn emit_stmt(&mut self, stmt: &Stmt) -> EmitResult<()> {
        match stmt {
            Stmt::Mostra(m) => {
                self.emit_expr(&m.expr)?;
                self.write_op(OpCode::Mostra, &[]);
                Ok(())
            }
            Stmt::VarDecl(v) => self.emit_var_decl(v),
            Stmt::Block(b) => self.emit_block(b),
            Stmt::Expr(_) => Err(EmitError::NotYetImplemented("expressão como instrução".to_string())),
            Stmt::Retorna(_) => Err(EmitError::NotYetImplemented("retorna".to_string())),
            Stmt::Se(_) => Err(EmitError::NotYetImplemented("se".to_string())),
            Stmt::Escolha(_) => Err(EmitError::NotYetImplemented("escolha".to_string())),
            Stmt::Enquanto(_) => Err(EmitError::NotYetImplemented("enquanto".to_string())),
            Stmt::Para(_) => Err(EmitError::NotYetImplemented("para".to_string())),
        }
    }

    fn emit_var_decl(&mut self, v: &VarDecl) -> EmitResult<()> {
        if let Some(init) = &v.init {
            self.emit_expr(init)?;
        }
        let def_id = v.symbol.ok_or_else(|| EmitError::NotYetImplemented("vardecl sem símbolo".to_string()))?;
        let out_id = self.out_id_of(def_id)?.to_string();
        let id_idx = self.define_constant(out_id);
        let ty = v.eval_type.as_ref().ok_or_else(|| EmitError::NotYetImplemented("vardecl sem tipo".to_string()))?;
        let code = type_code(ty)
            .ok_or_else(|| EmitError::NotYetImplemented(format!("tipo de global não suportado: {ty:?}")))?;
        self.write_op(OpCode::DefGlobal, &[id_idx, code as usize]);
        Ok(())
    }

    fn emit_expr(&mut self, e: &Expr) -> EmitResult<()> {
        match &e.kind {
            ExprKind::ConstantInt(_)
            | ExprKind::ConstantReal(_)
            | ExprKind::ConstantBool(_)
            | ExprKind::ConstantTexto(_) => {
                let idx = self.define_constant(e.token.lexeme.clone());
                self.write_op(OpCode::LoadConst, &[idx]);
                Ok(())
            }
            ExprKind::Variable { var_symbol, .. } => {
                let def_id = var_symbol
                    .ok_or_else(|| EmitError::NotYetImplemented("variável sem símbolo resolvido".to_string()))?;
                let out_id = self.out_id_of(def_id)?.to_string();
                let idx = self.define_constant(out_id);
                self.write_op(OpCode::GetGlobal, &[idx]);
                Ok(())
            }
            ExprKind::UnaryOp { op: UnaryOpKind::Minus, expr } => {
                self.emit_expr(expr)?;
                self.write_op(OpCode::OpInvert, &[]);
                Ok(())
            }
            ExprKind::BinOp { left, op, right } => {
                self.emit_expr(left)?;
                self.emit_expr(right)?;
                let opcode = match op {
                    BinOpKind::Add => OpCode::OpAdd,
                    BinOpKind::Sub => OpCode::OpMinus,
                    BinOpKind::Mul => OpCode::OpMul,
                    BinOpKind::Div => OpCode::OpDiv,
                    BinOpKind::FloorDiv => OpCode::OpFloorDiv,
                    BinOpKind::Mod => OpCode::OpModulo,
                    _ => return Err(EmitError::NotYetImplemented(format!("operador {op:?}"))),
                };
                self.write_op(opcode, &[]);
                Ok(())
            }
            other => Err(EmitError::NotYetImplemented(format!("{other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_sem::Analyzer;

    fn analyze(src: &str) -> (Ast, SymbolTable) {
        let mut a = Analyzer::new(std::env::temp_dir().join("faxc-gen-tests-nonexistent"), |_: &str| true).unwrap();
        let ast = faxc_par::Parser::parse_source(src).unwrap();
        let ast = a.analyze_program(ast).unwrap();
        (ast, a.symbols)
    }

    #[test]
    fn test_promotion_scenario_emits_expected_ops() {
        // Scenario 1 from §8.
        let (ast, symbols) = analyze("var x: real = 1 + 2");
        let out = Emitter::new(&symbols).emit_program(&ast).unwrap();
        assert!(out.contains(".data\n1\n2\nx\n"));
        assert!(out.contains(".ops\n"));
        let ops_section = out.split(".ops\n").nth(1).unwrap();
        let lines: Vec<_> = ops_section.lines().collect();
        assert_eq!(lines, vec!["1 0", "1 1", "2", "9 2 1"]);
    }

    #[test]
    fn test_mostra_constant() {
        let (ast, symbols) = analyze("mostra 10");
        let out = Emitter::new(&symbols).emit_program(&ast).unwrap();
        assert!(out.contains(".data\n10\n.ops\n1 0\n0\n"));
    }

    #[test]
    fn test_constant_pool_dedup_reuses_index() {
        let (ast, symbols) = analyze("mostra 1 mostra 1");
        let out = Emitter::new(&symbols).emit_program(&ast).unwrap();
        let data_section = out.split(".data\n").nth(1).unwrap().split(".ops\n").next().unwrap();
        assert_eq!(data_section.lines().count(), 1, "the literal '1' should be interned once");
    }

    #[test]
    fn test_unary_minus() {
        let (ast, symbols) = analyze("mostra -5");
        let out = Emitter::new(&symbols).emit_program(&ast).unwrap();
        let ops_section = out.split(".ops\n").nth(1).unwrap();
        assert_eq!(ops_section.lines().collect::<Vec<_>>(), vec!["1 0", "8", "0"]);
    }

    #[test]
    fn test_se_is_not_yet_implemented() {
        let (ast, symbols) = analyze("se verdadeiro { mostra 1 }");
        let err = Emitter::new(&symbols).emit_program(&ast).unwrap_err();
        assert!(matches!(err, EmitError::NotYetImplemented(_)));
    }

    #[test]
    fn test_var_decl_without_initializer_still_emits_def_global() {
        let (ast, symbols) = analyze("var x: int");
        let out = Emitter::new(&symbols).emit_program(&ast).unwrap();
        let ops_section = out.split(".ops\n").nth(1).unwrap();
        assert_eq!(ops_section.lines().collect::<Vec<_>>(), vec!["9 0 0"]);
    }
}
