//! faxc-par - AST Node Definitions
//!
//! The AST carries its own annotation fields (`eval_type`, `prom_type`,
//! `var_symbol`/`symbol` as `DefId`s) rather than a side table, filled in by
//! the semantic analyzer during its walk. Nodes are otherwise produced by
//! the parser and treated as read-only once analysis has run.

use faxc_util::{DefId, Symbol, Type};

use crate::Token;

/// AST root - a module is a flat list of top-level declarations.
pub type Ast = Vec<Decl>;

/// Top-level declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    Var(VarDecl),
    Function(FunctionDecl),
    Class(ClassDecl),
    Use(Use),
    Stmt(Stmt),
}

/// `var name: Type = init`
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: Symbol,
    pub type_name: Option<TypeName>,
    pub init: Option<Expr>,
    pub token: Token,
    /// Resolved by the analyzer.
    pub eval_type: Option<Type>,
    /// `DefId` of the `VariableSymbol` this declaration created.
    pub symbol: Option<DefId>,
}

/// A function parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Symbol,
    pub type_name: TypeName,
    pub token: Token,
}

/// `func name(params) : RetType { body }`
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub ret_type: Option<TypeName>,
    pub body: Option<Block>,
    pub token: Token,
    pub symbol: Option<DefId>,
}

/// `classe Name { members }`
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Symbol,
    pub variables: Vec<VarDecl>,
    pub methods: Vec<FunctionDecl>,
    pub token: Token,
    pub symbol: Option<DefId>,
}

/// `usa "path"`
#[derive(Debug, Clone)]
pub struct Use {
    pub path_lexeme: Symbol,
    pub token: Token,
}

/// A source-level type name as written (`int`, `texto`, `lista<int>`, a
/// class name, ...), resolved to a [`Type`] by the analyzer.
#[derive(Debug, Clone)]
pub struct TypeName {
    pub name: Symbol,
    pub dim: u32,
    pub token: Token,
}

/// A block of statements, with the scope the analyzer created for it.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    /// `DefId`-space marker for the scope created for this block; set by the
    /// analyzer. Concretely a `ScopeId` newtype lives in `faxc-sem`, but the
    /// AST only needs an opaque handle, so it is stored as a `DefId`.
    pub symbols: Option<DefId>,
}

/// Statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    Mostra(MostraStmt),
    Retorna(RetornaStmt),
    Se(SeStmt),
    Escolha(EscolhaStmt),
    Enquanto(EnquantoStmt),
    Para(ParaStmt),
    VarDecl(VarDecl),
    Block(Block),
}

#[derive(Debug, Clone)]
pub struct MostraStmt {
    pub expr: Expr,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct RetornaStmt {
    pub expr: Option<Expr>,
    pub token: Token,
}

/// `se cond { then } senaose cond2 { .. } senao { else }`
#[derive(Debug, Clone)]
pub struct SeStmt {
    pub condition: Expr,
    pub then_branch: Block,
    pub elifs: Vec<(Expr, Block)>,
    pub else_branch: Option<Box<Block>>,
    pub token: Token,
}

/// `escolha expr { caso v1: block caso v2: block por omissão: block }`.
/// Desugared into a chain of [`Stmt::Se`] by `visit_or_transform` in
/// `faxc-sem`; this is the shape the parser produces before that rewrite.
#[derive(Debug, Clone)]
pub struct EscolhaStmt {
    pub scrutinee: Expr,
    pub cases: Vec<(Expr, Block)>,
    pub default: Option<Block>,
    pub token: Token,
}

#[derive(Debug, Clone)]
pub struct EnquantoStmt {
    pub condition: Expr,
    pub body: Block,
    pub token: Token,
}

/// `para name de start ate end [inc step] { body }`
#[derive(Debug, Clone)]
pub struct ParaStmt {
    pub var_name: Symbol,
    pub start: Expr,
    pub end: Expr,
    pub inc: Option<Expr>,
    pub body: Block,
    pub token: Token,
    pub symbol: Option<DefId>,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpKind {
    Plus,
    Minus,
    Nao,
}

/// Every expression is one struct; `kind` carries the variant-specific
/// payload. Per the resolved AST-annotation strategy, `eval_type`/`prom_type`
/// are dedicated fields rather than a side table (§9.1).
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub token: Token,
    pub eval_type: Option<Type>,
    pub prom_type: Option<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind, token: Token) -> Self {
        Self {
            kind,
            token,
            eval_type: None,
            prom_type: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    ConstantInt(i64),
    ConstantReal(f64),
    ConstantTexto(Symbol),
    ConstantBool(bool),
    ConstantNulo,
    /// `lista(T, n)`/`matriz(T, r, c)` literal-style construction is modeled
    /// as an ordinary [`ExprKind::Call`]; a true list literal (`[a, b, c]`)
    /// carries its element expressions plus the declared element type name.
    ListLiteral {
        elements: Vec<Expr>,
        element_type: Option<TypeName>,
    },
    /// A bare name reference, resolved to a `DefId` by the analyzer.
    Variable {
        name: Symbol,
        var_symbol: Option<DefId>,
    },
    /// `target.member`
    Get {
        target: Box<Expr>,
        member: Symbol,
    },
    /// `target.member = value`
    Set {
        target: Box<Expr>,
        member: Symbol,
        value: Box<Expr>,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Converte {
        target_type: TypeName,
        expr: Box<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: BinOpKind,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOpKind,
        expr: Box<Expr>,
    },
    Assign {
        name: Symbol,
        var_symbol: Option<DefId>,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        /// `DefId` of the resolved callee symbol (function or constructor).
        symbol: Option<DefId>,
    },
    /// `eu` - self, legal only inside a method body.
    Eu,
}
