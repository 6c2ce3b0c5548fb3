//! faxc-par - external AST node definitions (§6) and a minimal hand-written
//! recursive-descent parser.
//!
//! Lexing and parsing to AST are out of scope for the core this crate feeds
//! (`faxc-sem`); what lives here is only the shape the analyzer is handed:
//! the AST node variants ([`ast`]) and a small scanner + `Parser` sufficient
//! to drive the analyzer end to end in tests and the CLI's `--emit-ast`
//! debugging path. This is deliberately not a general-purpose parser.

pub mod ast;

use faxc_util::{Span, Symbol};
use thiserror::Error;

pub use ast::{Ast, Decl};

/// A scanned token: lexeme, kind, and source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub lexeme: String,
    pub kind: TokenKind,
    pub line: u32,
    pub col: u32,
}

impl Token {
    pub fn span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    pub fn synthetic(kind: TokenKind, from: &Token) -> Self {
        Token {
            lexeme: String::new(),
            kind,
            line: from.line,
            col: from.col,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    IntLit(i64),
    RealLit(f64),
    TextoLit(Symbol),
    Ident(Symbol),

    Se,
    SenaoSe,
    Senao,
    Enquanto,
    Para,
    Escolha,
    Caso,
    PorOmissao,
    Retorna,
    Mostra,
    Usa,
    Eu,
    Var,
    Func,
    Classe,
    Const,
    Verdadeiro,
    Falso,
    Nulo,
    Nao,
    E,
    Ou,
    Converte,
    De,
    Ate,
    Inc,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Colon,
    Semicolon,

    Assign,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,

    Eof,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("linha {line}: caractere inesperado '{ch}'")]
    UnexpectedChar { ch: char, line: u32 },
    #[error("linha {line}: token inesperado, esperava {expected}, encontrou {found:?}")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        line: u32,
    },
    #[error("fim de arquivo inesperado")]
    UnexpectedEof,
}

type PResult<T> = Result<T, ParseError>;

/// Turns source text into a flat token stream. Not a production scanner:
/// covers exactly the lexical surface this grammar needs.
pub struct Scanner<'a> {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    col: u32,
    _source: &'a str,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            _source: source,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    pub fn tokenize(mut self) -> PResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let (line, col) = (self.line, self.col);
            let Some(c) = self.peek() else {
                tokens.push(Token {
                    lexeme: String::new(),
                    kind: TokenKind::Eof,
                    line,
                    col,
                });
                break;
            };

            if c.is_ascii_digit() {
                tokens.push(self.scan_number(line, col));
                continue;
            }
            if c == '"' {
                tokens.push(self.scan_string(line, col)?);
                continue;
            }
            if c.is_alphabetic() || c == '_' {
                tokens.push(self.scan_word(line, col));
                continue;
            }

            let kind = match c {
                '(' => {
                    self.advance();
                    TokenKind::LParen
                }
                ')' => {
                    self.advance();
                    TokenKind::RParen
                }
                '{' => {
                    self.advance();
                    TokenKind::LBrace
                }
                '}' => {
                    self.advance();
                    TokenKind::RBrace
                }
                '[' => {
                    self.advance();
                    TokenKind::LBracket
                }
                ']' => {
                    self.advance();
                    TokenKind::RBracket
                }
                ',' => {
                    self.advance();
                    TokenKind::Comma
                }
                '.' => {
                    self.advance();
                    TokenKind::Dot
                }
                ':' => {
                    self.advance();
                    TokenKind::Colon
                }
                ';' => {
                    self.advance();
                    TokenKind::Semicolon
                }
                '+' => {
                    self.advance();
                    TokenKind::Plus
                }
                '-' => {
                    self.advance();
                    TokenKind::Minus
                }
                '*' => {
                    self.advance();
                    TokenKind::Star
                }
                '%' => {
                    self.advance();
                    TokenKind::Percent
                }
                '/' => {
                    self.advance();
                    if self.peek() == Some('/') {
                        self.advance();
                        TokenKind::SlashSlash
                    } else {
                        TokenKind::Slash
                    }
                }
                '=' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::EqEq
                    } else {
                        TokenKind::Assign
                    }
                }
                '!' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::NotEq
                    } else {
                        return Err(ParseError::UnexpectedChar { ch: '!', line });
                    }
                }
                '<' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::Le
                    } else {
                        TokenKind::Lt
                    }
                }
                '>' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::Ge
                    } else {
                        TokenKind::Gt
                    }
                }
                other => return Err(ParseError::UnexpectedChar { ch: other, line }),
            };
            tokens.push(Token {
                lexeme: String::new(),
                kind,
                line,
                col,
            });
        }
        Ok(tokens)
    }

    fn scan_number(&mut self, line: u32, col: u32) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let mut is_real = false;
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_real = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        let kind = if is_real {
            TokenKind::RealLit(lexeme.parse().unwrap_or(0.0))
        } else {
            TokenKind::IntLit(lexeme.parse().unwrap_or(0))
        };
        Token { lexeme, kind, line, col }
    }

    fn scan_string(&mut self, line: u32, col: u32) -> PResult<Token> {
        self.advance(); // opening quote
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(ParseError::UnexpectedEof),
                Some('"') => break,
                _ => {
                    self.advance();
                }
            }
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        self.advance(); // closing quote
        Ok(Token {
            kind: TokenKind::TextoLit(Symbol::intern(&lexeme)),
            lexeme,
            line,
            col,
        })
    }

    fn scan_word(&mut self, line: u32, col: u32) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        // "por omissão" (the default-case keyword of `escolha`) is two words;
        // special-cased here since it is the only multi-word keyword.
        if word == "por" {
            let save = (self.pos, self.line, self.col);
            self.skip_trivia();
            let start2 = self.pos;
            while self.peek().is_some_and(|c| c.is_alphabetic()) {
                self.advance();
            }
            let second: String = self.chars[start2..self.pos].iter().collect();
            if second == "omissao" || second == "omissão" {
                return Token {
                    lexeme: format!("por {second}"),
                    kind: TokenKind::PorOmissao,
                    line,
                    col,
                };
            }
            self.pos = save.0;
            self.line = save.1;
            self.col = save.2;
        }

        let kind = match word.as_str() {
            "se" => TokenKind::Se,
            "senaose" => TokenKind::SenaoSe,
            "senao" | "senão" => TokenKind::Senao,
            "enquanto" => TokenKind::Enquanto,
            "para" => TokenKind::Para,
            "escolha" => TokenKind::Escolha,
            "caso" => TokenKind::Caso,
            "retorna" => TokenKind::Retorna,
            "mostra" => TokenKind::Mostra,
            "usa" => TokenKind::Usa,
            "eu" => TokenKind::Eu,
            "var" => TokenKind::Var,
            "func" => TokenKind::Func,
            "classe" => TokenKind::Classe,
            "const" => TokenKind::Const,
            "verdadeiro" => TokenKind::Verdadeiro,
            "falso" => TokenKind::Falso,
            "nulo" => TokenKind::Nulo,
            "nao" | "não" => TokenKind::Nao,
            "e" => TokenKind::E,
            "ou" => TokenKind::Ou,
            "converte" => TokenKind::Converte,
            "de" => TokenKind::De,
            "ate" | "até" => TokenKind::Ate,
            "inc" => TokenKind::Inc,
            _ => TokenKind::Ident(Symbol::intern(&word)),
        };
        Token { lexeme: word, kind, line, col }
    }
}

/// Hand-written recursive-descent parser producing [`ast::Ast`].
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_source(source: &str) -> PResult<Ast> {
        let tokens = Scanner::new(source).tokenize()?;
        Parser::new(tokens).parse_program()
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn advance(&mut self) -> Token {
        let t = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            let found = self.peek().clone();
            Err(ParseError::UnexpectedToken {
                expected: what.to_string(),
                found: found.kind,
                line: found.line,
            })
        }
    }

    fn expect_ident(&mut self) -> PResult<(Symbol, Token)> {
        let tok = self.peek().clone();
        if let TokenKind::Ident(sym) = tok.kind {
            self.advance();
            Ok((sym, tok))
        } else {
            Err(ParseError::UnexpectedToken {
                expected: "identificador".to_string(),
                found: tok.kind,
                line: tok.line,
            })
        }
    }

    pub fn parse_program(&mut self) -> PResult<Ast> {
        let mut decls = Vec::new();
        while !self.check(&TokenKind::Eof) {
            decls.push(self.parse_decl()?);
        }
        Ok(decls)
    }

    fn parse_decl(&mut self) -> PResult<ast::Decl> {
        match &self.peek().kind {
            TokenKind::Var => Ok(ast::Decl::Var(self.parse_var_decl()?)),
            TokenKind::Func => Ok(ast::Decl::Function(self.parse_function_decl()?)),
            TokenKind::Classe => Ok(ast::Decl::Class(self.parse_class_decl()?)),
            TokenKind::Usa => Ok(ast::Decl::Use(self.parse_use()?)),
            _ => Ok(ast::Decl::Stmt(self.parse_stmt()?)),
        }
    }

    fn parse_type_name(&mut self) -> PResult<ast::TypeName> {
        let (name, token) = self.expect_ident_or_keyword_type()?;
        let mut dim = 0;
        while self.check(&TokenKind::LBracket) {
            self.advance();
            self.expect(TokenKind::RBracket, "]")?;
            dim += 1;
        }
        Ok(ast::TypeName { name, dim, token })
    }

    fn expect_ident_or_keyword_type(&mut self) -> PResult<(Symbol, Token)> {
        let tok = self.peek().clone();
        let name = match &tok.kind {
            TokenKind::Ident(s) => *s,
            _ => return self.expect_ident(),
        };
        self.advance();
        Ok((name, tok))
    }

    fn parse_var_decl(&mut self) -> PResult<ast::VarDecl> {
        let token = self.expect(TokenKind::Var, "var")?;
        let (name, _) = self.expect_ident()?;
        let type_name = if self.check(&TokenKind::Colon) {
            self.advance();
            Some(self.parse_type_name()?)
        } else {
            None
        };
        let init = if self.check(&TokenKind::Assign) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.consume_semicolon();
        Ok(ast::VarDecl {
            name,
            type_name,
            init,
            token,
            eval_type: None,
            symbol: None,
        })
    }

    fn consume_semicolon(&mut self) {
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn parse_function_decl(&mut self) -> PResult<ast::FunctionDecl> {
        let token = self.expect(TokenKind::Func, "func")?;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::LParen, "(")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let (pname, ptoken) = self.expect_ident()?;
                self.expect(TokenKind::Colon, ":")?;
                let type_name = self.parse_type_name()?;
                params.push(ast::Param {
                    name: pname,
                    type_name,
                    token: ptoken,
                });
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, ")")?;
        let ret_type = if self.check(&TokenKind::Colon) {
            self.advance();
            Some(self.parse_type_name()?)
        } else {
            None
        };
        let body = Some(self.parse_block()?);
        Ok(ast::FunctionDecl {
            name,
            params,
            ret_type,
            body,
            token,
            symbol: None,
        })
    }

    fn parse_class_decl(&mut self) -> PResult<ast::ClassDecl> {
        let token = self.expect(TokenKind::Classe, "classe")?;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::LBrace, "{")?;
        let mut variables = Vec::new();
        let mut methods = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            match &self.peek().kind {
                TokenKind::Var => variables.push(self.parse_var_decl()?),
                TokenKind::Func => methods.push(self.parse_function_decl()?),
                _ => {
                    let found = self.advance();
                    return Err(ParseError::UnexpectedToken {
                        expected: "var ou func".to_string(),
                        found: found.kind,
                        line: found.line,
                    });
                }
            }
        }
        self.expect(TokenKind::RBrace, "}")?;
        Ok(ast::ClassDecl {
            name,
            variables,
            methods,
            token,
            symbol: None,
        })
    }

    fn parse_use(&mut self) -> PResult<ast::Use> {
        let token = self.expect(TokenKind::Usa, "usa")?;
        let path_tok = self.peek().clone();
        let path_lexeme = match path_tok.kind {
            TokenKind::TextoLit(s) => {
                self.advance();
                s
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    expected: "texto (caminho do módulo)".to_string(),
                    found: path_tok.kind,
                    line: path_tok.line,
                })
            }
        };
        self.consume_semicolon();
        Ok(ast::Use { path_lexeme, token })
    }

    fn parse_block(&mut self) -> PResult<ast::Block> {
        self.expect(TokenKind::LBrace, "{")?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace, "}")?;
        Ok(ast::Block { stmts, symbols: None })
    }

    fn parse_stmt(&mut self) -> PResult<ast::Stmt> {
        match &self.peek().kind {
            TokenKind::Var => Ok(ast::Stmt::VarDecl(self.parse_var_decl()?)),
            TokenKind::Mostra => Ok(ast::Stmt::Mostra(self.parse_mostra()?)),
            TokenKind::Retorna => Ok(ast::Stmt::Retorna(self.parse_retorna()?)),
            TokenKind::Se => Ok(ast::Stmt::Se(self.parse_se()?)),
            TokenKind::Escolha => Ok(ast::Stmt::Escolha(self.parse_escolha()?)),
            TokenKind::Enquanto => Ok(ast::Stmt::Enquanto(self.parse_enquanto()?)),
            TokenKind::Para => Ok(ast::Stmt::Para(self.parse_para()?)),
            TokenKind::LBrace => Ok(ast::Stmt::Block(self.parse_block()?)),
            _ => {
                let expr = self.parse_expr()?;
                self.consume_semicolon();
                Ok(ast::Stmt::Expr(expr))
            }
        }
    }

    fn parse_mostra(&mut self) -> PResult<ast::MostraStmt> {
        let token = self.expect(TokenKind::Mostra, "mostra")?;
        let expr = self.parse_expr()?;
        self.consume_semicolon();
        Ok(ast::MostraStmt { expr, token })
    }

    fn parse_retorna(&mut self) -> PResult<ast::RetornaStmt> {
        let token = self.expect(TokenKind::Retorna, "retorna")?;
        let expr = if self.check(&TokenKind::Semicolon) || self.check(&TokenKind::RBrace) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume_semicolon();
        Ok(ast::RetornaStmt { expr, token })
    }

    fn parse_se(&mut self) -> PResult<ast::SeStmt> {
        let token = self.expect(TokenKind::Se, "se")?;
        let condition = self.parse_expr()?;
        let then_branch = self.parse_block()?;
        let mut elifs = Vec::new();
        while self.check(&TokenKind::SenaoSe) {
            self.advance();
            let cond = self.parse_expr()?;
            let block = self.parse_block()?;
            elifs.push((cond, block));
        }
        let else_branch = if self.check(&TokenKind::Senao) {
            self.advance();
            Some(Box::new(self.parse_block()?))
        } else {
            None
        };
        Ok(ast::SeStmt {
            condition,
            then_branch,
            elifs,
            else_branch,
            token,
        })
    }

    fn parse_escolha(&mut self) -> PResult<ast::EscolhaStmt> {
        let token = self.expect(TokenKind::Escolha, "escolha")?;
        let scrutinee = self.parse_expr()?;
        self.expect(TokenKind::LBrace, "{")?;
        let mut cases = Vec::new();
        let mut default = None;
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Caso) {
                self.advance();
                let value = self.parse_expr()?;
                self.expect(TokenKind::Colon, ":")?;
                let mut stmts = Vec::new();
                while !self.check(&TokenKind::Caso)
                    && !self.check(&TokenKind::PorOmissao)
                    && !self.check(&TokenKind::RBrace)
                {
                    stmts.push(self.parse_stmt()?);
                }
                cases.push((value, ast::Block { stmts, symbols: None }));
            } else if self.check(&TokenKind::PorOmissao) {
                self.advance();
                self.expect(TokenKind::Colon, ":")?;
                let mut stmts = Vec::new();
                while !self.check(&TokenKind::RBrace) {
                    stmts.push(self.parse_stmt()?);
                }
                default = Some(ast::Block { stmts, symbols: None });
            } else {
                let found = self.advance();
                return Err(ParseError::UnexpectedToken {
                    expected: "caso ou por omissão".to_string(),
                    found: found.kind,
                    line: found.line,
                });
            }
        }
        self.expect(TokenKind::RBrace, "}")?;
        Ok(ast::EscolhaStmt {
            scrutinee,
            cases,
            default,
            token,
        })
    }

    fn parse_enquanto(&mut self) -> PResult<ast::EnquantoStmt> {
        let token = self.expect(TokenKind::Enquanto, "enquanto")?;
        let condition = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(ast::EnquantoStmt { condition, body, token })
    }

    fn parse_para(&mut self) -> PResult<ast::ParaStmt> {
        let token = self.expect(TokenKind::Para, "para")?;
        let (var_name, _) = self.expect_ident()?;
        self.expect(TokenKind::De, "de")?;
        let start = self.parse_expr()?;
        self.expect(TokenKind::Ate, "ate")?;
        let end = self.parse_expr()?;
        let inc = if self.check(&TokenKind::Inc) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(ast::ParaStmt {
            var_name,
            start,
            end,
            inc,
            body,
            token,
            symbol: None,
        })
    }

    // ---- Expression grammar: assign < or < and < equality < comparison
    // < additive < multiplicative < unary < postfix < primary ----

    pub fn parse_expr(&mut self) -> PResult<ast::Expr> {
        self.parse_assign()
    }

    fn parse_assign(&mut self) -> PResult<ast::Expr> {
        let expr = self.parse_or()?;
        if self.check(&TokenKind::Assign) {
            let token = self.advance();
            let value = self.parse_assign()?;
            return match expr.kind {
                ast::ExprKind::Variable { name, .. } => Ok(ast::Expr::new(
                    ast::ExprKind::Assign {
                        name,
                        var_symbol: None,
                        value: Box::new(value),
                    },
                    token,
                )),
                ast::ExprKind::Get { target, member } => Ok(ast::Expr::new(
                    ast::ExprKind::Set {
                        target,
                        member,
                        value: Box::new(value),
                    },
                    token,
                )),
                _ => Err(ParseError::UnexpectedToken {
                    expected: "alvo de atribuição válido".to_string(),
                    found: TokenKind::Assign,
                    line: token.line,
                }),
            };
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> PResult<ast::Expr> {
        let mut left = self.parse_and()?;
        while self.check(&TokenKind::Ou) {
            let token = self.advance();
            let right = self.parse_and()?;
            left = ast::Expr::new(
                ast::ExprKind::BinOp {
                    left: Box::new(left),
                    op: ast::BinOpKind::Or,
                    right: Box::new(right),
                },
                token,
            );
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> PResult<ast::Expr> {
        let mut left = self.parse_equality()?;
        while self.check(&TokenKind::E) {
            let token = self.advance();
            let right = self.parse_equality()?;
            left = ast::Expr::new(
                ast::ExprKind::BinOp {
                    left: Box::new(left),
                    op: ast::BinOpKind::And,
                    right: Box::new(right),
                },
                token,
            );
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> PResult<ast::Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::EqEq => ast::BinOpKind::Eq,
                TokenKind::NotEq => ast::BinOpKind::Ne,
                _ => break,
            };
            let token = self.advance();
            let right = self.parse_comparison()?;
            left = ast::Expr::new(
                ast::ExprKind::BinOp {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                token,
            );
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> PResult<ast::Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Lt => ast::BinOpKind::Lt,
                TokenKind::Le => ast::BinOpKind::Le,
                TokenKind::Gt => ast::BinOpKind::Gt,
                TokenKind::Ge => ast::BinOpKind::Ge,
                _ => break,
            };
            let token = self.advance();
            let right = self.parse_additive()?;
            left = ast::Expr::new(
                ast::ExprKind::BinOp {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                token,
            );
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> PResult<ast::Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Plus => ast::BinOpKind::Add,
                TokenKind::Minus => ast::BinOpKind::Sub,
                _ => break,
            };
            let token = self.advance();
            let right = self.parse_multiplicative()?;
            left = ast::Expr::new(
                ast::ExprKind::BinOp {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                token,
            );
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> PResult<ast::Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Star => ast::BinOpKind::Mul,
                TokenKind::Slash => ast::BinOpKind::Div,
                TokenKind::SlashSlash => ast::BinOpKind::FloorDiv,
                TokenKind::Percent => ast::BinOpKind::Mod,
                _ => break,
            };
            let token = self.advance();
            let right = self.parse_unary()?;
            left = ast::Expr::new(
                ast::ExprKind::BinOp {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                token,
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<ast::Expr> {
        let op = match &self.peek().kind {
            TokenKind::Plus => Some(ast::UnaryOpKind::Plus),
            TokenKind::Minus => Some(ast::UnaryOpKind::Minus),
            TokenKind::Nao => Some(ast::UnaryOpKind::Nao),
            _ => None,
        };
        if let Some(op) = op {
            let token = self.advance();
            let expr = self.parse_unary()?;
            return Ok(ast::Expr::new(
                ast::ExprKind::UnaryOp {
                    op,
                    expr: Box::new(expr),
                },
                token,
            ));
        }
        if self.check(&TokenKind::Converte) {
            let token = self.advance();
            self.expect(TokenKind::LParen, "(")?;
            let expr = self.parse_expr()?;
            self.expect(TokenKind::Comma, ",")?;
            let target_type = self.parse_type_name()?;
            self.expect(TokenKind::RParen, ")")?;
            return Ok(ast::Expr::new(
                ast::ExprKind::Converte {
                    target_type,
                    expr: Box::new(expr),
                },
                token,
            ));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<ast::Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match &self.peek().kind {
                TokenKind::Dot => {
                    let token = self.advance();
                    let (member, _) = self.expect_ident()?;
                    expr = ast::Expr::new(
                        ast::ExprKind::Get {
                            target: Box::new(expr),
                            member,
                        },
                        token,
                    );
                }
                TokenKind::LBracket => {
                    let token = self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket, "]")?;
                    expr = ast::Expr::new(
                        ast::ExprKind::Index {
                            target: Box::new(expr),
                            index: Box::new(index),
                        },
                        token,
                    );
                }
                TokenKind::LParen => {
                    let token = self.advance();
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if self.check(&TokenKind::Comma) {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RParen, ")")?;
                    expr = ast::Expr::new(
                        ast::ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                            symbol: None,
                        },
                        token,
                    );
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<ast::Expr> {
        let tok = self.peek().clone();
        match tok.kind.clone() {
            TokenKind::IntLit(v) => {
                self.advance();
                Ok(ast::Expr::new(ast::ExprKind::ConstantInt(v), tok))
            }
            TokenKind::RealLit(v) => {
                self.advance();
                Ok(ast::Expr::new(ast::ExprKind::ConstantReal(v), tok))
            }
            TokenKind::TextoLit(s) => {
                self.advance();
                Ok(ast::Expr::new(ast::ExprKind::ConstantTexto(s), tok))
            }
            TokenKind::Verdadeiro => {
                self.advance();
                Ok(ast::Expr::new(ast::ExprKind::ConstantBool(true), tok))
            }
            TokenKind::Falso => {
                self.advance();
                Ok(ast::Expr::new(ast::ExprKind::ConstantBool(false), tok))
            }
            TokenKind::Nulo => {
                self.advance();
                Ok(ast::Expr::new(ast::ExprKind::ConstantNulo, tok))
            }
            TokenKind::Eu => {
                self.advance();
                Ok(ast::Expr::new(ast::ExprKind::Eu, tok))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(ast::Expr::new(
                    ast::ExprKind::Variable {
                        name,
                        var_symbol: None,
                    },
                    tok,
                ))
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(&TokenKind::RBracket) {
                    loop {
                        elements.push(self.parse_expr()?);
                        if self.check(&TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBracket, "]")?;
                Ok(ast::Expr::new(
                    ast::ExprKind::ListLiteral {
                        elements,
                        element_type: None,
                    },
                    tok,
                ))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, ")")?;
                Ok(inner)
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "expressão".to_string(),
                found: other,
                line: tok.line,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==== scanner ====

    #[test]
    fn test_scan_keywords() {
        let toks = Scanner::new("se senao enquanto").tokenize().unwrap();
        assert_eq!(toks[0].kind, TokenKind::Se);
        assert_eq!(toks[1].kind, TokenKind::Senao);
        assert_eq!(toks[2].kind, TokenKind::Enquanto);
    }

    #[test]
    fn test_scan_por_omissao() {
        let toks = Scanner::new("por omissao:").tokenize().unwrap();
        assert_eq!(toks[0].kind, TokenKind::PorOmissao);
    }

    #[test]
    fn test_scan_numbers() {
        let toks = Scanner::new("42 3.14").tokenize().unwrap();
        assert_eq!(toks[0].kind, TokenKind::IntLit(42));
        assert_eq!(toks[1].kind, TokenKind::RealLit(3.14));
    }

    #[test]
    fn test_scan_string() {
        let toks = Scanner::new("\"ola mundo\"").tokenize().unwrap();
        assert_eq!(toks[0].kind, TokenKind::TextoLit(Symbol::intern("ola mundo")));
    }

    // ==== parser ====

    #[test]
    fn test_parse_var_decl() {
        let ast = Parser::parse_source("var x: int = 1 + 2").unwrap();
        assert_eq!(ast.len(), 1);
        match &ast[0] {
            ast::Decl::Var(v) => {
                assert_eq!(v.name, Symbol::intern("x"));
                assert!(v.init.is_some());
            }
            _ => panic!("expected var decl"),
        }
    }

    #[test]
    fn test_parse_function_decl() {
        let ast = Parser::parse_source("func f(a: int): int { retorna a }").unwrap();
        match &ast[0] {
            ast::Decl::Function(f) => {
                assert_eq!(f.params.len(), 1);
                assert!(f.ret_type.is_some());
            }
            _ => panic!("expected function decl"),
        }
    }

    #[test]
    fn test_parse_se_senaose_senao() {
        let src = "se x { mostra 1 } senaose y { mostra 2 } senao { mostra 3 }";
        let ast = Parser::parse_source(src).unwrap();
        match &ast[0] {
            ast::Decl::Stmt(ast::Stmt::Se(s)) => {
                assert_eq!(s.elifs.len(), 1);
                assert!(s.else_branch.is_some());
            }
            _ => panic!("expected se stmt"),
        }
    }

    #[test]
    fn test_parse_escolha() {
        let src = "escolha x { caso 1: mostra 10 caso 2: mostra 20 por omissao: mostra 0 }";
        let ast = Parser::parse_source(src).unwrap();
        match &ast[0] {
            ast::Decl::Stmt(ast::Stmt::Escolha(e)) => {
                assert_eq!(e.cases.len(), 2);
                assert!(e.default.is_some());
            }
            _ => panic!("expected escolha stmt"),
        }
    }

    #[test]
    fn test_parse_class_decl() {
        let src = "classe Ponto { var x: int var y: int func soma(): int { retorna eu.x } }";
        let ast = Parser::parse_source(src).unwrap();
        match &ast[0] {
            ast::Decl::Class(c) => {
                assert_eq!(c.variables.len(), 2);
                assert_eq!(c.methods.len(), 1);
            }
            _ => panic!("expected class decl"),
        }
    }

    #[test]
    fn test_parse_para_loop() {
        let ast = Parser::parse_source("para i de 0 ate 10 { mostra i }").unwrap();
        match &ast[0] {
            ast::Decl::Stmt(ast::Stmt::Para(p)) => {
                assert_eq!(p.var_name, Symbol::intern("i"));
                assert!(p.inc.is_none());
            }
            _ => panic!("expected para stmt"),
        }
    }

    #[test]
    fn test_parse_call_and_assign() {
        let ast = Parser::parse_source("x = lista(int, 5)").unwrap();
        match &ast[0] {
            ast::Decl::Stmt(ast::Stmt::Expr(e)) => {
                assert!(matches!(e.kind, ast::ExprKind::Assign { .. }));
            }
            _ => panic!("expected assign expr stmt"),
        }
    }

    #[test]
    fn test_operator_precedence() {
        // 1 + 2 * 3 should parse as 1 + (2 * 3)
        let ast = Parser::parse_source("var x = 1 + 2 * 3").unwrap();
        match &ast[0] {
            ast::Decl::Var(v) => {
                let init = v.init.as_ref().unwrap();
                match &init.kind {
                    ast::ExprKind::BinOp { op, right, .. } => {
                        assert_eq!(*op, ast::BinOpKind::Add);
                        assert!(matches!(right.kind, ast::ExprKind::BinOp { .. }));
                    }
                    _ => panic!("expected binop"),
                }
            }
            _ => panic!("expected var decl"),
        }
    }
}
