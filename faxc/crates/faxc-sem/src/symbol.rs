//! Symbol kinds (§4.2/§3) and the `DefId`-indexed arena that holds them.
//!
//! Grounded on the original analyzer's `symbols.VariableSymbol`/
//! `FunctionSymbol`/`Klass`/`Module` class hierarchy, translated into one
//! Rust enum stored in an `IndexVec<DefId, Symbol>` arena — `DefId` is
//! reused from `faxc-util` rather than invented fresh (§9.1).

use faxc_util::{DefId, IndexVec, Symbol as Name, Type};
use indexmap::IndexMap;

use crate::scope::RibId;

/// A resolved symbol. Polymorphic over the kinds §4.2 lists.
#[derive(Debug, Clone)]
pub enum Sym {
    Variable(VariableSymbol),
    Function(FunctionSymbol),
    Class(ClassSymbol),
    /// A bare type name (`int`, `texto`, ... or a class used as a type).
    Type(Type),
    Module(ModuleSymbol),
}

#[derive(Debug, Clone)]
pub struct VariableSymbol {
    pub name: Name,
    pub out_id: String,
    pub ty: Type,
    pub is_global: bool,
    pub is_property: bool,
}

#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub name: Name,
    pub out_id: String,
    pub ret_type: Type,
    /// Ordered parameter name -> type; order matters (constructor synthesis,
    /// §8 scenario 6, relies on declaration order).
    pub params: IndexMap<Name, Type>,
    pub body_scope: Option<RibId>,
    pub is_property: bool,
    pub is_native: bool,
}

impl FunctionSymbol {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone)]
pub struct ClassSymbol {
    pub name: Name,
    pub out_id: String,
    /// Instance members in declaration order (fields then, after the second
    /// pass, methods tagged `is_property = true` are recorded separately on
    /// their own `FunctionSymbol`).
    pub members: IndexMap<Name, DefId>,
    pub constructor: Option<DefId>,
}

#[derive(Debug, Clone)]
pub struct ModuleSymbol {
    pub path: std::path::PathBuf,
    pub loaded: bool,
}

impl Sym {
    pub fn name(&self) -> Option<Name> {
        match self {
            Sym::Variable(v) => Some(v.name),
            Sym::Function(f) => Some(f.name),
            Sym::Class(c) => Some(c.name),
            Sym::Type(_) => None,
            Sym::Module(_) => None,
        }
    }

    pub fn out_id(&self) -> Option<&str> {
        match self {
            Sym::Variable(v) => Some(&v.out_id),
            Sym::Function(f) => Some(&f.out_id),
            Sym::Class(c) => Some(&c.out_id),
            _ => None,
        }
    }

    /// The static type a reference to this symbol evaluates to, if any.
    pub fn eval_type(&self) -> Option<Type> {
        match self {
            Sym::Variable(v) => Some(v.ty.clone()),
            Sym::Function(_) => None,
            Sym::Class(c) => Some(Type::Class(DefId::DUMMY, c.name)),
            Sym::Type(t) => Some(t.clone()),
            Sym::Module(_) => None,
        }
    }

    pub fn can_evaluate(&self) -> bool {
        match self {
            Sym::Variable(_) => true,
            Sym::Function(_) => false,
            Sym::Class(_) => false,
            Sym::Type(_) => false,
            Sym::Module(_) => false,
        }
    }

    pub fn is_property(&self) -> bool {
        match self {
            Sym::Variable(v) => v.is_property,
            Sym::Function(f) => f.is_property,
            _ => false,
        }
    }

    pub fn set_is_property(&mut self, value: bool) {
        match self {
            Sym::Variable(v) => v.is_property = value,
            Sym::Function(f) => f.is_property = value,
            _ => {}
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match self {
            Sym::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassSymbol> {
        match self {
            Sym::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassSymbol> {
        match self {
            Sym::Class(c) => Some(c),
            _ => None,
        }
    }
}

/// `DefId`-indexed arena owning every symbol created during analysis.
/// `insert` returns the `DefId` from `IndexVec::push` directly, so no
/// separate id generator is needed (§9.1).
#[derive(Default)]
pub struct SymbolTable {
    symbols: IndexVec<DefId, Sym>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: IndexVec::new(),
        }
    }

    pub fn insert(&mut self, sym: Sym) -> DefId {
        self.symbols.push(sym)
    }

    pub fn get(&self, id: DefId) -> &Sym {
        &self.symbols[id]
    }

    pub fn get_mut(&mut self, id: DefId) -> &mut Sym {
        &mut self.symbols[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, ty: Type) -> Sym {
        Sym::Variable(VariableSymbol {
            name: Name::intern(name),
            out_id: name.to_string(),
            ty,
            is_global: false,
            is_property: false,
        })
    }

    #[test]
    fn test_insert_returns_distinct_ids() {
        let mut table = SymbolTable::new();
        let a = table.insert(var("a", Type::Int));
        let b = table.insert(var("b", Type::Real));
        assert_ne!(a, b);
    }

    #[test]
    fn test_get_roundtrip() {
        let mut table = SymbolTable::new();
        let id = table.insert(var("x", Type::Bool));
        match table.get(id) {
            Sym::Variable(v) => assert_eq!(v.name, Name::intern("x")),
            _ => panic!("expected variable"),
        }
    }

    #[test]
    fn test_function_arity() {
        let mut params = IndexMap::new();
        params.insert(Name::intern("a"), Type::Int);
        params.insert(Name::intern("b"), Type::Real);
        let f = FunctionSymbol {
            name: Name::intern("f"),
            out_id: "f".to_string(),
            ret_type: Type::Vazio,
            params,
            body_scope: None,
            is_property: false,
            is_native: false,
        };
        assert_eq!(f.arity(), 2);
    }

    #[test]
    fn test_variable_can_evaluate_function_cannot() {
        let v = var("x", Type::Int);
        assert!(v.can_evaluate());
        let f = Sym::Function(FunctionSymbol {
            name: Name::intern("f"),
            out_id: "f".to_string(),
            ret_type: Type::Vazio,
            params: IndexMap::new(),
            body_scope: None,
            is_property: false,
            is_native: false,
        });
        assert!(!f.can_evaluate());
    }

    #[test]
    fn test_set_is_property() {
        let mut v = var("x", Type::Int);
        assert!(!v.is_property());
        v.set_is_property(true);
        assert!(v.is_property());
    }
}
