//! Symbol module - String interning for efficient identifier handling.
//!
//! This module provides the [`Symbol`] type, a compact (4-byte) handle to an
//! interned string. Symbols enable O(1) string comparison and reduce memory
//! usage when the same string appears thousands of times across a source
//! file (identifiers, keywords, type names).
//!
//! # Thread Safety
//!
//! The symbol interner is fully thread-safe (`Sync + Send`). Multiple threads
//! can intern strings concurrently without blocking each other, via DashMap's
//! lock-free design.
//!
//! # Examples
//!
//! ```
//! use faxc_util::symbol::Symbol;
//!
//! let s1 = Symbol::intern("hello");
//! let s2 = Symbol::intern("hello");
//! let s3 = Symbol::intern("world");
//!
//! assert_eq!(s1, s2);
//! assert_ne!(s1, s3);
//! ```
//!
//! Using known keywords:
//!
//! ```
//! use faxc_util::symbol::{Symbol, KW_SE, KW_ENQUANTO};
//!
//! assert_eq!(KW_SE.as_str(), "se");
//! assert!(KW_SE.is_known());
//! ```

mod interner;

pub use interner::STRING_TABLE;

/// Statistics about the string interner for profiling.
#[derive(Clone, Copy, Debug, Default)]
pub struct InternerStats {
    pub count: usize,
    pub capacity: usize,
    pub collisions: usize,
    pub hits: usize,
    pub misses: usize,
}

impl InternerStats {
    pub const fn new(
        count: usize,
        capacity: usize,
        collisions: usize,
        hits: usize,
        misses: usize,
    ) -> Self {
        Self {
            count,
            capacity,
            collisions,
            hits,
            misses,
        }
    }

    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.count as f64 / self.capacity as f64
        }
    }

    pub fn is_near_capacity(&self) -> bool {
        self.load_factor() > 0.75
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn total_operations(&self) -> usize {
        self.hits + self.misses
    }

    pub fn memory_efficiency(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.count as f64 / self.total_operations() as f64
        }
    }
}

/// An interned string identifier.
///
/// `Symbol` is exactly 4 bytes, cache-friendly compared to `String`'s 24
/// bytes plus heap allocation. Interned strings live for the process
/// lifetime (never deallocated) via an arena allocator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    pub(crate) index: u32,
}

/// Reserved symbol indices for known symbols (keywords, type names, intrinsics).
const RESERVED_SYMBOLS_END: u32 = 512;

// ----------------------------------------------------------------------------
// Control flow keywords
// ----------------------------------------------------------------------------

/// `se` - if
pub const KW_SE: Symbol = Symbol { index: 0 };
/// `senaose` - elif
pub const KW_SENAOSE: Symbol = Symbol { index: 1 };
/// `senao` - else
pub const KW_SENAO: Symbol = Symbol { index: 2 };
/// `enquanto` - while
pub const KW_ENQUANTO: Symbol = Symbol { index: 3 };
/// `para` - for
pub const KW_PARA: Symbol = Symbol { index: 4 };
/// `escolha` - switch
pub const KW_ESCOLHA: Symbol = Symbol { index: 5 };
/// `caso` - case
pub const KW_CASO: Symbol = Symbol { index: 6 };
/// `retorna` - return
pub const KW_RETORNA: Symbol = Symbol { index: 7 };
/// `mostra` - print/show
pub const KW_MOSTRA: Symbol = Symbol { index: 8 };
/// `usa` - import/use
pub const KW_USA: Symbol = Symbol { index: 9 };
/// `eu` - self
pub const KW_EU: Symbol = Symbol { index: 10 };

// ----------------------------------------------------------------------------
// Declaration keywords
// ----------------------------------------------------------------------------

/// `var` - variable declaration
pub const KW_VAR: Symbol = Symbol { index: 11 };
/// `func` - function declaration
pub const KW_FUNC: Symbol = Symbol { index: 12 };
/// `classe` - class declaration
pub const KW_CLASSE: Symbol = Symbol { index: 13 };
/// `const` - constant declaration
pub const KW_CONST: Symbol = Symbol { index: 14 };

// ----------------------------------------------------------------------------
// Literal keywords
// ----------------------------------------------------------------------------

/// `verdadeiro` - boolean true
pub const KW_VERDADEIRO: Symbol = Symbol { index: 15 };
/// `falso` - boolean false
pub const KW_FALSO: Symbol = Symbol { index: 16 };
/// `nulo` - null/none
pub const KW_NULO: Symbol = Symbol { index: 17 };

// ----------------------------------------------------------------------------
// Operator keywords
// ----------------------------------------------------------------------------

/// `nao` - logical not
pub const KW_NAO: Symbol = Symbol { index: 18 };
/// `e` - logical and
pub const KW_E: Symbol = Symbol { index: 19 };
/// `ou` - logical or
pub const KW_OU: Symbol = Symbol { index: 20 };
/// `converte` - type conversion
pub const KW_CONVERTE: Symbol = Symbol { index: 21 };
/// `para` (type-conversion target clause) reuses `KW_PARA` above; `ate` is
/// the range-expression upper bound keyword
pub const KW_ATE: Symbol = Symbol { index: 22 };
/// `inc` - range-expression step clause
pub const KW_INC: Symbol = Symbol { index: 23 };

// ----------------------------------------------------------------------------
// Type names
// ----------------------------------------------------------------------------

/// `int` type
pub const TY_INT: Symbol = Symbol { index: 24 };
/// `real` type
pub const TY_REAL: Symbol = Symbol { index: 25 };
/// `bool` type
pub const TY_BOOL: Symbol = Symbol { index: 26 };
/// `texto` (string) type
pub const TY_TEXTO: Symbol = Symbol { index: 27 };
/// `vazio` (void) type
pub const TY_VAZIO: Symbol = Symbol { index: 28 };
/// `indef` (dynamically-typed) type
pub const TY_INDEF: Symbol = Symbol { index: 29 };

// ----------------------------------------------------------------------------
// Intrinsic call names
// ----------------------------------------------------------------------------

/// `lista` - list constructor intrinsic
pub const ID_LISTA: Symbol = Symbol { index: 30 };
/// `matriz` - matrix constructor intrinsic
pub const ID_MATRIZ: Symbol = Symbol { index: 31 };
/// `anexe` - list append intrinsic
pub const ID_ANEXE: Symbol = Symbol { index: 32 };

impl Symbol {
    /// The maximum index value for a symbol.
    pub const MAX_INDEX: u32 = u32::MAX;

    /// Intern a string, returning its symbol.
    #[inline]
    pub fn intern(string: &str) -> Self {
        STRING_TABLE.intern(string)
    }

    /// Get the string value associated with this symbol.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.get(*self).unwrap_or("")
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }

    #[inline]
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.as_str().ends_with(suffix)
    }

    #[inline]
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_str() == other
    }

    /// Returns true if this is a "known" symbol (predefined keyword/type/intrinsic).
    #[inline]
    pub fn is_known(&self) -> bool {
        self.index < RESERVED_SYMBOLS_END
    }

    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.index
    }

    /// # Safety
    /// The index must correspond to a valid entry in the string table.
    #[inline]
    pub unsafe fn from_u32_unchecked(index: u32) -> Self {
        Self { index }
    }

    #[inline]
    pub fn stats_struct() -> InternerStats {
        STRING_TABLE.stats()
    }

    #[inline]
    pub fn stats() -> (usize, usize) {
        let stats = STRING_TABLE.stats();
        (stats.count, stats.capacity)
    }

    /// Intern a keyword or type name, returning its predefined symbol where
    /// one exists, falling back to regular interning otherwise.
    #[inline]
    pub fn intern_known(string: &str) -> Self {
        match string {
            "se" => KW_SE,
            "senaose" => KW_SENAOSE,
            "senao" => KW_SENAO,
            "enquanto" => KW_ENQUANTO,
            "para" => KW_PARA,
            "escolha" => KW_ESCOLHA,
            "caso" => KW_CASO,
            "retorna" => KW_RETORNA,
            "mostra" => KW_MOSTRA,
            "usa" => KW_USA,
            "eu" => KW_EU,
            "var" => KW_VAR,
            "func" => KW_FUNC,
            "classe" => KW_CLASSE,
            "const" => KW_CONST,
            "verdadeiro" => KW_VERDADEIRO,
            "falso" => KW_FALSO,
            "nulo" => KW_NULO,
            "nao" => KW_NAO,
            "e" => KW_E,
            "ou" => KW_OU,
            "converte" => KW_CONVERTE,
            "ate" => KW_ATE,
            "inc" => KW_INC,
            "int" => TY_INT,
            "real" => TY_REAL,
            "bool" => TY_BOOL,
            "texto" => TY_TEXTO,
            "vazio" => TY_VAZIO,
            "indef" => TY_INDEF,
            "lista" => ID_LISTA,
            "matriz" => ID_MATRIZ,
            "anexe" => ID_ANEXE,
            _ => Self::intern(string),
        }
    }

    /// Get the symbol for a type-name keyword.
    #[inline]
    pub fn intern_type(string: &str) -> Self {
        match string {
            "int" => TY_INT,
            "real" => TY_REAL,
            "bool" => TY_BOOL,
            "texto" => TY_TEXTO,
            "vazio" => TY_VAZIO,
            "indef" => TY_INDEF,
            _ => Self::intern(string),
        }
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pretty-print a symbol with quotes for debugging.
pub trait SymbolPretty {
    fn pretty(&self) -> SymbolPrettyDisplay<'_>;
}

impl SymbolPretty for Symbol {
    fn pretty(&self) -> SymbolPrettyDisplay<'_> {
        SymbolPrettyDisplay(self)
    }
}

pub struct SymbolPrettyDisplay<'a>(&'a Symbol);

impl std::fmt::Display for SymbolPrettyDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.0.as_str())
    }
}

impl std::fmt::Debug for SymbolPrettyDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymbolPretty(\"{}\")", self.0.as_str())
    }
}

static_assertions::assert_impl_all!(Symbol: Send, Sync);
