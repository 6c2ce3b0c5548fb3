//! faxc-util - Core utilities and foundation types shared by every faxc crate.
//!
//! Provides interned identifiers ([`symbol`]), typed arena indices
//! ([`index_vec`]), source locations ([`span`]), the compiler's definition
//! handle ([`def_id`]), and diagnostic reporting ([`diagnostic`]).

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;
pub mod types;

pub use def_id::DefId;
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, Span};
pub use symbol::Symbol;
pub use types::Type;

pub use rustc_hash::{FxHashMap, FxHashSet};
