//! faxc-gen - Bytecode Emitter (§4.4)
//!
//! The second and final tree walker of the core: given a fully analyzed AST
//! and the `SymbolTable` the analyzer produced, emits the two-section
//! textual bytecode format consumed by the runtime. Deliberately partial —
//! a straight port of the original `ByteGen`'s coverage, not a full backend.

pub mod emitter;
pub mod error;
pub mod opcode;

#[cfg(test)]
mod edge_cases;

pub use emitter::Emitter;
pub use error::{EmitError, EmitResult};
pub use opcode::OpCode;
