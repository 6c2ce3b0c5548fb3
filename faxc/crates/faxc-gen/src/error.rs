//! The emitter's one error kind (§7.1): always an implementation fault, never
//! a user-facing diagnostic — well-formed, analyzed input never fails to
//! emit within the subset this emitter covers.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmitError {
    #[error("not yet implemented: {0}")]
    NotYetImplemented(String),
}

pub type EmitResult<T> = Result<T, EmitError>;
