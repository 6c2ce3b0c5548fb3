//! The driver's error type (§7.1): wraps every error kind a pipeline phase
//! can raise behind one enum the CLI matches on to pick an exit code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Compile(#[from] faxc_sem::CompileError),
    #[error(transparent)]
    Emit(#[from] faxc_gen::EmitError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DriverError {
    /// Mirrors the reference driver's exit code table (§6.1/§7.1): 0 success
    /// (handled by the CLI, not here), 1 compile error, 2 internal/emit
    /// fault, 3 CLI usage error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::Compile(_) => 1,
            DriverError::Emit(_) => 2,
            DriverError::Io(_) => 3,
        }
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
