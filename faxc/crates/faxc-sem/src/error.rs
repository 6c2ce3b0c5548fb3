//! The one user-facing error kind the analyzer raises (§7).

use std::path::PathBuf;
use thiserror::Error;

/// A single, non-accumulating compile error: the analyzer aborts at the
/// first rule violation rather than collecting a batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{file_path}:{line}: {message}")]
pub struct CompileError {
    pub file_path: PathBuf,
    pub message: String,
    pub line: u32,
}

impl CompileError {
    pub fn new(file_path: impl Into<PathBuf>, message: impl Into<String>, line: u32) -> Self {
        Self {
            file_path: file_path.into(),
            message: message.into(),
            line,
        }
    }
}

pub type SemResult<T> = Result<T, CompileError>;
