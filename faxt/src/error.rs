//! Error handling module for the faxt CLI.
//!
//! This module provides custom error types using `thiserror` for structured
//! error handling throughout the application.

use thiserror::Error;

/// Main error type for the faxt CLI application.
///
/// This enum represents all possible errors that can occur
/// during the execution of faxt commands.
#[derive(Error, Debug)]
pub enum FaxtError {
    /// Error when a required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when file operations fail.
    #[error("File operation failed: {0}")]
    FileOperation(String),

    /// Error when input validation fails.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the compiler pipeline itself (parse/analyze/emit).
    #[error(transparent)]
    Compile(#[from] faxc_drv::DriverError),
}

impl FaxtError {
    /// Exit code table (§7.1): 0 is success and handled by `main`, not here.
    /// 1 compile error, 2 internal/emit fault, 3 CLI usage error.
    pub fn exit_code(&self) -> i32 {
        match self {
            FaxtError::Compile(faxc_drv::DriverError::Compile(_)) => 1,
            FaxtError::Compile(faxc_drv::DriverError::Emit(_)) => 2,
            FaxtError::Compile(faxc_drv::DriverError::Io(_)) => 3,
            FaxtError::Io(_) => 3,
            FaxtError::Config(_) | FaxtError::FileOperation(_) | FaxtError::Validation(_) => 3,
        }
    }
}

/// Result type alias using FaxtError.
///
/// This type alias simplifies function signatures by providing
/// a consistent result type throughout the application.
pub type Result<T> = std::result::Result<T, FaxtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = FaxtError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_file_operation_error_display() {
        let err = FaxtError::FileOperation("permission denied".to_string());
        assert_eq!(err.to_string(), "File operation failed: permission denied");
    }

    #[test]
    fn test_validation_error_display() {
        let err = FaxtError::Validation("invalid format".to_string());
        assert_eq!(err.to_string(), "Validation error: invalid format");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let faxt_err: FaxtError = io_err.into();
        assert!(matches!(faxt_err, FaxtError::Io(_)));
        assert_eq!(faxt_err.exit_code(), 3);
    }

    #[test]
    fn test_compile_error_exit_code_is_one() {
        let dir = std::env::temp_dir().join("faxt-error-tests-no-stdlib");
        let mut session = faxc_drv::Session::new(dir);
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "var x: int = x").unwrap();
        let driver_err = session.compile_file(file.path()).unwrap_err();
        let faxt_err: FaxtError = driver_err.into();
        assert_eq!(faxt_err.exit_code(), 1);
    }
}
