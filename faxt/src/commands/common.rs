//! Common types and utilities for faxt commands.
//!
//! This module provides shared types, constants, and utility functions
//! used across all command implementations to ensure consistency.

use std::path::{Path, PathBuf};

use crate::error::{FaxtError, Result};

// ============================================================================
// Path Utilities
// ============================================================================

/// Sanitize a user-provided path to prevent path traversal attacks.
///
/// Ensures the resolved path is within the current working directory
/// or an allowed base directory.
///
/// # Security
/// This function protects against:
/// - Directory traversal using `..` components
/// - Symbolic link attacks
/// - Absolute path injection
#[allow(dead_code)]
pub fn sanitize_path(path: &Path, base_dir: Option<&Path>) -> Result<PathBuf> {
    let base = base_dir.unwrap_or_else(|| Path::new("."));
    let base_canonical = base
        .canonicalize()
        .map_err(|e| FaxtError::Validation(format!("Invalid base directory: {}", e)))?;

    let path_canonical = path.canonicalize().unwrap_or_else(|_| {
        // For non-existent paths, resolve relative to base
        base.join(path).to_path_buf()
    });

    // Ensure the path is within the base directory
    if !path_canonical.starts_with(&base_canonical) {
        return Err(FaxtError::Validation(
            "Path traversal detected: path must be within current directory".to_string(),
        ));
    }

    Ok(path_canonical)
}

/// Replace a source file's extension with `.fasm`, the bytecode output
/// extension (§6.1 `faxt build`'s default output path).
pub fn default_bytecode_path(input: &Path) -> PathBuf {
    input.with_extension("fasm")
}

// ============================================================================
// Error Messages
// ============================================================================

/// Standard error message templates.
pub mod error_messages {
    /// Error when input path does not exist.
    pub const INPUT_PATH_NOT_EXIST: &str = "Input path does not exist: {}";

    /// Error when input path is not a file.
    pub const INPUT_PATH_NOT_FILE: &str = "Input path is not a file: {}";

    /// Error when target path is not a directory.
    pub const TARGET_NOT_DIR: &str = "Target path is not a directory: {}";

    /// Error when directory is not empty.
    pub const DIR_NOT_EMPTY: &str = "Directory is not empty: {}";

    /// Error when output path's parent does not exist and cannot be created.
    pub const OUTPUT_PATH_NOT_DIR: &str = "Output path is not a directory: {}";
}

// ============================================================================
// Output Messages
// ============================================================================

/// Standard output message templates.
pub mod output_messages {
    /// Generic info message format.
    pub const INFO: &str = "ℹ️ {}";

    /// Generic warning message format.
    pub const WARNING: &str = "⚠️ {}";

    /// Message when a directory is created.
    pub const CREATED_DIR: &str = "✅ Created directory: {}";

    /// Message when a file is created.
    pub const CREATED_FILE: &str = "✅ Created file: {}";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bytecode_path_replaces_extension() {
        let path = Path::new("prog.ama");
        assert_eq!(default_bytecode_path(path), PathBuf::from("prog.fasm"));
    }

    #[test]
    fn test_sanitize_path_rejects_traversal_outside_base() {
        let base = std::env::temp_dir();
        let result = sanitize_path(Path::new("../../../../etc/passwd"), Some(&base));
        assert!(result.is_err());
    }
}
