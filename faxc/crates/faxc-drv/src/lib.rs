//! faxc-drv - Compiler Driver (§6.1)
//!
//! The thin layer that wires the three pipeline crates into one call: read a
//! source file, analyze it, emit its bytecode. Owns the source map, the
//! standard-library path used to resolve `embutidos.ama`, and a diagnostic
//! sink that holds the single structured error a compilation can raise (§7
//! is explicit the analyzer does not accumulate errors across a pass).

pub mod error;
pub mod runtime_names;

use std::path::{Path, PathBuf};

use faxc_sem::{Analyzer, CompileError};
use faxc_util::span::SourceMap;

pub use error::{DriverError, DriverResult};

/// Holds the single compile error a session's last compilation raised, if
/// any. Deliberately not an accumulating error list (§7).
#[derive(Default)]
pub struct DiagnosticSink {
    last_error: Option<CompileError>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, err: CompileError) {
        self.last_error = Some(err);
    }

    pub fn last_error(&self) -> Option<&CompileError> {
        self.last_error.as_ref()
    }

    pub fn clear(&mut self) {
        self.last_error = None;
    }
}

/// One compilation session (§6.1). Not `Send`/`Sync`-constrained beyond what
/// its fields already are: the analyzer itself is strictly single-threaded
/// (§5.1) — a session compiles one module at a time.
pub struct Session {
    pub sources: SourceMap,
    pub diagnostics: DiagnosticSink,
    std_lib: PathBuf,
}

impl Session {
    pub fn new(std_lib: impl Into<PathBuf>) -> Self {
        Self {
            sources: SourceMap::new(),
            diagnostics: DiagnosticSink::new(),
            std_lib: std_lib.into(),
        }
    }

    /// Runs parse → analyze → emit for one entry module, returning the
    /// two-section bytecode text (§6.1).
    pub fn compile_file(&mut self, path: impl AsRef<Path>) -> DriverResult<String> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        self.sources.add_file(path.display().to_string(), source.clone());

        let result = self.compile_source(path, &source);
        if let Err(DriverError::Compile(ref err)) = result {
            self.diagnostics.record(err.clone());
        }
        result
    }

    /// Runs analysis only, discarding the resulting AST (§6.1 `faxt check`).
    pub fn check_file(&mut self, path: impl AsRef<Path>) -> DriverResult<()> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        self.sources.add_file(path.display().to_string(), source.clone());

        let mut analyzer = self.new_analyzer()?;
        let result = analyzer.analyze_file(path.to_path_buf(), &source);
        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                self.diagnostics.record(err.clone());
                Err(err.into())
            }
        }
    }

    fn compile_source(&mut self, path: &Path, source: &str) -> DriverResult<String> {
        let mut analyzer = self.new_analyzer()?;
        let ast = analyzer.analyze_file(path.to_path_buf(), source)?;
        let out = faxc_gen::Emitter::new(&analyzer.symbols).emit_program(&ast)?;
        Ok(out)
    }

    fn new_analyzer(&self) -> DriverResult<Analyzer> {
        Ok(Analyzer::new(self.std_lib.clone(), runtime_names::is_valid_name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_source(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{contents}").unwrap();
        f
    }

    #[test]
    fn test_compile_file_produces_bytecode_text() {
        let file = temp_source("mostra 1");
        let mut session = Session::new(std::env::temp_dir().join("faxc-drv-tests-no-stdlib"));
        let out = session.compile_file(file.path()).unwrap();
        assert!(out.starts_with(".data\n"));
        assert!(out.contains(".ops\n1 0\n0\n"));
    }

    #[test]
    fn test_compile_file_records_compile_error_in_diagnostics() {
        let file = temp_source("var x: int = x");
        let mut session = Session::new(std::env::temp_dir().join("faxc-drv-tests-no-stdlib"));
        let err = session.compile_file(file.path()).unwrap_err();
        assert!(matches!(err, DriverError::Compile(_)));
        assert!(session.diagnostics.last_error().is_some());
    }

    #[test]
    fn test_compile_file_surfaces_emit_error_for_unsupported_construct() {
        let file = temp_source("enquanto verdadeiro { mostra 1 }");
        let mut session = Session::new(std::env::temp_dir().join("faxc-drv-tests-no-stdlib"));
        let err = session.compile_file(file.path()).unwrap_err();
        assert!(matches!(err, DriverError::Emit(_)));
    }

    #[test]
    fn test_compile_file_missing_path_is_io_error() {
        let mut session = Session::new(std::env::temp_dir().join("faxc-drv-tests-no-stdlib"));
        let err = session.compile_file("/nonexistent/path/to/nowhere.ama").unwrap_err();
        assert!(matches!(err, DriverError::Io(_)));
    }

    #[test]
    fn test_check_file_does_not_emit() {
        let file = temp_source("var x: int = 1");
        let mut session = Session::new(std::env::temp_dir().join("faxc-drv-tests-no-stdlib"));
        session.check_file(file.path()).unwrap();
    }

    #[test]
    fn test_check_file_still_reports_compile_errors() {
        let file = temp_source("var x: int = x");
        let mut session = Session::new(std::env::temp_dir().join("faxc-drv-tests-no-stdlib"));
        let err = session.check_file(file.path()).unwrap_err();
        assert!(matches!(err, DriverError::Compile(_)));
    }
}
