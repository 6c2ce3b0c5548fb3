//! Build command implementation (§6.1 `faxt build`).
//!
//! Compiles a single entry module through the full pipeline
//! (parse → analyze → emit) and writes the resulting bytecode text.

use std::path::{Path, PathBuf};
use std::time::Instant;

use faxc_drv::Session;

use crate::commands::common::{default_bytecode_path, error_messages, output_messages};
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::{FaxtError, Result};

/// Arguments for the build command.
#[derive(Debug, Clone)]
pub struct BuildArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Source file to compile.
    pub input: PathBuf,
    /// Output bytecode path (default: input with `.fasm` extension).
    pub output: Option<PathBuf>,
    /// Standard-library directory override.
    pub std_lib: Option<PathBuf>,
    /// Print the parsed AST instead of emitting bytecode.
    pub emit_ast: bool,
}

/// Build command handler.
pub struct BuildCommand {
    args: BuildArgs,
    config: Config,
}

impl BuildCommand {
    /// Create a new BuildCommand using default configuration.
    pub fn new(args: BuildArgs) -> Self {
        Self { args, config: Config::default() }
    }

    /// Create a new BuildCommand against an explicit configuration.
    pub fn with_config(args: BuildArgs, config: Config) -> Self {
        Self { args, config }
    }

    /// Execute the command.
    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        self.validate_input_path(&self.args.input)?;

        let output_path = self.get_output_path();
        self.validate_output_parent(&output_path)?;

        let std_lib = self.get_std_lib();
        let mut session = Session::new(std_lib);

        if self.args.emit_ast {
            self.emit_ast(&mut session, &output_path)?;
        } else {
            self.emit_bytecode(&mut session, &output_path)?;
        }

        if self.args.verbose {
            eprintln!("✅ Build completed in {:.2}s", start_time.elapsed().as_secs_f64());
            eprintln!("{} {}", output_messages::CREATED_FILE, output_path.display());
        }

        Ok(())
    }

    fn emit_bytecode(&self, session: &mut Session, output_path: &Path) -> Result<()> {
        let bytecode = session.compile_file(&self.args.input)?;
        std::fs::write(output_path, bytecode)?;
        Ok(())
    }

    fn emit_ast(&self, session: &mut Session, output_path: &Path) -> Result<()> {
        let source = std::fs::read_to_string(&self.args.input)?;
        let ast = faxc_par::Parser::parse_source(&source).map_err(|e| {
            FaxtError::Validation(format!("failed to parse {}: {e}", self.args.input.display()))
        })?;
        // Exercises the session's source map the same way compile_file does,
        // so --emit-ast reports file paths consistently with bytecode builds.
        session.sources.add_file(self.args.input.display().to_string(), source);
        std::fs::write(output_path, format!("{ast:#?}"))?;
        Ok(())
    }

    fn get_std_lib(&self) -> PathBuf {
        self.args
            .std_lib
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.std_lib))
    }

    fn get_output_path(&self) -> PathBuf {
        self.args
            .output
            .clone()
            .unwrap_or_else(|| default_bytecode_path(&self.args.input))
    }

    fn validate_input_path(&self, input_path: &Path) -> Result<()> {
        if !input_path.exists() {
            return Err(FaxtError::Validation(format!(
                "{} {}",
                error_messages::INPUT_PATH_NOT_EXIST,
                input_path.display()
            )));
        }

        if !input_path.is_file() {
            return Err(FaxtError::Validation(format!(
                "{} {}",
                error_messages::INPUT_PATH_NOT_FILE,
                input_path.display()
            )));
        }

        Ok(())
    }

    fn validate_output_parent(&self, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl Command for BuildCommand {
    type Args = BuildArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args, config: Config::default() }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "build"
    }
}

impl CommandDescription for BuildCommand {
    fn description() -> &'static str {
        "Compile a source file to bytecode"
    }

    fn help() -> &'static str {
        "Runs the full pipeline (parse, analyze, emit) over a single entry \
         module and writes the resulting bytecode text."
    }
}

/// Run the build command.
pub fn run_build(args: BuildArgs) -> Result<()> {
    BuildCommand::new(args).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_build_command_writes_bytecode_file() {
        let dir = TempDir::new().unwrap();
        let input = write_source(&dir, "prog.ama", "mostra 1");
        let output = dir.path().join("prog.fasm");

        let args = BuildArgs {
            verbose: false,
            input,
            output: Some(output.clone()),
            std_lib: Some(dir.path().join("no-such-std")),
            emit_ast: false,
        };
        run_build(args).unwrap();

        let contents = std::fs::read_to_string(&output).unwrap();
        assert!(contents.starts_with(".data\n"));
    }

    #[test]
    fn test_build_command_default_output_path() {
        let dir = TempDir::new().unwrap();
        let input = write_source(&dir, "prog.ama", "mostra 1");

        let args = BuildArgs {
            verbose: false,
            input,
            output: None,
            std_lib: Some(dir.path().join("no-such-std")),
            emit_ast: false,
        };
        run_build(args).unwrap();

        assert!(dir.path().join("prog.fasm").exists());
    }

    #[test]
    fn test_build_command_emit_ast() {
        let dir = TempDir::new().unwrap();
        let input = write_source(&dir, "prog.ama", "mostra 1");
        let output = dir.path().join("prog.ast");

        let args = BuildArgs {
            verbose: false,
            input,
            output: Some(output.clone()),
            std_lib: Some(dir.path().join("no-such-std")),
            emit_ast: true,
        };
        run_build(args).unwrap();

        let contents = std::fs::read_to_string(&output).unwrap();
        assert!(contents.contains("Mostra"));
    }

    #[test]
    fn test_build_command_nonexistent_input_is_validation_error() {
        let dir = TempDir::new().unwrap();
        let args = BuildArgs {
            verbose: false,
            input: dir.path().join("missing.ama"),
            output: None,
            std_lib: None,
            emit_ast: false,
        };

        let err = run_build(args).unwrap_err();
        assert!(matches!(err, FaxtError::Validation(_)));
    }

    #[test]
    fn test_build_command_surfaces_compile_error() {
        let dir = TempDir::new().unwrap();
        let input = write_source(&dir, "prog.ama", "var x: int = x");

        let args = BuildArgs {
            verbose: false,
            input,
            output: None,
            std_lib: Some(dir.path().join("no-such-std")),
            emit_ast: false,
        };

        let err = run_build(args).unwrap_err();
        assert!(matches!(err, FaxtError::Compile(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
