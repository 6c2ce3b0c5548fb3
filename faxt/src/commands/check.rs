//! Check command implementation (§6.1 `faxt check`).
//!
//! Runs analysis only, without emission, and reports success or the single
//! structured compile error — fast feedback suited to editor integration.

use std::path::PathBuf;

use faxc_drv::Session;

use crate::commands::common::error_messages;
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::{FaxtError, Result};

/// Arguments for the check command.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Source file to analyze.
    pub input: PathBuf,
    /// Standard-library directory override.
    pub std_lib: Option<PathBuf>,
}

/// Check command handler.
pub struct CheckCommand {
    args: CheckArgs,
    config: Config,
}

impl CheckCommand {
    pub fn new(args: CheckArgs) -> Self {
        Self { args, config: Config::default() }
    }

    pub fn with_config(args: CheckArgs, config: Config) -> Self {
        Self { args, config }
    }

    pub fn run(&self) -> Result<()> {
        if !self.args.input.exists() {
            return Err(FaxtError::Validation(format!(
                "{} {}",
                error_messages::INPUT_PATH_NOT_EXIST,
                self.args.input.display()
            )));
        }

        let std_lib = self
            .args
            .std_lib
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.std_lib));
        let mut session = Session::new(std_lib);
        session.check_file(&self.args.input)?;

        if self.args.verbose {
            eprintln!("✅ {} is well-formed", self.args.input.display());
        }

        Ok(())
    }
}

impl Command for CheckCommand {
    type Args = CheckArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args, config: Config::default() }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "check"
    }
}

impl CommandDescription for CheckCommand {
    fn description() -> &'static str {
        "Analyze a source file without emitting bytecode"
    }

    fn help() -> &'static str {
        "Runs name resolution and type checking only, reporting the single \
         structured compile error if one is found."
    }
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<()> {
    CheckCommand::new(args).run()
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
    fn test_check_command_passes_for_well_formed_source() {
        let dir = TempDir::new().unwrap();
        let input = write_source(&dir, "prog.ama", "var x: int = 1");

        let args = CheckArgs {
            verbose: false,
            input,
            std_lib: Some(dir.path().join("no-such-std")),
        };
        run_check(args).unwrap();
    }

    #[test]
    fn test_check_command_surfaces_compile_error() {
        let dir = TempDir::new().unwrap();
        let input = write_source(&dir, "prog.ama", "var x: int = x");

        let args = CheckArgs {
            verbose: false,
            input,
            std_lib: Some(dir.path().join("no-such-std")),
        };
        let err = run_check(args).unwrap_err();
        assert!(matches!(err, FaxtError::Compile(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_check_command_missing_input_is_validation_error() {
        let dir = TempDir::new().unwrap();
        let args = CheckArgs {
            verbose: false,
            input: dir.path().join("missing.ama"),
            std_lib: None,
        };
        let err = run_check(args).unwrap_err();
        assert!(matches!(err, FaxtError::Validation(_)));
    }
}
