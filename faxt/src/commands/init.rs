//! Init command implementation (§6.1 `faxt init`).
//!
//! Scaffolds a new project directory with a `faxt.toml` and an empty entry
//! module, mirroring the reference CLI's project-bootstrap command.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::commands::common::{error_messages, output_messages};
use crate::commands::traits::{Command, CommandDescription};
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::{FaxtError, Result};

/// Name of the scaffolded entry module.
const ENTRY_MODULE_NAME: &str = "main.ama";

/// Arguments for the init command.
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Force initialization even if directory is not empty.
    pub force: bool,
    /// Directory to initialize.
    pub path: Option<PathBuf>,
}

/// Init command handler.
pub struct InitCommand {
    args: InitArgs,
}

impl InitCommand {
    pub fn new(args: InitArgs) -> Self {
        Self { args }
    }

    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        let target_path = self.get_target_path();

        self.validate_directory(&target_path)?;
        self.create_config_file(&target_path)?;
        self.create_entry_module(&target_path)?;

        if self.args.verbose {
            eprintln!(
                "{} Project initialized successfully at {}",
                output_messages::CREATED_FILE,
                target_path.display()
            );
            eprintln!("✅ Completed in {:.2}s", start_time.elapsed().as_secs_f64());
        }

        Ok(())
    }

    /// Target directory for initialization, defaulting to the current one.
    fn get_target_path(&self) -> PathBuf {
        self.args.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Validate that the target directory is suitable for initialization.
    fn validate_directory(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            if self.args.verbose {
                eprintln!("ℹ️ Creating directory: {}", path.display());
            }
            std::fs::create_dir_all(path)?;
            return Ok(());
        }

        if !path.is_dir() {
            return Err(FaxtError::Validation(format!(
                "{} {}",
                error_messages::TARGET_NOT_DIR,
                path.display()
            )));
        }

        let is_empty = Self::check_directory_empty(path)?;

        if !is_empty && !self.args.force {
            return Err(FaxtError::Validation(format!(
                "{} {}",
                error_messages::DIR_NOT_EMPTY,
                path.display()
            )));
        }

        Ok(())
    }

    fn check_directory_empty(path: &Path) -> Result<bool> {
        match std::fs::read_dir(path) {
            Ok(mut dir) => Ok(dir.next().is_none()),
            Err(e) => Err(FaxtError::FileOperation(format!(
                "Failed to read directory {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Create the configuration file.
    fn create_config_file(&self, path: &Path) -> Result<()> {
        let config_path = path.join(CONFIG_FILE_NAME);

        if config_path.exists() && !self.args.force {
            if self.args.verbose {
                eprintln!("⚠️ Configuration file already exists, skipping");
            }
            return Ok(());
        }

        Config::default().save_to_path(&config_path)?;

        if self.args.verbose {
            eprintln!("{} {}", output_messages::CREATED_FILE, config_path.display());
        }

        Ok(())
    }

    /// Create the empty entry module.
    fn create_entry_module(&self, path: &Path) -> Result<()> {
        let module_path = path.join(ENTRY_MODULE_NAME);

        if module_path.exists() && !self.args.force {
            if self.args.verbose {
                eprintln!("⚠️ Entry module already exists, skipping");
            }
            return Ok(());
        }

        std::fs::write(&module_path, "")?;

        if self.args.verbose {
            eprintln!("{} {}", output_messages::CREATED_FILE, module_path.display());
        }

        Ok(())
    }
}

impl Command for InitCommand {
    type Args = InitArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "init"
    }
}

impl CommandDescription for InitCommand {
    fn description() -> &'static str {
        "Initialize a new faxt project"
    }

    fn help() -> &'static str {
        "Creates a faxt.toml configuration file and an empty entry module \
         in the specified or current directory."
    }
}

/// Run the init command.
pub fn run_init(args: InitArgs) -> Result<()> {
    InitCommand::new(args).run()
}
