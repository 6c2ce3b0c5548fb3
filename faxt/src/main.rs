//! Faxt CLI - driver front door for the language's compiler (§6.1).
//!
//! This is the main entry point for the faxt CLI application.
//! It uses clap for argument parsing and dispatches to appropriate
//! command handlers based on user input.

mod commands;
mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{build::BuildArgs, check::CheckArgs, init::{run_init, InitArgs}};
use config::Config;
use error::{FaxtError, Result};

/// Faxt - driver and CLI for the language's compiler.
#[derive(Parser, Debug)]
#[command(name = "faxt")]
#[command(author = "Fax Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiler driver for the language", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "FAXT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FAXT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "FAXT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the faxt CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new faxt project
    ///
    /// Creates a faxt.toml configuration file and an empty entry module
    /// in the specified or current directory.
    Init(InitCommand),

    /// Compile a source file to bytecode
    ///
    /// Runs parse, analyze, and emit over a single entry module and writes
    /// the resulting bytecode text.
    Build(BuildCommand),

    /// Analyze a source file without emitting bytecode
    ///
    /// Runs name resolution and type checking only, suited to fast
    /// editor-integration feedback.
    Check(CheckCommand),
}

/// Arguments for the init subcommand.
#[derive(Parser, Debug)]
struct InitCommand {
    /// Directory to initialize (default: current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Force initialization even if directory is not empty
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the build subcommand.
#[derive(Parser, Debug)]
struct BuildCommand {
    /// Source file to compile
    input: PathBuf,

    /// Output bytecode path (default: input with a .fasm extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Standard-library directory override
    #[arg(long = "std-lib")]
    std_lib: Option<PathBuf>,

    /// Print the parsed AST instead of emitting bytecode
    #[arg(long, conflicts_with = "emit_bytecode")]
    emit_ast: bool,

    /// Emit bytecode (the default; kept explicit for symmetry with --emit-ast)
    #[arg(long)]
    emit_bytecode: bool,
}

/// Arguments for the check subcommand.
#[derive(Parser, Debug)]
struct CheckCommand {
    /// Source file to analyze
    input: PathBuf,

    /// Standard-library directory override
    #[arg(long = "std-lib")]
    std_lib: Option<PathBuf>,
}

/// Main entry point for the faxt CLI.
fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.no_color)?;
    let config = load_config(cli.config.as_deref())?;
    execute_command(cli.command, cli.verbose, config)
}

/// Initialize the logging system.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };

    let subscriber = fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| FaxtError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Execute the selected command.
fn execute_command(command: Commands, verbose: bool, config: Config) -> Result<()> {
    match command {
        Commands::Init(args) => execute_init(args, verbose),
        Commands::Build(args) => execute_build(args, verbose, config),
        Commands::Check(args) => execute_check(args, verbose, config),
    }
}

fn execute_init(args: InitCommand, verbose: bool) -> Result<()> {
    run_init(InitArgs { verbose, force: args.force, path: args.path })
}

fn execute_build(args: BuildCommand, verbose: bool, config: Config) -> Result<()> {
    let build_args = BuildArgs {
        verbose,
        input: args.input,
        output: args.output,
        std_lib: args.std_lib,
        emit_ast: args.emit_ast,
    };
    commands::build::BuildCommand::with_config(build_args, config).run()
}

fn execute_check(args: CheckCommand, verbose: bool, config: Config) -> Result<()> {
    let check_args = CheckArgs { verbose, input: args.input, std_lib: args.std_lib };
    commands::check::CheckCommand::with_config(check_args, config).run()
}
