//! # AtomSpace CLI Module
//!
//! ## Available Commands
//!
//! - `demo` - Run the built-in taxonomy scenario
//! - `run` - Replay a JSON scenario script
//! - `config` - Show the effective engine configuration

mod commands;

use crate::error::CliError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// AtomSpace - probabilistic knowledge graph engine
///
/// Builds an in-memory atom space, runs PLN inference and ECAN attention
/// dynamics over it, and reports what happened.
#[derive(Parser, Debug)]
#[command(name = "atomspace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML engine configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the built-in demo scenario
    Demo,

    /// Replay a scenario script
    Run {
        /// Path to the JSON script
        #[arg(short, long)]
        script: PathBuf,
    },

    /// Show the effective engine configuration
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), CliError> {
    let config = crate::config::load_config(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Run { script }) => cmd_run(config, &script, json_mode),
        Some(Commands::Config) => cmd_config(&config, json_mode),
        Some(Commands::Demo) | None => cmd_demo(config, json_mode),
    }
}
