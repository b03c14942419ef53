//! # CLI Errors
//!
//! Everything that can stop a command: engine errors plus the file and
//! format problems only the binary runs into.

use atomspace_core::AtomSpaceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] AtomSpaceError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid script: {0}")]
    Script(String),
}
