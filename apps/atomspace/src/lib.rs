//! # atomspace
//!
//! Library half of the `atomspace` binary: configuration loading, scenario
//! scripts and the CLI, exposed so integration tests can drive them.

pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod script;

pub use error::CliError;
