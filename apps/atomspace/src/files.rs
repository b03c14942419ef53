//! # Input Files
//!
//! Path and size checks shared by every command that reads a file.

use crate::error::CliError;
use std::path::{Path, PathBuf};

/// Maximum size of a configuration file (1 MB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Maximum size of a scenario script (10 MB).
pub const MAX_SCRIPT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Resolve `path` to an existing regular file.
///
/// Canonicalizing resolves `..` and symlinks before anything is read.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, CliError> {
    let canonical = path.canonicalize().map_err(|e| {
        CliError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(CliError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Read a UTF-8 file after checking its path and size.
pub fn read_bounded(path: &Path, max_size: u64) -> Result<String, CliError> {
    let canonical = validate_file_path(path)?;

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| CliError::Io(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > max_size {
        return Err(CliError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }

    std::fs::read_to_string(&canonical)
        .map_err(|e| CliError::Io(format!("Cannot read '{}': {}", path.display(), e)))
}
