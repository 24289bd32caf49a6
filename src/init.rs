//!
//! This module provides initialization utilities for fmtbridge, such as creating default configuration files.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Error type for initialization operations
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Failed to access file {path}: {source}")]
    IoError { source: io::Error, path: String },
}

/// Create a default configuration file at the specified path.
///
/// Returns `true` if the file was created, or `false` if it already exists.
///
/// # Errors
///
/// Returns an error if the file cannot be created due to permissions or other I/O errors.
pub fn create_default_config(path: &str) -> Result<bool, InitError> {
    if Path::new(path).exists() {
        return Ok(false);
    }

    let default_config = r#"# fmtbridge configuration file

# Coding style passed to the formatter:
#   - a predefined style: "LLVM", "Google", "Chromium", "Mozilla", "WebKit"
#   - "file" to search for a .clang-format or _clang-format configuration
#     file in the source file's directory and its parents
#   - an inline configuration snippet, e.g. "{BasedOnStyle: LLVM, IndentWidth: 8}"
style = "file"

# Predefined style used when "file" finds no configuration file.
# Use "none" to skip formatting in that case.
fallback-style = "LLVM"

# Filename the formatter should assume when reading from stdin, used for
# style discovery and language detection. Empty = use the document's path.
assume-filename = ""

# Sort touched include lines
sort-includes = false

# Name or path of the formatter executable
tool = "clang-format"

# Timeout per invocation in milliseconds (0 = no timeout)
timeout = 30000
"#;

    fs::write(path, default_config).map_err(|e| InitError::IoError {
        source: e,
        path: path.to_string(),
    })?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatConfig;

    #[test]
    fn test_default_config_file_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".fmtbridge.toml");
        let path_str = path.to_str().unwrap();

        assert!(create_default_config(path_str).unwrap());
        let config = FormatConfig::load(&path).unwrap();
        assert_eq!(config, FormatConfig::default());

        // Second call refuses to overwrite
        assert!(!create_default_config(path_str).unwrap());
    }
}
