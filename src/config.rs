//!
//! This module defines configuration structures, loading logic, and validation for fmtbridge.
//! Supports TOML configuration files with upward directory discovery, and enforces
//! the quote restriction on assume-filename at the moment the value is set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, searched for in the working directory and its parents.
pub const CONFIG_FILE_NAME: &str = ".fmtbridge.toml";

/// Error type for configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// An assume-filename value contained a quote character.
    /// A quote in the value would end the parameter quote and break the tool invocation,
    /// so it is rejected when the value is set rather than at invocation time.
    #[error("Filename cannot contain quotes: {0}")]
    QuotedFilename(String),

    /// A style string that is neither a known preset, "file", nor an inline snippet
    #[error("Unknown style '{0}' (expected LLVM, Google, Chromium, Mozilla, WebKit, file, or an inline snippet like '{{BasedOnStyle: LLVM}}')")]
    UnknownStyle(String),

    /// A fallback style that is neither "none" nor a known preset
    #[error("Unknown fallback style '{0}' (expected none, LLVM, Google, Chromium, Mozilla, WebKit)")]
    UnknownFallbackStyle(String),
}

/// Coding style passed to the formatter.
///
/// Either a predefined style, `file` to search for an external configuration
/// file in the source file's directory and its parents, or an inline
/// configuration snippet such as `{BasedOnStyle: LLVM, IndentWidth: 8}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Style {
    Llvm,
    Google,
    Chromium,
    Mozilla,
    WebKit,
    /// Search for an external configuration file
    File,
    /// Inline configuration snippet, passed to the tool verbatim
    Inline(String),
}

impl Style {
    /// The value handed to the tool's `-style` switch.
    pub fn as_arg(&self) -> &str {
        match self {
            Style::Llvm => "LLVM",
            Style::Google => "Google",
            Style::Chromium => "Chromium",
            Style::Mozilla => "Mozilla",
            Style::WebKit => "WebKit",
            Style::File => "file",
            Style::Inline(snippet) => snippet,
        }
    }

    fn parse(s: &str) -> Result<Self, ConfigError> {
        let trimmed = s.trim();
        // Inline snippets are brace-delimited and passed through untouched
        if trimmed.starts_with('{') {
            return Ok(Style::Inline(trimmed.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "llvm" => Ok(Style::Llvm),
            "google" => Ok(Style::Google),
            "chromium" => Ok(Style::Chromium),
            "mozilla" => Ok(Style::Mozilla),
            "webkit" => Ok(Style::WebKit),
            "file" => Ok(Style::File),
            _ => Err(ConfigError::UnknownStyle(s.to_string())),
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::File
    }
}

impl std::str::FromStr for Style {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::parse(s)
    }
}

impl TryFrom<String> for Style {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Style::parse(&s)
    }
}

impl From<Style> for String {
    fn from(style: Style) -> Self {
        style.as_arg().to_string()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

/// Predefined style used as a fallback when the primary style is `file` but no
/// configuration file can be found. `None` skips formatting in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FallbackStyle {
    None,
    Llvm,
    Google,
    Chromium,
    Mozilla,
    WebKit,
}

impl FallbackStyle {
    /// The value handed to the tool's `-fallback-style` switch.
    pub fn as_arg(&self) -> &'static str {
        match self {
            FallbackStyle::None => "none",
            FallbackStyle::Llvm => "LLVM",
            FallbackStyle::Google => "Google",
            FallbackStyle::Chromium => "Chromium",
            FallbackStyle::Mozilla => "Mozilla",
            FallbackStyle::WebKit => "WebKit",
        }
    }

    fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FallbackStyle::None),
            "llvm" => Ok(FallbackStyle::Llvm),
            "google" => Ok(FallbackStyle::Google),
            "chromium" => Ok(FallbackStyle::Chromium),
            "mozilla" => Ok(FallbackStyle::Mozilla),
            "webkit" => Ok(FallbackStyle::WebKit),
            _ => Err(ConfigError::UnknownFallbackStyle(s.to_string())),
        }
    }
}

impl Default for FallbackStyle {
    fn default() -> Self {
        FallbackStyle::Llvm
    }
}

impl std::str::FromStr for FallbackStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FallbackStyle::parse(s)
    }
}

impl TryFrom<String> for FallbackStyle {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        FallbackStyle::parse(&s)
    }
}

impl From<FallbackStyle> for String {
    fn from(style: FallbackStyle) -> Self {
        style.as_arg().to_string()
    }
}

impl fmt::Display for FallbackStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

/// Filename the tool should assume when reading from stdin, used to look for a
/// style configuration file (with the `file` style) and to determine the language.
///
/// Quotes are rejected when the value is constructed. File names cannot contain
/// quotes on Windows anyway, and a quote in user input would break the command
/// invocation in hard-to-debug ways.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssumeFilename(String);

impl AssumeFilename {
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.contains('"') {
            return Err(ConfigError::QuotedFilename(name));
        }
        Ok(AssumeFilename(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for AssumeFilename {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        AssumeFilename::new(s)
    }
}

impl From<AssumeFilename> for String {
    fn from(name: AssumeFilename) -> Self {
        name.0
    }
}

impl fmt::Display for AssumeFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Complete formatter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FormatConfig {
    /// Coding style: a predefined style, "file", or an inline snippet
    pub style: Style,

    /// Predefined style applied when "file" finds no configuration file
    pub fallback_style: FallbackStyle,

    /// Filename the tool should assume for stdin input (empty = use the source path)
    pub assume_filename: AssumeFilename,

    /// Sort touched include lines
    pub sort_includes: bool,

    /// Name or path of the formatter executable
    pub tool: String,

    /// Timeout per invocation in milliseconds (0 = no timeout)
    pub timeout: u64,
}

fn default_tool() -> String {
    "clang-format".to_string()
}

fn default_timeout() -> u64 {
    30_000
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            style: Style::default(),
            fallback_style: FallbackStyle::default(),
            assume_filename: AssumeFilename::default(),
            sort_includes: false,
            tool: default_tool(),
            timeout: default_timeout(),
        }
    }
}

impl FormatConfig {
    /// Set the assume-filename value, rejecting quotes eagerly.
    pub fn set_assume_filename(&mut self, name: impl Into<String>) -> Result<(), ConfigError> {
        self.assume_filename = AssumeFilename::new(name)?;
        Ok(())
    }

    /// Parse a configuration from TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load a configuration from the given file path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            source: e,
            path: path.display().to_string(),
        })?;
        log::debug!("[fmtbridge-config] Loading config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Search for a configuration file in `start_dir` and its parents.
    ///
    /// Returns the loaded configuration and the path it was found at, or `None`
    /// if no configuration file exists anywhere up the tree.
    pub fn discover(start_dir: impl AsRef<Path>) -> Result<Option<(Self, PathBuf)>, ConfigError> {
        let mut dir = Some(start_dir.as_ref());
        while let Some(current) = dir {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((config, candidate)));
            }
            dir = current.parent();
        }
        log::debug!("[fmtbridge-config] No {CONFIG_FILE_NAME} found, using defaults");
        Ok(None)
    }
}
