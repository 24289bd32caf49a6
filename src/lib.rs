pub mod apply;
pub mod config;
pub mod exit_codes;
pub mod host;
pub mod init;
pub mod invoker;
pub mod replacements;
pub mod request;

pub use crate::apply::{apply_replacements, validate_replacements, ApplyError};
pub use crate::config::{AssumeFilename, ConfigError, FallbackStyle, FormatConfig, Style};
pub use crate::host::{format_in_host, BufferHost, EditorHost};
pub use crate::invoker::{invoke, InvokeError};
pub use crate::replacements::{parse_replacements, ProtocolError, Replacement};
pub use crate::request::FormatRequest;

use thiserror::Error;

/// Any failure in the format cycle, typed by the layer it came from.
///
/// Nothing in the cycle is logged-and-swallowed; every failure propagates as
/// one of these and the host boundary turns it into a single user-visible
/// notification.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error("Failed to parse formatter output: {0}")]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Apply(#[from] ApplyError),
}

/// Format a selection of `text` and return the new text.
///
/// Runs the full cycle against an owned string: build the request (with
/// selection clamping), invoke the tool, parse its replacement list, and
/// apply it as one batch. `text` is returned unchanged when the tool reports
/// nothing to do.
///
/// # Errors
///
/// Returns a [`FormatError`] if the tool cannot be launched, exits nonzero,
/// replies with malformed output, or returns an out-of-range edit. On error
/// no partial result is produced.
pub fn format_text(
    text: &str,
    start: usize,
    length: usize,
    config: &FormatConfig,
) -> Result<String, FormatError> {
    format_request(&FormatRequest::new(text, start, length), config)
}

/// Format an already-constructed request and return the new text.
///
/// Like [`format_text`], but the caller controls the request's working
/// directory and source path.
pub fn format_request(
    request: &FormatRequest,
    config: &FormatConfig,
) -> Result<String, FormatError> {
    let output = invoker::invoke(request, config)?;
    let replacements = replacements::parse_replacements(&output)?;
    Ok(apply::apply_replacements(&request.text, &replacements)?)
}
