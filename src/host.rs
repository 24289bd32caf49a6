//! The editor host boundary.
//!
//! The surrounding editor integration is abstracted as the narrow
//! [`EditorHost`] trait: everything the core needs from an editor is a text
//! snapshot with a selection, optional path information, an atomic edit
//! batch, and an error surface. Concrete integrations implement this trait;
//! [`BufferHost`] is the in-memory implementation used by the CLI and tests.

use crate::apply::{self, ApplyError};
use crate::config::FormatConfig;
use crate::invoker;
use crate::replacements::{self, Replacement};
use crate::request::FormatRequest;
use crate::FormatError;
use std::path::PathBuf;

/// What the core consumes from, and exposes to, the surrounding editor.
pub trait EditorHost {
    /// Full document text plus the selection's start and end byte offsets.
    fn active_text(&self) -> (String, usize, usize);

    /// Path of the document on disk, if it has one.
    fn source_path(&self) -> Option<PathBuf> {
        None
    }

    /// Directory the formatter should run in (style discovery starts here).
    fn working_dir(&self) -> Option<PathBuf> {
        None
    }

    /// Apply a batch of replacements to the buffer, all-or-nothing.
    ///
    /// Offsets refer to the text returned by the last [`active_text`] call;
    /// the host's edit transaction must resolve them against that snapshot.
    ///
    /// [`active_text`]: EditorHost::active_text
    fn apply_edit_batch(&mut self, replacements: &[Replacement]) -> Result<(), ApplyError>;

    /// Surface a failure to the user.
    fn report_error(&mut self, message: &str);
}

/// Format the host's current selection.
///
/// Drives the whole cycle: snapshot the buffer, invoke the tool, parse its
/// reply, validate the batch, and hand it to the host as one transaction.
/// Any failure is converted into a single [`EditorHost::report_error`] call
/// and no edit is applied. Returns `true` when the buffer was updated (or no
/// update was needed).
pub fn format_in_host(host: &mut dyn EditorHost, config: &FormatConfig) -> bool {
    match run(host, config) {
        Ok(()) => true,
        Err(e) => {
            host.report_error(&format!("Error while running {}: {e}", config.tool));
            false
        }
    }
}

fn run(host: &mut dyn EditorHost, config: &FormatConfig) -> Result<(), FormatError> {
    let (text, sel_start, sel_end) = host.active_text();
    let length = sel_end.saturating_sub(sel_start);

    let mut request = FormatRequest::new(text, sel_start, length);
    request.source_path = host.source_path();
    request.working_dir = host.working_dir();

    let output = invoker::invoke(&request, config)?;
    let parsed = replacements::parse_replacements(&output)?;
    if parsed.is_empty() {
        // e.g. fallback style "none" with no config file found
        return Ok(());
    }
    // Reject a bad batch before the host touches its buffer
    apply::validate_replacements(&request.text, &parsed)?;
    host.apply_edit_batch(&parsed)?;
    Ok(())
}

/// An in-memory editor host over a plain string buffer.
#[derive(Debug, Default)]
pub struct BufferHost {
    text: String,
    selection: (usize, usize),
    source_path: Option<PathBuf>,
    working_dir: Option<PathBuf>,
    reported: Vec<String>,
}

impl BufferHost {
    /// Create a host whose selection spans the whole buffer.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: (0, end),
            ..Default::default()
        }
    }

    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        self.selection = (start, end);
        self
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Errors surfaced through [`EditorHost::report_error`].
    pub fn reported_errors(&self) -> &[String] {
        &self.reported
    }
}

impl EditorHost for BufferHost {
    fn active_text(&self) -> (String, usize, usize) {
        (self.text.clone(), self.selection.0, self.selection.1)
    }

    fn source_path(&self) -> Option<PathBuf> {
        self.source_path.clone()
    }

    fn working_dir(&self) -> Option<PathBuf> {
        self.working_dir.clone()
    }

    fn apply_edit_batch(&mut self, replacements: &[Replacement]) -> Result<(), ApplyError> {
        self.text = apply::apply_replacements(&self.text, replacements)?;
        Ok(())
    }

    fn report_error(&mut self, message: &str) {
        self.reported.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_host_selection_defaults_to_whole_buffer() {
        let host = BufferHost::new("int x;");
        assert_eq!(host.active_text(), ("int x;".to_string(), 0, 6));
    }

    #[test]
    fn test_buffer_host_applies_batch() {
        let mut host = BufferHost::new("Hello, World!");
        host.apply_edit_batch(&[Replacement {
            offset: 5,
            length: 3,
            text: "XYZ".to_string(),
        }])
        .unwrap();
        assert_eq!(host.text(), "HelloXYZWorld!");
    }

    #[test]
    fn test_buffer_host_rejects_bad_batch_unchanged() {
        let mut host = BufferHost::new("short");
        let result = host.apply_edit_batch(&[Replacement {
            offset: 0,
            length: 50,
            text: String::new(),
        }]);
        assert!(result.is_err());
        assert_eq!(host.text(), "short");
    }

    #[test]
    fn test_format_in_host_reports_launch_failure() {
        let mut host = BufferHost::new("int x;");
        let config = FormatConfig {
            tool: "fmtbridge-no-such-tool-xyz".to_string(),
            ..Default::default()
        };
        assert!(!format_in_host(&mut host, &config));
        assert_eq!(host.text(), "int x;");
        let reported = host.reported_errors();
        assert_eq!(reported.len(), 1);
        assert!(reported[0].contains("fmtbridge-no-such-tool-xyz"));
    }
}
