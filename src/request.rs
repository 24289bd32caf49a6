//! Format request construction and selection clamping.

use std::path::PathBuf;

/// A single formatting request: the full document plus the selection to format.
///
/// Offsets are byte offsets into `text`. Constructed fresh from host state per
/// invocation; never retained or cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRequest {
    /// Full document text, written to the tool's standard input
    pub text: String,
    /// Byte offset where the selection starts
    pub start: usize,
    /// Byte length of the selection
    pub length: usize,
    /// Working directory for the tool (style config discovery starts here)
    pub working_dir: Option<PathBuf>,
    /// Path of the document on disk, if it has one
    pub source_path: Option<PathBuf>,
}

impl FormatRequest {
    /// Build a request, clamping the selection into the document's bounds.
    ///
    /// The tool rejects a range that starts at the end of the file, so a
    /// `start` at or past the end of a non-empty document is clamped to the
    /// last valid offset. `length` is then clamped so the selection never
    /// extends past the end of the text. An empty document keeps `start == 0`.
    pub fn new(text: impl Into<String>, start: usize, length: usize) -> Self {
        let text = text.into();
        let start = if text.is_empty() {
            0
        } else if start >= text.len() {
            text.len() - 1
        } else {
            start
        };
        let length = length.min(text.len() - start);
        Self {
            text,
            start,
            length,
            working_dir: None,
            source_path: None,
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}
