//! Batch application of replacements to the original text.
//!
//! All offsets refer to the *original* document. The whole batch is validated
//! before a single byte changes, and application happens in descending offset
//! order against a copy, so no replacement's offset is invalidated by an
//! earlier one and the result is independent of input order.

use crate::replacements::Replacement;
use thiserror::Error;

/// Error applying replacements to a document.
#[derive(Error, Debug)]
pub enum ApplyError {
    /// A replacement extends past the end of the document
    #[error("Replacement range {offset}..{end} exceeds document length {len}")]
    OutOfBounds {
        offset: usize,
        end: usize,
        len: usize,
    },

    /// A replacement boundary falls inside a multi-byte UTF-8 character
    #[error("Replacement range {offset}..{end} splits a UTF-8 character")]
    SplitsCharacter { offset: usize, end: usize },
}

/// Validate every replacement against the original text.
///
/// Rejecting the whole batch up front keeps application all-or-nothing: a bad
/// range must never corrupt the buffer, so nothing is applied when any entry
/// fails.
pub fn validate_replacements(original: &str, replacements: &[Replacement]) -> Result<(), ApplyError> {
    for r in replacements {
        let end = r.offset.saturating_add(r.length);
        if end > original.len() || r.offset > original.len() {
            return Err(ApplyError::OutOfBounds {
                offset: r.offset,
                end,
                len: original.len(),
            });
        }
        if !original.is_char_boundary(r.offset) || !original.is_char_boundary(end) {
            return Err(ApplyError::SplitsCharacter { offset: r.offset, end });
        }
    }
    Ok(())
}

/// Apply a batch of replacements and return the new text.
///
/// Replacements are assumed non-overlapping, in any order. An empty batch
/// returns the original unchanged.
///
/// # Errors
///
/// Returns [`ApplyError`] if any replacement is out of bounds or splits a
/// character; in that case the original is untouched.
pub fn apply_replacements(original: &str, replacements: &[Replacement]) -> Result<String, ApplyError> {
    validate_replacements(original, replacements)?;

    let mut ordered: Vec<&Replacement> = replacements.iter().collect();
    // Descending offset so earlier edits never shift the ranges still to apply
    ordered.sort_by(|a, b| b.offset.cmp(&a.offset).then(b.length.cmp(&a.length)));

    let mut result = original.to_string();
    for r in ordered {
        result.replace_range(r.offset..r.offset + r.length, &r.text);
    }
    Ok(result)
}
