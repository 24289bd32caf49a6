//! Parsing of the formatter's XML replacement output.
//!
//! The tool answers a successful run with a document of the form
//!
//! ```xml
//! <?xml version='1.0'?>
//! <replacements xml:space='preserve' incomplete_format='false'>
//! <replacement offset='5' length='3'>XYZ</replacement>
//! </replacements>
//! ```
//!
//! Zero replacement elements is a valid, empty result. Anything malformed is
//! a hard error surfaced to the caller, never skipped.

use thiserror::Error;

/// A single substitution in the original document's coordinate space:
/// remove `length` bytes starting at `offset`, insert `text` in their place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub offset: usize,
    pub length: usize,
    pub text: String,
}

/// Error parsing the tool's replacement output.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The output is not well-formed XML
    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    /// The output is not valid UTF-8
    #[error("Replacement output is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),

    /// A replacement element lacks a required attribute
    #[error("Replacement element is missing the '{0}' attribute")]
    MissingAttribute(&'static str),

    /// A replacement attribute is not a base-10 integer
    #[error("Replacement attribute '{name}' is not a base-10 integer: '{value}'")]
    BadInteger { name: &'static str, value: String },
}

/// Parse raw tool output into an ordered list of replacements.
///
/// The order is whatever the tool emitted; [`crate::apply::apply_replacements`]
/// is order-independent, so callers need not sort.
pub fn parse_replacements(output: &[u8]) -> Result<Vec<Replacement>, ProtocolError> {
    let text = std::str::from_utf8(output)?;
    let doc = roxmltree::Document::parse(text)?;

    let mut replacements = Vec::new();
    for node in doc.descendants().filter(|n| n.has_tag_name("replacement")) {
        let offset = int_attr(&node, "offset")?;
        let length = int_attr(&node, "length")?;
        replacements.push(Replacement {
            offset,
            length,
            text: node.text().unwrap_or("").to_string(),
        });
    }
    log::debug!("[fmtbridge] parsed {} replacement(s)", replacements.len());
    Ok(replacements)
}

fn int_attr(node: &roxmltree::Node, name: &'static str) -> Result<usize, ProtocolError> {
    let value = node
        .attribute(name)
        .ok_or(ProtocolError::MissingAttribute(name))?;
    value.parse().map_err(|_| ProtocolError::BadInteger {
        name,
        value: value.to_string(),
    })
}
