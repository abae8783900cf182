//! Error types for FMU descriptor parsing.
//!
//! Every public entry point of the crate reports failures through the
//! single [`DescriptorError`] enum. The taxonomy is closed: archive-stage
//! failures, one syntax-stage failure carrying a position, semantic-stage
//! failures naming the offending field or element, and a size guard.
//! Errors are terminal; there is nothing to retry.

use std::fmt;

use thiserror::Error;

/// Position of a syntax error within the descriptor text.
///
/// Line and column are 1-based; the byte offset is 0-based into the
/// UTF-8 text handed to the XML parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl TextPosition {
    /// Compute the line/column position of `offset` within `text`.
    pub fn at(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let prefix = &text.as_bytes()[..offset];
        let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = prefix
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        // Columns count characters, not bytes.
        let column = String::from_utf8_lossy(&prefix[line_start..]).chars().count() + 1;
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {} (byte {})",
            self.line, self.column, self.offset
        )
    }
}

/// All failure modes of descriptor parsing.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The byte buffer is not a readable zip archive.
    #[error("not a valid FMU archive: {0}")]
    ArchiveFormat(String),

    /// The archive contains no `modelDescription.xml` entry at its root.
    #[error("archive contains no modelDescription.xml entry")]
    DescriptorNotFound,

    /// The archive contains more than one `modelDescription.xml` entry.
    #[error("archive contains {0} modelDescription.xml entries, expected exactly one")]
    DescriptorAmbiguous(usize),

    /// The descriptor entry could not be decoded as text.
    #[error("descriptor is not valid UTF-8: {0}")]
    Encoding(String),

    /// The descriptor text is not well-formed XML.
    #[error("malformed XML at {position}: {message}")]
    MalformedXml {
        message: String,
        position: TextPosition,
    },

    /// The document is well-formed XML but does not fit the
    /// fmiModelDescription schema (wrong root, repeated singleton
    /// section, unparseable attribute value).
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A required attribute or element is absent.
    #[error("missing required {field} on {element}")]
    MissingRequiredField {
        element: String,
        field: &'static str,
    },

    /// A unit or type name is defined twice within one dictionary.
    #[error("duplicate {kind} definition '{name}'")]
    DuplicateDefinition { kind: &'static str, name: String },

    /// A variable declares zero or several typed payload children.
    #[error(
        "variable '{name}' declares {found} typed elements, expected exactly one of \
         Real, Integer, Boolean, String or Enumeration"
    )]
    AmbiguousVariableType { name: String, found: usize },

    /// The causality/variability/initial combination is invalid.
    #[error("variable '{name}': {reason}")]
    IncompatibleVariableAttributes { name: String, reason: String },

    /// A declared unit or type name does not exist in the dictionaries.
    #[error("{owner} references undefined {kind} '{reference}'")]
    UnresolvedReference {
        owner: String,
        kind: &'static str,
        reference: String,
    },

    /// Two variables share a name or a value reference.
    #[error("duplicate variable: {0}")]
    DuplicateVariable(String),

    /// The input exceeds the maximum size the parser accepts.
    #[error("input of {actual} bytes exceeds the {limit} byte limit")]
    InputTooLarge { actual: usize, limit: usize },
}
