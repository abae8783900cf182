//! Public parsing entry points.
//!
//! All three functions are pure, synchronous computations over
//! already-in-memory buffers; concurrent callers need no coordination.
//! Errors surface as [`DescriptorError`] unchanged — archive- and
//! XML-library error types never leak to the caller.

use log::debug;

use crate::archive::{self, MAX_DESCRIPTOR_SIZE};
use crate::descriptor::{ModelDescription, mapper};
use crate::errors::DescriptorError;
use crate::xml;

/// Parse a model description straight from FMU archive bytes.
pub fn parse_from_archive(bytes: &[u8]) -> Result<ModelDescription, DescriptorError> {
    let text = archive::read_descriptor_text(bytes)?;
    parse_from_text(&text)
}

/// Parse a model description from already-extracted descriptor text.
pub fn parse_from_text(text: &str) -> Result<ModelDescription, DescriptorError> {
    // The archive path strips a BOM during decoding; text handed in
    // directly may still carry one.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.len() > MAX_DESCRIPTOR_SIZE {
        return Err(DescriptorError::InputTooLarge {
            actual: text.len(),
            limit: MAX_DESCRIPTOR_SIZE,
        });
    }
    let doc = xml::parse_document(text)?;
    let model = mapper::map_document(&doc)?;
    debug!(
        "parsed model description '{}' with {} variables",
        model.model_name,
        model.number_of_variables()
    );
    Ok(model)
}

/// Extract the raw descriptor text from FMU archive bytes without
/// mapping it, for callers that validate or cache the document
/// externally.
pub fn extract_descriptor_text(bytes: &[u8]) -> Result<String, DescriptorError> {
    archive::read_descriptor_text(bytes)
}
