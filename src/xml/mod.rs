//! Schema-agnostic XML document tree.
//!
//! [`parse_document`] turns raw text into an order-preserving tree of
//! elements, attributes and text nodes using quick-xml's event API. The
//! tree knows nothing about the fmiModelDescription schema; all semantic
//! interpretation happens in [`crate::descriptor::mapper`].
//!
//! Well-formedness is enforced here: mismatched or unclosed tags,
//! duplicate attributes on one element, invalid character references and
//! a declared encoding that contradicts the (UTF-8) input all fail with
//! [`DescriptorError::MalformedXml`] carrying the text position.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::errors::{DescriptorError, TextPosition};

/// A parsed XML document: exactly one root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

/// One element: tag name, attributes in declaration order, children in
/// document order, and the byte offset of its start tag.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub offset: usize,
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over child elements, skipping text nodes.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given tag name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.name == name)
    }

    /// Concatenated text content of direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let XmlNode::Text(t) = node {
                out.push_str(t);
            }
        }
        out
    }
}

fn malformed(text: &str, offset: usize, message: impl Into<String>) -> DescriptorError {
    DescriptorError::MalformedXml {
        message: message.into(),
        position: TextPosition::at(text, offset),
    }
}

fn parse_attributes(
    text: &str,
    offset: usize,
    start: &BytesStart<'_>,
) -> Result<Vec<(String, String)>, DescriptorError> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(text, offset, e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(text, offset, e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}

/// Parse `text` into a generic document tree.
pub fn parse_document(text: &str) -> Result<XmlDocument, DescriptorError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let offset = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| malformed(text, reader.buffer_position(), e.to_string()))?;

        match event {
            Event::Decl(decl) => {
                if let Some(enc) = decl.encoding() {
                    let enc = enc.map_err(|e| malformed(text, offset, e.to_string()))?;
                    let enc = String::from_utf8_lossy(&enc);
                    if !enc.eq_ignore_ascii_case("utf-8") {
                        return Err(malformed(
                            text,
                            offset,
                            format!("declared encoding '{enc}' does not match UTF-8 input"),
                        ));
                    }
                }
            }
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(malformed(text, offset, "multiple root elements"));
                }
                let element = XmlElement {
                    name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    attributes: parse_attributes(text, offset, &start)?,
                    children: Vec::new(),
                    offset,
                };
                stack.push(element);
            }
            Event::Empty(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(malformed(text, offset, "multiple root elements"));
                }
                let element = XmlElement {
                    name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    attributes: parse_attributes(text, offset, &start)?,
                    children: Vec::new(),
                    offset,
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Element(element)),
                    None => root = Some(element),
                }
            }
            Event::End(_) => {
                // quick-xml has already verified the end tag matches.
                let element = match stack.pop() {
                    Some(el) => el,
                    None => return Err(malformed(text, offset, "unexpected end tag")),
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Element(element)),
                    None => root = Some(element),
                }
            }
            Event::Text(t) => {
                let value = t
                    .unescape()
                    .map_err(|e| malformed(text, offset, e.to_string()))?;
                if value.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Text(value.into_owned())),
                    None => {
                        return Err(malformed(text, offset, "text content outside root element"));
                    }
                }
            }
            Event::CData(c) => {
                let value = String::from_utf8_lossy(c.as_ref()).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Text(value)),
                    None => {
                        return Err(malformed(text, offset, "text content outside root element"));
                    }
                }
            }
            Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => {
                if let Some(open) = stack.last() {
                    return Err(malformed(
                        text,
                        reader.buffer_position(),
                        format!("unclosed element <{}>", open.name),
                    ));
                }
                break;
            }
        }
    }

    match root {
        Some(root) => Ok(XmlDocument { root }),
        None => Err(malformed(text, text.len(), "document has no root element")),
    }
}
