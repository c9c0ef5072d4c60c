#![warn(missing_docs)]

//! Thin streaming layer over `quick-xml` used when loading OPC UA NodeSet
//! documents.
//!
//! The loader consumes raw scanner events rather than a document tree, so this
//! crate only provides a buffered event pump and a helper for pulling decoded
//! attribute values out of start tags.

use std::io::{BufReader, Read};

use quick_xml::events::BytesStart;
use thiserror::Error;

pub use quick_xml::events;

#[derive(Debug, Error)]
/// Error produced when reading XML.
pub enum XmlReadError {
    #[error("{0}")]
    /// Failed to parse XML.
    Xml(#[from] quick_xml::Error),
    #[error("{0}")]
    /// An attribute list was malformed.
    Attr(#[from] quick_xml::events::attributes::AttrError),
}

/// XML stream reader specialized for working with NodeSet documents.
pub struct XmlStreamReader<T> {
    reader: quick_xml::Reader<BufReader<T>>,
    buffer: Vec<u8>,
}

impl<T: Read> XmlStreamReader<T> {
    /// Create a new stream reader with an internal buffer.
    pub fn new(reader: T) -> Self {
        Self {
            reader: quick_xml::Reader::from_reader(BufReader::new(reader)),
            buffer: Vec::new(),
        }
    }

    /// Get the next event from the stream.
    pub fn next_event(&mut self) -> Result<quick_xml::events::Event, XmlReadError> {
        self.buffer.clear();
        Ok(self.reader.read_event_into(&mut self.buffer)?)
    }
}

/// Look up an attribute on a start tag by local name and return its unescaped
/// value, or `None` if the tag does not carry it.
pub fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, XmlReadError> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
