//! Root namespace sniffing
//!
//! Reads a document only as far as its root start tag to learn the root
//! element's namespace URI, without validating the rest of the bytes.

use crate::error::ClassificationError;
use crate::reader::{EventReader, XmlEvent};

/// Extract the root element's resolved namespace URI
///
/// Returns Ok(None) when the root element carries no namespace. Fails
/// with ClassificationError only when no root element can be parsed at
/// all (malformed or empty input).
pub fn extract_root_namespace(content: &[u8]) -> Result<Option<Vec<u8>>, ClassificationError> {
    let mut reader = EventReader::new(content);
    loop {
        match reader.next_event()? {
            Some(XmlEvent::StartElement(element)) => return Ok(element.namespace),
            Some(_) => continue,
            // The reader errors before ever reaching EndDocument without a
            // root element, so this arm is not hit in practice.
            None => return Ok(None),
        }
    }
}
