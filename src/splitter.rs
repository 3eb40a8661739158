//! Streaming envelope splitter
//!
//! Single forward pass over the envelope document's events, copying to
//! the output writer in lock-step everything that lies outside the SBDH
//! header namespace. The payload/header verdict is a pure function of
//! the namespace of each element and is recomputed on every start and
//! end tag, not latched once the header has been passed.

use tracing::{debug, warn};

use crate::declaration::SBDH_NAMESPACE;
use crate::error::ExtractionError;
use crate::reader::{EventReader, XmlEvent};
use crate::writer::EventWriter;

/// Extract the embedded payload as an independent XML document
///
/// Copies the document declaration, then every element, attribute,
/// namespace declaration, text run and CDATA section whose enclosing
/// element lies outside the header namespace. Attributes are written as
/// local name + value only; their namespace prefixes are dropped.
pub fn extract_payload(content: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let mut reader = EventReader::new(content);
    let mut writer = EventWriter::new();
    let mut payload = false;

    while let Some(event) = reader.next_event()? {
        match event {
            XmlEvent::StartDocument { version, encoding } => {
                debug!("START_DOCUMENT");
                writer.write_start_document(&version, encoding.as_deref());
            }
            XmlEvent::EndDocument => {
                debug!("END_DOCUMENT");
                writer.write_end_document();
            }
            XmlEvent::StartElement(element) => {
                payload = element.namespace.as_deref() != Some(SBDH_NAMESPACE);
                if payload {
                    debug!("START_ELEMENT");
                    writer.write_start_element(element.prefix.as_deref(), &element.local_name);
                    for attribute in &element.attributes {
                        writer.write_attribute(&attribute.local_name, &attribute.value)?;
                    }
                    for declaration in &element.declarations {
                        writer.write_namespace(declaration.prefix.as_deref(), &declaration.uri)?;
                    }
                }
            }
            XmlEvent::EndElement(element) => {
                payload = element.namespace.as_deref() != Some(SBDH_NAMESPACE);
                if payload {
                    debug!("END_ELEMENT");
                    writer.write_end_element()?;
                }
            }
            XmlEvent::Text(text) => {
                if payload {
                    debug!("CHARACTERS");
                    writer.write_characters(&text);
                }
            }
            XmlEvent::CData(text) => {
                if payload {
                    debug!("CDATA");
                    writer.write_cdata(&text);
                }
            }
            // Comments, processing instructions and DOCTYPE are not copied
            _ => {}
        }
    }

    Ok(writer.into_bytes())
}

enum IterState<'a> {
    Ready(&'a [u8]),
    Exhausted,
}

/// Single-use sequence of extracted payload documents
///
/// Yields at most one buffer: the SBDH format embeds exactly one payload.
/// The first `next()` consumes the input; every later call yields None.
/// An extraction failure is logged and yields None as well, so callers of
/// the sequence cannot tell "no payload" from "corrupt input" -- use
/// [`extract_payload`] directly to observe the failure.
pub struct PayloadIter<'a> {
    state: IterState<'a>,
}

impl<'a> PayloadIter<'a> {
    /// Create an iterator over the given envelope document
    pub fn new(content: &'a [u8]) -> Self {
        PayloadIter {
            state: IterState::Ready(content),
        }
    }
}

impl Iterator for PayloadIter<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        match std::mem::replace(&mut self.state, IterState::Exhausted) {
            IterState::Ready(content) => match extract_payload(content) {
                Ok(buffer) => Some(buffer),
                Err(error) => {
                    warn!(%error, "payload extraction failed");
                    None
                }
            },
            IterState::Exhausted => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVELOPE: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<StandardBusinessDocument xmlns=\"http://www.unece.org/cefact/namespaces/StandardBusinessDocumentHeader\">\
<StandardBusinessDocumentHeader><HeaderVersion>1.0</HeaderVersion></StandardBusinessDocumentHeader>\
<Payload xmlns=\"urn:order\"><Order id=\"1\"/></Payload>\
</StandardBusinessDocument>";

    #[test]
    fn test_header_dropped_payload_kept() {
        let output = extract_payload(ENVELOPE).unwrap();
        assert_eq!(
            output,
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<Payload xmlns=\"urn:order\"><Order id=\"1\"/></Payload>"
        );
    }

    #[test]
    fn test_output_is_well_formed_with_payload_root() {
        let output = extract_payload(ENVELOPE).unwrap();
        let mut reader = EventReader::new(&output);
        let mut roots = 0;
        let mut depth = 0;
        while let Some(event) = reader.next_event().unwrap() {
            match event {
                XmlEvent::StartElement(e) => {
                    if depth == 0 {
                        roots += 1;
                        assert_eq!(e.local_name.as_ref(), b"Payload");
                        assert_eq!(e.namespace.as_deref(), Some(&b"urn:order"[..]));
                    }
                    depth += 1;
                }
                XmlEvent::EndElement(_) => depth -= 1,
                _ => {}
            }
        }
        assert_eq!(roots, 1);
    }

    #[test]
    fn test_payload_text_and_cdata_copied() {
        let input = b"<e xmlns=\"http://www.unece.org/cefact/namespaces/StandardBusinessDocumentHeader\">\
<h>skip this</h>\
<p xmlns=\"urn:p\">keep <![CDATA[1 < 2]]></p>\
</e>";
        let output = extract_payload(input).unwrap();
        assert_eq!(
            output,
            b"<?xml version=\"1.0\"?><p xmlns=\"urn:p\">keep <![CDATA[1 < 2]]></p>"
        );
    }

    #[test]
    fn test_attribute_prefix_flattened() {
        // Attribute namespace prefixes are dropped on output: only the
        // local name and value survive. Deliberate format narrowing.
        let input = b"<e xmlns=\"http://www.unece.org/cefact/namespaces/StandardBusinessDocumentHeader\">\
<p xmlns=\"urn:p\" xmlns:x=\"urn:x\" x:kind=\"fast\"/>\
</e>";
        let output = extract_payload(input).unwrap();
        assert_eq!(
            output,
            b"<?xml version=\"1.0\"?><p kind=\"fast\" xmlns=\"urn:p\" xmlns:x=\"urn:x\"/>"
        );
    }

    #[test]
    fn test_nested_header_namespace_element_dropped() {
        // Classification is per element namespace, not a latch: a
        // header-namespaced element nested inside the payload is dropped.
        let input = b"<e xmlns=\"http://www.unece.org/cefact/namespaces/StandardBusinessDocumentHeader\" xmlns:h=\"http://www.unece.org/cefact/namespaces/StandardBusinessDocumentHeader\">\
<p xmlns=\"urn:p\"><h:note/><q/></p>\
</e>";
        let output = extract_payload(input).unwrap();
        assert_eq!(output, b"<?xml version=\"1.0\"?><p xmlns=\"urn:p\"><q/></p>");
    }

    #[test]
    fn test_whitespace_between_header_children_preserved_after_payload() {
        // After the payload's end tag the flag stays true until the next
        // header tag, so inter-element whitespace lands after the output
        // root. Document-level whitespace is legal XML.
        let input = b"<e xmlns=\"http://www.unece.org/cefact/namespaces/StandardBusinessDocumentHeader\">\
<p xmlns=\"urn:p\"/>\n</e>";
        let output = extract_payload(input).unwrap();
        assert_eq!(output, b"<?xml version=\"1.0\"?><p xmlns=\"urn:p\"/>\n");
    }

    #[test]
    fn test_extract_payload_surfaces_parse_failure() {
        let result = extract_payload(b"<e xmlns=\"urn:x\"><truncated");
        assert!(matches!(result, Err(ExtractionError::Parse(_))));
    }

    #[test]
    fn test_iterator_yields_exactly_once() {
        let mut iter = PayloadIter::new(ENVELOPE);
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_iterator_swallows_failure_as_empty() {
        let mut iter = PayloadIter::new(b"<e xmlns=\"urn:x\"><truncated");
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
