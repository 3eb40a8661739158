//! Document declarations
//!
//! The capability contract the validation pipeline drives declarations
//! through, and the SBDH envelope declaration implementing it.

use crate::error::ClassificationError;
use crate::expectation::XmlExpectation;
use crate::sniffer;
use crate::splitter::PayloadIter;

/// Namespace URI of the Standard Business Document Header
pub const SBDH_NAMESPACE: &[u8] =
    b"http://www.unece.org/cefact/namespaces/StandardBusinessDocumentHeader";

/// Format tag reported for recognized SBDH envelopes
pub const SBDH_FORMAT_TAG: &str = "SBDH:1.0";

/// Capability contract for recognizing and describing a document kind
pub trait Declaration {
    /// Check whether the document belongs to this declaration
    ///
    /// False when the root namespace differs or is absent; an error only
    /// when the input cannot be parsed as XML at all.
    fn verify(&self, content: &[u8]) -> Result<bool, ClassificationError>;

    /// Report the format tag for a document this declaration recognizes
    ///
    /// Callers must have seen `verify` succeed first.
    fn detect(&self, content: &[u8]) -> Result<&'static str, ClassificationError>;

    /// Describe the checks the document is expected to undergo
    fn expectations(&self, content: &[u8]) -> Result<XmlExpectation, ClassificationError>;
}

/// A declaration whose documents embed child documents to validate
pub trait DeclarationWithChildren: Declaration {
    /// Produce the embedded child documents, at most one for SBDH
    fn children<'a>(&self, content: &'a [u8]) -> PayloadIter<'a>;
}

/// The SBDH envelope declaration
pub struct SbdhDeclaration;

impl Declaration for SbdhDeclaration {
    fn verify(&self, content: &[u8]) -> Result<bool, ClassificationError> {
        let namespace = sniffer::extract_root_namespace(content)?;
        Ok(namespace.as_deref() == Some(SBDH_NAMESPACE))
    }

    fn detect(&self, _content: &[u8]) -> Result<&'static str, ClassificationError> {
        // Version-specific fields are not inspected; verify() has already
        // pinned the namespace.
        Ok(SBDH_FORMAT_TAG)
    }

    fn expectations(&self, content: &[u8]) -> Result<XmlExpectation, ClassificationError> {
        // The whole raw document goes to the generic builder, not the
        // split payload.
        XmlExpectation::build(content)
    }
}

impl DeclarationWithChildren for SbdhDeclaration {
    fn children<'a>(&self, content: &'a [u8]) -> PayloadIter<'a> {
        PayloadIter::new(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVELOPE: &[u8] = b"<StandardBusinessDocument xmlns=\"http://www.unece.org/cefact/namespaces/StandardBusinessDocumentHeader\">\
<StandardBusinessDocumentHeader/>\
<Invoice xmlns=\"urn:invoice\"/>\
</StandardBusinessDocument>";

    #[test]
    fn test_verify_true_for_sbdh_root() {
        assert!(SbdhDeclaration.verify(ENVELOPE).unwrap());
    }

    #[test]
    fn test_verify_false_for_other_namespace() {
        assert!(!SbdhDeclaration.verify(b"<a xmlns=\"urn:other\"/>").unwrap());
        assert!(!SbdhDeclaration.verify(b"<a/>").unwrap());
    }

    #[test]
    fn test_verify_error_for_malformed_input() {
        assert!(SbdhDeclaration.verify(b"").is_err());
        assert!(SbdhDeclaration.verify(b"<a").is_err());
    }

    #[test]
    fn test_detect_is_constant() {
        assert_eq!(SbdhDeclaration.detect(ENVELOPE).unwrap(), "SBDH:1.0");
    }

    #[test]
    fn test_children_yields_payload() {
        let mut children = SbdhDeclaration.children(ENVELOPE);
        let payload = children.next().unwrap();
        assert_eq!(
            payload,
            b"<?xml version=\"1.0\"?><Invoice xmlns=\"urn:invoice\"/>"
        );
        assert!(children.next().is_none());
    }

    #[test]
    fn test_children_on_malformed_input_is_empty() {
        let mut children = SbdhDeclaration.children(b"<a xmlns=\"urn:x\"><oops");
        assert!(children.next().is_none());
    }

    #[test]
    fn test_expectations_use_the_raw_document() {
        let expectation = SbdhDeclaration.expectations(ENVELOPE).unwrap();
        assert_eq!(expectation.root_namespace(), Some(SBDH_NAMESPACE));
        assert_eq!(expectation.root_local_name(), b"StandardBusinessDocument");
    }
}
