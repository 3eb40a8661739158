//! XML event types
//!
//! Event types for pull-parser style XML processing. Text and attribute
//! data borrow from the input where possible; resolved namespaces are
//! owned, since they come from the reader's binding stack.

use crate::core::attributes::{Attribute, NamespaceDecl};
use std::borrow::Cow;

/// XML parsing event
#[derive(Debug, Clone)]
pub enum XmlEvent<'a> {
    /// Start of the document, before any markup
    ///
    /// Synthesized with version "1.0" and no encoding when the input has
    /// no XML declaration.
    StartDocument {
        version: Cow<'a, [u8]>,
        encoding: Option<Cow<'a, [u8]>>,
    },
    /// Start of an element: <name attrs...>
    ///
    /// Empty elements (<name/>) produce a StartElement immediately
    /// followed by a matching EndElement.
    StartElement(StartElement<'a>),
    /// End of an element: </name>
    EndElement(EndElement),
    /// Text content between tags (entities decoded)
    Text(Cow<'a, [u8]>),
    /// CDATA section content (verbatim)
    CData(Cow<'a, [u8]>),
    /// Comment content
    Comment(Cow<'a, [u8]>),
    /// Processing instruction: <?target data?>
    ProcessingInstruction {
        target: Cow<'a, [u8]>,
        data: Option<Cow<'a, [u8]>>,
    },
    /// DOCTYPE declaration content
    DocType(Cow<'a, [u8]>),
    /// End of the document
    EndDocument,
}

/// Start element event data
#[derive(Debug, Clone)]
pub struct StartElement<'a> {
    /// Namespace prefix (before colon), if any
    pub prefix: Option<Cow<'a, [u8]>>,
    /// Local name (after colon)
    pub local_name: Cow<'a, [u8]>,
    /// Resolved namespace URI, if any is in scope
    pub namespace: Option<Vec<u8>>,
    /// Ordinary attributes (namespace declarations excluded)
    pub attributes: Vec<Attribute<'a>>,
    /// Namespace declarations made on this element
    pub declarations: Vec<NamespaceDecl<'a>>,
}

impl StartElement<'_> {
    /// Get the local name as a string
    pub fn local_name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.local_name.as_ref()).ok()
    }

    /// Get the resolved namespace as a string
    pub fn namespace_str(&self) -> Option<&str> {
        self.namespace
            .as_deref()
            .and_then(|ns| std::str::from_utf8(ns).ok())
    }
}

/// End element event data
///
/// Owned: the fields are taken from the reader's open-element stack, so
/// the namespace is guaranteed to match the start element's.
#[derive(Debug, Clone)]
pub struct EndElement {
    pub prefix: Option<Vec<u8>>,
    pub local_name: Vec<u8>,
    pub namespace: Option<Vec<u8>>,
}
