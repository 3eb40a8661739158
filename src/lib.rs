//! sbdh-envelope - streaming SBDH envelope classification and splitting
//!
//! Classifies an XML document by its root namespace and, for recognized
//! Standard Business Document Header envelopes, re-serializes the embedded
//! payload as an independent XML document in a single forward pass over
//! parse events. The header subtree is dropped; the payload's own markup
//! passes through.
//!
//! Pipeline surface:
//! - verify: is this document an SBDH envelope? (root namespace check)
//! - detect: constant format tag once verify succeeded
//! - expectations: which checks should a validator run against the bytes
//! - children: at most one extracted payload document, single-use
//!
//! ```
//! use sbdh_envelope::{Declaration, DeclarationWithChildren, SbdhDeclaration};
//!
//! let doc = br#"<StandardBusinessDocument
//!     xmlns="http://www.unece.org/cefact/namespaces/StandardBusinessDocumentHeader">
//!   <StandardBusinessDocumentHeader/>
//!   <Order xmlns="urn:order"/>
//! </StandardBusinessDocument>"#;
//!
//! assert!(SbdhDeclaration.verify(doc).unwrap());
//! let payload = SbdhDeclaration.children(doc).next().unwrap();
//! assert!(payload.windows(6).any(|w| w == &b"<Order"[..]));
//! ```

pub mod core;
pub mod declaration;
pub mod error;
pub mod expectation;
pub mod reader;
pub mod sniffer;
pub mod splitter;
pub mod writer;

pub use declaration::{
    Declaration, DeclarationWithChildren, SbdhDeclaration, SBDH_FORMAT_TAG, SBDH_NAMESPACE,
};
pub use error::{ClassificationError, ExtractionError, ParseError, WriteError};
pub use expectation::XmlExpectation;
pub use reader::{EventReader, XmlEvent};
pub use splitter::{extract_payload, PayloadIter};
pub use writer::EventWriter;
