//! Error types
//!
//! - `ParseError`: low-level reader failure with a byte position
//! - `WriteError`: serializer misuse (unbalanced or out-of-place writes)
//! - `ClassificationError`: the document cannot be classified at all
//! - `ExtractionError`: payload extraction failed mid-stream

use thiserror::Error;

/// Failure while pulling events from an XML byte stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {position}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// Failure while emitting events to the output buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// Attribute or namespace written while no start tag is open
    #[error("attribute or namespace written outside an open start tag")]
    NoOpenStartTag,
    /// End element without a matching start element
    #[error("end element without a matching start element")]
    UnbalancedEnd,
}

/// The root element's namespace cannot be determined
///
/// Raised only when the input cannot be parsed as XML at all; a parseable
/// document whose root carries no namespace classifies as "no match", not
/// as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to classify document: {0}")]
pub struct ClassificationError(#[from] pub ParseError);

/// Parser or writer failure during payload extraction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("parse failure during extraction: {0}")]
    Parse(#[from] ParseError),
    #[error("write failure during extraction: {0}")]
    Write(#[from] WriteError),
}
