//! XML event writer
//!
//! Serializes write events into an in-memory buffer in lock-step with the
//! reader. The start tag is left open until the next event so attributes
//! and namespace declarations can be appended; an element closed while
//! its start tag is still open collapses to an empty tag (`<a/>`).

use crate::core::entities::{escape_attribute_into, escape_text_into};
use crate::error::WriteError;

/// Event-based XML serializer bound to an owned output buffer
pub struct EventWriter {
    buf: Vec<u8>,
    /// Qualified names of elements opened but not yet closed
    open_tags: Vec<Vec<u8>>,
    /// A start tag has been written but not yet terminated with '>'
    tag_open: bool,
}

impl EventWriter {
    /// Create a writer with an empty output buffer
    pub fn new() -> Self {
        EventWriter {
            buf: Vec::new(),
            open_tags: Vec::new(),
            tag_open: false,
        }
    }

    /// Write the XML declaration
    ///
    /// The encoding pseudo-attribute is included only when given.
    pub fn write_start_document(&mut self, version: &[u8], encoding: Option<&[u8]>) {
        self.buf.extend_from_slice(b"<?xml version=\"");
        self.buf.extend_from_slice(version);
        self.buf.push(b'"');
        if let Some(encoding) = encoding {
            self.buf.extend_from_slice(b" encoding=\"");
            self.buf.extend_from_slice(encoding);
            self.buf.push(b'"');
        }
        self.buf.extend_from_slice(b"?>");
    }

    /// Close any elements still open and finish the document
    pub fn write_end_document(&mut self) {
        self.close_start_tag();
        while let Some(qname) = self.open_tags.pop() {
            self.buf.extend_from_slice(b"</");
            self.buf.extend_from_slice(&qname);
            self.buf.push(b'>');
        }
    }

    /// Open an element, deferring the '>' until the next event
    pub fn write_start_element(&mut self, prefix: Option<&[u8]>, local_name: &[u8]) {
        self.close_start_tag();

        let mut qname = Vec::with_capacity(local_name.len() + 8);
        if let Some(prefix) = prefix {
            qname.extend_from_slice(prefix);
            qname.push(b':');
        }
        qname.extend_from_slice(local_name);

        self.buf.push(b'<');
        self.buf.extend_from_slice(&qname);
        self.open_tags.push(qname);
        self.tag_open = true;
    }

    /// Write an attribute on the currently open start tag
    pub fn write_attribute(&mut self, local_name: &[u8], value: &[u8]) -> Result<(), WriteError> {
        if !self.tag_open {
            return Err(WriteError::NoOpenStartTag);
        }
        self.buf.push(b' ');
        self.buf.extend_from_slice(local_name);
        self.buf.extend_from_slice(b"=\"");
        escape_attribute_into(value, &mut self.buf);
        self.buf.push(b'"');
        Ok(())
    }

    /// Write a namespace declaration on the currently open start tag
    pub fn write_namespace(&mut self, prefix: Option<&[u8]>, uri: &[u8]) -> Result<(), WriteError> {
        if !self.tag_open {
            return Err(WriteError::NoOpenStartTag);
        }
        self.buf.extend_from_slice(b" xmlns");
        if let Some(prefix) = prefix {
            self.buf.push(b':');
            self.buf.extend_from_slice(prefix);
        }
        self.buf.extend_from_slice(b"=\"");
        escape_attribute_into(uri, &mut self.buf);
        self.buf.push(b'"');
        Ok(())
    }

    /// Close the most recently opened element
    ///
    /// Collapses to `<a/>` when nothing was written since the start tag.
    pub fn write_end_element(&mut self) -> Result<(), WriteError> {
        let qname = self.open_tags.pop().ok_or(WriteError::UnbalancedEnd)?;
        if self.tag_open {
            self.buf.extend_from_slice(b"/>");
            self.tag_open = false;
        } else {
            self.buf.extend_from_slice(b"</");
            self.buf.extend_from_slice(&qname);
            self.buf.push(b'>');
        }
        Ok(())
    }

    /// Write escaped character data
    pub fn write_characters(&mut self, text: &[u8]) {
        self.close_start_tag();
        escape_text_into(text, &mut self.buf);
    }

    /// Write a CDATA section (content verbatim, not escaped)
    pub fn write_cdata(&mut self, text: &[u8]) {
        self.close_start_tag();
        self.buf.extend_from_slice(b"<![CDATA[");
        self.buf.extend_from_slice(text);
        self.buf.extend_from_slice(b"]]>");
    }

    /// Hand back the accumulated output buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn close_start_tag(&mut self) {
        if self.tag_open {
            self.buf.push(b'>');
            self.tag_open = false;
        }
    }
}

impl Default for EventWriter {
    fn default() -> Self {
        Self::new()
    }
}
