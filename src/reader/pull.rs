//! Pull-based XML event reader
//!
//! Single forward pass over a byte slice, producing namespace-resolved
//! events. The reader keeps a stack of open elements, so end elements
//! carry the same resolved namespace as their start elements and tag
//! balance is checked as a side effect.

use crate::core::attributes::{parse_tag_body, split_name};
use crate::core::namespace::NamespaceResolver;
use crate::core::scanner::Scanner;
use crate::error::ParseError;
use std::borrow::Cow;

use super::events::{EndElement, StartElement, XmlEvent};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Before the first event (StartDocument pending)
    Prolog,
    /// Inside the document proper
    Body,
    /// EndDocument delivered, nothing further
    Done,
}

/// An element currently open on the reader's stack
struct OpenElement {
    /// Full qualified name as written, for end-tag matching
    name: Vec<u8>,
    prefix: Option<Vec<u8>>,
    local_name: Vec<u8>,
    namespace: Option<Vec<u8>>,
}

/// Forward-only XML event cursor over a byte slice
pub struct EventReader<'a> {
    scanner: Scanner<'a>,
    resolver: NamespaceResolver,
    open: Vec<OpenElement>,
    /// End event synthesized for an empty tag, delivered on the next pull
    pending_end: Option<EndElement>,
    state: ReaderState,
    seen_root: bool,
}

impl<'a> EventReader<'a> {
    /// Create a reader over the given document bytes
    pub fn new(input: &'a [u8]) -> Self {
        let mut scanner = Scanner::new(input);
        if scanner.starts_with(UTF8_BOM) {
            scanner.advance(UTF8_BOM.len());
        }
        EventReader {
            scanner,
            resolver: NamespaceResolver::new(),
            open: Vec::new(),
            pending_end: None,
            state: ReaderState::Prolog,
            seen_root: false,
        }
    }

    /// Pull the next event; Ok(None) once EndDocument has been delivered
    pub fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>, ParseError> {
        if let Some(end) = self.pending_end.take() {
            self.leave_element();
            return Ok(Some(XmlEvent::EndElement(end)));
        }

        match self.state {
            ReaderState::Prolog => {
                self.state = ReaderState::Body;
                self.read_declaration().map(Some)
            }
            ReaderState::Body => self.read_body_event(),
            ReaderState::Done => Ok(None),
        }
    }

    fn leave_element(&mut self) {
        self.open.pop();
        self.resolver.pop_scope();
    }

    /// Read the XML declaration, or synthesize a default StartDocument
    fn read_declaration(&mut self) -> Result<XmlEvent<'a>, ParseError> {
        let has_declaration = self.scanner.starts_with(b"<?xml")
            && matches!(
                self.scanner.peek_at(b"<?xml".len()),
                Some(b' ' | b'\t' | b'\n' | b'\r' | b'?')
            );
        if has_declaration {
            let start = self.scanner.position();
            let close = self
                .scanner
                .find_sequence(b"?>")
                .ok_or_else(|| ParseError::new("unterminated XML declaration", start))?;
            let body = self.scanner.slice(start + b"<?xml".len(), close);
            let parsed = parse_tag_body(body)
                .map_err(|msg| ParseError::new(format!("malformed XML declaration: {msg}"), start))?;
            self.scanner.set_position(close + 2);

            let mut version: Cow<'a, [u8]> = Cow::Borrowed(&b"1.0"[..]);
            let mut encoding = None;
            for attr in parsed.attributes {
                match attr.name.as_ref() {
                    b"version" => version = attr.value,
                    b"encoding" => encoding = Some(attr.value),
                    _ => {}
                }
            }
            return Ok(XmlEvent::StartDocument { version, encoding });
        }

        Ok(XmlEvent::StartDocument {
            version: Cow::Borrowed(b"1.0"),
            encoding: None,
        })
    }

    fn read_body_event(&mut self) -> Result<Option<XmlEvent<'a>>, ParseError> {
        if self.scanner.is_eof() {
            if !self.open.is_empty() {
                return Err(ParseError::new(
                    format!("unexpected end of input: {} unclosed element(s)", self.open.len()),
                    self.scanner.position(),
                ));
            }
            if !self.seen_root {
                return Err(ParseError::new("no root element", self.scanner.position()));
            }
            self.state = ReaderState::Done;
            return Ok(Some(XmlEvent::EndDocument));
        }

        match self.scanner.peek() {
            Some(b'<') => self.read_markup().map(Some),
            _ => self.read_text().map(Some),
        }
    }

    /// Dispatch markup starting at '<'
    fn read_markup(&mut self) -> Result<XmlEvent<'a>, ParseError> {
        let start = self.scanner.position();
        self.scanner.advance(1);

        match self.scanner.peek() {
            Some(b'/') => self.read_end_tag(start),
            Some(b'!') => self.read_bang_markup(start),
            Some(b'?') => self.read_pi(start),
            Some(_) => self.read_start_tag(start),
            None => Err(ParseError::new("unexpected end of input inside markup", start)),
        }
    }

    fn read_start_tag(&mut self, start: usize) -> Result<XmlEvent<'a>, ParseError> {
        if self.open.is_empty() && self.seen_root {
            return Err(ParseError::new("content after root element", start));
        }

        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| ParseError::new("invalid element name", start))?;
        let close = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| ParseError::new("unterminated start tag", start))?;

        let mut body = self.scanner.slice(self.scanner.position(), close);
        let empty = body.last() == Some(&b'/');
        if empty {
            body = &body[..body.len() - 1];
        }
        let tag = parse_tag_body(body).map_err(|msg| ParseError::new(msg, start))?;
        self.scanner.set_position(close + 1);

        self.resolver.push_scope();
        for decl in &tag.declarations {
            self.resolver
                .declare(decl.prefix.as_deref().unwrap_or(b""), &decl.uri);
        }

        let (prefix, local_name) = split_name(name);
        let namespace = match prefix {
            Some(p) => Some(
                self.resolver
                    .resolve(p)
                    .ok_or_else(|| {
                        ParseError::new(
                            format!("unbound namespace prefix '{}'", String::from_utf8_lossy(p)),
                            start,
                        )
                    })?
                    .to_vec(),
            ),
            None => self.resolver.resolve_default().map(|uri| uri.to_vec()),
        };

        self.seen_root = true;
        self.open.push(OpenElement {
            name: name.to_vec(),
            prefix: prefix.map(|p| p.to_vec()),
            local_name: local_name.to_vec(),
            namespace: namespace.clone(),
        });

        if empty {
            self.pending_end = Some(EndElement {
                prefix: prefix.map(|p| p.to_vec()),
                local_name: local_name.to_vec(),
                namespace: namespace.clone(),
            });
        }

        Ok(XmlEvent::StartElement(StartElement {
            prefix: prefix.map(Cow::Borrowed),
            local_name: Cow::Borrowed(local_name),
            namespace,
            attributes: tag.attributes,
            declarations: tag.declarations,
        }))
    }

    fn read_end_tag(&mut self, start: usize) -> Result<XmlEvent<'a>, ParseError> {
        self.scanner.advance(1); // '/'
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| ParseError::new("invalid end tag name", start))?;
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(ParseError::new("malformed end tag", start));
        }
        self.scanner.advance(1);

        let open = self
            .open
            .last()
            .ok_or_else(|| ParseError::new("end tag without matching start", start))?;
        if open.name != name {
            return Err(ParseError::new(
                format!(
                    "mismatched end tag: expected </{}>, found </{}>",
                    String::from_utf8_lossy(&open.name),
                    String::from_utf8_lossy(name)
                ),
                start,
            ));
        }

        let end = EndElement {
            prefix: open.prefix.clone(),
            local_name: open.local_name.clone(),
            namespace: open.namespace.clone(),
        };
        self.leave_element();
        Ok(XmlEvent::EndElement(end))
    }

    /// Parse markup starting with '<!' (comment, CDATA, DOCTYPE)
    fn read_bang_markup(&mut self, start: usize) -> Result<XmlEvent<'a>, ParseError> {
        if self.scanner.starts_with(b"!--") {
            self.scanner.advance(3);
            let content_start = self.scanner.position();
            let end = self
                .scanner
                .find_sequence(b"-->")
                .ok_or_else(|| ParseError::new("unterminated comment", start))?;
            let content = self.scanner.slice(content_start, end);
            self.scanner.set_position(end + 3);
            return Ok(XmlEvent::Comment(Cow::Borrowed(content)));
        }

        if self.scanner.starts_with(b"![CDATA[") {
            self.scanner.advance(8);
            let content_start = self.scanner.position();
            let end = self
                .scanner
                .find_sequence(b"]]>")
                .ok_or_else(|| ParseError::new("unterminated CDATA section", start))?;
            let content = self.scanner.slice(content_start, end);
            self.scanner.set_position(end + 3);
            return Ok(XmlEvent::CData(Cow::Borrowed(content)));
        }

        if self.scanner.starts_with(b"!DOCTYPE") {
            self.scanner.advance(8);
            let content_start = self.scanner.position();
            // '>' inside the internal subset brackets does not end the declaration
            let mut bracket_depth = 0usize;
            loop {
                match self.scanner.peek() {
                    Some(b'[') => bracket_depth += 1,
                    Some(b']') => bracket_depth = bracket_depth.saturating_sub(1),
                    Some(b'>') if bracket_depth == 0 => break,
                    Some(_) => {}
                    None => {
                        return Err(ParseError::new("unterminated DOCTYPE declaration", start))
                    }
                }
                self.scanner.advance(1);
            }
            let content = self.scanner.slice(content_start, self.scanner.position());
            self.scanner.advance(1);
            return Ok(XmlEvent::DocType(Cow::Borrowed(content)));
        }

        Err(ParseError::new("unrecognized markup declaration", start))
    }

    fn read_pi(&mut self, start: usize) -> Result<XmlEvent<'a>, ParseError> {
        self.scanner.advance(1); // '?'
        let target = self
            .scanner
            .read_name()
            .ok_or_else(|| ParseError::new("invalid processing instruction target", start))?;
        self.scanner.skip_whitespace();
        let data_start = self.scanner.position();
        let end = self
            .scanner
            .find_sequence(b"?>")
            .ok_or_else(|| ParseError::new("unterminated processing instruction", start))?;
        let data = self.scanner.slice(data_start, end);
        self.scanner.set_position(end + 2);

        Ok(XmlEvent::ProcessingInstruction {
            target: Cow::Borrowed(target),
            data: if data.is_empty() {
                None
            } else {
                Some(Cow::Borrowed(data))
            },
        })
    }

    fn read_text(&mut self) -> Result<XmlEvent<'a>, ParseError> {
        let start = self.scanner.position();
        let end = self.scanner.find_byte(b'<').unwrap_or(self.scanner.len());
        let raw = self.scanner.slice(start, end);
        self.scanner.set_position(end);
        Ok(XmlEvent::Text(crate::core::entities::decode_text(raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8]) -> Vec<XmlEvent<'_>> {
        let mut reader = EventReader::new(input);
        let mut events = Vec::new();
        while let Some(event) = reader.next_event().unwrap() {
            events.push(event);
        }
        events
    }

    fn collect_err(input: &[u8]) -> ParseError {
        let mut reader = EventReader::new(input);
        loop {
            match reader.next_event() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("expected a parse error"),
                Err(err) => return err,
            }
        }
    }

    #[test]
    fn test_simple_document() {
        let events = collect(b"<root>hello</root>");
        assert_eq!(events.len(), 5);
        assert!(matches!(
            &events[0],
            XmlEvent::StartDocument { version, encoding }
                if version.as_ref() == b"1.0" && encoding.is_none()
        ));
        assert!(matches!(
            &events[1],
            XmlEvent::StartElement(e) if e.local_name.as_ref() == b"root" && e.namespace.is_none()
        ));
        assert!(matches!(&events[2], XmlEvent::Text(t) if t.as_ref() == b"hello"));
        assert!(matches!(
            &events[3],
            XmlEvent::EndElement(e) if e.local_name == b"root"
        ));
        assert!(matches!(&events[4], XmlEvent::EndDocument));
    }

    #[test]
    fn test_xml_declaration_parsed() {
        let events = collect(b"<?xml version=\"1.1\" encoding=\"UTF-8\"?><a/>");
        assert!(matches!(
            &events[0],
            XmlEvent::StartDocument { version, encoding }
                if version.as_ref() == b"1.1"
                    && encoding.as_deref() == Some(&b"UTF-8"[..])
        ));
    }

    #[test]
    fn test_xml_declaration_with_newline_whitespace() {
        let events = collect(b"<?xml\nversion=\"1.1\" encoding=\"UTF-8\"?>\n<a/>");
        assert!(matches!(
            &events[0],
            XmlEvent::StartDocument { version, encoding }
                if version.as_ref() == b"1.1"
                    && encoding.as_deref() == Some(&b"UTF-8"[..])
        ));
    }

    #[test]
    fn test_xml_stylesheet_pi_is_not_a_declaration() {
        let events = collect(b"<?xml-stylesheet href=\"s.xsl\"?><a/>");
        assert!(matches!(
            &events[0],
            XmlEvent::StartDocument { version, encoding }
                if version.as_ref() == b"1.0" && encoding.is_none()
        ));
        assert!(matches!(
            &events[1],
            XmlEvent::ProcessingInstruction { target, .. }
                if target.as_ref() == b"xml-stylesheet"
        ));
    }

    #[test]
    fn test_empty_tag_expands_to_start_end() {
        let events = collect(b"<a/>");
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[1], XmlEvent::StartElement(_)));
        assert!(matches!(&events[2], XmlEvent::EndElement(_)));
    }

    #[test]
    fn test_default_namespace_inherited() {
        let events = collect(b"<a xmlns=\"urn:x\"><b/></a>");
        let ns: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                XmlEvent::StartElement(e) => Some(e.namespace.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(ns.len(), 2);
        assert_eq!(ns[0].as_deref(), Some(&b"urn:x"[..]));
        assert_eq!(ns[1].as_deref(), Some(&b"urn:x"[..]));
    }

    #[test]
    fn test_prefixed_namespace_resolved() {
        let events = collect(b"<p:a xmlns:p=\"urn:p\"/>");
        match &events[1] {
            XmlEvent::StartElement(e) => {
                assert_eq!(e.prefix.as_deref(), Some(&b"p"[..]));
                assert_eq!(e.local_name.as_ref(), b"a");
                assert_eq!(e.namespace.as_deref(), Some(&b"urn:p"[..]));
            }
            other => panic!("expected StartElement, got {other:?}"),
        }
    }

    #[test]
    fn test_end_element_namespace_matches_start() {
        let events = collect(b"<a xmlns=\"urn:x\"></a>");
        assert!(matches!(
            &events[2],
            XmlEvent::EndElement(e) if e.namespace.as_deref() == Some(&b"urn:x"[..])
        ));
    }

    #[test]
    fn test_unbound_prefix_is_error() {
        let err = collect_err(b"<p:a/>");
        assert!(err.message.contains("unbound namespace prefix"));
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        let err = collect_err(b"<a><b></a></a>");
        assert!(err.message.contains("mismatched end tag"));
    }

    #[test]
    fn test_truncated_input_is_error() {
        let err = collect_err(b"<root><child>");
        assert!(err.message.contains("unclosed element"));
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = collect_err(b"");
        assert!(err.message.contains("no root element"));
    }

    #[test]
    fn test_element_after_root_is_error() {
        let err = collect_err(b"<a/><b/>");
        assert!(err.message.contains("content after root"));
    }

    #[test]
    fn test_cdata_and_comment_events() {
        let events = collect(b"<a><!-- note --><![CDATA[1 < 2]]></a>");
        assert!(matches!(&events[2], XmlEvent::Comment(c) if c.as_ref() == b" note "));
        assert!(matches!(&events[3], XmlEvent::CData(c) if c.as_ref() == b"1 < 2"));
    }

    #[test]
    fn test_text_entities_decoded() {
        let events = collect(b"<a>1 &lt; 2</a>");
        assert!(matches!(&events[2], XmlEvent::Text(t) if t.as_ref() == b"1 < 2"));
    }

    #[test]
    fn test_doctype_and_pi_skippable() {
        let events = collect(b"<!DOCTYPE a><?pi data?><a/>");
        assert!(matches!(&events[1], XmlEvent::DocType(_)));
        assert!(matches!(
            &events[2],
            XmlEvent::ProcessingInstruction { target, .. } if target.as_ref() == b"pi"
        ));
    }

    #[test]
    fn test_utf8_bom_skipped() {
        let events = collect(b"\xef\xbb\xbf<a/>");
        assert!(matches!(&events[1], XmlEvent::StartElement(_)));
    }
}
