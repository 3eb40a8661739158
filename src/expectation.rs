//! XML-derived validation expectations
//!
//! Generic expectation builder: reads the raw document (not the split
//! payload) and derives the identifiers of the checks a downstream
//! validator should run. The schema check identifier comes from the root
//! element; XML comments may add further checks with `expect:` lines.

use crate::error::ClassificationError;
use crate::reader::{EventReader, StartElement, XmlEvent};

/// Descriptor of the checks a document is expected to undergo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlExpectation {
    root_namespace: Option<Vec<u8>>,
    root_local_name: Vec<u8>,
    checks: Vec<String>,
}

impl XmlExpectation {
    /// Build an expectation descriptor from a complete raw document
    pub fn build(content: &[u8]) -> Result<Self, ClassificationError> {
        let mut reader = EventReader::new(content);
        let mut root_namespace = None;
        let mut root_local_name = Vec::new();
        let mut checks = Vec::new();
        let mut seen_root = false;

        while let Some(event) = reader.next_event()? {
            match event {
                XmlEvent::StartElement(element) if !seen_root => {
                    seen_root = true;
                    checks.push(schema_check(&element));
                    root_local_name = element.local_name.to_vec();
                    root_namespace = element.namespace;
                }
                XmlEvent::Comment(comment) => {
                    collect_expect_lines(&comment, &mut checks);
                }
                _ => {}
            }
        }

        Ok(XmlExpectation {
            root_namespace,
            root_local_name,
            checks,
        })
    }

    /// Resolved namespace of the document's root element
    pub fn root_namespace(&self) -> Option<&[u8]> {
        self.root_namespace.as_deref()
    }

    /// Local name of the document's root element
    pub fn root_local_name(&self) -> &[u8] {
        &self.root_local_name
    }

    /// Identifiers of the checks expected for this document
    pub fn checks(&self) -> &[String] {
        &self.checks
    }
}

/// Derive the schema check identifier for a root element
fn schema_check(element: &StartElement<'_>) -> String {
    match element.namespace_str() {
        Some(ns) => format!("schema:{ns}"),
        None => format!(
            "schema:{}",
            element.local_name_str().unwrap_or_default()
        ),
    }
}

/// Collect `expect: <check-id>` lines from a comment body
fn collect_expect_lines(comment: &[u8], checks: &mut Vec<String>) {
    let text = String::from_utf8_lossy(comment);
    for line in text.lines() {
        if let Some(rest) = line.trim().strip_prefix("expect:") {
            let check = rest.trim();
            if !check.is_empty() {
                checks.push(check.to_string());
            }
        }
    }
}
