//! XML tag-body parsing
//!
//! Parses the content between an element name and '>' into ordinary
//! attributes and namespace declarations. `xmlns`/`xmlns:p` pseudo
//! attributes are kept out of the attribute list, matching the event
//! model the splitter copies from.

use super::entities::decode_text;
use super::scanner::{is_name_char, is_name_start_char};
use memchr::memchr;
use std::borrow::Cow;

/// A parsed XML attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Full attribute name (may include namespace prefix)
    pub name: Cow<'a, [u8]>,
    /// Namespace prefix (before colon), if any
    pub prefix: Option<Cow<'a, [u8]>>,
    /// Local name (after colon, if prefixed)
    pub local_name: Cow<'a, [u8]>,
    /// Attribute value (entities decoded)
    pub value: Cow<'a, [u8]>,
}

/// A namespace declaration made on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl<'a> {
    /// Declared prefix; None for the default namespace (plain `xmlns`)
    pub prefix: Option<Cow<'a, [u8]>>,
    /// Namespace URI; empty undeclares the default namespace
    pub uri: Cow<'a, [u8]>,
}

/// Parsed content of a start tag after the element name
#[derive(Debug, Clone, Default)]
pub struct TagBody<'a> {
    pub attributes: Vec<Attribute<'a>>,
    pub declarations: Vec<NamespaceDecl<'a>>,
}

/// Split a name into prefix and local name at the colon
#[inline]
pub fn split_name(name: &[u8]) -> (Option<&[u8]>, &[u8]) {
    match memchr(b':', name) {
        Some(colon_pos) => (Some(&name[..colon_pos]), &name[colon_pos + 1..]),
        None => (None, name),
    }
}

/// Parse a tag body into attributes and namespace declarations
///
/// Input is the content between the element name and '>' (or '/>', with
/// the trailing slash already stripped). Malformed syntax is an error:
/// missing '=', unquoted or unterminated values.
pub fn parse_tag_body(input: &[u8]) -> Result<TagBody<'_>, &'static str> {
    let mut body = TagBody::default();
    let mut pos = 0;

    while pos < input.len() {
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            break;
        }

        // Attribute name
        let name_start = pos;
        if !is_name_start_char(input[pos]) {
            return Err("attribute name must start with letter, underscore, or colon");
        }
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() || input[pos] != b'=' {
            return Err("attribute without '=' value separator");
        }
        pos += 1;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        // Quoted value
        let quote = match input.get(pos).copied() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err("attribute value must be quoted"),
        };
        pos += 1;
        let value_start = pos;
        let value_end = match memchr(quote, &input[pos..]) {
            Some(offset) => pos + offset,
            None => return Err("unterminated attribute value"),
        };
        let value = decode_text(&input[value_start..value_end]);
        pos = value_end + 1;

        let (prefix, local_name) = split_name(name);
        if name == b"xmlns" {
            body.declarations.push(NamespaceDecl {
                prefix: None,
                uri: value,
            });
        } else if prefix == Some(b"xmlns") {
            body.declarations.push(NamespaceDecl {
                prefix: Some(Cow::Borrowed(local_name)),
                uri: value,
            });
        } else {
            body.attributes.push(Attribute {
                name: Cow::Borrowed(name),
                prefix: prefix.map(Cow::Borrowed),
                local_name: Cow::Borrowed(local_name),
                value,
            });
        }
    }

    Ok(body)
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}
