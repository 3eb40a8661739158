//! XML entity decoding and escaping
//!
//! Decoding handles the built-in entities (&lt; &gt; &amp; &quot; &apos;)
//! and numeric character references (&#123; &#x7B;), returning a borrowed
//! Cow when no entities are present. Escaping is the inverse used when
//! serializing extracted payload content.

use memchr::memchr;
use std::borrow::Cow;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy),
/// returns Owned if entities were decoded.
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

/// Decode all entity references in the input
fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        match memchr(b'&', &input[pos..]) {
            Some(amp_offset) => {
                result.extend_from_slice(&input[pos..pos + amp_offset]);
                pos += amp_offset;

                match memchr(b';', &input[pos..]) {
                    Some(semi_offset) => {
                        let entity = &input[pos + 1..pos + semi_offset];
                        match decode_entity(entity) {
                            Some(decoded) => {
                                result.extend_from_slice(decoded.as_bytes());
                                pos += semi_offset + 1;
                            }
                            None => {
                                // Unknown entity, keep the ampersand as-is
                                result.push(b'&');
                                pos += 1;
                            }
                        }
                    }
                    None => {
                        // No terminating semicolon, keep the ampersand
                        result.push(b'&');
                        pos += 1;
                    }
                }
            }
            None => {
                result.extend_from_slice(&input[pos..]);
                break;
            }
        }
    }

    result
}

/// Decode a single entity (content between '&' and ';')
fn decode_entity(entity: &[u8]) -> Option<String> {
    match entity {
        b"lt" => Some("<".to_string()),
        b"gt" => Some(">".to_string()),
        b"amp" => Some("&".to_string()),
        b"quot" => Some("\"".to_string()),
        b"apos" => Some("'".to_string()),
        _ if entity.first() == Some(&b'#') => decode_char_ref(&entity[1..]),
        _ => None,
    }
}

/// Decode a numeric character reference (decimal or hex)
fn decode_char_ref(reference: &[u8]) -> Option<String> {
    let (digits, radix) = match reference.first() {
        Some(b'x') | Some(b'X') => (&reference[1..], 16),
        _ => (reference, 10),
    };
    let digits = std::str::from_utf8(digits).ok()?;
    let code = u32::from_str_radix(digits, radix).ok()?;
    char::from_u32(code).map(|c| c.to_string())
}

/// Escape character data for element content ('&', '<', '>')
pub fn escape_text_into(input: &[u8], out: &mut Vec<u8>) {
    for &b in input {
        match b {
            b'&' => out.extend_from_slice(b"&amp;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            _ => out.push(b),
        }
    }
}

/// Escape an attribute value (element content escapes plus '"')
pub fn escape_attribute_into(input: &[u8], out: &mut Vec<u8>) {
    for &b in input {
        match b {
            b'&' => out.extend_from_slice(b"&amp;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            b'"' => out.extend_from_slice(b"&quot;"),
            _ => out.push(b),
        }
    }
}
