//! Character decoding of raw snapshot documents.
//!
//! gmond and gmetad declare `encoding="ISO-8859-1"` in their XML header,
//! so the bytes cannot be assumed to be UTF-8. The encoding is taken from a
//! byte order mark if there is one, else from the declaration, else UTF-8.
//! Undecodable bytes are an error, never replaced.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::error::ParseError;

/// Decode a complete document into text.
pub fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]);
    }

    let encoding = match declared_encoding(bytes) {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ParseError::UnsupportedEncoding(label.to_string()))?,
        None => UTF_8,
    };

    // A readable declaration means the bytes are ASCII-compatible, whatever
    // the label says (a "UTF-16" label on an 8-bit document).
    let encoding = if encoding.is_ascii_compatible() {
        encoding
    } else {
        UTF_8
    };

    decode_with(encoding, bytes)
}

fn decode_with<'a>(
    encoding: &'static Encoding,
    bytes: &'a [u8],
) -> Result<Cow<'a, str>, ParseError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or(ParseError::Decode {
            encoding: encoding.name(),
        })
}

/// The `encoding` pseudo-attribute of a leading XML declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let rest = bytes.strip_prefix(b"<?xml")?;
    let end = rest.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&rest[..end]).ok()?;

    let after = &decl[decl.find("encoding")? + "encoding".len()..];
    let after = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &after[1..];
    let close = value.find(quote)?;
    Some(value[..close].trim())
}
