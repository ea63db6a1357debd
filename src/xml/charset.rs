//! ISO-8859-15 (Latin-9) encoding for PADnext XML.
//!
//! Typographic characters are mapped through an explicit substitution table.
//! Anything else outside Latin-9 becomes `?` and is logged.

use encoding_rs::{Encoding, ISO_8859_15, UTF_8};

use crate::core::PadnextError;

/// Encoding label written into every XML declaration.
pub const XML_ENCODING: &str = "ISO-8859-15";

/// Characters outside Latin-9 with their ASCII stand-ins.
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2012}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2015}', "-"),
    ('\u{2212}', "-"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201A}', "'"),
    ('\u{2032}', "'"),
    ('\u{00B4}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{201E}', "\""),
    ('\u{2033}', "\""),
    ('\u{00A8}', "\""),
    ('\u{2026}', "..."),
    ('\u{2022}', "*"),
    ('\u{00A4}', "EUR"),
    ('\u{2009}', " "),
    ('\u{202F}', " "),
    ('\u{200B}', ""),
];

/// True if the character has a code point in ISO-8859-15.
pub fn is_latin9(c: char) -> bool {
    match c {
        '\u{20AC}' | '\u{0160}' | '\u{0161}' | '\u{017D}' | '\u{017E}' | '\u{0152}'
        | '\u{0153}' | '\u{0178}' => true,
        '\u{00A4}' | '\u{00A6}' | '\u{00A8}' | '\u{00B4}' | '\u{00B8}' | '\u{00BC}'
        | '\u{00BD}' | '\u{00BE}' => false,
        c => (c as u32) < 0x100,
    }
}

/// Apply the substitution table and replace unmappable characters with `?`.
/// Returns the sanitized text and the number of `?` replacements.
pub fn sanitize(text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut replaced = 0;
    for c in text.chars() {
        if let Some((_, sub)) = SUBSTITUTIONS.iter().find(|(from, _)| *from == c) {
            out.push_str(sub);
        } else if is_latin9(c) {
            out.push(c);
        } else {
            tracing::warn!(code_point = %format!("U+{:04X}", c as u32), "character not representable in ISO-8859-15, replaced with '?'");
            out.push('?');
            replaced += 1;
        }
    }
    (out, replaced)
}

/// Encode sanitized text as ISO-8859-15 bytes.
///
/// Callers run [`sanitize`] on every value first; characters that still fall
/// outside Latin-9 come out as numeric character references.
pub fn encode(text: &str) -> Vec<u8> {
    let (bytes, _, _) = ISO_8859_15.encode(text);
    bytes.into_owned()
}

/// Decode XML bytes using the encoding named in the declaration.
///
/// Without a declaration the bytes are read as UTF-8, falling back to ISO-8859-15.
pub fn decode(bytes: &[u8]) -> Result<String, PadnextError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let encoding = match declared_encoding(bytes) {
        Some(label) => Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            PadnextError::Xml(format!("unsupported XML encoding '{label}'"))
        })?,
        None if std::str::from_utf8(bytes).is_ok() => UTF_8,
        None => ISO_8859_15,
    };
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(PadnextError::Xml(format!(
            "document is not valid {}",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}

/// Encoding label from `<?xml ... encoding="..."?>`, if present.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(200)];
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = String::from_utf8_lossy(&head[..end]);
    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    Some(value[..value.find(quote)?].to_string())
}
