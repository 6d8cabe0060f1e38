//! Percent-encoding helpers for path segments and query components.

use std::borrow::Cow;

/// Characters kept verbatim in a path parameter value.
const PRETTY_SAFE: &str = "-_.!~*'();,:@&=+$";

/// Like [`PRETTY_SAFE`] but wildcard values keep their slashes.
const ASTERISK_SAFE: &str = "-_.!~*'();,:@&=+$/";

/// Characters kept verbatim in a query key or value.
const QUERY_SAFE: &str = "-_.~,";

fn encode_with(value: &str, safe: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || safe.contains(c) {
            encoded.push(c);
        } else {
            encoded.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    encoded
}

/// Encode a parameter value for a single path segment.
pub fn encode_pretty(value: &str) -> String {
    encode_with(value, PRETTY_SAFE)
}

/// Encode a wildcard value, which may span segments.
pub fn encode_asterisk(value: &str) -> String {
    encode_with(value, ASTERISK_SAFE)
}

/// Encode a query key or value.
pub fn encode_query(value: &str) -> String {
    encode_with(value, QUERY_SAFE)
}

/// Percent-decode `value`; malformed input is returned unchanged.
pub fn decode_component(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(Cow::Borrowed(decoded)) => decoded.to_string(),
        Ok(Cow::Owned(decoded)) => decoded,
        Err(e) => {
            tracing::warn!(value, error = %e, "Error decoding \"{}\". Leaving it intact.", value);
            value.to_string()
        }
    }
}
