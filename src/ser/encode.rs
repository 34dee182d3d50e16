use crate::utils::{FORM_ENCODE_SET, RAW_ENCODE_SET, replace_space};

/// Form-encodes a key or value of the inner query string.
///
/// ASCII alphanumerics and `-`, `.`, `_` are written as-is, a space becomes
/// `+`, and every other byte is percent-encoded with uppercase hex digits.
pub fn form_encode(input: &str, out: &mut String) {
    for chunk in percent_encoding::utf8_percent_encode(input, FORM_ENCODE_SET) {
        out.push_str(&replace_space(chunk));
    }
}

/// Percent-encodes a string for use as a single query value.
///
/// This is the raw (RFC 3986) flavour: only unreserved characters survive and
/// a space would become `%20`, never `+`.
pub fn raw_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, RAW_ENCODE_SET).to_string()
}
