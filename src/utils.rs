use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;

/// Bytes escaped when form-encoding the inner query string.
///
/// Everything except ASCII alphanumerics, `-`, `.` and `_`. Space is left
/// alone here and turned into `+` afterwards by [`replace_space`].
pub const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// RFC 3986 unreserved characters pass through, everything else is escaped.
///
/// Used for the outer layer, where the base64 text is embedded as a single
/// query value. Unlike form encoding, a space would become `%20`.
pub const RAW_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Swaps spaces for `+`, borrowing the input when there is nothing to swap.
pub fn replace_space(input: &str) -> Cow<'_, str> {
    if input.as_bytes().contains(&b' ') {
        Cow::Owned(input.replace(' ', "+"))
    } else {
        Cow::Borrowed(input)
    }
}
