use std::borrow::Cow;

#[inline(always)]
fn char_to_digit(c: u8) -> Option<u8> {
    char::from(c).to_digit(16).map(|d| d as u8)
}

/// Decodes a form-encoded key or value:
/// - Replaces `+` with a space
/// - Decodes percent-encoded characters
///
/// A `%` that is not followed by two hex digits is kept as a literal `%`.
pub fn decode(input: &[u8]) -> Cow<'_, [u8]> {
    if !input.iter().any(|&b| b == b'+' || b == b'%') {
        return Cow::Borrowed(input);
    }

    let mut decoded = Vec::with_capacity(input.len());
    let mut idx = 0;

    while idx < input.len() {
        match input[idx] {
            b'+' => decoded.push(b' '),
            b'%' => {
                let high = input.get(idx + 1).copied().and_then(char_to_digit);
                let low = input.get(idx + 2).copied().and_then(char_to_digit);
                if let (Some(h), Some(l)) = (high, low) {
                    decoded.push(h * 0x10 + l);
                    idx += 3;
                    continue;
                }
                decoded.push(b'%');
            }
            b => decoded.push(b),
        }
        idx += 1;
    }

    Cow::Owned(decoded)
}

/// Decodes a form-encoded string. Invalid UTF-8 is replaced rather than
/// rejected.
pub fn decode_str(input: &str) -> Cow<'_, str> {
    match decode(input.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(input),
        Cow::Owned(bytes) => match String::from_utf8(bytes) {
            Ok(s) => Cow::Owned(s),
            Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        },
    }
}

/// Splits a form-encoded querystring into decoded key-value pairs.
///
/// Empty segments are skipped and a segment without `=` yields an empty
/// value. Pairs are returned in input order, duplicates included.
pub fn parse_query(input: &str) -> impl Iterator<Item = (Cow<'_, str>, Cow<'_, str>)> {
    input
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (decode_str(key), decode_str(value))
        })
}
