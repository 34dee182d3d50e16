//! Unpacking an encoded blob back into structured parameters.

mod decode;

pub(crate) use decode::parse_query;

use std::borrow::Cow;

use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine, alphabet};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::DecodePolicy;
use crate::error::*;
use crate::params::Params;

/// Standard alphabet, accepting blobs with or without trailing padding.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Unpacks an encoded blob, keeping values that are not valid JSON as raw
/// strings.
///
/// ```
/// use serde_json::json;
///
/// let params = encode_url_rule::unpack("a2V5Mj0lMjJ2YWx1ZTIlMjI%3D").unwrap();
/// assert_eq!(params["key2"], json!("value2"));
/// ```
///
/// A blob that is not valid base64 always fails, whatever the policy. It is
/// up to the caller (usually the [`EncodeUrlRule`](crate::EncodeUrlRule)) to
/// decide whether that aborts the request.
pub fn unpack(input: &str) -> Result<Params> {
    unpack_with(input, DecodePolicy::Lenient)
}

/// Unpacks an encoded blob using the given policy for values that are not
/// valid JSON.
pub fn unpack_with(input: &str, policy: DecodePolicy) -> Result<Params> {
    let query = decode_blob(input)?;
    let mut params = Params::new();

    for (key, raw) in parse_query(&query) {
        let value = match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(source) if policy == DecodePolicy::Strict => {
                return Err(Error::Json {
                    key: key.into_owned(),
                    source,
                });
            }
            Err(source) => {
                tracing::warn!(key = %key, error = %source, "keeping undecodable value as a string");
                Value::String(raw.into_owned())
            }
        };
        params.insert(key.into_owned(), value);
    }

    tracing::debug!(params = params.len(), len = input.len(), "unpacked parameters");
    Ok(params)
}

/// Unpacks an encoded blob directly into a typed value.
///
/// ```
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// #[serde(rename_all = "camelCase")]
/// struct Paging {
///     user_id: u64,
///     page: u32,
/// }
///
/// let paging: Paging = encode_url_rule::unpack_as("dXNlcklkPTQ1NiZwYWdlPTI%3D").unwrap();
/// assert_eq!(paging, Paging { user_id: 456, page: 2 });
/// ```
pub fn unpack_as<T: DeserializeOwned>(input: &str) -> Result<T> {
    let params = unpack_with(input, DecodePolicy::Strict)?;
    let object: serde_json::Map<String, Value> = params.into_iter().collect();
    serde_json::from_value(Value::Object(object)).map_err(Error::Deserialize)
}

/// Undoes the outer two layers: raw percent-decoding, then base64.
fn decode_blob(input: &str) -> Result<String> {
    let raw: Cow<'_, [u8]> = percent_encoding::percent_decode_str(input).into();
    let bytes = BASE64.decode(raw)?;
    String::from_utf8(bytes).map_err(|e| Error::Utf8(e.utf8_error()))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    // base64 of `a=%7B%22x%22%3A1%7D&b=not-json`
    const MIXED: &str = "YT0lN0IlMjJ4JTIyJTNBMSU3RCZiPW5vdC1qc29u";

    #[test]
    fn unpack_known_vector() {
        let params = unpack("a2V5Mj0lMjJ2YWx1ZTIlMjImdXNlcklkPTQ1NiZwYWdlPTI%3D").unwrap();
        let keys: Vec<_> = params.keys().map(String::as_str).collect();
        assert_eq!(keys, ["key2", "userId", "page"]);
        assert_eq!(params["key2"], json!("value2"));
        assert_eq!(params["userId"], json!(456));
        assert_eq!(params["page"], json!(2));
    }

    #[test]
    fn unpack_accepts_missing_padding() {
        let params = unpack("dXNlcklkPTQ1NiZwYWdlPTI").unwrap();
        assert_eq!(params["page"], json!(2));
    }

    #[test]
    fn unpack_does_not_treat_plus_as_space() {
        // `+` is part of the base64 alphabet, a raw decode must leave it alone
        let err = unpack("ab cd").unwrap_err();
        assert!(matches!(err, Error::Base64(_)));
    }

    #[test]
    fn unpack_rejects_invalid_base64() {
        let err = unpack("!!not base64!!").unwrap_err();
        assert!(err.is_decode());
        assert!(matches!(err, Error::Base64(_)));
    }

    #[test]
    fn unpack_rejects_invalid_utf8() {
        // base64 of the single byte 0xff
        assert!(matches!(unpack("%2Fw%3D%3D"), Err(Error::Utf8(_))));
    }

    #[test]
    fn lenient_keeps_raw_value() {
        let params = unpack(MIXED).unwrap();
        assert_eq!(params["a"], json!({"x": 1}));
        assert_eq!(params["b"], json!("not-json"));
    }

    #[test]
    fn strict_reports_key() {
        match unpack_with(MIXED, DecodePolicy::Strict) {
            Err(Error::Json { key, .. }) => assert_eq!(key, "b"),
            other => panic!("expected a JSON error, got {other:?}"),
        }
    }

    #[test]
    fn unpack_as_reports_shape_mismatch() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Paging {
            page: String,
        }
        let err = unpack_as::<Paging>("cGFnZT0y").unwrap_err();
        assert!(matches!(err, Error::Deserialize(_)));
    }

    #[test]
    fn empty_blob_is_empty_map() {
        assert!(unpack("").unwrap().is_empty());
    }
}
