//! Packing structured parameters into a single query value.

mod encode;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;

use crate::error::*;
use crate::params::Params;

use encode::{form_encode, raw_encode};

/// Packs a map-like value into an encoded blob.
///
/// Each entry's value is serialized to JSON text, the resulting pairs are
/// form-encoded into a querystring, the querystring is base64-encoded, and
/// the base64 text is percent-encoded so that it can be used verbatim as a
/// query value.
///
/// ```
/// use serde_json::json;
///
/// let blob = encode_url_rule::pack(&json!({
///     "key2": "value2",
///     "userId": 456,
///     "page": 2,
/// })).unwrap();
///
/// assert_eq!(blob, "a2V5Mj0lMjJ2YWx1ZTIlMjImdXNlcklkPTQ1NiZwYWdlPTI%3D");
/// ```
///
/// Anything that serializes to a map or struct is accepted. Values that
/// cannot be represented as JSON produce [`Error::Encoding`], and top-level
/// values that are not maps produce [`Error::NotAnObject`].
pub fn pack<T: Serialize + ?Sized>(blob: &T) -> Result<String> {
    match serde_json::to_value(blob).map_err(Error::Encoding)? {
        Value::Object(map) => pack_entries(map.iter().map(|(key, value)| (key.as_str(), value))),
        other => Err(Error::NotAnObject(value_kind(&other))),
    }
}

/// Packs a [`Params`] mapping into an encoded blob.
///
/// Entries are written in the mapping's order, so the same mapping always
/// yields byte-identical output.
pub fn pack_params(params: &Params) -> Result<String> {
    pack_entries(params.iter().map(|(key, value)| (key.as_str(), value)))
}

fn pack_entries<'a, I>(entries: I) -> Result<String>
where
    I: Iterator<Item = (&'a str, &'a Value)>,
{
    let mut query = String::with_capacity(64);
    let mut count = 0usize;

    for (key, value) in entries {
        let json = serde_json::to_string(value).map_err(Error::Encoding)?;
        if count > 0 {
            query.push('&');
        }
        form_encode(key, &mut query);
        query.push('=');
        form_encode(&json, &mut query);
        count += 1;
    }

    let blob = raw_encode(&STANDARD.encode(query.as_bytes()));
    tracing::debug!(params = count, len = blob.len(), "packed parameters");
    Ok(blob)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn pack_matches_known_vectors() {
        let params: Params = serde_json::from_value(json!({"userId": 456, "page": 2})).unwrap();
        assert_eq!(
            pack_params(&params).unwrap(),
            "dXNlcklkPTQ1NiZwYWdlPTI%3D"
        );
        assert_eq!(
            pack(&json!({"a": null, "b": true, "c": 1.5})).unwrap(),
            "YT1udWxsJmI9dHJ1ZSZjPTEuNQ%3D%3D"
        );
    }

    #[test]
    fn pack_empty_map() {
        assert_eq!(pack_params(&Params::new()).unwrap(), "");
    }

    #[test]
    fn pack_rejects_non_maps() {
        assert!(matches!(pack(&[1, 2, 3]), Err(Error::NotAnObject("sequence"))));
        assert!(matches!(pack("text"), Err(Error::NotAnObject("string"))));
    }

    #[test]
    fn pack_reports_unserializable_values() {
        // JSON object keys must be strings
        let mut inner = BTreeMap::new();
        inner.insert(vec![1u8, 2], "x");
        let mut blob = BTreeMap::new();
        blob.insert("bad", inner);

        let err = pack(&blob).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
        assert!(!err.is_decode());
    }
}
