use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use encode_url_rule::{DecodePolicy, Error, Params, pack, pack_params, unpack, unpack_as, unpack_with};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

fn params(value: Value) -> Params {
    serde_json::from_value(value).expect("object")
}

/// Peels the outer layers off a blob, returning the inner querystring.
fn inner_query(blob: &str) -> String {
    let b64 = percent_encoding::percent_decode_str(blob)
        .decode_utf8()
        .expect("utf-8");
    String::from_utf8(STANDARD.decode(b64.as_bytes()).expect("base64")).expect("utf-8")
}

macro_rules! roundtrip_test {
    ($data:expr) => {
        let data = params($data);
        let blob = pack_params(&data).expect("pack");
        assert_eq!(unpack(&blob).expect("unpack"), data);
        // determinism
        assert_eq!(pack_params(&data).expect("pack"), blob);
    };
}

#[test]
fn roundtrip_scalars() {
    roundtrip_test!(json!({
        "string": "value",
        "int": 456,
        "negative": -3,
        "float": 1.25,
        "bool": false,
        "null": null,
        "empty": "",
    }));
}

#[test]
fn roundtrip_nested() {
    roundtrip_test!(json!({
        "filter": {"status": ["open", "closed"], "range": {"from": 1, "to": null}},
        "ids": [1, 2, 3],
        "matrix": [[1, 2], [3, [4, {"deep": true}]]],
        "emptyList": [],
        "emptyMap": {},
    }));
}

#[test]
fn roundtrip_awkward_text() {
    roundtrip_test!(json!({
        "sort by": "-created",
        "q": "a+b = c & d; 100% \"quoted\" ~*",
        "unicode": "Zoë 東京 🚀",
        "newline": "line1\nline2",
        "a[b]": "brackets in key",
    }));
}

#[test]
fn roundtrip_keeps_string_numbers_as_strings() {
    roundtrip_test!(json!({"zip": "01234", "id": 1234, "flag": "true"}));
}

#[test]
fn wire_vectors() {
    insta::assert_snapshot!(
        pack(&json!({"userId": 456, "page": 2})).unwrap(),
        @"dXNlcklkPTQ1NiZwYWdlPTI%3D"
    );
    insta::assert_snapshot!(
        pack(&json!({"key2": "value2"})).unwrap(),
        @"a2V5Mj0lMjJ2YWx1ZTIlMjI%3D"
    );
    insta::assert_snapshot!(
        pack(&json!({"sort by": "-created"})).unwrap(),
        @"c29ydCtieT0lMjItY3JlYXRlZCUyMg%3D%3D"
    );
    insta::assert_snapshot!(
        pack(&json!({"name": "Zoë", "tags": ["a b", "c&d"]})).unwrap(),
        @"bmFtZT0lMjJabyVDMyVBQiUyMiZ0YWdzPSU1QiUyMmErYiUyMiUyQyUyMmMlMjZkJTIyJTVE"
    );
    insta::assert_snapshot!(
        pack(&json!({"filter": {"status": ["open", "closed"], "q": "a b"}, "page": 2})).unwrap(),
        @"ZmlsdGVyPSU3QiUyMnN0YXR1cyUyMiUzQSU1QiUyMm9wZW4lMjIlMkMlMjJjbG9zZWQlMjIlNUQlMkMlMjJxJTIyJTNBJTIyYStiJTIyJTdEJnBhZ2U9Mg%3D%3D"
    );
}

#[test]
fn inner_layer_is_a_form_encoded_map_of_json_text() {
    let blob = pack(&json!({"name": "Zoë", "tags": ["a b", "c&d"], "page": 2})).unwrap();
    let query = inner_query(&blob);

    // an independent form decoder sees one JSON document per key
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(&query).unwrap();
    assert_eq!(
        pairs,
        vec![
            ("name".to_owned(), r#""Zoë""#.to_owned()),
            ("tags".to_owned(), r#"["a b","c&d"]"#.to_owned()),
            ("page".to_owned(), "2".to_owned()),
        ]
    );
}

#[test]
fn outer_layer_is_url_safe() {
    // long enough to produce `+` and `/` in the base64 alphabet
    let blob = pack(&json!({"bytes": "\u{00ff}\u{00fe}\u{00fd}>>>???~~~"})).unwrap();
    assert!(
        blob.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-._~%".contains(&b)),
        "{blob}"
    );
}

#[test]
fn unpack_accepts_blobs_from_other_encoders() {
    // built by hand: form-encode with `serde_urlencoded`, then base64, no outer escaping
    let query = serde_urlencoded::to_string(&[("key2", r#""value2""#), ("n", "[1,2]")]).unwrap();
    let blob = STANDARD.encode(query);
    assert_eq!(unpack(&blob).unwrap(), params(json!({"key2": "value2", "n": [1, 2]})));
}

#[test]
fn unpack_policies() {
    let blob = STANDARD.encode("good=%7B%7D&bad=%7Bnope");
    assert_eq!(
        unpack(&blob).unwrap(),
        params(json!({"good": {}, "bad": "{nope"}))
    );
    let err = unpack_with(&blob, DecodePolicy::Strict).unwrap_err();
    assert!(err.is_decode());
    assert!(err.to_string().contains("`bad`"), "{err}");
}

#[test]
fn pack_structs_and_maps() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Paging {
        user_id: u64,
        page: u32,
        tags: Vec<String>,
    }

    let paging = Paging {
        user_id: 456,
        page: 2,
        tags: vec!["x y".to_owned()],
    };
    let blob = pack(&paging).unwrap();
    assert_eq!(unpack_as::<Paging>(&blob).unwrap(), paging);

    let mut map = BTreeMap::new();
    map.insert("a", vec![1, 2]);
    map.insert("b", vec![]);
    let blob = pack(&map).unwrap();
    assert_eq!(unpack(&blob).unwrap(), params(json!({"a": [1, 2], "b": []})));
}

#[test]
fn pack_errors() {
    assert!(matches!(pack(&Some(3)), Err(Error::NotAnObject("number"))));
    assert!(matches!(pack(&()), Err(Error::NotAnObject("null"))));

    let mut bad = BTreeMap::new();
    bad.insert("k", BTreeMap::from([((1, 2), "tuple keys are not JSON")]));
    assert!(matches!(pack(&bad), Err(Error::Encoding(_))));
}
