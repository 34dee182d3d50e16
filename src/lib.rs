//! Structured query parameters carried through a flat querystring.
//!
//! Querystrings are flat: every parameter is a single string. This crate
//! lets maps and sequences travel through them anyway, by packing a set of
//! parameters into one opaque value stored under a reserved key (`_pi` by
//! default).
//!
//! On the wire the reserved parameter's value is:
//!
//! ```text
//! percent_encode(base64(form_encode({ key: json(value), ... })))
//! ```
//!
//! - [`pack`] and [`unpack`] implement this transform in both directions.
//! - [`EncodeUrlRule`] wraps an existing [`UrlRule`]. It moves configured
//!   parameters into the blob when URLs are built, and merges the blob back
//!   into the route parameters when requests are parsed.
//!
//! ## Usage
//!
//! ```
//! use encode_url_rule::{Config, EncodeUrlRule, Params};
//! use serde_json::json;
//!
//! let rule = EncodeUrlRule::new((), Config::new().auto_encode_params(["filter"]));
//!
//! let params: Params = serde_json::from_value(json!({
//!     "id": 7,
//!     "filter": {"status": ["open", "closed"], "q": "a b"},
//! })).unwrap();
//!
//! // building a URL: `filter` is moved into the blob
//! let built = rule.build_params(params).unwrap();
//! assert!(!built.contains_key("filter"));
//! let blob = built["_pi"].as_str().unwrap().to_owned();
//!
//! // parsing a request: the blob is merged back into the route parameters
//! let matched: Params = serde_json::from_value(json!({"id": 7})).unwrap();
//! let query = format!("_pi={blob}");
//! let parsed = rule.parse_params(matched, query.as_str()).unwrap();
//! assert_eq!(parsed["filter"]["status"][1], json!("closed"));
//! ```
//!
//! ## Decode failures
//!
//! Building a URL fails if a value cannot be encoded. A blob on an incoming
//! request that cannot be decoded is, by default, ignored: the route still
//! matches and only the structured parameters are lost. Use
//! [`DecodePolicy::Strict`] to surface those errors instead.

#[cfg(feature = "axum")]
pub mod axum;

mod config;
mod de;
mod error;
mod params;
mod rule;
mod ser;
mod utils;

#[doc(inline)]
pub use config::{Config, DEFAULT_PARAM_NAME, DecodePolicy};
#[doc(inline)]
pub use de::{unpack, unpack_as, unpack_with};
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use params::{Params, ParsedRoute, merge};
#[doc(inline)]
pub use rule::{EncodeUrlRule, QueryParams, UrlRule};
#[doc(inline)]
pub use ser::{pack, pack_params};
