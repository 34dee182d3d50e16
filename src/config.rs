use std::borrow::Cow;

use indexmap::IndexSet;
use serde::Deserialize;

/// The query key that carries the encoded blob unless configured otherwise.
pub const DEFAULT_PARAM_NAME: &str = "_pi";

/// What to do when an incoming blob cannot be decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Keep routing. A blob that is not valid base64 is dropped and the flat
    /// parameters are used as they are; a single value that is not valid
    /// JSON is kept as its raw string.
    #[default]
    Lenient,
    /// Return the decode error to the caller.
    Strict,
}

/// Configuration for an [`EncodeUrlRule`](crate::EncodeUrlRule).
///
/// ## Reserved parameter name
///
/// `param_name` is the query key that carries the encoded blob. It defaults
/// to `_pi`.
///
/// ## Auto-encoded parameters
///
/// Any parameter whose key is listed in `auto_encode_params` is moved into
/// the blob when a URL is built, unless its value is `null`.
///
/// ```
/// use encode_url_rule::Config;
///
/// let config = Config::new()
///     .param_name("enc")
///     .auto_encode_params(["page", "userId"]);
///
/// assert_eq!(config.get_param_name(), "enc");
/// assert!(config.is_auto_encoded("page"));
/// assert!(!config.is_auto_encoded("id"));
/// ```
///
/// `Config` can also be loaded with serde. Both `snake_case` and the
/// `camelCase` spelling used by route-rule configuration files are accepted:
///
/// ```
/// use encode_url_rule::{Config, DecodePolicy};
///
/// let config: Config = serde_json::from_str(r#"{
///     "paramName": "enc",
///     "autoEncodeParams": ["page"],
///     "decodePolicy": "strict"
/// }"#).unwrap();
///
/// assert_eq!(config.get_param_name(), "enc");
/// assert_eq!(config.get_decode_policy(), DecodePolicy::Strict);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "paramName")]
    param_name: Cow<'static, str>,
    #[serde(alias = "autoEncodeParams")]
    auto_encode_params: IndexSet<String>,
    #[serde(alias = "decodePolicy")]
    decode_policy: DecodePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            param_name: Cow::Borrowed(DEFAULT_PARAM_NAME),
            auto_encode_params: IndexSet::new(),
            decode_policy: DecodePolicy::Lenient,
        }
    }

    /// Sets the query key that carries the encoded blob.
    pub fn param_name(mut self, param_name: impl Into<Cow<'static, str>>) -> Self {
        self.param_name = param_name.into();
        self
    }

    /// Replaces the set of parameters moved into the blob when building URLs.
    pub fn auto_encode_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auto_encode_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Sets how decode failures on incoming blobs are handled.
    pub fn decode_policy(mut self, decode_policy: DecodePolicy) -> Self {
        self.decode_policy = decode_policy;
        self
    }

    pub fn get_param_name(&self) -> &str {
        &self.param_name
    }

    pub fn get_auto_encode_params(&self) -> &IndexSet<String> {
        &self.auto_encode_params
    }

    pub const fn get_decode_policy(&self) -> DecodePolicy {
        self.decode_policy
    }

    pub fn is_auto_encoded(&self, key: &str) -> bool {
        self.auto_encode_params.contains(key)
    }
}
