//! A URL rule decorator that carries structured parameters in one query value.
//!
//! [`EncodeUrlRule`] wraps any [`UrlRule`]. When a URL is built it moves the
//! configured parameters into an encoded blob stored under the reserved key;
//! when a request is parsed it unpacks the blob from the request's query and
//! merges its entries back into the matched route's parameters. Everything
//! else is left to the wrapped rule.

use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasher;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{Config, DecodePolicy};
use crate::de::{parse_query, unpack_with};
use crate::error::*;
use crate::params::{Params, ParsedRoute, merge};
use crate::ser::pack_params;

/// Read access to a request's query parameters.
pub trait QueryParams {
    /// Returns the decoded value of the named query parameter, if present.
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// A raw, form-encoded querystring such as `id=1&_pi=...`. When a key
/// repeats, the last value wins.
impl QueryParams for str {
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        parse_query(self)
            .filter(|(key, _)| key == name)
            .last()
            .map(|(_, value)| value)
    }
}

impl QueryParams for String {
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.as_str().query_param(name)
    }
}

/// Only string values are visible as query parameters.
impl QueryParams for Params {
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).and_then(Value::as_str).map(Cow::Borrowed)
    }
}

impl<S: BuildHasher> QueryParams for HashMap<String, String, S> {
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_str()))
    }
}

impl<S: BuildHasher> QueryParams for IndexMap<String, String, S> {
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_str()))
    }
}

impl<T: QueryParams + ?Sized> QueryParams for &T {
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).query_param(name)
    }
}

/// The URL building and matching behaviour of a single route rule.
///
/// `Ok(None)` means the rule does not apply: it cannot build a URL for the
/// given route, or the request does not match it.
pub trait UrlRule {
    /// Whatever owns the rules, passed through untouched.
    type Manager: ?Sized;
    /// The incoming request type.
    type Request: QueryParams + ?Sized;

    fn create_url(
        &self,
        manager: &Self::Manager,
        route: &str,
        params: Params,
    ) -> Result<Option<String>>;

    fn parse_request(
        &self,
        manager: &Self::Manager,
        request: &Self::Request,
    ) -> Result<Option<ParsedRoute>>;
}

/// Wraps a [`UrlRule`], packing structured parameters into a single query
/// value on the way out and unpacking them on the way in.
///
/// ```
/// use encode_url_rule::{Config, EncodeUrlRule, Params};
/// use serde_json::json;
///
/// let rule = EncodeUrlRule::new((), Config::new().auto_encode_params(["page", "userId"]));
///
/// let params: Params = serde_json::from_value(json!({
///     "id": 123,
///     "key1": "value1",
///     "userId": 456,
///     "page": 2,
/// })).unwrap();
///
/// let built = rule.build_params(params).unwrap();
/// assert_eq!(built, serde_json::from_value::<Params>(json!({
///     "id": 123,
///     "key1": "value1",
///     "_pi": "dXNlcklkPTQ1NiZwYWdlPTI%3D",
/// })).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct EncodeUrlRule<R> {
    inner: R,
    config: Config,
}

impl<R> EncodeUrlRule<R> {
    pub fn new(inner: R, config: Config) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Rewrites outgoing parameters before a URL is built.
    ///
    /// 1. A blob already present under the reserved key is unpacked first. A
    ///    map under the reserved key is taken as the blob's entries directly.
    /// 2. Every auto-encoded parameter with a non-null value is moved into
    ///    the blob.
    /// 3. A non-empty blob is packed and stored under the reserved key.
    ///
    /// Parameters that are neither auto-encoded nor the reserved key are
    /// returned untouched and in their original order.
    pub fn build_params(&self, mut params: Params) -> Result<Params> {
        let name = self.config.get_param_name();

        let mut blob = match params.get_mut(name) {
            Some(Value::String(encoded)) => self.unpack_existing(encoded)?,
            Some(Value::Object(entries)) => std::mem::take(entries).into_iter().collect(),
            _ => Params::new(),
        };

        let mut flat = Params::with_capacity(params.len());
        for (key, value) in params {
            if key != name && !value.is_null() && self.config.is_auto_encoded(&key) {
                blob.insert(key, value);
            } else {
                flat.insert(key, value);
            }
        }

        if !blob.is_empty() {
            let packed = pack_params(&blob)?;
            flat.insert(name.to_owned(), Value::String(packed));
        }

        Ok(flat)
    }

    /// Merges the blob carried by `request` into matched route parameters.
    ///
    /// Values from the blob take priority over parameters of the same name.
    /// A request without the reserved key, or with an empty value, leaves
    /// `params` unchanged.
    pub fn parse_params<Q>(&self, params: Params, request: &Q) -> Result<Params>
    where
        Q: QueryParams + ?Sized,
    {
        let name = self.config.get_param_name();
        let encoded = match request.query_param(name) {
            Some(encoded) if !encoded.is_empty() => encoded,
            _ => return Ok(params),
        };

        let policy = self.config.get_decode_policy();
        match unpack_with(&encoded, policy) {
            Ok(blob) => Ok(merge(params, blob)),
            Err(err) if policy == DecodePolicy::Lenient => {
                tracing::warn!(param = name, error = %err, "ignoring undecodable parameter blob");
                Ok(params)
            }
            Err(err) => Err(err),
        }
    }

    fn unpack_existing(&self, encoded: &str) -> Result<Params> {
        let policy = self.config.get_decode_policy();
        match unpack_with(encoded, policy) {
            Ok(blob) => Ok(blob),
            Err(err) if policy == DecodePolicy::Lenient => {
                tracing::warn!(
                    param = self.config.get_param_name(),
                    error = %err,
                    "discarding undecodable parameter blob"
                );
                Ok(Params::new())
            }
            Err(err) => Err(err),
        }
    }
}

impl<R: UrlRule> UrlRule for EncodeUrlRule<R> {
    type Manager = R::Manager;
    type Request = R::Request;

    fn create_url(
        &self,
        manager: &Self::Manager,
        route: &str,
        params: Params,
    ) -> Result<Option<String>> {
        let params = self.build_params(params)?;
        self.inner.create_url(manager, route, params)
    }

    fn parse_request(
        &self,
        manager: &Self::Manager,
        request: &Self::Request,
    ) -> Result<Option<ParsedRoute>> {
        let Some(ParsedRoute { route, params }) = self.inner.parse_request(manager, request)?
        else {
            return Ok(None);
        };
        let params = self.parse_params(params, request)?;
        Ok(Some(ParsedRoute { route, params }))
    }
}
