//! Functionality for using `encode_url_rule` with `axum`.
//!
//! Enable with the `axum` feature.

use std::borrow::Cow;
use std::fmt;
use std::ops::{Deref, DerefMut};

use axum_framework as axum;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, Uri, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::de::parse_query;
use crate::{Config, EncodeUrlRule, Error, Params, QueryParams};

impl QueryParams for Uri {
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.query()?.query_param(name)
    }
}

impl QueryParams for Parts {
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.uri.query_param(name)
    }
}

/// Extracts the request's query parameters with the encoded blob merged in.
///
/// Plain query parameters are kept as strings, and the reserved parameter
/// itself stays in the map. Entries from the blob overwrite plain parameters
/// of the same name. The [`Config`] is read from a request extension, falling
/// back to [`Config::default`].
///
/// ## Example
///
/// ```rust
/// use axum_framework::{Extension, Router, routing::get};
/// use encode_url_rule::{Config, axum::EncodedQuery};
///
/// async fn filter(EncodedQuery(params): EncodedQuery) -> String {
///     format!("{:?}", params.get("filter"))
/// }
///
/// let app: Router = Router::new()
///     .route("/", get(filter))
///     .layer(Extension(Config::new().param_name("enc")));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EncodedQuery(pub Params);

impl EncodedQuery {
    /// Unwrap into the inner parameters
    pub fn into_inner(self) -> Params {
        self.0
    }
}

impl Deref for EncodedQuery {
    type Target = Params;

    fn deref(&self) -> &Params {
        &self.0
    }
}

impl DerefMut for EncodedQuery {
    fn deref_mut(&mut self) -> &mut Params {
        &mut self.0
    }
}

impl<S> FromRequestParts<S> for EncodedQuery
where
    S: Send + Sync,
{
    type Rejection = EncodedQueryRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let config = parts.extensions.get::<Config>().cloned().unwrap_or_default();
        let query = parts.uri.query().unwrap_or_default();

        let flat: Params = parse_query(query)
            .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
            .collect();

        EncodeUrlRule::new((), config)
            .parse_params(flat, query)
            .map(EncodedQuery)
            .map_err(EncodedQueryRejection::new)
    }
}

/// Rejection used when the encoded blob cannot be decoded under
/// [`DecodePolicy::Strict`](crate::DecodePolicy::Strict).
#[derive(Debug)]
pub struct EncodedQueryRejection {
    error: Error,
}

impl EncodedQueryRejection {
    pub fn new(error: Error) -> Self {
        Self { error }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }
}

impl fmt::Display for EncodedQueryRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to decode encoded query parameters. Error: {}",
            self.error
        )
    }
}

impl std::error::Error for EncodedQueryRejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl IntoResponse for EncodedQueryRejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}
