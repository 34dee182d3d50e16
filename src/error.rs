use std::str::Utf8Error;

/// Errors produced while packing or unpacking an encoded parameter blob.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value headed for the blob could not be serialized to JSON.
    #[error("failed to encode value as JSON: {0}")]
    Encoding(#[source] serde_json::Error),

    /// The value handed to the packer did not serialize to a map of
    /// key-value pairs.
    #[error("cannot pack a {0} at the top level, expected a map or struct")]
    NotAnObject(&'static str),

    /// The blob is not valid base64.
    #[error("encoded parameters are not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The base64 payload did not decode to UTF-8 text.
    #[error("encoded parameters are not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),

    /// A single value inside the blob is not valid JSON.
    #[error("value for `{key}` is not valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The unpacked parameters do not fit the requested type.
    #[error("failed to deserialize unpacked parameters: {0}")]
    Deserialize(#[source] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Returns `true` for errors raised while reading a blob, as opposed to
    /// building one.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Base64(_) | Error::Utf8(_) | Error::Json { .. } | Error::Deserialize(_))
    }
}
