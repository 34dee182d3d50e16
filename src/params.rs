//! The flat parameter mapping shared by the packer, the unpacker and the rule.

use indexmap::IndexMap;
use serde_json::Value;

/// Flat route parameters, keyed by name.
///
/// Values are either scalars or arbitrary JSON structures. Insertion order
/// is kept so that packing the same mapping twice gives the same bytes.
pub type Params = IndexMap<String, Value>;

/// A route matched by a [`UrlRule`](crate::UrlRule), together with the
/// parameters extracted while matching it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedRoute {
    pub route: String,
    pub params: Params,
}

impl ParsedRoute {
    pub fn new(route: impl Into<String>, params: Params) -> Self {
        Self {
            route: route.into(),
            params,
        }
    }
}

/// Merges `blob` into `base`, with `blob` winning on overlapping keys.
///
/// The merge is shallow: a nested structure in `blob` replaces the
/// corresponding value in `base` wholesale. Keys already in `base` keep
/// their position and new keys are appended in `blob` order.
pub fn merge(mut base: Params, blob: Params) -> Params {
    base.extend(blob);
    base
}
