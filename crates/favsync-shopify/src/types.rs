//! Admin REST API payloads for customer metafields and products.
//!
//! ### Metafield `value`
//! For `json` metafields the REST API returns `value` as a JSON-encoded
//! **string**, e.g. `"{\"saved\":{}}"`. Other metafield types return strings or
//! numbers, so `value` is modelled as a raw [`serde_json::Value`] and decoded by
//! the caller.
//!
//! ### Product `fields`
//! Product lookups send `fields=id,variants`, so only those keys are present.
//! Variants come back in position order; the first one is the storefront
//! default.

use serde::{Deserialize, Serialize};

/// Metafield namespace holding the favorites document.
pub const FAVORITES_NAMESPACE: &str = "cad";
/// Metafield key holding the favorites document.
pub const FAVORITES_KEY: &str = "customer_products";
/// Metafield type used when writing the favorites document.
pub const FAVORITES_TYPE: &str = "json";

/// A metafield as returned by the Admin REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metafield {
    pub id: i64,
    pub namespace: String,
    pub key: String,
    pub value: serde_json::Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Metafield {
    /// Whether this is the `cad.customer_products` favorites metafield.
    #[must_use]
    pub fn is_favorites(&self) -> bool {
        self.namespace == FAVORITES_NAMESPACE && self.key == FAVORITES_KEY
    }
}

/// `GET customers/{id}/metafields.json`
#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldsResponse {
    #[serde(default)]
    pub metafields: Vec<Metafield>,
}

/// `POST`/`PUT` responses wrapping a single metafield.
#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldResponse {
    pub metafield: Metafield,
}

/// Request body for creating or updating the favorites metafield.
#[derive(Debug, Serialize)]
pub(crate) struct MetafieldEnvelope<'a> {
    pub metafield: MetafieldWrite<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MetafieldWrite<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub namespace: &'a str,
    pub key: &'a str,
    #[serde(rename = "type")]
    pub value_type: &'a str,
    pub value: &'a str,
}

/// `GET products/{id}.json?fields=id,variants`
#[derive(Debug, Deserialize)]
pub(crate) struct ProductResponse {
    #[serde(default)]
    pub product: Option<ProductVariants>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductVariants {
    #[serde(default)]
    pub variants: Vec<VariantId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VariantId {
    #[serde(default)]
    pub id: Option<i64>,
}
