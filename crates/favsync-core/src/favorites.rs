//! The favorites document kept in a customer's `cad.customer_products`
//! metafield, the request-side input shape, and the merge between them.
//!
//! ## Stored shape
//!
//! ```json
//! { "saved": { "7001": ["41001", "41002"] }, "viewed": "", "custom": {} }
//! ```
//!
//! `saved` maps a product id to the variant ids the shopper favorited, in the
//! order they were first seen. Older writers stored numeric ids and sometimes
//! omitted `viewed`/`custom`, so decoding is lenient: see
//! [`FavoritesRecord::from_value`].

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Parsed contents of the favorites metafield.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FavoritesRecord {
    /// Product id → de-duplicated variant ids, insertion ordered.
    pub saved: BTreeMap<String, Vec<String>>,
    pub viewed: String,
    pub custom: Map<String, Value>,
}

/// One favorite from a sync request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteInput {
    /// Only the product is known; the variant must be looked up.
    ProductOnly { product_id: String },
    /// The client supplied the variant directly.
    ProductVariant {
        product_id: String,
        variant_id: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FavoritesParseError {
    #[error("favorites must be an array")]
    NotAnArray,

    #[error("favorites[{index}]: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

impl FavoriteInput {
    #[must_use]
    pub fn product_id(&self) -> &str {
        match self {
            Self::ProductOnly { product_id } | Self::ProductVariant { product_id, .. } => {
                product_id
            }
        }
    }

    #[must_use]
    pub fn variant_id(&self) -> Option<&str> {
        match self {
            Self::ProductOnly { .. } => None,
            Self::ProductVariant { variant_id, .. } => Some(variant_id),
        }
    }
}

impl FavoritesRecord {
    /// Builds a record from an already-parsed JSON value, normalizing as it goes.
    ///
    /// - non-object input, or a non-object `saved`/`custom`, yields the empty default
    ///   for that part;
    /// - a non-string `viewed` becomes `""`;
    /// - numeric ids are converted to strings, blanks and non-ids are dropped,
    ///   duplicates keep their first position;
    /// - a single id in place of a variant list counts as a one-element list;
    /// - product keys are trimmed and keys that collide after trimming are merged.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut obj) = value else {
            return Self::default();
        };

        let viewed = match obj.remove("viewed") {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };
        let custom = match obj.remove("custom") {
            Some(Value::Object(m)) => m,
            _ => Map::new(),
        };
        let mut record = Self {
            saved: BTreeMap::new(),
            viewed,
            custom,
        };

        // Keys that only differ by whitespace fold into one product.
        if let Some(Value::Object(products)) = obj.remove("saved") {
            for (product_id, variants) in products {
                let product_id = product_id.trim();
                if product_id.is_empty() {
                    continue;
                }
                record.saved.entry(product_id.to_string()).or_default();
                for variant_id in variant_list(variants) {
                    record.add_variant(product_id, &variant_id);
                }
            }
        }

        record
    }

    /// Decodes a metafield `value`.
    ///
    /// The Admin API returns `json` metafields as a JSON-encoded string; an
    /// inline object is accepted as well.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when a string value is not valid JSON.
    pub fn from_metafield_value(value: &Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::String(raw) => serde_json::from_str::<Value>(raw).map(Self::from_value),
            other => Ok(Self::from_value(other.clone())),
        }
    }

    /// Serializes the record into the string stored in the metafield.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_metafield_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Records `variant_id` under `product_id`. Returns `false` when it was
    /// already present.
    pub fn add_variant(&mut self, product_id: &str, variant_id: &str) -> bool {
        let variants = self.saved.entry(product_id.to_string()).or_default();
        if variants.iter().any(|v| v == variant_id) {
            return false;
        }
        variants.push(variant_id.to_string());
        true
    }

    /// Folds `incoming` into this record. Entries without a variant are skipped.
    pub fn merge(&mut self, incoming: &[FavoriteInput]) {
        for favorite in incoming {
            if let Some(variant_id) = favorite.variant_id() {
                self.add_variant(favorite.product_id(), variant_id);
            }
        }
    }
}

/// Merges `incoming` into `existing`, starting from an empty record when there
/// is none.
#[must_use]
pub fn merge_favorites(
    existing: Option<FavoritesRecord>,
    incoming: &[FavoriteInput],
) -> FavoritesRecord {
    let mut record = existing.unwrap_or_default();
    record.merge(incoming);
    record
}

/// Parses the `favorites` array of a sync request.
///
/// Each entry is either a bare id (`"7001"` or `7001`), which becomes
/// [`FavoriteInput::ProductOnly`], or an object with `productId` and an
/// optional `variantId`.
///
/// # Errors
///
/// [`FavoritesParseError::NotAnArray`] when `value` is not an array, and
/// [`FavoritesParseError::InvalidEntry`] for the first entry that has neither
/// shape.
pub fn parse_favorites(value: &Value) -> Result<Vec<FavoriteInput>, FavoritesParseError> {
    let Value::Array(entries) = value else {
        return Err(FavoritesParseError::NotAnArray);
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_entry(entry)
                .map_err(|reason| FavoritesParseError::InvalidEntry { index, reason })
        })
        .collect()
}

fn parse_entry(entry: &Value) -> Result<FavoriteInput, String> {
    match entry {
        Value::String(_) | Value::Number(_) => normalize_id(entry)
            .map(|product_id| FavoriteInput::ProductOnly { product_id })
            .ok_or_else(|| "product id must be a non-empty string or integer".to_string()),
        Value::Object(fields) => {
            let product_id = fields
                .get("productId")
                .and_then(normalize_id)
                .ok_or_else(|| "productId must be a non-empty string or integer".to_string())?;

            match fields.get("variantId") {
                None | Some(Value::Null) => Ok(FavoriteInput::ProductOnly { product_id }),
                Some(Value::String(s)) if s.trim().is_empty() => {
                    Ok(FavoriteInput::ProductOnly { product_id })
                }
                Some(raw) => normalize_id(raw)
                    .map(|variant_id| FavoriteInput::ProductVariant {
                        product_id,
                        variant_id,
                    })
                    .ok_or_else(|| "variantId must be a string or integer".to_string()),
            }
        }
        _ => Err("expected a product id or an object with productId".to_string()),
    }
}

/// String-normalizes an identifier: trimmed non-empty strings and JSON numbers.
#[must_use]
pub fn normalize_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => number_id(n),
        _ => None,
    }
}

/// Integers as-is; whole floats (`7001.0`) as their integer text; anything
/// fractional is not an id.
fn number_id(n: &serde_json::Number) -> Option<String> {
    if n.is_i64() || n.is_u64() {
        return Some(n.to_string());
    }
    let f = n.as_f64()?;
    (f.is_finite() && f.fract().abs() < f64::EPSILON).then(|| format!("{f:.0}"))
}

fn variant_list(value: Value) -> Vec<String> {
    let items = match value {
        Value::Array(items) => items,
        single @ (Value::String(_) | Value::Number(_)) => vec![single],
        _ => return Vec::new(),
    };
    let mut variants: Vec<String> = Vec::with_capacity(items.len());
    for id in items.iter().filter_map(normalize_id) {
        if !variants.contains(&id) {
            variants.push(id);
        }
    }
    variants
}

#[cfg(test)]
#[path = "favorites_test.rs"]
mod tests;
