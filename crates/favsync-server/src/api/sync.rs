//! `POST /api/sync-favorites`: merges a batch of favorites into the
//! customer's metafield.
//!
//! Steps: validate → fetch current metafield → resolve variants for
//! product-only entries → merge → create or update → respond. The fetch and
//! write are not atomic; two concurrent syncs for one customer race and the
//! last write wins.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use favsync_core::{
    merge_favorites, normalize_id, parse_favorites, FavoriteInput, FavoritesRecord,
};
use favsync_shopify::{FavoritesBackend, Metafield};
use futures::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::middleware::RequestId;

use super::{map_shopify_error, upstream_error, ApiError, AppState};

const SYNC_FAILED: &str = "Failed to sync favorites";

/// Product lookups in flight at once for one request.
const MAX_CONCURRENT_LOOKUPS: usize = 4;

// Fields stay untyped so a wrong shape is reported as a validation message
// instead of a serde rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SyncFavoritesRequest {
    #[serde(default)]
    customer_id: Option<Value>,
    #[serde(default)]
    favorites: Option<Value>,
}

#[derive(Debug, Serialize)]
pub(super) struct SyncFavoritesResponse {
    success: bool,
    message: &'static str,
    updated: Metafield,
}

pub(super) async fn sync_favorites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<SyncFavoritesRequest>, JsonRejection>,
) -> Result<Json<SyncFavoritesResponse>, ApiError> {
    let rid = &req_id.0;
    let Json(body) = payload.map_err(|rejection| {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    let (customer_id, favorites) = validate(&body)?;

    let backend = state.backend.as_ref();

    let existing = backend
        .find_favorites(&customer_id)
        .await
        .map_err(|e| map_shopify_error(rid, SYNC_FAILED, &customer_id, &e))?;

    let existing_record = existing
        .as_ref()
        .map(|m| FavoritesRecord::from_metafield_value(&m.value))
        .transpose()
        .map_err(|e| {
            tracing::error!(
                request_id = %rid,
                customer_id = %customer_id,
                error = %e,
                "stored favorites are corrupt"
            );
            ApiError::Upstream {
                message: SYNC_FAILED,
                error: format!("stored favorites are not valid JSON: {e}"),
            }
        })?;

    let requested = favorites.len();
    let resolved = resolve_variants(backend, favorites).await;
    tracing::debug!(
        request_id = %rid,
        customer_id = %customer_id,
        requested,
        resolved = resolved.len(),
        "resolved favorites"
    );

    let merged = merge_favorites(existing_record, &resolved);
    let value = merged
        .to_metafield_value()
        .map_err(|e| ApiError::internal(e.to_string(), state.expose_error_details))?;

    // A 404 on update means the metafield vanished after the read, not that
    // the customer is unknown.
    let updated = match existing {
        Some(metafield) => backend
            .update_favorites(&customer_id, metafield.id, &value)
            .await
            .map_err(|e| upstream_error(rid, SYNC_FAILED, &customer_id, &e))?,
        None => backend
            .create_favorites(&customer_id, &value)
            .await
            .map_err(|e| map_shopify_error(rid, SYNC_FAILED, &customer_id, &e))?,
    };

    tracing::info!(
        request_id = %rid,
        customer_id = %customer_id,
        metafield_id = updated.id,
        products = merged.saved.len(),
        "favorites synced"
    );

    Ok(Json(SyncFavoritesResponse {
        success: true,
        message: "Favorites synced successfully",
        updated,
    }))
}

fn validate(body: &SyncFavoritesRequest) -> Result<(String, Vec<FavoriteInput>), ApiError> {
    let customer_id = body.customer_id.as_ref().and_then(normalize_id);
    let (Some(customer_id), Some(favorites)) = (customer_id, body.favorites.as_ref()) else {
        return Err(ApiError::BadRequest(
            "Missing required fields: customerId and favorites".to_owned(),
        ));
    };

    let favorites = parse_favorites(favorites)
        .map_err(|e| ApiError::BadRequest(format!("Invalid favorites: {e}")))?;

    Ok((customer_id, favorites))
}

/// Replaces product-only entries with their first variant.
///
/// Products that cannot be resolved are logged and dropped; one bad product
/// never fails the batch. Output keeps input order.
async fn resolve_variants(
    backend: &dyn FavoritesBackend,
    favorites: Vec<FavoriteInput>,
) -> Vec<FavoriteInput> {
    stream::iter(favorites)
        .map(|favorite| async move {
            let FavoriteInput::ProductOnly { product_id } = favorite else {
                return Some(favorite);
            };
            match backend.first_variant_id(&product_id).await {
                Ok(Some(variant_id)) => Some(FavoriteInput::ProductVariant {
                    product_id,
                    variant_id,
                }),
                Ok(None) => {
                    tracing::warn!(product_id = %product_id, "skipping favorite: no variant found");
                    None
                }
                Err(e) => {
                    tracing::error!(
                        product_id = %product_id,
                        error = %e,
                        "skipping favorite: product lookup failed"
                    );
                    None
                }
            }
        })
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .filter_map(std::future::ready)
        .collect()
        .await
}
