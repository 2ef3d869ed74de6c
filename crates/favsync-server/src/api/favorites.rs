//! `GET /api/favorites/{customer_id}`: current favorites of a customer.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use favsync_core::FavoritesRecord;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_shopify_error, ApiError, AppState};

const FETCH_FAILED: &str = "Failed to fetch favorites";

#[derive(Debug, Serialize)]
pub(super) struct FavoritesResponse {
    success: bool,
    /// `null` when the customer has never synced.
    data: Option<FavoritesRecord>,
}

pub(super) async fn get_favorites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(customer_id): Path<String>,
) -> Result<Json<FavoritesResponse>, ApiError> {
    let rid = &req_id.0;
    let customer_id = customer_id.trim();
    if customer_id.is_empty() {
        return Err(ApiError::BadRequest("customerId must not be blank".to_owned()));
    }

    let metafield = state
        .backend
        .find_favorites(customer_id)
        .await
        .map_err(|e| map_shopify_error(rid, FETCH_FAILED, customer_id, &e))?;

    let data = metafield
        .map(|m| FavoritesRecord::from_metafield_value(&m.value))
        .transpose()
        .map_err(|e| {
            tracing::error!(
                request_id = %rid,
                customer_id,
                error = %e,
                "stored favorites are corrupt"
            );
            ApiError::Upstream {
                message: FETCH_FAILED,
                error: format!("stored favorites are not valid JSON: {e}"),
            }
        })?;

    Ok(Json(FavoritesResponse {
        success: true,
        data,
    }))
}
