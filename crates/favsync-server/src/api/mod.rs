mod favorites;
mod sync;

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use favsync_shopify::{FavoritesBackend, ShopifyError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, require_api_key, ApiKeyState, API_KEY_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn FavoritesBackend>,
    /// Echo internal error details to clients (development only).
    pub expose_error_details: bool,
}

/// Error envelope shared by every failing response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    /// Malformed request body.
    BadRequest(String),
    /// Missing or wrong `x-api-key`.
    Forbidden,
    /// No shared secret configured on the server.
    Misconfigured,
    NotFound(String),
    /// Shopify call failed; `message` names the operation, `error` carries the cause.
    Upstream { message: &'static str, error: String },
    Internal { detail: Option<String> },
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct PingData {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

impl ApiError {
    /// Internal failure whose detail is only kept when `expose` is set.
    pub fn internal(detail: impl Into<String>, expose: bool) -> Self {
        Self::Internal {
            detail: expose.then(|| detail.into()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Misconfigured | Self::Upstream { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn into_body(self) -> ErrorBody {
        let (message, error) = match self {
            Self::BadRequest(message) | Self::NotFound(message) => (message, None),
            Self::Forbidden => ("Forbidden: Invalid API key".to_owned(), None),
            Self::Misconfigured => ("Server configuration error".to_owned(), None),
            Self::Upstream { message, error } => (message.to_owned(), Some(error)),
            Self::Internal { detail } => ("Internal server error".to_owned(), detail),
        };
        ErrorBody {
            success: false,
            message,
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.into_body())).into_response()
    }
}

/// Maps a Shopify failure for `customer_id`. A 404 means the customer does not
/// exist; everything else is passed through as an upstream error.
pub(super) fn map_shopify_error(
    request_id: &str,
    message: &'static str,
    customer_id: &str,
    error: &ShopifyError,
) -> ApiError {
    if let ShopifyError::NotFound { .. } = error {
        tracing::warn!(request_id, customer_id, "customer not found");
        return ApiError::NotFound(format!("Customer {customer_id} not found"));
    }
    upstream_error(request_id, message, customer_id, error)
}

/// Any Shopify failure, 404 included, as an upstream error. Used where a 404
/// points at something other than the customer.
pub(super) fn upstream_error(
    request_id: &str,
    message: &'static str,
    customer_id: &str,
    error: &ShopifyError,
) -> ApiError {
    tracing::error!(request_id, customer_id, error = %error, "{message}");
    ApiError::Upstream {
        message,
        error: error.to_string(),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(API_KEY_HEADER),
            HeaderName::from_static("x-request-id"),
        ])
}

fn panic_response(
    expose: bool,
) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone + Send + Sync + 'static {
    move |panic| {
        let detail = panic
            .downcast_ref::<String>()
            .cloned()
            .or_else(|| panic.downcast_ref::<&str>().map(|s| (*s).to_owned()))
            .unwrap_or_else(|| "handler panicked".to_owned());
        tracing::error!(panic = %detail, "request handler panicked");
        ApiError::internal(detail, expose).into_response()
    }
}

fn protected_router(api_key: ApiKeyState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/favorites/{customer_id}",
            get(favorites::get_favorites),
        )
        .route("/api/sync-favorites", post(sync::sync_favorites))
        .layer(axum::middleware::from_fn_with_state(
            api_key,
            require_api_key,
        ))
}

pub fn build_app(state: AppState, api_key: ApiKeyState) -> Router {
    let public_routes = Router::new().route("/ping", get(ping));
    let expose = state.expose_error_details;

    Router::new()
        .merge(public_routes)
        .merge(protected_router(api_key))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response(expose))),
        )
        .with_state(state)
}

async fn ping() -> impl IntoResponse {
    Json(PingData {
        status: "ok",
        timestamp: Utc::now(),
    })
}
