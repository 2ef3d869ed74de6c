use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("Shopify rejected the access token (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("rate limited by Shopify (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid Admin API URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("access token contains characters that are not valid in an HTTP header")]
    InvalidAccessToken,
}
