//! HTTP client for the Shopify Admin REST API.

mod admin_url;
mod metafields;
mod products;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ShopifyError;

pub use admin_url::admin_base_url;

// `HeaderName::from_static` requires lowercase.
const ACCESS_TOKEN_HEADER: &str = "x-shopify-access-token";

/// Upstream error bodies are echoed into error messages; keep them short.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Authenticated client for the customer-metafield and product resources.
///
/// Every request carries the `X-Shopify-Access-Token` header. Non-2xx
/// responses become typed [`ShopifyError`]s; nothing is retried.
pub struct ShopifyAdminClient {
    client: Client,
    base_url: Url,
}

impl ShopifyAdminClient {
    /// Creates a client for `https://{shop}/admin/api/{api_version}/`.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::InvalidUrl`] if `shop` does not form a valid URL.
    /// - [`ShopifyError::InvalidAccessToken`] if the token is not a valid header value.
    /// - [`ShopifyError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        shop: &str,
        api_version: &str,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ShopifyError> {
        Self::with_base_url(
            &admin_base_url(shop, api_version),
            access_token,
            timeout_secs,
            user_agent,
        )
    }

    /// Creates a client rooted at an explicit base URL (wiremock in tests).
    ///
    /// # Errors
    ///
    /// Same as [`ShopifyAdminClient::new`].
    pub fn with_base_url(
        base_url: &str,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ShopifyError> {
        let mut token =
            HeaderValue::from_str(access_token).map_err(|_| ShopifyError::InvalidAccessToken)?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        // Exactly one trailing slash, so appended segments land under the
        // version directory instead of replacing it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ShopifyError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ShopifyError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self { client, base_url })
    }

    /// Builds `{base}/{segments...}`. Each segment is percent-encoded, so ids
    /// containing `/` or `..` cannot escape their resource path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ShopifyError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ShopifyError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends `request` and decodes a 2xx JSON body into `T`.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::RateLimited`] on 429.
    /// - [`ShopifyError::NotFound`] on 404.
    /// - [`ShopifyError::Unauthorized`] on 401/403.
    /// - [`ShopifyError::UnexpectedStatus`] on any other non-2xx.
    /// - [`ShopifyError::Http`] on network failure.
    /// - [`ShopifyError::Deserialize`] if the body does not match `T`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
        context: &str,
    ) -> Result<T, ShopifyError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            // Shopify sends fractional seconds ("2.0").
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().split('.').next()?.parse::<u64>().ok())
                .unwrap_or(2);
            return Err(ShopifyError::RateLimited { retry_after_secs });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ShopifyError::NotFound {
                url: url.path().to_owned(),
            });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ShopifyError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.path().to_owned(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ShopifyError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
