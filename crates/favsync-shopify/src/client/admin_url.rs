//! Admin API base URL construction.

/// Builds the versioned Admin REST root for a shop.
///
/// Given `"https://my-store.myshopify.com/"` and `"2024-10"`, returns
/// `"https://my-store.myshopify.com/admin/api/2024-10/"`. The shop may be
/// given with or without scheme; `http://` is upgraded to `https://` since the
/// Admin API only serves TLS.
#[must_use]
pub fn admin_base_url(shop: &str, api_version: &str) -> String {
    let trimmed = shop.trim();
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed)
        .trim_end_matches('/');
    format!("https://{host}/admin/api/{}/", api_version.trim_matches('/'))
}
