use super::*;

fn client(base: &str) -> ShopifyAdminClient {
    ShopifyAdminClient::with_base_url(base, "shpat_test", 5, "favsync-test/0.1").unwrap()
}

#[test]
fn admin_base_url_bare_domain() {
    assert_eq!(
        admin_base_url("shop.myshopify.com", "2024-10"),
        "https://shop.myshopify.com/admin/api/2024-10/"
    );
}

#[test]
fn admin_base_url_strips_scheme_and_trailing_slash() {
    assert_eq!(
        admin_base_url("http://shop.myshopify.com/", "2024-10"),
        "https://shop.myshopify.com/admin/api/2024-10/"
    );
}

#[test]
fn endpoint_appends_segments_under_version() {
    let c = client("https://shop.myshopify.com/admin/api/2024-10");
    let url = c
        .endpoint(&["customers", "42", "metafields.json"])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://shop.myshopify.com/admin/api/2024-10/customers/42/metafields.json"
    );
}

#[test]
fn endpoint_encodes_path_separators_in_ids() {
    let c = client("https://shop.myshopify.com/admin/api/2024-10/");
    let url = c.endpoint(&["products", "../orders/1.json"]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://shop.myshopify.com/admin/api/2024-10/products/..%2Forders%2F1.json"
    );
}

#[test]
fn with_base_url_rejects_garbage() {
    let result = ShopifyAdminClient::with_base_url("not a url", "shpat_test", 5, "ua");
    assert!(
        matches!(result, Err(ShopifyError::InvalidUrl { .. })),
        "expected InvalidUrl"
    );
}

#[test]
fn with_base_url_rejects_token_with_newline() {
    let result = ShopifyAdminClient::with_base_url(
        "https://shop.myshopify.com/admin/api/2024-10/",
        "bad\ntoken",
        5,
        "ua",
    );
    assert!(matches!(result, Err(ShopifyError::InvalidAccessToken)));
}
