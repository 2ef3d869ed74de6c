use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("SHOPIFY_SHOP", "test-store.myshopify.com");
    m.insert("SHOPIFY_ADMIN_API_ACCESS_TOKEN", "shpat_test");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "FAVSYNC_ENV"));
}

#[test]
fn only_development_exposes_error_details() {
    assert!(Environment::Development.exposes_error_details());
    assert!(!Environment::Test.exposes_error_details());
    assert!(!Environment::Production.exposes_error_details());
}

#[test]
fn build_app_config_fails_without_shop() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPIFY_SHOP"),
        "expected MissingEnvVar(SHOPIFY_SHOP), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_access_token() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("SHOPIFY_SHOP", "test-store.myshopify.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPIFY_ADMIN_API_ACCESS_TOKEN"),
        "expected MissingEnvVar(SHOPIFY_ADMIN_API_ACCESS_TOKEN), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_token_as_missing() {
    let mut map = full_env();
    map.insert("SHOPIFY_ADMIN_API_ACCESS_TOKEN", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.shopify_shop, "test-store.myshopify.com");
    assert_eq!(cfg.shopify_access_token, "shpat_test");
    assert_eq!(cfg.shopify_api_version, "2024-10");
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.shopify_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "favsync/0.1 (customer-favorites)");
    assert!(cfg.api_secret_key.is_none());
}

#[test]
fn build_app_config_strips_scheme_from_shop() {
    let mut map = full_env();
    map.insert("SHOPIFY_SHOP", "https://test-store.myshopify.com/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.shopify_shop, "test-store.myshopify.com");
}

#[test]
fn build_app_config_rejects_shop_that_is_only_a_scheme() {
    let mut map = full_env();
    map.insert("SHOPIFY_SHOP", "https://");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPIFY_SHOP"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_port_when_bind_addr_absent() {
    let mut map = full_env();
    map.insert("PORT", "8080");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
}

#[test]
fn build_app_config_bind_addr_overrides_port() {
    let mut map = full_env();
    map.insert("PORT", "8080");
    map.insert("FAVSYNC_BIND_ADDR", "127.0.0.1:9000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:9000");
}

#[test]
fn build_app_config_fails_with_invalid_port() {
    let mut map = full_env();
    map.insert("PORT", "not-a-port");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PORT"),
        "expected InvalidEnvVar(PORT), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("FAVSYNC_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FAVSYNC_BIND_ADDR"),
        "expected InvalidEnvVar(FAVSYNC_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_timeout_override() {
    let mut map = full_env();
    map.insert("FAVSYNC_SHOPIFY_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.shopify_timeout_secs, 60);
}

#[test]
fn build_app_config_timeout_invalid() {
    let mut map = full_env();
    map.insert("FAVSYNC_SHOPIFY_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FAVSYNC_SHOPIFY_TIMEOUT_SECS"),
        "expected InvalidEnvVar(FAVSYNC_SHOPIFY_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_trims_api_secret() {
    let mut map = full_env();
    map.insert("API_SECRET_KEY", "  s3cret \n");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_secret_key.as_deref(), Some("s3cret"));
}

#[test]
fn build_app_config_blank_api_secret_is_none() {
    let mut map = full_env();
    map.insert("API_SECRET_KEY", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.api_secret_key.is_none());
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = full_env();
    map.insert("API_SECRET_KEY", "s3cret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("shpat_test"));
    assert!(!rendered.contains("s3cret"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn normalize_shop_domain_variants() {
    assert_eq!(normalize_shop_domain("shop.myshopify.com"), "shop.myshopify.com");
    assert_eq!(
        normalize_shop_domain("http://shop.myshopify.com"),
        "shop.myshopify.com"
    );
    assert_eq!(
        normalize_shop_domain(" https://shop.myshopify.com// "),
        "shop.myshopify.com"
    );
}
