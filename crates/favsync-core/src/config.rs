use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the real environment so tests can
/// drive them with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    // Blank values count as unset; a `.env` line like `API_SECRET_KEY=` should
    // not turn into an empty shared secret.
    let non_blank = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let require = |var: &str| -> Result<String, ConfigError> {
        non_blank(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default =
        |var: &str, default: &str| -> String { non_blank(var).unwrap_or_else(|| default.to_string()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let shopify_shop = normalize_shop_domain(&require("SHOPIFY_SHOP")?);
    if shopify_shop.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPIFY_SHOP".to_string(),
            reason: "shop domain is empty after removing scheme".to_string(),
        });
    }
    let shopify_access_token = require("SHOPIFY_ADMIN_API_ACCESS_TOKEN")?;

    let env = parse_environment(&or_default("FAVSYNC_ENV", "development"))?;

    // FAVSYNC_BIND_ADDR wins; otherwise honour the conventional PORT variable.
    let default_bind = format!("0.0.0.0:{}", or_default("PORT", "3000"));
    let bind_raw = or_default("FAVSYNC_BIND_ADDR", &default_bind);
    let bind_var = if non_blank("FAVSYNC_BIND_ADDR").is_some() {
        "FAVSYNC_BIND_ADDR"
    } else {
        "PORT"
    };
    let bind_addr = bind_raw
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: bind_var.to_string(),
            reason: e.to_string(),
        })?;

    let log_level = or_default("FAVSYNC_LOG_LEVEL", "info");
    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2024-10");
    let shopify_timeout_secs = parse_u64("FAVSYNC_SHOPIFY_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("FAVSYNC_USER_AGENT", "favsync/0.1 (customer-favorites)");
    let api_secret_key = non_blank("API_SECRET_KEY");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        shopify_shop,
        shopify_access_token,
        shopify_api_version,
        shopify_timeout_secs,
        user_agent,
        api_secret_key,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FAVSYNC_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

/// Reduces a configured shop to its bare host.
///
/// `"https://my-store.myshopify.com/"` becomes `"my-store.myshopify.com"`.
#[must_use]
pub fn normalize_shop_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    without_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
