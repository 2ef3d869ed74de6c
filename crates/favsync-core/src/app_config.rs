use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Whether internal error details may be echoed back to HTTP clients.
    #[must_use]
    pub fn exposes_error_details(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Shop domain without scheme, e.g. `my-store.myshopify.com`.
    pub shopify_shop: String,
    pub shopify_access_token: String,
    pub shopify_api_version: String,
    pub shopify_timeout_secs: u64,
    pub user_agent: String,
    /// Shared secret expected in the `x-api-key` header. `None` means every
    /// protected request is answered with a server configuration error.
    pub api_secret_key: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("shopify_shop", &self.shopify_shop)
            .field("shopify_access_token", &"[redacted]")
            .field("shopify_api_version", &self.shopify_api_version)
            .field("shopify_timeout_secs", &self.shopify_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field(
                "api_secret_key",
                &self.api_secret_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
