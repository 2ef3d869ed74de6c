pub mod client;
pub mod error;
pub mod store;
pub mod types;

pub use client::ShopifyAdminClient;
pub use error::ShopifyError;
pub use store::FavoritesBackend;
pub use types::{Metafield, FAVORITES_KEY, FAVORITES_NAMESPACE, FAVORITES_TYPE};
