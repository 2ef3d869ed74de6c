//! The remote operations the favorites service needs, behind a trait so the
//! HTTP layer can be exercised against an in-memory double.

use async_trait::async_trait;

use crate::client::ShopifyAdminClient;
use crate::error::ShopifyError;
use crate::types::Metafield;

#[async_trait]
pub trait FavoritesBackend: Send + Sync {
    /// The customer's favorites metafield, or `None` if it was never written.
    async fn find_favorites(&self, customer_id: &str) -> Result<Option<Metafield>, ShopifyError>;

    async fn create_favorites(
        &self,
        customer_id: &str,
        value: &str,
    ) -> Result<Metafield, ShopifyError>;

    async fn update_favorites(
        &self,
        customer_id: &str,
        metafield_id: i64,
        value: &str,
    ) -> Result<Metafield, ShopifyError>;

    /// First variant of a product; `None` when the product or its variant is missing.
    async fn first_variant_id(&self, product_id: &str) -> Result<Option<String>, ShopifyError>;
}

#[async_trait]
impl FavoritesBackend for ShopifyAdminClient {
    async fn find_favorites(&self, customer_id: &str) -> Result<Option<Metafield>, ShopifyError> {
        self.find_customer_metafield(customer_id).await
    }

    async fn create_favorites(
        &self,
        customer_id: &str,
        value: &str,
    ) -> Result<Metafield, ShopifyError> {
        self.create_customer_metafield(customer_id, value).await
    }

    async fn update_favorites(
        &self,
        customer_id: &str,
        metafield_id: i64,
        value: &str,
    ) -> Result<Metafield, ShopifyError> {
        self.update_customer_metafield(customer_id, metafield_id, value)
            .await
    }

    async fn first_variant_id(&self, product_id: &str) -> Result<Option<String>, ShopifyError> {
        ShopifyAdminClient::first_variant_id(self, product_id).await
    }
}
