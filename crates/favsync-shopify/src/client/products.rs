//! Product lookups used to resolve a favorite's variant.

use crate::error::ShopifyError;
use crate::types::ProductResponse;

use super::ShopifyAdminClient;

impl ShopifyAdminClient {
    /// Returns the id of the product's first variant.
    ///
    /// Only `id` and `variants` are requested. A missing product, a product
    /// without variants, or a first variant without an id all yield `Ok(None)`
    /// and a warning; callers treat that as "nothing to record".
    ///
    /// # Errors
    ///
    /// Any request failure other than 404.
    pub async fn first_variant_id(&self, product_id: &str) -> Result<Option<String>, ShopifyError> {
        let file = format!("{product_id}.json");
        let mut url = self.endpoint(&["products", &file])?;
        url.query_pairs_mut().append_pair("fields", "id,variants");

        let response: ProductResponse = match self
            .send_json(
                self.client.get(url.clone()),
                &url,
                &format!("product {product_id}"),
            )
            .await
        {
            Ok(response) => response,
            Err(ShopifyError::NotFound { .. }) => {
                tracing::warn!(product_id, "product not found");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let Some(product) = response.product else {
            tracing::warn!(product_id, "product missing from response");
            return Ok(None);
        };

        let Some(first) = product.variants.first() else {
            tracing::warn!(product_id, "no variants found for product");
            return Ok(None);
        };

        let Some(variant_id) = first.id else {
            tracing::warn!(product_id, "first variant has no id");
            return Ok(None);
        };

        tracing::debug!(product_id, variant_id, "resolved first variant");
        Ok(Some(variant_id.to_string()))
    }
}
