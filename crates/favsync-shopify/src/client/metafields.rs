//! Customer metafield reads and writes.

use crate::error::ShopifyError;
use crate::types::{
    Metafield, MetafieldEnvelope, MetafieldResponse, MetafieldWrite, MetafieldsResponse,
    FAVORITES_KEY, FAVORITES_NAMESPACE, FAVORITES_TYPE,
};

use super::ShopifyAdminClient;

impl ShopifyAdminClient {
    /// Fetches the customer's `cad.customer_products` metafield, if any.
    ///
    /// The request filters by namespace and key server-side; the response is
    /// filtered again because older API versions ignore those parameters.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::NotFound`] if the customer does not exist.
    /// - Any other error from the underlying request.
    pub async fn find_customer_metafield(
        &self,
        customer_id: &str,
    ) -> Result<Option<Metafield>, ShopifyError> {
        let mut url = self.endpoint(&["customers", customer_id, "metafields.json"])?;
        url.query_pairs_mut()
            .append_pair("namespace", FAVORITES_NAMESPACE)
            .append_pair("key", FAVORITES_KEY);

        let response: MetafieldsResponse = self
            .send_json(
                self.client.get(url.clone()),
                &url,
                &format!("metafields of customer {customer_id}"),
            )
            .await?;

        Ok(response.metafields.into_iter().find(Metafield::is_favorites))
    }

    /// Creates the favorites metafield on a customer.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::NotFound`] if the customer does not exist.
    /// - [`ShopifyError::UnexpectedStatus`] if Shopify rejects the payload (422).
    /// - Any other error from the underlying request.
    pub async fn create_customer_metafield(
        &self,
        customer_id: &str,
        value: &str,
    ) -> Result<Metafield, ShopifyError> {
        let url = self.endpoint(&["customers", customer_id, "metafields.json"])?;
        let body = MetafieldEnvelope {
            metafield: MetafieldWrite {
                id: None,
                namespace: FAVORITES_NAMESPACE,
                key: FAVORITES_KEY,
                value_type: FAVORITES_TYPE,
                value,
            },
        };

        let response: MetafieldResponse = self
            .send_json(
                self.client.post(url.clone()).json(&body),
                &url,
                &format!("created metafield of customer {customer_id}"),
            )
            .await?;

        tracing::info!(
            customer_id,
            metafield_id = response.metafield.id,
            "created favorites metafield"
        );
        Ok(response.metafield)
    }

    /// Replaces the value of an existing favorites metafield.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::NotFound`] if the customer or metafield is gone.
    /// - Any other error from the underlying request.
    pub async fn update_customer_metafield(
        &self,
        customer_id: &str,
        metafield_id: i64,
        value: &str,
    ) -> Result<Metafield, ShopifyError> {
        let file = format!("{metafield_id}.json");
        let url = self.endpoint(&["customers", customer_id, "metafields", &file])?;
        let body = MetafieldEnvelope {
            metafield: MetafieldWrite {
                id: Some(metafield_id),
                namespace: FAVORITES_NAMESPACE,
                key: FAVORITES_KEY,
                value_type: FAVORITES_TYPE,
                value,
            },
        };

        let response: MetafieldResponse = self
            .send_json(
                self.client.put(url.clone()).json(&body),
                &url,
                &format!("updated metafield {metafield_id} of customer {customer_id}"),
            )
            .await?;

        tracing::info!(customer_id, metafield_id, "updated favorites metafield");
        Ok(response.metafield)
    }
}
