use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::SessionClient;
use crate::api::{ProductDraft, StorefrontApi};
use crate::domain::{Product, ProductId};
use crate::error::SupplierError;

/// Catalog management for supplier accounts.
///
/// The backend enforces write authorization; the owner filter in
/// [`SupplierClient::my_products`] only decides what is listed.
#[derive(Clone)]
pub struct SupplierClient {
    session: SessionClient,
    api: Arc<dyn StorefrontApi>,
}

impl SupplierClient {
    pub fn new(session: SessionClient, api: Arc<dyn StorefrontApi>) -> Self {
        Self { session, api }
    }

    #[instrument(skip(self))]
    pub async fn my_products(&self) -> Result<Vec<Product>, SupplierError> {
        let session = self.session.require().await?;
        let products = self.api.list_products(&session.token).await?;
        let mine = owned_by(&products, &session.username);
        debug!(total = products.len(), owned = mine.len(), "Filtered supplier products");
        Ok(mine)
    }

    #[instrument(fields(title = %draft.title), skip(self, draft))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, SupplierError> {
        draft.validate()?;
        let session = self.session.require().await?;
        let product = self.api.create_product(&session.token, draft).await?;
        info!(product_id = ?product.id, "Product created");
        Ok(product)
    }

    #[instrument(fields(title = %draft.title), skip(self, draft))]
    pub async fn update_product(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, SupplierError> {
        draft.validate()?;
        let session = self.session.require().await?;
        let product = self.api.update_product(&session.token, id, draft).await?;
        info!("Product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), SupplierError> {
        let session = self.session.require().await?;
        self.api.delete_product(&session.token, id).await?;
        info!("Product deleted");
        Ok(())
    }
}

/// Products whose supplier is `username`.
pub fn owned_by(products: &[Product], username: &str) -> Vec<Product> {
    products
        .iter()
        .filter(|product| product.owner() == Some(username))
        .cloned()
        .collect()
}
