use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::SessionClient;
use crate::api::{ApiError, StorefrontApi};
use crate::domain::{CategoryRef, Product};
use crate::error::CatalogError;

/// Categories offered when the backend cannot list its own.
pub const FALLBACK_CATEGORIES: [(u64, &str); 3] = [(1, "Electronics"), (2, "Clothing"), (3, "Food")];

#[derive(Clone)]
pub struct CatalogClient {
    session: SessionClient,
    api: Arc<dyn StorefrontApi>,
}

impl CatalogClient {
    pub fn new(session: SessionClient, api: Arc<dyn StorefrontApi>) -> Self {
        Self { session, api }
    }

    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let session = self.session.require().await?;
        let products = self.api.list_products(&session.token).await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Backend categories, or [`FALLBACK_CATEGORIES`] when the backend answers
    /// with an error status. Network failures are returned as errors.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<CategoryRef>, CatalogError> {
        let session = self.session.require().await?;
        match self.api.list_categories(&session.token).await {
            Ok(categories) => Ok(categories),
            Err(ApiError::Status { status, .. }) => {
                warn!(%status, "Category list unavailable, using defaults");
                Ok(FALLBACK_CATEGORIES
                    .iter()
                    .map(|(id, name)| CategoryRef {
                        id: *id,
                        name: name.to_string(),
                    })
                    .collect())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Case-insensitive title search. A blank query keeps every product.
pub fn filter_products(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }

    products
        .iter()
        .filter(|product| match &product.title {
            Some(title) => title.to_lowercase().contains(&needle),
            None => {
                debug!(product_id = ?product.id, "Skipping product without a title");
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(id: u64, title: &str) -> Product {
        Product::new(id, title, "1.00".parse().unwrap(), 1)
    }

    #[test]
    fn filter_matches_substrings_case_insensitively() {
        let products = vec![titled(1, "Blue Pen"), titled(2, "Notebook"), titled(3, "pencil case")];

        let found = filter_products(&products, "  PEN ");

        let ids: Vec<_> = found.iter().filter_map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn blank_query_returns_everything_and_untitled_never_match() {
        let mut untitled = titled(4, "x");
        untitled.title = None;
        let products = vec![titled(1, "Blue Pen"), untitled];

        assert_eq!(filter_products(&products, "").len(), 2);
        assert!(filter_products(&products, "x").is_empty());
    }
}
