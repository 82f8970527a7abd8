//! Cart store: the single owner of the user's cart lines.

mod service;

pub use service::CartService;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::api::{ApiError, MockStorefrontApi};
    use crate::clients::CartClient;
    use crate::domain::{CartLine, Product};
    use crate::error::CartError;
    use crate::storage::{LocalStorage, MemoryStorage, CART_KEY};

    fn product(id: u64, price: &str) -> Product {
        Product::new(id, format!("Product {id}"), price.parse().unwrap(), 20)
    }

    fn start(storage: Arc<MemoryStorage>, api: MockStorefrontApi) -> CartClient {
        let (service, client) = CartService::new(10, storage, Arc::new(api));
        tokio::spawn(service.run());
        client
    }

    #[tokio::test]
    async fn repeated_adds_aggregate_into_one_line() -> TestResult {
        let client = start(Arc::new(MemoryStorage::new()), MockStorefrontApi::new());

        for quantity in [1, 2, 4] {
            client.add_item(product(1, "3.00"), quantity).await?;
        }
        client.add_item(product(2, "1.00"), 1).await?;

        let lines = client.lines().await?;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, 1);
        assert_eq!(lines[0].quantity, 7);
        assert_eq!(lines[1].product_id, 2);
        assert_eq!(client.line_count().await?, 2);

        client.shutdown().await?;
        Ok(())
    }

    #[tokio::test]
    async fn remove_then_add_starts_a_fresh_line() -> TestResult {
        let client = start(Arc::new(MemoryStorage::new()), MockStorefrontApi::new());

        client.add_item(product(1, "3.00"), 5).await?;
        client.remove_item(1).await?;
        client.add_item(product(1, "3.00"), 2).await?;

        let lines = client.lines().await?;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn removing_unknown_product_is_a_no_op() -> TestResult {
        let client = start(Arc::new(MemoryStorage::new()), MockStorefrontApi::new());

        client.add_item(product(1, "3.00"), 1).await?;
        client.remove_item(42).await?;

        assert_eq!(client.lines().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn product_without_id_is_ignored() -> TestResult {
        let client = start(Arc::new(MemoryStorage::new()), MockStorefrontApi::new());

        let mut nameless = product(1, "3.00");
        nameless.id = None;
        client.add_item(nameless, 3).await?;

        assert!(client.lines().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() -> TestResult {
        let client = start(Arc::new(MemoryStorage::new()), MockStorefrontApi::new());

        let result = client.add_item(product(1, "3.00"), 0).await;

        assert!(matches!(result, Err(CartError::InvalidQuantity(0))));
        assert!(client.lines().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn set_quantity_overwrites_or_removes() -> TestResult {
        let client = start(Arc::new(MemoryStorage::new()), MockStorefrontApi::new());

        client.add_item(product(1, "3.00"), 1).await?;
        client.add_item(product(2, "3.00"), 1).await?;
        client.set_quantity(1, 9).await?;
        client.set_quantity(2, 0).await?;

        let lines = client.lines().await?;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 9);
        Ok(())
    }

    #[tokio::test]
    async fn every_mutation_is_persisted_and_restored_on_start() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());
        let client = start(Arc::clone(&storage), MockStorefrontApi::new());

        client.add_item(product(1, "$10.00"), 2).await?;
        client.add_item(product(2, "$5.00"), 3).await?;
        let before = client.lines().await?;
        client.shutdown().await?;

        let persisted = storage.get_item(CART_KEY).await?.unwrap_or_default();
        let decoded: Vec<CartLine> = serde_json::from_str(&persisted)?;
        assert_eq!(decoded, before);

        let restarted = start(Arc::clone(&storage), MockStorefrontApi::new());
        assert_eq!(restarted.lines().await?, before);
        assert_eq!(restarted.total().await?, Decimal::new(3500, 2));

        restarted.remove_all().await?;
        assert_eq!(storage.get_item(CART_KEY).await?.as_deref(), Some("[]"));
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_persisted_cart_starts_empty() -> TestResult {
        let storage = Arc::new(MemoryStorage::with_items([(CART_KEY, "{not json")]));
        let client = start(storage, MockStorefrontApi::new());

        assert!(client.lines().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn persisted_duplicates_are_merged_on_restore() -> TestResult {
        let storage = Arc::new(MemoryStorage::with_items([(
            CART_KEY,
            r#"[{"id": 1, "quantity": 2}, {"id": 1, "quantity": 3}]"#,
        )]));
        let client = start(storage, MockStorefrontApi::new());

        let lines = client.lines().await?;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
        Ok(())
    }

    #[tokio::test]
    async fn persistence_failure_does_not_fail_mutation() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());
        storage.fail_writes(true);
        let client = start(Arc::clone(&storage), MockStorefrontApi::new());

        client.add_item(product(1, "3.00"), 1).await?;

        assert_eq!(client.lines().await?.len(), 1);
        assert_eq!(storage.get_item(CART_KEY).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn stock_update_patches_remaining_stock_without_touching_cart() -> TestResult {
        let mut api = MockStorefrontApi::new();
        api.expect_update_stock()
            .once()
            .withf(|token, id, patch| token == "tok" && *id == 1 && patch.stock == 17)
            .returning(|_, _, _| Ok(()));

        let client = start(Arc::new(MemoryStorage::new()), api);
        client.add_item(product(1, "3.00"), 3).await?;
        let snapshot = client.lines().await?.remove(0);

        client
            .update_stock_after_checkout("tok".to_string(), 1, 3, snapshot)
            .await?;

        assert_eq!(client.lines().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn stock_update_failure_is_reported_to_caller() -> TestResult {
        let mut api = MockStorefrontApi::new();
        api.expect_update_stock().once().returning(|_, _, _| {
            Err(ApiError::Decode("boom".to_string()))
        });

        let client = start(Arc::new(MemoryStorage::new()), api);
        client.add_item(product(4, "3.00"), 30).await?;
        let snapshot = client.lines().await?.remove(0);

        let result = client
            .update_stock_after_checkout("tok".to_string(), 4, 30, snapshot)
            .await;

        assert!(matches!(result, Err(CartError::StockUpdate { product_id: 4, .. })));
        Ok(())
    }
}
