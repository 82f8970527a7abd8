use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{CartLine, Product, ProductId};
use crate::error::CartError;
use crate::messages::CartRequest;

/// Handle to the [`CartService`](crate::cart_actor::CartService) mailbox.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    /// Reduce the backend stock of `product_id` by `quantity`, based on the
    /// stock recorded in `snapshot`. Does not change the cart.
    #[instrument(skip(self, token, snapshot))]
    pub async fn update_stock_after_checkout(
        &self,
        token: String,
        product_id: ProductId,
        quantity: u32,
        snapshot: CartLine,
    ) -> Result<(), CartError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::UpdateStock {
                token,
                product_id,
                quantity,
                snapshot,
                respond_to,
            })
            .await
            .map_err(|_| CartError::ActorCommunicationError("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| CartError::ActorCommunicationError("Actor dropped".to_string()))?
    }

    /// Number of distinct products in the cart.
    pub async fn line_count(&self) -> Result<usize, CartError> {
        Ok(self.lines().await?.len())
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown request");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|e| CartError::ActorCommunicationError(e.to_string()))?;
        Ok(())
    }
}

client_method!(CartClient => fn add_item(product: Product, quantity: u32) -> () as CartRequest::AddItem, Error = CartError);
client_method!(CartClient => fn remove_item(product_id: ProductId) -> () as CartRequest::RemoveItem, Error = CartError);
client_method!(CartClient => fn remove_all() -> () as CartRequest::RemoveAll, Error = CartError);
client_method!(CartClient => fn set_quantity(product_id: ProductId, quantity: u32) -> () as CartRequest::SetQuantity, Error = CartError);
client_method!(CartClient => fn lines() -> Vec<CartLine> as CartRequest::Lines, Error = CartError);
client_method!(CartClient => fn total() -> Decimal as CartRequest::Total, Error = CartError);
