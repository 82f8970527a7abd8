use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::{CartClient, SessionClient};
use crate::api::{ApiError, StorefrontApi};
use crate::domain::{cart_total, CartLine, NewOrder, ProcurementStatus};
use crate::error::OrderError;

/// Outcome of a successful bulk checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub submitted: usize,
    pub total: Decimal,
}

/// Orchestrates order submission across the cart store and the backend.
///
/// Each cart line becomes one order request. A line leaves the cart only
/// after the backend accepted its order; the stock decrement that follows is
/// best-effort.
#[derive(Clone)]
pub struct OrderClient {
    cart: CartClient,
    session: SessionClient,
    api: Arc<dyn StorefrontApi>,
}

impl OrderClient {
    pub fn new(cart: CartClient, session: SessionClient, api: Arc<dyn StorefrontApi>) -> Self {
        Self { cart, session, api }
    }

    #[instrument(fields(product_id = %line.product_id, quantity = %line.quantity), skip(self, line))]
    pub async fn submit_single(&self, line: CartLine) -> Result<(), OrderError> {
        let session = self.session.require().await?;
        Ok(self.submit_line(&session.token, line).await?)
    }

    /// Submit every cart line in order. Stops at the first rejected line;
    /// lines already accepted stay submitted and out of the cart.
    #[instrument(skip(self))]
    pub async fn submit_all(&self) -> Result<CheckoutReceipt, OrderError> {
        let lines = self.cart.lines().await?;
        if lines.is_empty() {
            warn!("Checkout attempted with an empty cart");
            return Err(OrderError::EmptyCart);
        }

        let session = self.session.require().await?;
        let total = cart_total(&lines);
        info!(line_count = lines.len(), %total, "Submitting cart");

        let mut submitted = 0;
        for line in lines {
            match self.submit_line(&session.token, line).await {
                Ok(()) => submitted += 1,
                Err(source) => return Err(OrderError::PartialCheckout { submitted, source }),
            }
        }

        info!(submitted, %total, "Checkout complete");
        Ok(CheckoutReceipt { submitted, total })
    }

    /// Only the order request itself can fail a line. Once the backend
    /// accepted it, cart and stock bookkeeping problems are logged.
    async fn submit_line(&self, token: &str, line: CartLine) -> Result<(), ApiError> {
        let order = NewOrder {
            product_id: line.product_id,
            quantity: line.quantity,
            total_price: line.line_total(),
            status: ProcurementStatus::Pending,
        };
        debug!(?order, "Sending order request");

        if let Err(e) = self.api.create_order(token, order).await {
            error!(product_id = line.product_id, error = %e, "Order submission failed");
            return Err(e);
        }
        info!(product_id = line.product_id, "Order submitted");

        if let Err(e) = self.cart.remove_item(line.product_id).await {
            warn!(product_id = line.product_id, error = %e, "Order accepted but line stayed in the cart");
        }

        let (product_id, quantity) = (line.product_id, line.quantity);
        if let Err(e) = self
            .cart
            .update_stock_after_checkout(token.to_string(), product_id, quantity, line)
            .await
        {
            warn!(product_id, error = %e, "Stock was not decremented after checkout");
        }

        Ok(())
    }
}
