use std::sync::Arc;

use tracing::{debug, instrument};

use super::SessionClient;
use crate::api::StorefrontApi;
use crate::domain::{DisplayStatus, Order};
use crate::error::CatalogError;

/// Read-only view over the backend's order records.
#[derive(Clone)]
pub struct HistoryClient {
    session: SessionClient,
    api: Arc<dyn StorefrontApi>,
}

impl HistoryClient {
    pub fn new(session: SessionClient, api: Arc<dyn StorefrontApi>) -> Self {
        Self { session, api }
    }

    #[instrument(skip(self))]
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, CatalogError> {
        let session = self.session.require().await?;
        let orders = self.api.list_orders(&session.token).await?;
        debug!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }
}

/// Orders grouped by how they are shown to the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBoard {
    pub pending: Vec<Order>,
    pub reviewed: Vec<Order>,
    pub approved: Vec<Order>,
    pub declined: Vec<Order>,
}

impl OrderBoard {
    pub fn partition(orders: impl IntoIterator<Item = Order>) -> Self {
        let mut board = Self::default();
        for order in orders {
            match order.display_status() {
                DisplayStatus::Pending => board.pending.push(order),
                DisplayStatus::Reviewed => board.reviewed.push(order),
                DisplayStatus::Approved => board.approved.push(order),
                DisplayStatus::Declined => board.declined.push(order),
            }
        }
        board
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.reviewed.len() + self.approved.len() + self.declined.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Orders that were rejected or dispatched.
pub fn closed_orders(orders: &[Order]) -> Vec<Order> {
    orders.iter().filter(|order| order.is_closed()).cloned().collect()
}
