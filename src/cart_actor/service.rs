use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::api::{StockPatch, StorefrontApi};
use crate::clients::CartClient;
use crate::domain::{cart_total, CartLine, Product, ProductId};
use crate::error::CartError;
use crate::messages::{CartRequest, ServiceResponse};
use crate::storage::{LocalStorage, CART_KEY};

/// Macro for clean error response handling
macro_rules! send_error {
    ($respond_to:expr, $error:expr) => {{
        let _ = $respond_to.send(Err($error));
        return;
    }};
}

/// Owner of every cart line for the lifetime of the process.
///
/// All mutations arrive through the mailbox and are applied one at a time, so
/// there is exactly one writer. After each mutation the whole cart is written
/// to local storage; a failed write is logged and otherwise ignored.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    lines: Vec<CartLine>,
    storage: Arc<dyn LocalStorage>,
    api: Arc<dyn StorefrontApi>,
}

impl CartService {
    pub fn new(
        buffer_size: usize,
        storage: Arc<dyn LocalStorage>,
        api: Arc<dyn StorefrontApi>,
    ) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            lines: Vec::new(),
            storage,
            api,
        };
        let client = CartClient::new(sender);
        (service, client)
    }

    /// Main actor loop. Persisted lines are restored before the first message
    /// is read, so no operation ever observes a half-loaded cart.
    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!("CartService starting");

        self.restore().await;

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddItem {
                    product,
                    quantity,
                    respond_to,
                } => {
                    self.handle_add_item(product, quantity, respond_to).await;
                }
                CartRequest::RemoveItem {
                    product_id,
                    respond_to,
                } => {
                    self.handle_remove_item(product_id, respond_to).await;
                }
                CartRequest::RemoveAll { respond_to } => {
                    self.handle_remove_all(respond_to).await;
                }
                CartRequest::SetQuantity {
                    product_id,
                    quantity,
                    respond_to,
                } => {
                    self.handle_set_quantity(product_id, quantity, respond_to)
                        .await;
                }
                CartRequest::UpdateStock {
                    token,
                    product_id,
                    quantity,
                    snapshot,
                    respond_to,
                } => {
                    self.handle_update_stock(token, product_id, quantity, snapshot, respond_to);
                }
                CartRequest::Lines { respond_to } => {
                    let _ = respond_to.send(Ok(self.lines.clone()));
                }
                CartRequest::Total { respond_to } => {
                    let _ = respond_to.send(Ok(cart_total(&self.lines)));
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }

        info!("CartService stopped");
    }

    #[instrument(skip(self))]
    async fn restore(&mut self) {
        let raw = match self.storage.get_item(CART_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No persisted cart");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart, starting empty");
                return;
            }
        };

        match serde_json::from_str::<Vec<CartLine>>(&raw) {
            Ok(lines) => {
                for line in lines {
                    merge_line(&mut self.lines, line);
                }
                info!(line_count = self.lines.len(), "Restored persisted cart");
            }
            Err(e) => warn!(error = %e, "Persisted cart is corrupt, starting empty"),
        }
    }

    async fn persist(&self) {
        let serialized = match serde_json::to_string(&self.lines) {
            Ok(serialized) => serialized,
            Err(e) => {
                error!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        match self.storage.set_item(CART_KEY, serialized).await {
            Ok(()) => debug!(line_count = self.lines.len(), "Cart persisted"),
            Err(e) => warn!(error = %e, "Failed to persist cart"),
        }
    }

    #[instrument(fields(product_id = ?product.id, quantity = %quantity), skip(self, product, respond_to))]
    async fn handle_add_item(
        &mut self,
        product: Product,
        quantity: u32,
        respond_to: ServiceResponse<(), CartError>,
    ) {
        debug!("Processing add_item request");

        if quantity == 0 {
            error!("Validation failed: zero quantity");
            send_error!(respond_to, CartError::InvalidQuantity(quantity));
        }

        match CartLine::from_product(&product, quantity) {
            Some(line) => {
                merge_line(&mut self.lines, line);
                info!(line_count = self.lines.len(), "Item added to cart");
                self.persist().await;
            }
            None => warn!(title = %product.display_title(), "Ignoring product without an id"),
        }

        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    async fn handle_remove_item(
        &mut self,
        product_id: ProductId,
        respond_to: ServiceResponse<(), CartError>,
    ) {
        debug!("Processing remove_item request");

        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);

        if self.lines.len() < before {
            info!("Item removed from cart");
        } else {
            debug!("Item not in cart");
        }
        self.persist().await;

        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_remove_all(&mut self, respond_to: ServiceResponse<(), CartError>) {
        debug!("Processing remove_all request");

        let removed = self.lines.len();
        self.lines.clear();
        info!(removed, "Cart cleared");
        self.persist().await;

        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(product_id = %product_id, quantity = %quantity), skip(self, respond_to))]
    async fn handle_set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        respond_to: ServiceResponse<(), CartError>,
    ) {
        debug!("Processing set_quantity request");

        if quantity == 0 {
            self.lines.retain(|line| line.product_id != product_id);
        } else if let Some(line) = self.lines.iter_mut().find(|line| line.product_id == product_id) {
            line.quantity = quantity;
        } else {
            debug!("Item not in cart");
        }
        self.persist().await;

        let _ = respond_to.send(Ok(()));
    }

    /// **Background Handler** - the spawned task owns `respond_to` and answers
    /// once the backend write finishes. Cart lines are never touched.
    #[instrument(fields(product_id = %product_id, quantity = %quantity), skip(self, token, snapshot, respond_to))]
    fn handle_update_stock(
        &self,
        token: String,
        product_id: ProductId,
        quantity: u32,
        snapshot: CartLine,
        respond_to: ServiceResponse<(), CartError>,
    ) {
        debug!("Processing update_stock request");

        let api = Arc::clone(&self.api);
        let patch = StockPatch {
            stock: snapshot.stock.saturating_sub(quantity),
        };

        tokio::spawn(
            async move {
                let result = api
                    .update_stock(&token, product_id, patch)
                    .await
                    .map_err(|source| CartError::StockUpdate { product_id, source });

                match &result {
                    Ok(()) => info!(remaining_stock = patch.stock, "Stock updated"),
                    Err(e) => warn!(error = %e, "Stock update failed"),
                }

                let _ = respond_to.send(result);
            }
            .in_current_span(),
        );
    }
}

/// Folds `line` into `lines`, keeping at most one line per product.
fn merge_line(lines: &mut Vec<CartLine>, line: CartLine) {
    match lines.iter_mut().find(|existing| existing.product_id == line.product_id) {
        Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
        None => lines.push(line),
    }
}
