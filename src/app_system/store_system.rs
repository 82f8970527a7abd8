use std::sync::Arc;

use tracing::{error, info};

use crate::api::StorefrontApi;
use crate::cart_actor::CartService;
use crate::clients::{
    AccountClient, CartClient, CatalogClient, HistoryClient, OrderClient, SessionClient,
    SupplierClient,
};
use crate::session_actor::SessionService;
use crate::storage::LocalStorage;

/// The running client: the cart and session services plus every handle the
/// screens talk to.
///
/// Responsible for starting the services, wiring clients together, and
/// handling shutdown.
pub struct StoreSystem {
    pub cart: CartClient,
    pub session: SessionClient,
    pub account: AccountClient,
    pub catalog: CatalogClient,
    pub orders: OrderClient,
    pub history: HistoryClient,
    pub supplier: SupplierClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl StoreSystem {
    pub fn new(
        storage: Arc<dyn LocalStorage>,
        api: Arc<dyn StorefrontApi>,
        mailbox_size: usize,
    ) -> Self {
        // 1. Session store
        let (session_service, session) = SessionService::new(mailbox_size, Arc::clone(&storage));
        let session_handle = tokio::spawn(session_service.run());

        // 2. Cart store
        let (cart_service, cart) = CartService::new(mailbox_size, storage, Arc::clone(&api));
        let cart_handle = tokio::spawn(cart_service.run());

        // 3. Orchestrating clients
        let account = AccountClient::new(session.clone(), Arc::clone(&api));
        let catalog = CatalogClient::new(session.clone(), Arc::clone(&api));
        let orders = OrderClient::new(cart.clone(), session.clone(), Arc::clone(&api));
        let history = HistoryClient::new(session.clone(), Arc::clone(&api));
        let supplier = SupplierClient::new(session.clone(), api);

        Self {
            cart,
            session,
            account,
            catalog,
            orders,
            history,
            supplier,
            handles: vec![session_handle, cart_handle],
        }
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        if let Err(e) = self.cart.shutdown().await {
            error!(error = %e, "Cart service already stopped");
        }
        if let Err(e) = self.session.shutdown().await {
            error!(error = %e, "Session service already stopped");
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Service task failed: {:?}", e);
                return Err(format!("Service task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
