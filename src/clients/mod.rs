//! Client handles.
//!
//! `CartClient` and `SessionClient` are thin wrappers around a service mailbox;
//! their methods are generated by [`client_method!`]. The remaining clients
//! orchestrate those handles and the backend API to implement user-facing
//! flows.

// =============================================================================
// CLIENT METHOD MACRO
// =============================================================================

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
/// A closed or dropped mailbox becomes the error type's `ActorCommunicationError`.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| <$error_type>::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| <$error_type>::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

mod account_client;
mod cart_client;
mod catalog_client;
mod history_client;
mod order_client;
mod session_client;
mod supplier_client;

pub use account_client::AccountClient;
pub use cart_client::CartClient;
pub use catalog_client::{filter_products, CatalogClient, FALLBACK_CATEGORIES};
pub use history_client::{closed_orders, HistoryClient, OrderBoard};
pub use order_client::{CheckoutReceipt, OrderClient};
pub use session_client::SessionClient;
pub use supplier_client::{owned_by, SupplierClient};
