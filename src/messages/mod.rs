use rust_decimal::Decimal;
use tokio::sync::oneshot;

use crate::domain::{CartLine, Product, ProductId, Session};
use crate::error::{CartError, SessionError};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed message enums for actor communication. Each variant includes parameters
/// and a oneshot channel for responses.

#[derive(Debug)]
pub enum CartRequest {
    AddItem {
        product: Product,
        quantity: u32,
        respond_to: ServiceResponse<(), CartError>,
    },
    RemoveItem {
        product_id: ProductId,
        respond_to: ServiceResponse<(), CartError>,
    },
    RemoveAll {
        respond_to: ServiceResponse<(), CartError>,
    },
    SetQuantity {
        product_id: ProductId,
        quantity: u32,
        respond_to: ServiceResponse<(), CartError>,
    },
    UpdateStock {
        token: String,
        product_id: ProductId,
        quantity: u32,
        snapshot: CartLine,
        respond_to: ServiceResponse<(), CartError>,
    },
    Lines {
        respond_to: ServiceResponse<Vec<CartLine>, CartError>,
    },
    Total {
        respond_to: ServiceResponse<Decimal, CartError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum SessionRequest {
    Current {
        respond_to: ServiceResponse<Option<Session>, SessionError>,
    },
    Start {
        session: Session,
        respond_to: ServiceResponse<(), SessionError>,
    },
    Clear {
        respond_to: ServiceResponse<(), SessionError>,
    },
    Shutdown,
}
