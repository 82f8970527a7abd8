use thiserror::Error;

use crate::api::ApiError;
use crate::domain::ProductId;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Stock update failed for product {product_id}: {source}")]
    StockUpdate {
        product_id: ProductId,
        #[source]
        source: ApiError,
    },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Login failed: {0}")]
    LoginRejected(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("Order submission failed after {submitted} line(s) were submitted: {source}")]
    PartialCheckout {
        submitted: usize,
        #[source]
        source: ApiError,
    },
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum SupplierError {
    #[error("Please fill all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AccountError {
    /// Input problems caught before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, AccountError::ValidationError(_))
    }
}

impl OrderError {
    pub fn is_validation(&self) -> bool {
        matches!(self, OrderError::EmptyCart)
    }
}

impl SupplierError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SupplierError::MissingFields(_))
    }
}
