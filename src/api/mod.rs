//! Backend REST collaborator.
//!
//! [`StorefrontApi`] is the seam between the client flows and the remote
//! service; [`HttpApi`] talks to the real backend and `MockStorefrontApi`
//! stands in for it in tests.

use async_trait::async_trait;
use mockall::automock;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::lenient::or_default;
use crate::domain::{CategoryRef, NewOrder, Order, Price, Product, ProductId, UserType};
use crate::error::SupplierError;

mod http;

pub use http::HttpApi;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Unexpected response from backend: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub user_type: Option<UserType>,
    #[serde(default, deserialize_with = "or_default")]
    pub message: Option<String>,
}

/// Product fields a supplier can create or edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductDraft {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub price: Option<Price>,
    pub stock: Option<u32>,
    pub category_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductDraft {
    /// Names of required fields that are missing, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.price.is_none() {
            missing.push("price");
        }
        if self.stock.is_none() {
            missing.push("stock");
        }
        if self.category_id.is_none() {
            missing.push("category");
        }
        missing
    }

    /// Reject the draft before any network call if a required field is missing.
    pub fn validate(&self) -> Result<(), SupplierError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SupplierError::MissingFields(missing))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockPatch {
    pub stock: u32,
}

#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `POST /api/login/`
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError>;

    /// `POST /api/forgot-password/`
    async fn forgot_password(&self, token: &str, email: &str) -> Result<(), ApiError>;

    /// `GET /api/products/`
    async fn list_products(&self, token: &str) -> Result<Vec<Product>, ApiError>;

    /// `POST /api/products/`
    async fn create_product(&self, token: &str, draft: ProductDraft) -> Result<Product, ApiError>;

    /// `PATCH /api/products/{id}/`
    async fn update_product(
        &self,
        token: &str,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, ApiError>;

    /// `DELETE /api/products/{id}/`
    async fn delete_product(&self, token: &str, id: ProductId) -> Result<(), ApiError>;

    /// `PATCH /api/products/{id}/` with only the stock field.
    async fn update_stock(&self, token: &str, id: ProductId, patch: StockPatch) -> Result<(), ApiError>;

    /// `GET /api/category/`
    async fn list_categories(&self, token: &str) -> Result<Vec<CategoryRef>, ApiError>;

    /// `GET /api/orders/`
    async fn list_orders(&self, token: &str) -> Result<Vec<Order>, ApiError>;

    /// `POST /api/orders/`
    async fn create_order(&self, token: &str, order: NewOrder) -> Result<(), ApiError>;
}
