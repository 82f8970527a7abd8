//! # Storefront client
//!
//! Client core of a small procurement storefront: browse the catalog, fill a
//! persistent cart, submit orders, follow their review status, and (for
//! supplier accounts) manage the products on offer.
//!
//! ## Layout
//!
//! - **Services** own mutable state behind an `mpsc` mailbox and apply one
//!   request at a time: [`cart_actor::CartService`] holds the cart lines,
//!   [`session_actor::SessionService`] holds the login session. Both mirror
//!   their state to [`storage::LocalStorage`].
//! - **Clients** are cheap, cloneable handles. [`clients::CartClient`] and
//!   [`clients::SessionClient`] talk to a service; the others orchestrate those
//!   handles and the backend ([`api::StorefrontApi`]) to implement the
//!   user-facing flows.
//! - [`app_system::StoreSystem`] starts everything, wires it together and
//!   shuts it down.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront_client::api::HttpApi;
//! use storefront_client::app_system::StoreSystem;
//! use storefront_client::storage::FileStorage;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let system = StoreSystem::new(
//!     Arc::new(FileStorage::new("/tmp/storefront")),
//!     Arc::new(HttpApi::new("http://localhost:8000")),
//!     100,
//! );
//!
//! system.account.login("alice", "secret").await?;
//! let products = system.catalog.fetch_products().await?;
//! if let Some(first) = products.into_iter().next() {
//!     system.cart.add_item(first, 2).await?;
//! }
//! let receipt = system.orders.submit_all().await?;
//! println!("submitted {} order(s), total {}", receipt.submitted, receipt.total);
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app_system;
pub mod cart_actor;
pub mod clients;
pub mod domain;
pub mod error;
pub mod load_state;
pub mod messages;
pub mod session_actor;
pub mod storage;

#[cfg(test)]
mod mock_framework;
