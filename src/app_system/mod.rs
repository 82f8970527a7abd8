//! System orchestration, startup, and shutdown logic.

pub mod config;
pub mod store_system;
pub mod telemetry;

pub use config::*;
pub use store_system::*;
pub use telemetry::*;
