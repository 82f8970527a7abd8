pub mod cart;
pub(crate) mod lenient;
pub mod order;
pub mod price;
pub mod product;
pub mod session;

pub use cart::*;
pub use order::*;
pub use price::*;
pub use product::*;
pub use session::*;
