pub mod amount;
pub mod error;
pub mod identity;
pub mod order;

pub use error::ErrorResponse;
pub use identity::Identity;
pub use order::{Order, OrderCreateRequest, OrderId, ParseOrderIdError};
