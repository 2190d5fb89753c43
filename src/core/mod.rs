pub mod error;
pub mod price;

pub use error::{Result, StoreError};
pub use price::Price;
