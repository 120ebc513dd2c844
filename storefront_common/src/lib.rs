//! Value types shared by the storefront engine and server.
mod money;

pub mod helpers;
pub mod op;
mod secret;

pub use money::{Money, MoneyConversionError};
pub use secret::Secret;
