pub mod config;
pub mod detail;
pub mod error;
pub mod membership;
pub mod session;
pub mod toggle;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::CoreError;
