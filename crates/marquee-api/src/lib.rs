//! HTTP clients for the movie catalog service.
//!
//! [`CatalogClient`] covers the public read endpoints, [`AccountClient`]
//! the session-scoped collections and review submission. Both share one
//! [`Connection`] so the session cookie set at login rides on every
//! later request.

pub mod account;
pub mod catalog;
pub mod connection;
pub mod error;
pub mod traits;
pub mod types;

pub use account::AccountClient;
pub use catalog::CatalogClient;
pub use connection::Connection;
pub use error::{ApiError, ApiResult};
