//! Game catalog service.
//!
//! Coordinates a game and its authors as one unit on top of any
//! [`ludo_core::Store`] backend. The only multi-step write, game creation,
//! runs inside a single transaction.

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod service;

pub use aggregate::GameWithAuthors;
pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use service::GameAuthorConnector;
