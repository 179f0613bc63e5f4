//! Core types and traits for the ludo game catalog.
//!
//! This crate provides the domain objects ([`Author`], [`Game`]), the
//! data-access contract implemented by the storage backends, and the
//! validation rules shared by every write path.

pub mod author;
pub mod criteria;
pub mod error;
pub mod game;
pub mod repository;
pub mod validation;

pub use author::{Author, AuthorFields, AuthorId, AuthorRecord};
pub use criteria::{AuthorCriteria, GameCriteria};
pub use error::{StorageError, ValidationError};
pub use game::{Game, GameFields, GameId, GameRecord};
pub use repository::{AuthorStore, GameStore, Store, Transaction};
