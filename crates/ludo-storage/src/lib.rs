pub mod memory;
pub mod postgres;

pub use ludo_core::repository::{AuthorStore, GameStore, Result, Store, Transaction};
pub use ludo_core::StorageError;
pub use memory::{InMemoryStore, MemoryConnection};
pub use postgres::{PgConnectionUnit, PgSession, PgStore, PgTransaction};
