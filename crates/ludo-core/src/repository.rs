use crate::author::{AuthorFields, AuthorId, AuthorRecord};
use crate::criteria::{AuthorCriteria, GameCriteria};
use crate::error::StorageError;
use crate::game::{GameFields, GameId, GameRecord};
use async_trait::async_trait;

/// Result type for data-access operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Data access for author records.
#[async_trait]
pub trait AuthorStore: Send {
    /// Inserts a new author and returns the id assigned by the backend.
    async fn insert_author(&mut self, fields: &AuthorFields) -> Result<AuthorId>;

    /// Overwrites the fields of an existing author.
    /// Returns `false` if no author has the given id.
    async fn update_author(&mut self, id: AuthorId, fields: &AuthorFields) -> Result<bool>;

    /// Returns every author matching `criteria`, ordered by id.
    async fn filter_authors(&mut self, criteria: &AuthorCriteria) -> Result<Vec<AuthorRecord>>;
}

/// Data access for game records and the game/author join.
#[async_trait]
pub trait GameStore: Send {
    /// Inserts a new game and returns the id assigned by the backend.
    async fn insert_game(&mut self, fields: &GameFields) -> Result<GameId>;

    /// Overwrites the fields of an existing game.
    /// Returns `false` if no game has the given id.
    async fn update_game(&mut self, id: GameId, fields: &GameFields) -> Result<bool>;

    /// Returns the first game matching `criteria`, or `None`.
    async fn get_game(&mut self, criteria: &GameCriteria) -> Result<Option<GameRecord>>;

    /// Returns every game, ordered by id.
    async fn all_games(&mut self) -> Result<Vec<GameRecord>>;

    /// Removes every game matching `criteria` together with its join rows.
    /// Returns the number of games removed; zero is not an error.
    async fn delete_games(&mut self, criteria: &GameCriteria) -> Result<u64>;

    /// Returns the authors linked to a game, ordered by id.
    async fn authors_of_game(&mut self, game: GameId) -> Result<Vec<AuthorRecord>>;

    /// Links existing authors to an existing game.
    ///
    /// Pairs that are already linked are left untouched. Fails with
    /// [`StorageError::MissingReference`] if the game or an author is absent.
    async fn link_authors(&mut self, game: GameId, authors: &[AuthorId]) -> Result<()>;
}

/// A unit of work whose writes become visible only once committed.
///
/// Dropping a transaction without committing rolls it back.
#[async_trait]
pub trait Transaction: AuthorStore + GameStore {
    async fn commit(self) -> Result<()>;

    async fn rollback(self) -> Result<()>;
}

/// A storage backend.
///
/// Hands out auto-commit sessions for single-step operations and
/// transactions for operations that must be applied atomically.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    type Session: AuthorStore + GameStore + 'static;
    type Tx: Transaction + 'static;

    /// Opens a session whose writes are applied immediately.
    async fn session(&self) -> Result<Self::Session>;

    /// Begins a transaction.
    async fn begin(&self) -> Result<Self::Tx>;
}
