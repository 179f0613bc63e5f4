use crate::aggregate::GameWithAuthors;
use crate::error::Result;
use async_trait::async_trait;
use ludo_core::{Author, AuthorId, Game, GameCriteria, GameFields, GameId};

#[async_trait]
pub trait Catalog: Send + Sync + 'static {
    /// Persists a new game, its inline authors, and links them together with
    /// the existing authors named by `author_ids`. All or nothing.
    async fn create_game(
        &self,
        game: Game,
        authors: Vec<Author>,
        author_ids: Vec<AuthorId>,
    ) -> Result<GameWithAuthors>;

    /// Fetches one game with its authors.
    /// Fails with `NotFound` if no game matches.
    async fn get_game(&self, criteria: &GameCriteria) -> Result<GameWithAuthors>;

    /// Fetches every game with its authors.
    async fn all_games(&self) -> Result<Vec<GameWithAuthors>>;

    /// Deletes matching games. Returns how many were removed; zero is fine.
    async fn delete_game(&self, criteria: &GameCriteria) -> Result<u64>;

    /// Overwrites the name, url and published date of the game with `id`.
    /// Returns the game built from `fields`; an unknown id writes nothing.
    async fn update_game(&self, id: GameId, fields: GameFields) -> Result<Game>;

    /// Lists every author.
    async fn all_authors(&self) -> Result<Vec<Author>>;
}
