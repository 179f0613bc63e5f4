use crate::author::Author;
use crate::criteria::GameCriteria;
use crate::repository::{GameStore, Result};
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier assigned to a game by the storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(i64);

impl GameId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for GameId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted game row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub game_id: GameId,
    pub name: String,
    pub url: String,
    pub published_date: Date,
}

/// The writable columns of a game row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFields {
    pub name: String,
    pub url: String,
    pub published_date: Date,
}

/// A published game.
///
/// The author relation is managed separately from the game's own fields:
/// `authors` is `None` until it has been loaded from storage, and `save`
/// never touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub game_id: Option<GameId>,
    pub name: String,
    pub url: String,
    pub published_date: Date,
    pub authors: Option<Vec<Author>>,
}

impl Game {
    /// Creates a game that has not been persisted yet.
    pub fn new(name: impl Into<String>, url: impl Into<String>, published_date: Date) -> Self {
        Self {
            game_id: None,
            name: name.into(),
            url: url.into(),
            published_date,
            authors: None,
        }
    }

    /// Creates a game bound to an existing id, e.g. for an update.
    pub fn with_id(id: GameId, fields: GameFields) -> Self {
        Self {
            game_id: Some(id),
            name: fields.name,
            url: fields.url,
            published_date: fields.published_date,
            authors: None,
        }
    }

    pub fn fields(&self) -> GameFields {
        GameFields {
            name: self.name.clone(),
            url: self.url.clone(),
            published_date: self.published_date,
        }
    }

    /// Inserts the game if it has no id yet, otherwise updates it in place.
    ///
    /// Returns `false` only when an update matched no stored game.
    pub async fn save<S: GameStore>(&mut self, store: &mut S) -> Result<bool> {
        match self.game_id {
            None => {
                let id = store.insert_game(&self.fields()).await?;
                self.game_id = Some(id);
                Ok(true)
            }
            Some(id) => store.update_game(id, &self.fields()).await,
        }
    }

    /// Fetches the first game matching `criteria` with its authors loaded.
    pub async fn get<S: GameStore>(store: &mut S, criteria: &GameCriteria) -> Result<Option<Game>> {
        let Some(record) = store.get_game(criteria).await? else {
            return Ok(None);
        };
        let game = Self::load_authors(store, record).await?;
        Ok(Some(game))
    }

    /// Fetches every game with its authors loaded.
    pub async fn all<S: GameStore>(store: &mut S) -> Result<Vec<Game>> {
        let records = store.all_games().await?;
        let mut games = Vec::with_capacity(records.len());
        for record in records {
            games.push(Self::load_authors(store, record).await?);
        }
        Ok(games)
    }

    /// Removes every game matching `criteria`. Returns how many were removed.
    pub async fn delete<S: GameStore>(store: &mut S, criteria: &GameCriteria) -> Result<u64> {
        store.delete_games(criteria).await
    }

    async fn load_authors<S: GameStore>(store: &mut S, record: GameRecord) -> Result<Game> {
        let authors = store.authors_of_game(record.game_id).await?;
        let mut game = Game::from(record);
        game.authors = Some(authors.into_iter().map(Author::from).collect());
        Ok(game)
    }
}

impl From<GameRecord> for Game {
    fn from(record: GameRecord) -> Self {
        Self {
            game_id: Some(record.game_id),
            name: record.name,
            url: record.url,
            published_date: record.published_date,
            authors: None,
        }
    }
}
