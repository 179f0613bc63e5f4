use crate::author::{AuthorId, AuthorRecord};
use crate::game::{GameId, GameRecord};

/// Equality-based selection of author records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorCriteria {
    /// Every author.
    All,
    /// Authors whose id appears in the list.
    IdIn(Vec<AuthorId>),
}

impl AuthorCriteria {
    pub fn matches(&self, record: &AuthorRecord) -> bool {
        match self {
            AuthorCriteria::All => true,
            AuthorCriteria::IdIn(ids) => ids.contains(&record.author_id),
        }
    }
}

/// Equality-based selection of game records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCriteria {
    Id(GameId),
    Name(String),
}

impl GameCriteria {
    pub fn matches(&self, record: &GameRecord) -> bool {
        match self {
            GameCriteria::Id(id) => record.game_id == *id,
            GameCriteria::Name(name) => record.name == *name,
        }
    }
}

impl From<GameId> for GameCriteria {
    fn from(id: GameId) -> Self {
        GameCriteria::Id(id)
    }
}
