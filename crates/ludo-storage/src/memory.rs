use async_trait::async_trait;
use ludo_core::repository::{AuthorStore, GameStore, Result, Store, Transaction};
use ludo_core::{
    AuthorCriteria, AuthorFields, AuthorId, AuthorRecord, GameCriteria, GameFields, GameId,
    GameRecord, StorageError,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// The in-memory tables. Ordered maps keep ids ascending like `ORDER BY`.
#[derive(Debug, Clone, Default)]
struct Tables {
    authors: BTreeMap<AuthorId, AuthorFields>,
    games: BTreeMap<GameId, GameFields>,
    links: BTreeSet<(GameId, AuthorId)>,
    last_author_id: i64,
    last_game_id: i64,
}

impl Tables {
    fn author_record(id: AuthorId, fields: &AuthorFields) -> AuthorRecord {
        AuthorRecord {
            author_id: id,
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
        }
    }

    fn game_record(id: GameId, fields: &GameFields) -> GameRecord {
        GameRecord {
            game_id: id,
            name: fields.name.clone(),
            url: fields.url.clone(),
            published_date: fields.published_date,
        }
    }

    fn game_records(&self) -> impl Iterator<Item = GameRecord> + '_ {
        self.games
            .iter()
            .map(|(id, fields)| Self::game_record(*id, fields))
    }
}

/// In-memory implementation of [`Store`].
///
/// Every session or transaction holds the table lock for its whole
/// lifetime, so units of work are fully serialized. A transaction works
/// on a private copy of the tables that replaces the shared state on
/// commit and is discarded otherwise.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A locked view of an [`InMemoryStore`].
///
/// Sessions write straight through to the shared tables; transactions
/// write to `staged` until committed.
#[derive(Debug)]
pub struct MemoryConnection {
    guard: OwnedMutexGuard<Tables>,
    staged: Option<Tables>,
}

impl MemoryConnection {
    fn tables(&mut self) -> &mut Tables {
        match &mut self.staged {
            Some(staged) => staged,
            None => &mut *self.guard,
        }
    }
}

#[async_trait]
impl Store for InMemoryStore {
    type Session = MemoryConnection;
    type Tx = MemoryConnection;

    async fn session(&self) -> Result<MemoryConnection> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        Ok(MemoryConnection {
            guard,
            staged: None,
        })
    }

    async fn begin(&self) -> Result<MemoryConnection> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let staged = Some((*guard).clone());
        Ok(MemoryConnection { guard, staged })
    }
}

#[async_trait]
impl AuthorStore for MemoryConnection {
    async fn insert_author(&mut self, fields: &AuthorFields) -> Result<AuthorId> {
        let tables = self.tables();
        tables.last_author_id += 1;
        let id = AuthorId::new(tables.last_author_id);
        tables.authors.insert(id, fields.clone());
        Ok(id)
    }

    async fn update_author(&mut self, id: AuthorId, fields: &AuthorFields) -> Result<bool> {
        let Some(existing) = self.tables().authors.get_mut(&id) else {
            return Ok(false);
        };
        *existing = fields.clone();
        Ok(true)
    }

    async fn filter_authors(&mut self, criteria: &AuthorCriteria) -> Result<Vec<AuthorRecord>> {
        Ok(self
            .tables()
            .authors
            .iter()
            .map(|(id, fields)| Tables::author_record(*id, fields))
            .filter(|record| criteria.matches(record))
            .collect())
    }
}

#[async_trait]
impl GameStore for MemoryConnection {
    async fn insert_game(&mut self, fields: &GameFields) -> Result<GameId> {
        let tables = self.tables();
        tables.last_game_id += 1;
        let id = GameId::new(tables.last_game_id);
        tables.games.insert(id, fields.clone());
        Ok(id)
    }

    async fn update_game(&mut self, id: GameId, fields: &GameFields) -> Result<bool> {
        let Some(existing) = self.tables().games.get_mut(&id) else {
            return Ok(false);
        };
        *existing = fields.clone();
        Ok(true)
    }

    async fn get_game(&mut self, criteria: &GameCriteria) -> Result<Option<GameRecord>> {
        Ok(self
            .tables()
            .game_records()
            .find(|record| criteria.matches(record)))
    }

    async fn all_games(&mut self) -> Result<Vec<GameRecord>> {
        Ok(self.tables().game_records().collect())
    }

    async fn delete_games(&mut self, criteria: &GameCriteria) -> Result<u64> {
        let tables = self.tables();
        let doomed: BTreeSet<GameId> = tables
            .game_records()
            .filter(|record| criteria.matches(record))
            .map(|record| record.game_id)
            .collect();

        tables.games.retain(|id, _| !doomed.contains(id));
        tables.links.retain(|(game, _)| !doomed.contains(game));
        Ok(doomed.len() as u64)
    }

    async fn authors_of_game(&mut self, game: GameId) -> Result<Vec<AuthorRecord>> {
        let tables = self.tables();
        Ok(tables
            .links
            .range((game, AuthorId::new(i64::MIN))..=(game, AuthorId::new(i64::MAX)))
            .filter_map(|(_, author)| {
                tables
                    .authors
                    .get(author)
                    .map(|fields| Tables::author_record(*author, fields))
            })
            .collect())
    }

    async fn link_authors(&mut self, game: GameId, authors: &[AuthorId]) -> Result<()> {
        let tables = self.tables();
        if !tables.games.contains_key(&game) {
            return Err(StorageError::MissingReference(format!("game {game}")));
        }
        if let Some(missing) = authors.iter().find(|id| !tables.authors.contains_key(*id)) {
            return Err(StorageError::MissingReference(format!("author {missing}")));
        }

        tables
            .links
            .extend(authors.iter().map(|author| (game, *author)));
        Ok(())
    }
}

#[async_trait]
impl Transaction for MemoryConnection {
    async fn commit(mut self) -> Result<()> {
        if let Some(staged) = self.staged.take() {
            *self.guard = staged;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}
