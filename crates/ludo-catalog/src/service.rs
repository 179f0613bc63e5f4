use crate::aggregate::GameWithAuthors;
use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use ludo_core::validation::validate_author_refs;
use ludo_core::{Author, AuthorId, Game, GameCriteria, GameFields, GameId, Store, Transaction};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// A concrete implementation of the [`Catalog`] trait.
///
/// Wraps a [`Store`] and coordinates games with their authors. Reads and
/// single-row writes run on an auto-commit session; game creation runs in
/// one transaction that is committed only if every step succeeds.
#[derive(Debug, Clone)]
pub struct GameAuthorConnector<S> {
    store: Arc<S>,
}

impl<S: Store> GameAuthorConnector<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the authors of `game`, reloading the game if its author
    /// relation was not loaded.
    pub async fn get_authors_for_game(&self, game: Game) -> Result<GameWithAuthors> {
        let mut session = self.store.session().await?;
        GameWithAuthors::for_game(&mut session, game).await
    }

    /// Links already persisted authors to an already persisted game.
    pub async fn link_authors(&self, game: &Game, authors: &[Author]) -> Result<()> {
        let mut session = self.store.session().await?;
        GameWithAuthors::link_authors(&mut session, game, authors).await?;
        Ok(())
    }
}

#[async_trait]
impl<S: Store> Catalog for GameAuthorConnector<S> {
    async fn create_game(
        &self,
        game: Game,
        authors: Vec<Author>,
        author_ids: Vec<AuthorId>,
    ) -> Result<GameWithAuthors> {
        // Rejected before a transaction is opened.
        validate_author_refs("authors", authors.len(), author_ids.len())?;

        let mut tx = self.store.begin().await?;
        match GameWithAuthors::create_in(&mut tx, game, authors, &author_ids).await {
            Ok(created) => {
                tx.commit().await.map_err(CatalogError::Transaction)?;
                info!(
                    game_id = ?created.game.game_id,
                    authors = created.authors.len(),
                    "created game"
                );
                Ok(created)
            }
            Err(err) => {
                warn!(error = %err, "rolling back game creation");
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn get_game(&self, criteria: &GameCriteria) -> Result<GameWithAuthors> {
        trace!(?criteria, "fetching game");
        let mut session = self.store.session().await?;

        let Some(game) = Game::get(&mut session, criteria).await? else {
            debug!(?criteria, "game not found");
            return Err(CatalogError::NotFound("game".to_string()));
        };

        GameWithAuthors::for_game(&mut session, game).await
    }

    async fn all_games(&self) -> Result<Vec<GameWithAuthors>> {
        let mut session = self.store.session().await?;
        let games = Game::all(&mut session).await?;

        let mut aggregates = Vec::with_capacity(games.len());
        for game in games {
            aggregates.push(GameWithAuthors::for_game(&mut session, game).await?);
        }
        Ok(aggregates)
    }

    async fn delete_game(&self, criteria: &GameCriteria) -> Result<u64> {
        let mut session = self.store.session().await?;
        let removed = Game::delete(&mut session, criteria).await?;
        info!(?criteria, removed, "deleted games");
        Ok(removed)
    }

    async fn update_game(&self, id: GameId, fields: GameFields) -> Result<Game> {
        let mut game = Game::with_id(id, fields);
        let mut session = self.store.session().await?;

        if game.save(&mut session).await? {
            info!(game_id = %id, "updated game");
        } else {
            debug!(game_id = %id, "update matched no game");
        }
        Ok(game)
    }

    async fn all_authors(&self) -> Result<Vec<Author>> {
        let mut session = self.store.session().await?;
        Ok(Author::all(&mut session).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use ludo_core::{
        AuthorCriteria, AuthorFields, AuthorRecord, AuthorStore, GameRecord, GameStore,
        StorageError,
    };
    use ludo_storage::{InMemoryStore, MemoryConnection};

    fn test_connector() -> GameAuthorConnector<InMemoryStore> {
        GameAuthorConnector::new(InMemoryStore::new())
    }

    fn chess() -> Game {
        Game::new("Chess", "https://example.com/chess", date(2001, 1, 1))
    }

    async fn seed_author(store: &impl Store, first: &str, last: &str) -> AuthorId {
        let mut session = store.session().await.unwrap();
        let mut author = Author::new(first, last);
        author.save(&mut session).await.unwrap();
        author.author_id.unwrap()
    }

    #[tokio::test]
    async fn create_combines_inline_and_existing_authors() {
        let connector = test_connector();
        let existing = seed_author(connector.store(), "Grace", "Hopper").await;

        let created = connector
            .create_game(
                chess(),
                vec![Author::new("Ada", "Lovelace"), Author::new("Alan", "Turing")],
                vec![existing],
            )
            .await
            .unwrap();

        let game_id = created.game.game_id.unwrap();
        assert_eq!(created.authors.len(), 3);
        assert!(created.authors.iter().all(|a| a.author_id.is_some()));

        let fetched = connector
            .get_game(&GameCriteria::Id(game_id))
            .await
            .unwrap();
        let mut ids: Vec<_> = fetched
            .authors
            .iter()
            .map(|a| a.author_id.unwrap())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&existing));
        assert_eq!(fetched.game.name, "Chess");
    }

    #[tokio::test]
    async fn create_rejects_repeated_author_ids() {
        let connector = test_connector();
        let existing = seed_author(connector.store(), "Grace", "Hopper").await;

        let err = connector
            .create_game(chess(), vec![], vec![existing, existing])
            .await
            .unwrap_err();

        match err {
            CatalogError::Validation(err) => assert_eq!(err.field, "author_ids"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(connector.all_games().await.unwrap().is_empty());
        assert_eq!(connector.all_authors().await.unwrap().len(), 1);
    }


    #[tokio::test]
    async fn create_with_unknown_author_id_persists_nothing() {
        let connector = test_connector();
        let existing = seed_author(connector.store(), "Grace", "Hopper").await;

        let err = connector
            .create_game(
                chess(),
                vec![Author::new("Ada", "Lovelace")],
                vec![existing, AuthorId::new(404)],
            )
            .await
            .unwrap_err();

        match err {
            CatalogError::Validation(e) => assert_eq!(e.field, "author_ids"),
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(connector.all_games().await.unwrap().is_empty());
        let authors = connector.all_authors().await.unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].author_id, Some(existing));
    }

    #[tokio::test]
    async fn create_without_any_author_is_rejected() {
        let connector = test_connector();

        let err = connector
            .create_game(chess(), vec![], vec![])
            .await
            .unwrap_err();

        match err {
            CatalogError::Validation(e) => assert_eq!(e.field, "authors"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(connector.all_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_missing_game_is_not_found() {
        let connector = test_connector();

        let err = connector
            .get_game(&GameCriteria::Id(GameId::new(12)))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_missing_game_is_a_no_op() {
        let connector = test_connector();

        let removed = connector
            .delete_game(&GameCriteria::Id(GameId::new(12)))
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn delete_keeps_authors() {
        let connector = test_connector();
        let created = connector
            .create_game(chess(), vec![Author::new("Ada", "Lovelace")], vec![])
            .await
            .unwrap();
        let game_id = created.game.game_id.unwrap();

        assert_eq!(
            connector
                .delete_game(&GameCriteria::Id(game_id))
                .await
                .unwrap(),
            1
        );
        assert!(matches!(
            connector.get_game(&GameCriteria::Id(game_id)).await,
            Err(CatalogError::NotFound(_))
        ));
        assert_eq!(connector.all_authors().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_changes_fields_but_not_authors() {
        let connector = test_connector();
        let created = connector
            .create_game(chess(), vec![Author::new("Ada", "Lovelace")], vec![])
            .await
            .unwrap();
        let game_id = created.game.game_id.unwrap();

        let updated = connector
            .update_game(
                game_id,
                GameFields {
                    name: "Chess 960".to_string(),
                    url: "https://example.com/960".to_string(),
                    published_date: date(1996, 6, 19),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.game_id, Some(game_id));

        let fetched = connector
            .get_game(&GameCriteria::Id(game_id))
            .await
            .unwrap();
        assert_eq!(fetched.game.name, "Chess 960");
        assert_eq!(fetched.game.published_date, date(1996, 6, 19));
        assert_eq!(fetched.authors.len(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_game_echoes_fields_without_writing() {
        let connector = test_connector();

        let game = connector
            .update_game(GameId::new(3), chess().fields())
            .await
            .unwrap();
        assert_eq!(game.game_id, Some(GameId::new(3)));
        assert_eq!(game.name, "Chess");
        assert!(connector.all_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn all_games_loads_authors_for_each_game() {
        let connector = test_connector();
        let shared = seed_author(connector.store(), "Grace", "Hopper").await;

        connector
            .create_game(chess(), vec![], vec![shared])
            .await
            .unwrap();
        connector
            .create_game(
                Game::new("Go", "https://example.com/go", date(2002, 2, 2)),
                vec![Author::new("Ada", "Lovelace")],
                vec![shared],
            )
            .await
            .unwrap();

        let games = connector.all_games().await.unwrap();
        let counts: Vec<_> = games.iter().map(|g| g.authors.len()).collect();
        assert_eq!(counts, vec![1, 2]);
    }

    #[tokio::test]
    async fn get_authors_for_unloaded_game_reloads_it() {
        let connector = test_connector();
        let created = connector
            .create_game(chess(), vec![Author::new("Ada", "Lovelace")], vec![])
            .await
            .unwrap();

        let mut bare = created.game.clone();
        bare.authors = None;

        let aggregate = connector.get_authors_for_game(bare).await.unwrap();
        assert_eq!(aggregate.authors.len(), 1);
        assert_eq!(aggregate.authors[0].first_name, "Ada");
    }

    #[tokio::test]
    async fn link_authors_adds_to_existing_game() {
        let connector = test_connector();
        let created = connector
            .create_game(chess(), vec![Author::new("Ada", "Lovelace")], vec![])
            .await
            .unwrap();
        let extra = seed_author(connector.store(), "Alan", "Turing").await;
        let extra = Author {
            author_id: Some(extra),
            ..Author::new("Alan", "Turing")
        };

        connector
            .link_authors(&created.game, &[extra])
            .await
            .unwrap();

        let game_id = created.game.game_id.unwrap();
        let fetched = connector
            .get_game(&GameCriteria::Id(game_id))
            .await
            .unwrap();
        assert_eq!(fetched.authors.len(), 2);
    }

    /// In-memory store whose transactions fail when linking authors.
    struct FailingLinkStore(InMemoryStore);

    struct FailingLinkTx(MemoryConnection);

    #[async_trait]
    impl AuthorStore for FailingLinkTx {
        async fn insert_author(
            &mut self,
            fields: &AuthorFields,
        ) -> ludo_core::repository::Result<AuthorId> {
            self.0.insert_author(fields).await
        }

        async fn update_author(
            &mut self,
            id: AuthorId,
            fields: &AuthorFields,
        ) -> ludo_core::repository::Result<bool> {
            self.0.update_author(id, fields).await
        }

        async fn filter_authors(
            &mut self,
            criteria: &AuthorCriteria,
        ) -> ludo_core::repository::Result<Vec<AuthorRecord>> {
            self.0.filter_authors(criteria).await
        }
    }

    #[async_trait]
    impl GameStore for FailingLinkTx {
        async fn insert_game(
            &mut self,
            fields: &GameFields,
        ) -> ludo_core::repository::Result<GameId> {
            self.0.insert_game(fields).await
        }

        async fn update_game(
            &mut self,
            id: GameId,
            fields: &GameFields,
        ) -> ludo_core::repository::Result<bool> {
            self.0.update_game(id, fields).await
        }

        async fn get_game(
            &mut self,
            criteria: &GameCriteria,
        ) -> ludo_core::repository::Result<Option<GameRecord>> {
            self.0.get_game(criteria).await
        }

        async fn all_games(&mut self) -> ludo_core::repository::Result<Vec<GameRecord>> {
            self.0.all_games().await
        }

        async fn delete_games(
            &mut self,
            criteria: &GameCriteria,
        ) -> ludo_core::repository::Result<u64> {
            self.0.delete_games(criteria).await
        }

        async fn authors_of_game(
            &mut self,
            game: GameId,
        ) -> ludo_core::repository::Result<Vec<AuthorRecord>> {
            self.0.authors_of_game(game).await
        }

        async fn link_authors(
            &mut self,
            _game: GameId,
            _authors: &[AuthorId],
        ) -> ludo_core::repository::Result<()> {
            Err(StorageError::Unavailable("connection reset".to_string()))
        }
    }

    #[async_trait]
    impl Transaction for FailingLinkTx {
        async fn commit(self) -> ludo_core::repository::Result<()> {
            self.0.commit().await
        }

        async fn rollback(self) -> ludo_core::repository::Result<()> {
            self.0.rollback().await
        }
    }

    #[async_trait]
    impl Store for FailingLinkStore {
        type Session = MemoryConnection;
        type Tx = FailingLinkTx;

        async fn session(&self) -> ludo_core::repository::Result<MemoryConnection> {
            self.0.session().await
        }

        async fn begin(&self) -> ludo_core::repository::Result<FailingLinkTx> {
            Ok(FailingLinkTx(self.0.begin().await?))
        }
    }

    #[tokio::test]
    async fn failure_after_writes_rolls_everything_back() {
        let connector = GameAuthorConnector::new(FailingLinkStore(InMemoryStore::new()));
        let existing = seed_author(connector.store(), "Grace", "Hopper").await;

        let err = connector
            .create_game(
                chess(),
                vec![Author::new("Ada", "Lovelace"), Author::new("Alan", "Turing")],
                vec![existing],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Transaction(_)));

        assert!(connector.all_games().await.unwrap().is_empty());
        let authors = connector.all_authors().await.unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].author_id, Some(existing));
    }
}
