use crate::error::{CatalogError, Result};
use ludo_core::repository::Result as StoreResult;
use ludo_core::validation::validate_author_refs;
use ludo_core::{
    Author, AuthorCriteria, AuthorId, AuthorStore, Game, GameCriteria, GameStore, StorageError,
    ValidationError,
};
use tracing::trace;

/// A game together with its authors.
///
/// This is a transient view: it has no identity of its own and is never
/// stored, only its game and authors are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameWithAuthors {
    pub game: Game,
    pub authors: Vec<Author>,
}

impl GameWithAuthors {
    /// Builds the aggregate for `game`.
    ///
    /// If the game's author relation has not been loaded yet, the game is
    /// reloaded by id first, which also loads its authors.
    pub async fn for_game<S: GameStore>(store: &mut S, game: Game) -> Result<Self> {
        let game = match game.authors {
            Some(_) => game,
            None => {
                let id = game
                    .game_id
                    .ok_or_else(|| CatalogError::NotFound("unsaved game".to_string()))?;
                trace!(game_id = %id, "reloading game to load its authors");
                Game::get(store, &GameCriteria::Id(id))
                    .await?
                    .ok_or_else(|| CatalogError::NotFound(format!("game {id}")))?
            }
        };

        let authors = game.authors.clone().unwrap_or_default();
        Ok(Self { game, authors })
    }

    /// Adds already persisted authors to an already persisted game.
    pub async fn link_authors<S: GameStore>(
        store: &mut S,
        game: &Game,
        authors: &[Author],
    ) -> StoreResult<()> {
        let Some(game_id) = game.game_id else {
            return Err(StorageError::MissingReference("unsaved game".to_string()));
        };
        let mut ids = Vec::with_capacity(authors.len());
        for author in authors {
            let id = author.author_id.ok_or_else(|| {
                StorageError::MissingReference(format!(
                    "unsaved author {} {}",
                    author.first_name, author.last_name
                ))
            })?;
            ids.push(id);
        }
        store.link_authors(game_id, &ids).await
    }

    /// Creates a game with its authors using the caller's transaction.
    ///
    /// Steps:
    /// 1. resolve `author_ids`; an unknown or repeated id fails with a
    ///    validation error on `author_ids` before anything is written,
    /// 2. insert the game,
    /// 3. insert every inline author,
    /// 4. combine inline and resolved authors,
    /// 5. link them all to the game.
    ///
    /// The caller owns `tx` and must commit it on success. On error it must
    /// roll back (or drop) the transaction, which discards every write.
    pub async fn create_in<S: AuthorStore + GameStore>(
        tx: &mut S,
        mut game: Game,
        mut authors: Vec<Author>,
        author_ids: &[AuthorId],
    ) -> Result<Self> {
        validate_author_refs("authors", authors.len(), author_ids.len())?;

        // Every requested id must resolve to its own author row, so a repeated
        // id fails just like an unknown one.
        let existing = Author::filter(tx, &AuthorCriteria::IdIn(author_ids.to_vec())).await?;
        if existing.len() != author_ids.len() {
            return Err(ValidationError::new("author_ids", "Some field is wrong.").into());
        }

        game.save(tx).await.map_err(CatalogError::Transaction)?;
        for author in &mut authors {
            author.save(tx).await.map_err(CatalogError::Transaction)?;
        }
        authors.extend(existing);

        Self::link_authors(tx, &game, &authors)
            .await
            .map_err(CatalogError::Transaction)?;

        game.authors = Some(authors.clone());
        Ok(Self { game, authors })
    }
}
