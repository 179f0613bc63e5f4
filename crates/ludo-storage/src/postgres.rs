use async_trait::async_trait;
use jiff::civil::Date;
use ludo_core::repository::{AuthorStore, GameStore, Result, Store, Transaction};
use ludo_core::{
    AuthorCriteria, AuthorFields, AuthorId, AuthorRecord, GameCriteria, GameFields, GameId,
    GameRecord, StorageError,
};
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPoolOptions, Postgres};
use sqlx::{PgConnection, PgPool};
use std::ops::DerefMut;
use std::path::Path;
use tracing::{debug, info};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// PostgreSQL implementation of the storage contract.
///
/// Dates travel over the wire as ISO `YYYY-MM-DD` text and are parsed
/// back into [`jiff::civil::Date`]. Join rows are removed by the
/// `ON DELETE CASCADE` foreign keys when a game is deleted.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Auto-commit unit of work on a pooled connection.
pub type PgSession = PgConnectionUnit<PoolConnection<Postgres>>;

/// Unit of work inside a database transaction.
pub type PgTransaction = PgConnectionUnit<sqlx::Transaction<'static, Postgres>>;

impl PgStore {
    /// Creates a store from an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the migrations bundled with this crate.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.map_err(map_migrate_error)?;
        info!("applied embedded migrations");
        Ok(())
    }

    /// Applies the migrations found in `dir` instead of the bundled ones.
    pub async fn migrate_from(&self, dir: &Path) -> Result<()> {
        let migrator = Migrator::new(dir).await.map_err(map_migrate_error)?;
        migrator.run(&self.pool).await.map_err(map_migrate_error)?;
        info!(migrations_dir = %dir.display(), "applied migrations");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    type Session = PgSession;
    type Tx = PgTransaction;

    async fn session(&self) -> Result<PgSession> {
        let conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        Ok(PgConnectionUnit { conn })
    }

    async fn begin(&self) -> Result<PgTransaction> {
        let conn = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(PgConnectionUnit { conn })
    }
}

/// A connection-backed unit of work: either a pooled connection or an open
/// transaction, both of which dereference to a [`PgConnection`].
#[derive(Debug)]
pub struct PgConnectionUnit<C> {
    conn: C,
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    author_id: i64,
    first_name: String,
    last_name: String,
}

impl From<AuthorRow> for AuthorRecord {
    fn from(row: AuthorRow) -> Self {
        AuthorRecord {
            author_id: AuthorId::new(row.author_id),
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GameRow {
    game_id: i64,
    name: String,
    url: String,
    published_date: String,
}

impl TryFrom<GameRow> for GameRecord {
    type Error = StorageError;

    fn try_from(row: GameRow) -> Result<Self> {
        Ok(GameRecord {
            game_id: GameId::new(row.game_id),
            name: row.name,
            url: row.url,
            published_date: parse_date(&row.published_date)?,
        })
    }
}

fn parse_date(value: &str) -> Result<Date> {
    value.parse::<Date>().map_err(|e| {
        StorageError::InvalidData(format!("invalid published_date '{}': {e}", value))
    })
}

fn author_ids(ids: &[AuthorId]) -> Vec<i64> {
    ids.iter().map(|id| id.get()).collect()
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_foreign_key_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn map_migrate_error(err: MigrateError) -> StorageError {
    StorageError::Migration(err.to_string())
}

const AUTHOR_COLUMNS: &str = "author_id, first_name, last_name";
const GAME_COLUMNS: &str = "game_id, name, url, published_date::text AS published_date";

#[async_trait]
impl<C> AuthorStore for PgConnectionUnit<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    async fn insert_author(&mut self, fields: &AuthorFields) -> Result<AuthorId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO authors (first_name, last_name)
            VALUES ($1, $2)
            RETURNING author_id
            "#,
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(map_sqlx_error)?;

        debug!(author_id = id, "inserted author");
        Ok(AuthorId::new(id))
    }

    async fn update_author(&mut self, id: AuthorId, fields: &AuthorFields) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE authors
            SET first_name = $1, last_name = $2
            WHERE author_id = $3
            "#,
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(id.get())
        .execute(&mut *self.conn)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn filter_authors(&mut self, criteria: &AuthorCriteria) -> Result<Vec<AuthorRecord>> {
        let rows: Vec<AuthorRow> = match criteria {
            AuthorCriteria::All => {
                sqlx::query_as(&format!(
                    "SELECT {AUTHOR_COLUMNS} FROM authors ORDER BY author_id"
                ))
                .fetch_all(&mut *self.conn)
                .await
            }
            AuthorCriteria::IdIn(ids) if ids.is_empty() => return Ok(Vec::new()),
            AuthorCriteria::IdIn(ids) => {
                sqlx::query_as(&format!(
                    "SELECT {AUTHOR_COLUMNS} FROM authors WHERE author_id = ANY($1) ORDER BY author_id"
                ))
                .bind(author_ids(ids))
                .fetch_all(&mut *self.conn)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(AuthorRecord::from).collect())
    }
}

#[async_trait]
impl<C> GameStore for PgConnectionUnit<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    async fn insert_game(&mut self, fields: &GameFields) -> Result<GameId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO games (name, url, published_date)
            VALUES ($1, $2, $3::date)
            RETURNING game_id
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.url)
        .bind(fields.published_date.to_string())
        .fetch_one(&mut *self.conn)
        .await
        .map_err(map_sqlx_error)?;

        debug!(game_id = id, "inserted game");
        Ok(GameId::new(id))
    }

    async fn update_game(&mut self, id: GameId, fields: &GameFields) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE games
            SET name = $1, url = $2, published_date = $3::date
            WHERE game_id = $4
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.url)
        .bind(fields.published_date.to_string())
        .bind(id.get())
        .execute(&mut *self.conn)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_game(&mut self, criteria: &GameCriteria) -> Result<Option<GameRecord>> {
        let row: Option<GameRow> = match criteria {
            GameCriteria::Id(id) => {
                sqlx::query_as(&format!(
                    "SELECT {GAME_COLUMNS} FROM games WHERE game_id = $1 ORDER BY game_id LIMIT 1"
                ))
                .bind(id.get())
                .fetch_optional(&mut *self.conn)
                .await
            }
            GameCriteria::Name(name) => {
                sqlx::query_as(&format!(
                    "SELECT {GAME_COLUMNS} FROM games WHERE name = $1 ORDER BY game_id LIMIT 1"
                ))
                .bind(name)
                .fetch_optional(&mut *self.conn)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        row.map(GameRecord::try_from).transpose()
    }

    async fn all_games(&mut self) -> Result<Vec<GameRecord>> {
        let rows: Vec<GameRow> =
            sqlx::query_as(&format!("SELECT {GAME_COLUMNS} FROM games ORDER BY game_id"))
                .fetch_all(&mut *self.conn)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter().map(GameRecord::try_from).collect()
    }

    async fn delete_games(&mut self, criteria: &GameCriteria) -> Result<u64> {
        let result = match criteria {
            GameCriteria::Id(id) => {
                sqlx::query("DELETE FROM games WHERE game_id = $1")
                    .bind(id.get())
                    .execute(&mut *self.conn)
                    .await
            }
            GameCriteria::Name(name) => {
                sqlx::query("DELETE FROM games WHERE name = $1")
                    .bind(name)
                    .execute(&mut *self.conn)
                    .await
            }
        }
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn authors_of_game(&mut self, game: GameId) -> Result<Vec<AuthorRecord>> {
        let rows: Vec<AuthorRow> = sqlx::query_as(
            r#"
            SELECT a.author_id, a.first_name, a.last_name
            FROM authors a
            JOIN game_authors ga ON ga.author_id = a.author_id
            WHERE ga.game_id = $1
            ORDER BY a.author_id
            "#,
        )
        .bind(game.get())
        .fetch_all(&mut *self.conn)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(AuthorRecord::from).collect())
    }

    async fn link_authors(&mut self, game: GameId, authors: &[AuthorId]) -> Result<()> {
        if authors.is_empty() {
            return Ok(());
        }

        let result = sqlx::query(
            r#"
            INSERT INTO game_authors (game_id, author_id)
            SELECT $1, UNNEST($2::bigint[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(game.get())
        .bind(author_ids(authors))
        .execute(&mut *self.conn)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => Err(StorageError::MissingReference(
                format!("game {game} or one of its authors"),
            )),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn commit(self) -> Result<()> {
        self.conn.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(self) -> Result<()> {
        self.conn.rollback().await.map_err(map_sqlx_error)
    }
}
