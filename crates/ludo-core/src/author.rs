use crate::criteria::AuthorCriteria;
use crate::repository::{AuthorStore, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier assigned to an author by the storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(i64);

impl AuthorId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for AuthorId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted author row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
    pub author_id: AuthorId,
    pub first_name: String,
    pub last_name: String,
}

/// The writable columns of an author row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorFields {
    pub first_name: String,
    pub last_name: String,
}

/// An author of one or more games.
///
/// `author_id` stays `None` until the author is first saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub author_id: Option<AuthorId>,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    /// Creates an author that has not been persisted yet.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            author_id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn fields(&self) -> AuthorFields {
        AuthorFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }

    /// Inserts the author if it has no id yet, otherwise updates it in place.
    ///
    /// On insert the generated id is written back into `self.author_id`.
    pub async fn save<S: AuthorStore>(&mut self, store: &mut S) -> Result<()> {
        match self.author_id {
            None => {
                let id = store.insert_author(&self.fields()).await?;
                self.author_id = Some(id);
            }
            Some(id) => {
                store.update_author(id, &self.fields()).await?;
            }
        }
        Ok(())
    }

    /// Returns every author matching `criteria`.
    pub async fn filter<S: AuthorStore>(
        store: &mut S,
        criteria: &AuthorCriteria,
    ) -> Result<Vec<Author>> {
        let records = store.filter_authors(criteria).await?;
        Ok(records.into_iter().map(Author::from).collect())
    }

    /// Returns every stored author.
    pub async fn all<S: AuthorStore>(store: &mut S) -> Result<Vec<Author>> {
        Self::filter(store, &AuthorCriteria::All).await
    }
}

impl From<AuthorRecord> for Author {
    fn from(record: AuthorRecord) -> Self {
        Self {
            author_id: Some(record.author_id),
            first_name: record.first_name,
            last_name: record.last_name,
        }
    }
}
