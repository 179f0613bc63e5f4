use ludo_core::validation::{validate_text, AUTHOR_NAME_MAX_LEN};
use ludo_core::{Author, AuthorId, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// An author created inline with a new game.
#[derive(Debug, Deserialize)]
pub struct NewAuthorRequest {
    pub first_name: String,
    pub last_name: String,
}

impl NewAuthorRequest {
    /// `index` is the author's position in the request, used in field names.
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        validate_text(
            &format!("authors[{index}].first_name"),
            &self.first_name,
            AUTHOR_NAME_MAX_LEN,
        )?;
        validate_text(
            &format!("authors[{index}].last_name"),
            &self.last_name,
            AUTHOR_NAME_MAX_LEN,
        )
    }
}

impl From<NewAuthorRequest> for Author {
    fn from(request: NewAuthorRequest) -> Self {
        Author::new(request.first_name, request.last_name)
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub author_id: AuthorId,
    pub first_name: String,
    pub last_name: String,
}

impl TryFrom<Author> for AuthorResponse {
    type Error = AppError;

    fn try_from(author: Author) -> Result<Self, Self::Error> {
        let author_id = author.author_id.ok_or_else(|| {
            AppError::Internal(format!(
                "author {} {} has no id",
                author.first_name, author.last_name
            ))
        })?;
        Ok(Self {
            author_id,
            first_name: author.first_name,
            last_name: author.last_name,
        })
    }
}
