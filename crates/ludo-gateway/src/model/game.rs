use jiff::civil::Date;
use ludo_catalog::GameWithAuthors;
use ludo_core::validation::{
    validate_author_refs, validate_published_date, validate_text, validate_url, GAME_NAME_MAX_LEN,
};
use ludo_core::{Author, AuthorId, Game, GameFields, GameId, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::author::{AuthorResponse, NewAuthorRequest};

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub name: String,
    pub url: String,
    pub published_date: Date,
    #[serde(default)]
    pub author_ids: Vec<AuthorId>,
    #[serde(default)]
    pub authors: Vec<NewAuthorRequest>,
}

impl CreateGameRequest {
    /// Checks every field in declaration order and reports the first failure.
    pub fn validate(&self, today: Date) -> Result<(), ValidationError> {
        validate_text("name", &self.name, GAME_NAME_MAX_LEN)?;
        validate_url("url", &self.url)?;
        validate_published_date("published_date", self.published_date, today)?;
        for (index, author) in self.authors.iter().enumerate() {
            author.validate(index)?;
        }
        validate_author_refs("authors", self.authors.len(), self.author_ids.len())
    }

    /// Splits the request into the unsaved game, its inline authors and the
    /// ids of existing authors.
    pub fn into_parts(self) -> (Game, Vec<Author>, Vec<AuthorId>) {
        let game = Game::new(self.name, self.url, self.published_date);
        let authors = self.authors.into_iter().map(Author::from).collect();
        (game, authors, self.author_ids)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateGameRequest {
    pub name: String,
    pub url: String,
    pub published_date: Date,
}

impl UpdateGameRequest {
    pub fn validate(&self, today: Date) -> Result<(), ValidationError> {
        validate_text("name", &self.name, GAME_NAME_MAX_LEN)?;
        validate_url("url", &self.url)?;
        validate_published_date("published_date", self.published_date, today)
    }
}

impl From<UpdateGameRequest> for GameFields {
    fn from(request: UpdateGameRequest) -> Self {
        GameFields {
            name: request.name,
            url: request.url,
            published_date: request.published_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub game_id: GameId,
    pub name: String,
    pub url: String,
    pub published_date: Date,
    pub authors: Vec<AuthorResponse>,
}

impl TryFrom<GameWithAuthors> for GameResponse {
    type Error = AppError;

    fn try_from(aggregate: GameWithAuthors) -> Result<Self, Self::Error> {
        let GameWithAuthors { game, authors } = aggregate;
        let game_id = saved_id(&game)?;
        let authors = authors
            .into_iter()
            .map(AuthorResponse::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            game_id,
            name: game.name,
            url: game.url,
            published_date: game.published_date,
            authors,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateGameResponse {
    pub game_id: GameId,
    pub name: String,
    pub url: String,
    pub published_date: Date,
}

impl TryFrom<Game> for UpdateGameResponse {
    type Error = AppError;

    fn try_from(game: Game) -> Result<Self, Self::Error> {
        Ok(Self {
            game_id: saved_id(&game)?,
            name: game.name,
            url: game.url,
            published_date: game.published_date,
        })
    }
}

fn saved_id(game: &Game) -> Result<GameId, AppError> {
    game.game_id
        .ok_or_else(|| AppError::Internal(format!("game {} has no id", game.name)))
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
