mod author;
mod game;
mod health;

pub use author::{AuthorResponse, NewAuthorRequest};
pub use game::{
    CreateGameRequest, GameResponse, SuccessResponse, UpdateGameRequest, UpdateGameResponse,
};
pub use health::HealthResponse;
