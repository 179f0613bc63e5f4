use crate::error::Result;
use crate::model::{
    CreateGameRequest, GameResponse, SuccessResponse, UpdateGameRequest, UpdateGameResponse,
};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use ludo_core::validation::today;
use ludo_core::{GameCriteria, GameId};

pub async fn create_game_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateGameRequest>,
) -> Result<Json<GameResponse>> {
    request.validate(today())?;
    let (game, authors, author_ids) = request.into_parts();
    let created = state
        .catalog()
        .create_game(game, authors, author_ids)
        .await?;
    Ok(Json(created.try_into()?))
}

pub async fn get_game_handler(
    Path(game_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<GameResponse>> {
    let criteria = GameCriteria::Id(GameId::new(game_id));
    let game = state.catalog().get_game(&criteria).await?;
    Ok(Json(game.try_into()?))
}

pub async fn all_games_handler(State(state): State<AppState>) -> Result<Json<Vec<GameResponse>>> {
    let games = state.catalog().all_games().await?;
    let games = games
        .into_iter()
        .map(GameResponse::try_from)
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(games))
}

pub async fn delete_game_handler(
    Path(game_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse>> {
    let criteria = GameCriteria::Id(GameId::new(game_id));
    // Deleting a missing game is not an error.
    state.catalog().delete_game(&criteria).await?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn update_game_handler(
    Path(game_id): Path<i64>,
    State(state): State<AppState>,
    Json(request): Json<UpdateGameRequest>,
) -> Result<Json<UpdateGameResponse>> {
    request.validate(today())?;
    let game = state
        .catalog()
        .update_game(GameId::new(game_id), request.into())
        .await?;
    Ok(Json(game.try_into()?))
}
