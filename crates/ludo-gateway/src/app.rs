use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    all_authors_handler, all_games_handler, create_game_handler, delete_game_handler,
    get_game_handler, health_handler, update_game_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/createGame", post(create_game_handler))
            .route("/getGame/{game_id}", get(get_game_handler))
            .route("/allGames", get(all_games_handler))
            .route("/deleteGame/{game_id}", delete(delete_game_handler))
            .route("/updateGame/{game_id}", put(update_game_handler))
            .route("/allAuthors", get(all_authors_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
