mod author;
mod game;
mod health;

pub use author::all_authors_handler;
pub use game::{
    all_games_handler, create_game_handler, delete_game_handler, get_game_handler,
    update_game_handler,
};
pub use health::health_handler;
