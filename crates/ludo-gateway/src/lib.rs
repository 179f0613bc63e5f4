//! HTTP surface of the ludo game catalog.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use config::{GatewayConfig, Profile, StorageBackend};
pub use state::AppState;
