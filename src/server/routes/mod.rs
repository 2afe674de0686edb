pub mod health;
pub mod player;
pub mod suggest;

use axum::routing::get;
use axum::Router;

use crate::server::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /player?name=<string>    GET  masked career
/// /suggest?q=<string>      GET  autocomplete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/player", get(player::get_player))
        .route("/suggest", get(suggest::get_suggestions))
}
