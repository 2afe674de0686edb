use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::model::{PlayerQuery, PlayerQuiz};
use crate::server::error::{rejection_error, ApiError};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlayerParams {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub player: PlayerQuiz,
}

/// GET /api/player?name=
///
/// A missing or blank `name` is rejected by lookup validation with 400.
pub async fn get_player(
    State(state): State<AppState>,
    params: Result<Query<PlayerParams>, QueryRejection>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| rejection_error(rejection, &state))?;
    let query = PlayerQuery::new(params.name);
    let player = state
        .client
        .get_player(&query)
        .await
        .map_err(|err| ApiError::new(err, state.config.debug))?;

    Ok(Json(PlayerResponse { player }))
}
