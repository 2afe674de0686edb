use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::model::Suggestion;
use crate::server::error::{rejection_error, ApiError};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
}

/// GET /api/suggest?q=
pub async fn get_suggestions(
    State(state): State<AppState>,
    params: Result<Query<SuggestParams>, QueryRejection>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| rejection_error(rejection, &state))?;
    let suggestions = state
        .client
        .suggest(&params.q, state.config.suggestion_limit)
        .await
        .map_err(|err| ApiError::new(err, state.config.debug))?;

    Ok(Json(SuggestResponse { suggestions }))
}
