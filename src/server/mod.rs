//! JSON API over [`WikiClient`](crate::WikiClient).
//!
//! ```text
//! /health                      liveness + version
//! /api/player?name=<string>    masked career of one player
//! /api/suggest?q=<string>      autocomplete
//! ```

pub mod error;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::middleware::map_response_with_state;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use error::ApiError;
pub use state::AppState;

use crate::error::QuizError;

/// Build the full application [`Router`] with all middleware layers.
///
/// The middleware stack is applied bottom-up:
///
/// 1. CORS
/// 2. Structured request/response tracing
/// 3. Timed-out responses rewritten as JSON errors
/// 4. Request timeout
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(map_response_with_state(state.clone(), timeout_as_api_error))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(build_cors_layer())
        .with_state(state)
}

/// `TimeoutLayer` answers with a bare 408; give it the same JSON body as every other failure.
async fn timeout_as_api_error(State(state): State<AppState>, response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let error = QuizError::RequestTimeout {
        after_secs: state.config.request_timeout_secs,
    };
    ApiError::new(error, state.config.debug).into_response()
}

/// The front end is static and may be served from anywhere; the API is read-only.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}
