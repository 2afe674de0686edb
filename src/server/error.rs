use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::{ErrorCategory, QuizError};
use crate::server::state::AppState;

/// A [`QuizError`] on its way out of a handler.
///
/// Produces `{"error": message, "code": category}`; `details` carries the
/// full error only when the service runs with `QUIZ_DEBUG`.
#[derive(Debug)]
pub struct ApiError {
    pub error: QuizError,
    pub include_details: bool,
}

impl ApiError {
    pub fn new(error: QuizError, include_details: bool) -> Self {
        Self {
            error,
            include_details,
        }
    }
}

/// Malformed query strings are the caller's fault and get the usual JSON body.
pub(crate) fn rejection_error(rejection: QueryRejection, state: &AppState) -> ApiError {
    ApiError::new(
        QuizError::InvalidInput(rejection.body_text()),
        state.config.debug,
    )
}

pub fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::InvalidInput | ErrorCategory::Ambiguous => StatusCode::BAD_REQUEST,
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::NotAFootballer | ErrorCategory::MalformedData => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ErrorCategory::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        ErrorCategory::Timeout => StatusCode::REQUEST_TIMEOUT,
    }
}

/// Human-readable message for the caller. Transport failures are not spelled out.
fn public_message(error: &QuizError) -> String {
    match error {
        QuizError::InvalidInput(msg) => msg.clone(),
        QuizError::NotFound { query } => format!("No player found for {query:?}"),
        QuizError::Ambiguous { query, candidates } => format!(
            "{query:?} matches several players: {}. Try a more specific name",
            candidates.join(", ")
        ),
        QuizError::NotAFootballer { title } => {
            format!("{title:?} does not appear to be a footballer's page")
        }
        QuizError::RequestTimeout { after_secs } => {
            format!("The request did not complete within {after_secs} seconds")
        }
        _ => match error.category() {
            ErrorCategory::MalformedData => {
                "The player's career data could not be read".to_string()
            }
            ErrorCategory::Timeout => "Wikipedia took too long to respond".to_string(),
            _ => "Wikipedia is currently unavailable".to_string(),
        },
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let category = self.error.category();
        let status = status_for(category);

        if status.is_server_error() {
            tracing::error!(error = %self.error, code = %category, "request failed");
        } else {
            tracing::debug!(error = %self.error, code = %category, "request rejected");
        }

        let mut body = json!({
            "error": public_message(&self.error),
            "code": category.as_ref(),
        });
        if self.include_details {
            body["details"] = json!(format!("{:?}", self.error));
        }

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404_without_details() {
        let err = QuizError::NotFound {
            query: "xyzqqq123".to_string(),
        };
        let response = ApiError::new(err, false).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_of(response).await;
        assert_eq!(body["code"], "not_found");
        assert!(body["error"].as_str().unwrap().contains("xyzqqq123"));
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_details_only_in_debug_mode() {
        let err = QuizError::malformed("senior career row 2004– has no team");
        let response = ApiError::new(err, true).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body["code"], "malformed_data");
        assert!(body["details"].as_str().unwrap().contains("has no team"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorCategory::Ambiguous), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorCategory::NotAFootballer),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(ErrorCategory::UpstreamUnavailable),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status_for(ErrorCategory::Timeout), StatusCode::REQUEST_TIMEOUT);
    }
}
