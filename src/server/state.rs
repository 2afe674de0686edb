use std::sync::Arc;

use crate::client::WikiClient;
use crate::config::QuizConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Requests share nothing mutable: the client and configuration are read-only.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<WikiClient>,
    pub config: Arc<QuizConfig>,
}

impl AppState {
    pub fn new(client: WikiClient, config: QuizConfig) -> Self {
        Self {
            client: Arc::new(client),
            config: Arc::new(config),
        }
    }
}
