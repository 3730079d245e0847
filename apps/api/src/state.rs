use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// `None` when no API key is configured; handlers that need extraction
    /// check this and answer 503 instead of attempting a call.
    pub llm: Option<LlmClient>,
    pub config: Config,
}

impl AppState {
    /// Returns the LLM client or a typed "service unavailable" error.
    pub fn require_llm(&self) -> Result<&LlmClient, crate::errors::AppError> {
        self.llm
            .as_ref()
            .ok_or(crate::errors::AppError::LlmUnavailable)
    }
}
