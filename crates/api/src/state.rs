use std::sync::Arc;

use dreamtales_ai::StoryProvider;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: dreamtales_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Generative AI backend. `None` when no API key is configured.
    pub provider: Option<Arc<dyn StoryProvider>>,
}

impl AppState {
    /// The configured provider, or 503 when AI features are disabled.
    pub fn provider(&self) -> AppResult<&dyn StoryProvider> {
        self.provider
            .as_deref()
            .ok_or(AppError::ProviderUnavailable)
    }
}
