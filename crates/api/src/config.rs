use std::time::Duration;

use dreamtales_ai::RetryPolicy;

use crate::auth::jwt::JwtConfig;

/// Request timeout when `REQUEST_TIMEOUT_SECS` is unset. Kept above the
/// provider's per-call timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Illustrated
    /// generations make several sequential image calls, so this is longer
    /// than a typical API timeout.
    pub request_timeout_secs: u64,
    /// Bearer token validation settings.
    pub jwt: JwtConfig,
    /// Story engine tuning.
    pub generation: GenerationConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .map(|v| v.parse().expect("REQUEST_TIMEOUT_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            generation: GenerationConfig::from_env(),
        }
    }
}

/// Story engine tuning knobs.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Sampling temperature for story completions.
    pub temperature: f32,
    /// Retry policy wrapped around every image request.
    pub image_retry: RetryPolicy,
    /// Pause between consecutive image requests of one story.
    pub image_request_delay: Duration,
}

/// Default sampling temperature for story text.
const DEFAULT_TEMPERATURE: f32 = 0.8;
/// Default pause between image requests.
const DEFAULT_IMAGE_DELAY_MS: u64 = 2000;

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            image_retry: RetryPolicy::default(),
            image_request_delay: Duration::from_millis(DEFAULT_IMAGE_DELAY_MS),
        }
    }
}

impl GenerationConfig {
    /// Load from environment variables with defaults.
    ///
    /// | Env Var                  | Default |
    /// |--------------------------|---------|
    /// | `STORY_TEMPERATURE`      | `0.8`   |
    /// | `IMAGE_RETRY_ATTEMPTS`   | `3`     |
    /// | `IMAGE_RETRY_BASE_MS`    | `1000`  |
    /// | `IMAGE_REQUEST_DELAY_MS` | `2000`  |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let temperature: f32 = std::env::var("STORY_TEMPERATURE")
            .ok()
            .map(|v| v.parse().expect("STORY_TEMPERATURE must be a valid f32"))
            .unwrap_or(defaults.temperature);

        let max_attempts: u32 = std::env::var("IMAGE_RETRY_ATTEMPTS")
            .ok()
            .map(|v| v.parse().expect("IMAGE_RETRY_ATTEMPTS must be a valid u32"))
            .unwrap_or(defaults.image_retry.max_attempts);

        let base_delay = std::env::var("IMAGE_RETRY_BASE_MS")
            .ok()
            .map(|v| {
                Duration::from_millis(v.parse().expect("IMAGE_RETRY_BASE_MS must be a valid u64"))
            })
            .unwrap_or(defaults.image_retry.base_delay);

        let image_request_delay = std::env::var("IMAGE_REQUEST_DELAY_MS")
            .ok()
            .map(|v| {
                Duration::from_millis(
                    v.parse()
                        .expect("IMAGE_REQUEST_DELAY_MS must be a valid u64"),
                )
            })
            .unwrap_or(defaults.image_request_delay);

        Self {
            temperature,
            image_retry: RetryPolicy {
                max_attempts,
                base_delay,
            },
            image_request_delay,
        }
    }
}
