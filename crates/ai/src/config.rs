use std::time::Duration;

/// Per-call timeout when `PROVIDER_TIMEOUT_SECS` is unset.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 90;

/// Connection settings for an OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Base URL without a trailing slash, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub story_model: String,
    pub image_model: String,
    pub image_size: String,
    pub image_quality: String,
    /// `url` (provider-hosted link) or `b64_json` (inline data).
    pub image_response_format: String,
    pub speech_model: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Load from environment variables. Returns `None` when
    /// `OPENAI_API_KEY` is unset or empty; the server then runs with AI
    /// features disabled.
    ///
    /// | Env var                  | Default                     |
    /// |--------------------------|-----------------------------|
    /// | `OPENAI_API_KEY`         | (required)                  |
    /// | `OPENAI_BASE_URL`        | `https://api.openai.com/v1` |
    /// | `STORY_MODEL`            | `gpt-4o-mini`               |
    /// | `IMAGE_MODEL`            | `dall-e-3`                  |
    /// | `IMAGE_SIZE`             | `1024x1024`                 |
    /// | `IMAGE_QUALITY`          | `standard`                  |
    /// | `IMAGE_RESPONSE_FORMAT`  | `url`                       |
    /// | `SPEECH_MODEL`           | `tts-1`                     |
    /// | `PROVIDER_TIMEOUT_SECS`  | `90`                        |
    ///
    /// The provider timeout stays below the server's request timeout so a
    /// stalled call fails inside the request instead of outliving it.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;

        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };

        let timeout_secs: u64 = std::env::var("PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS);

        Some(Self {
            api_key,
            base_url: var("OPENAI_BASE_URL", "https://api.openai.com/v1")
                .trim_end_matches('/')
                .to_string(),
            story_model: var("STORY_MODEL", "gpt-4o-mini"),
            image_model: var("IMAGE_MODEL", "dall-e-3"),
            image_size: var("IMAGE_SIZE", "1024x1024"),
            image_quality: var("IMAGE_QUALITY", "standard"),
            image_response_format: var("IMAGE_RESPONSE_FORMAT", "url"),
            speech_model: var("SPEECH_MODEL", "tts-1"),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
