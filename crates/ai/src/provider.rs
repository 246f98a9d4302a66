//! Provider-neutral interface used by the story engine.

use async_trait::async_trait;
use dreamtales_core::prompt::ChatPrompt;

use crate::error::ProviderError;

/// A finished text completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    /// `stop`, `length`, ... as reported by the provider.
    pub finish_reason: Option<String>,
}

impl Completion {
    /// The model ran out of tokens before finishing.
    pub fn was_truncated(&self) -> bool {
        self.finish_reason.as_deref() == Some("length")
    }
}

/// A generated image. At least one of `url` / `b64_json` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: Option<String>,
    pub b64_json: Option<String>,
    /// The prompt after the provider's own rewriting, when it reports one.
    pub revised_prompt: Option<String>,
}

/// Everything the story engine needs from a generative AI backend.
#[async_trait]
pub trait StoryProvider: Send + Sync {
    /// Run a chat completion for an assembled prompt.
    async fn complete(
        &self,
        prompt: &ChatPrompt,
        temperature: f32,
    ) -> Result<Completion, ProviderError>;

    /// Generate a single image for `prompt`.
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError>;

    /// Synthesize narration audio. Returns raw MP3 bytes.
    async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Vec<u8>, ProviderError>;
}
