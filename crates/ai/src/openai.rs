//! REST client for OpenAI-compatible chat, image and speech endpoints.

use async_trait::async_trait;
use dreamtales_core::prompt::ChatPrompt;
use dreamtales_core::speech::SPEECH_FORMAT;

use crate::config::OpenAiConfig;
use crate::error::ProviderError;
use crate::messages::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ImageGenerationRequest,
    ImageGenerationResponse, SpeechRequest,
};
use crate::provider::{Completion, GeneratedImage, StoryProvider};

/// HTTP client for a single OpenAI-compatible API.
pub struct OpenAiApi {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiApi {
    /// Create a client with the configured request timeout.
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url)
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;
        Self::ensure_success(response).await
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or an
    /// [`ProviderError::Api`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl StoryProvider for OpenAiApi {
    async fn complete(
        &self,
        prompt: &ChatPrompt,
        temperature: f32,
    ) -> Result<Completion, ProviderError> {
        let request = ChatCompletionRequest {
            model: &self.config.story_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: prompt.max_tokens,
            temperature,
        };

        let response: ChatCompletionResponse =
            self.post("chat/completions", &request).await?.json().await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse("completion"))?;
        let text = choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse("completion text"))?;

        tracing::debug!(
            model = %self.config.story_model,
            chars = text.len(),
            finish_reason = ?choice.finish_reason,
            "Completion received"
        );

        Ok(Completion {
            text,
            finish_reason: choice.finish_reason,
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ProviderError> {
        let request = ImageGenerationRequest {
            model: &self.config.image_model,
            prompt,
            n: 1,
            size: &self.config.image_size,
            quality: &self.config.image_quality,
            response_format: &self.config.image_response_format,
        };

        let response: ImageGenerationResponse =
            self.post("images/generations", &request).await?.json().await?;

        let datum = response
            .data
            .into_iter()
            .find(|d| d.url.is_some() || d.b64_json.is_some())
            .ok_or(ProviderError::EmptyResponse("image"))?;

        Ok(GeneratedImage {
            url: datum.url,
            b64_json: datum.b64_json,
            revised_prompt: datum.revised_prompt,
        })
    }

    async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Vec<u8>, ProviderError> {
        let request = SpeechRequest {
            model: &self.config.speech_model,
            input: text,
            voice,
            response_format: SPEECH_FORMAT,
        };

        let bytes = self.post("audio/speech", &request).await?.bytes().await?;
        if bytes.is_empty() {
            return Err(ProviderError::EmptyResponse("audio"));
        }
        Ok(bytes.to_vec())
    }
}
