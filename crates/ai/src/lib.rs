//! Generative AI provider client.
//!
//! The story engine talks to a [`StoryProvider`]: text completions for
//! stories, image generation for illustrations, and speech synthesis for
//! narration. [`OpenAiApi`] implements it against any
//! OpenAI-compatible HTTP API; tests substitute a scripted fake.
//!
//! [`retry`] holds the backoff loop used around image generation.

pub mod config;
pub mod error;
pub mod messages;
pub mod openai;
pub mod provider;
pub mod retry;

pub use config::OpenAiConfig;
pub use error::ProviderError;
pub use openai::OpenAiApi;
pub use provider::{Completion, GeneratedImage, StoryProvider};
pub use retry::RetryPolicy;
