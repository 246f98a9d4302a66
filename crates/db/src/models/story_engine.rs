//! Payloads of the story engine (`POST /story-engine`) and the standalone
//! narration endpoint.
//!
//! The engine request is a single JSON object whose `operation` field picks
//! the variant. Each variant's body is validated separately by the handler.

use dreamtales_core::story::{StoryLength, StoryType};
use dreamtales_core::types::DbId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::profile::UsageSummary;
use crate::models::story::Story;
use crate::models::story_image::StoryImage;

fn default_true() -> bool {
    true
}

/// Body of `POST /story-engine`, dispatched on `operation`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum StoryEngineRequest {
    Generate(GenerateStoryRequest),
    Continue(ContinueStoryRequest),
    Edit(EditStoryRequest),
    Coach(CoachRequest),
    Illustrate(IllustrateRequest),
}

impl StoryEngineRequest {
    /// Every accepted `operation` tag.
    pub const OPERATIONS: &'static [&'static str] =
        &["generate", "continue", "edit", "coach", "illustrate"];

    /// Operation name as it appears on the wire. Used for log fields.
    pub fn operation(&self) -> &'static str {
        match self {
            StoryEngineRequest::Generate(_) => "generate",
            StoryEngineRequest::Continue(_) => "continue",
            StoryEngineRequest::Edit(_) => "edit",
            StoryEngineRequest::Coach(_) => "coach",
            StoryEngineRequest::Illustrate(_) => "illustrate",
        }
    }
}

/// Create a new story from a parent's brief.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GenerateStoryRequest {
    #[validate(length(max = 2000))]
    pub prompt: Option<String>,
    #[serde(default)]
    pub story_type: StoryType,
    #[serde(default)]
    pub length: StoryLength,
    pub tone: Option<String>,
    #[validate(length(max = 200))]
    pub setting: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub themes: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub character_ids: Vec<DbId>,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub place_ids: Vec<DbId>,
    /// Illustrate the story right after writing it (paid tiers only).
    #[serde(default)]
    pub generate_images: bool,
    /// Overrides the length-based image count.
    #[validate(range(min = 1, max = 4))]
    pub image_count: Option<u32>,
    #[validate(length(max = 200))]
    pub image_style: Option<String>,
    /// `false` writes only an opening and leaves the story paused.
    #[serde(default = "default_true")]
    pub complete: bool,
}

/// Extend a paused story.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContinueStoryRequest {
    pub story_id: DbId,
    #[validate(length(max = 1000))]
    pub direction: Option<String>,
    /// Bring the story to its ending and mark it complete.
    #[serde(default)]
    pub finish: bool,
}

/// Revise a story, either by replacing its text or by asking the model.
///
/// Exactly one of `content` and `instruction` must be present.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditStoryRequest {
    pub story_id: DbId,
    #[validate(length(min = 1, max = 1000))]
    pub instruction: Option<String>,
    #[validate(length(min = 1, max = 50000))]
    pub content: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub title: Option<String>,
}

/// Ask the writing coach for ideas. Never persists anything.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CoachRequest {
    #[validate(length(min = 1, max = 2000))]
    pub prompt: String,
    /// Ground the advice in one of the caller's stories.
    pub story_id: Option<DbId>,
}

/// Generate illustrations for an existing story.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IllustrateRequest {
    pub story_id: DbId,
    #[validate(range(min = 1, max = 4))]
    pub count: Option<u32>,
    #[validate(length(max = 200))]
    pub style: Option<String>,
}

/// Result of a story engine call, tagged with the operation that produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum StoryEngineResponse {
    Generate(GeneratedStory),
    Continue(StoryResult),
    Edit(StoryResult),
    Coach(CoachResult),
    Illustrate(IllustrationResult),
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedStory {
    pub story: Story,
    pub images: Vec<StoryImage>,
    /// Set when the story was saved but its illustrations failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_error: Option<String>,
    pub usage: UsageSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryResult {
    pub story: Story,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoachResult {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IllustrationResult {
    pub story_id: DbId,
    pub images: Vec<StoryImage>,
}

// ---------------------------------------------------------------------------
// Narration
// ---------------------------------------------------------------------------

/// Body of `POST /text-to-speech`.
///
/// Either `text` or `story_id` must be set; `text` wins when both are.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechRequest {
    pub text: Option<String>,
    pub story_id: Option<DbId>,
    pub voice: Option<String>,
}

/// Narrated audio, base64-encoded.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechResponse {
    pub audio_content: String,
    pub format: &'static str,
    pub voice: &'static str,
}
