//! Story entity model and DTOs.

use dreamtales_core::prompt::CharacterBrief;
use dreamtales_core::status::StoryStatus;
use dreamtales_core::story::{StoryLength, StoryType};
use dreamtales_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::status::{serialize_story_status, StatusId};
use crate::models::story_image::StoryImage;

/// A row from the `stories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Story {
    pub id: DbId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    /// The parent's original idea, if any.
    pub prompt: Option<String>,
    /// `structured` or `freeform`.
    pub story_type: String,
    /// `short`, `medium` or `long`.
    pub length: String,
    pub tone: Option<String>,
    pub setting: Option<String>,
    /// Snapshot of the characters used, as a JSON array of briefs.
    pub characters: serde_json::Value,
    pub themes: Vec<String>,
    pub is_complete: bool,
    #[serde(rename = "status", serialize_with = "serialize_story_status")]
    pub status_id: StatusId,
    /// Bumped on every content change. Not used for locking.
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Story {
    /// Generation status. Unknown ids read as `draft`.
    pub fn status(&self) -> StoryStatus {
        StoryStatus::from_id(self.status_id).unwrap_or(StoryStatus::Draft)
    }

    /// Length bucket. Rows are CHECK-constrained, so the fallback is unreachable
    /// in practice.
    pub fn length(&self) -> StoryLength {
        self.length.parse().unwrap_or_default()
    }

    /// Character briefs embedded at generation time.
    pub fn character_briefs(&self) -> Vec<CharacterBrief> {
        serde_json::from_value(self.characters.clone()).unwrap_or_default()
    }
}

/// DTO for inserting a freshly generated story.
#[derive(Debug, Clone)]
pub struct CreateStory {
    pub title: String,
    pub content: String,
    pub prompt: Option<String>,
    pub story_type: StoryType,
    pub length: StoryLength,
    pub tone: Option<String>,
    pub setting: Option<String>,
    pub characters: Vec<CharacterBrief>,
    pub themes: Vec<String>,
    pub is_complete: bool,
    pub status: StoryStatus,
}

/// DTO for replacing a story's text after a continue or edit pass.
#[derive(Debug, Clone)]
pub struct UpdateStoryContent {
    /// `None` keeps the current title.
    pub title: Option<String>,
    pub content: String,
    pub is_complete: bool,
    pub status: StoryStatus,
}

/// A story together with its illustrations, ordered by section index.
#[derive(Debug, Clone, Serialize)]
pub struct StoryWithImages {
    #[serde(flatten)]
    pub story: Story,
    pub images: Vec<StoryImage>,
}
