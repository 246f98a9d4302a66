//! Story image entity model and DTOs.

use dreamtales_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `story_images` table.
///
/// Exactly one of `image_url` / `image_data` is normally set, depending on
/// whether the provider returned a hosted URL or inline base64 data.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoryImage {
    pub id: DbId,
    pub story_id: DbId,
    pub user_id: UserId,
    pub image_url: Option<String>,
    pub image_data: Option<String>,
    pub section_index: i32,
    pub prompt: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a generated image.
#[derive(Debug, Clone)]
pub struct CreateStoryImage {
    pub story_id: DbId,
    pub image_url: Option<String>,
    pub image_data: Option<String>,
    pub section_index: i32,
    pub prompt: String,
}

/// Body of `POST /generate-image`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateImageRequest {
    /// Attach the image to this story when set.
    pub story_id: Option<DbId>,
    #[validate(length(min = 1, max = 1000))]
    pub prompt: String,
    #[validate(range(min = 0, max = 99))]
    pub section_index: Option<i32>,
}

/// Response of `POST /generate-image`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateImageResponse {
    pub image_url: Option<String>,
    pub image_data: Option<String>,
    pub revised_prompt: Option<String>,
    /// The stored row, when the image was attached to a story.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<StoryImage>,
}
