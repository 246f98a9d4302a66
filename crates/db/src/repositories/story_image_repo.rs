//! Repository for the `story_images` table.

use dreamtales_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::story_image::{CreateStoryImage, StoryImage};

const COLUMNS: &str =
    "id, story_id, user_id, image_url, image_data, section_index, prompt, created_at, updated_at";

/// Provides persistence for story illustrations.
pub struct StoryImageRepo;

impl StoryImageRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateStoryImage,
    ) -> Result<StoryImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO story_images (story_id, user_id, image_url, image_data, section_index, prompt)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StoryImage>(&query)
            .bind(input.story_id)
            .bind(user_id)
            .bind(&input.image_url)
            .bind(&input.image_data)
            .bind(input.section_index)
            .bind(&input.prompt)
            .fetch_one(pool)
            .await
    }

    /// All images of a story in reading order.
    pub async fn list_by_story(
        pool: &PgPool,
        user_id: UserId,
        story_id: DbId,
    ) -> Result<Vec<StoryImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM story_images
             WHERE story_id = $1 AND user_id = $2
             ORDER BY section_index ASC, id ASC"
        );
        sqlx::query_as::<_, StoryImage>(&query)
            .bind(story_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_story(
        pool: &PgPool,
        user_id: UserId,
        story_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM story_images WHERE story_id = $1 AND user_id = $2",
        )
        .bind(story_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
