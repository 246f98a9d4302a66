//! Repository for the `stories` table.

use dreamtales_core::status::StoryStatus;
use dreamtales_core::types::{DbId, UserId};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::story::{CreateStory, Story, UpdateStoryContent};

const COLUMNS: &str = "id, user_id, title, content, prompt, story_type, length, tone, setting, \
     characters, themes, is_complete, status_id, version, created_at, updated_at";

/// Provides persistence for generated stories.
pub struct StoryRepo;

impl StoryRepo {
    /// Insert a freshly generated story at version 1.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateStory,
    ) -> Result<Story, sqlx::Error> {
        let query = format!(
            "INSERT INTO stories
                (user_id, title, content, prompt, story_type, length, tone, setting,
                 characters, themes, is_complete, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.prompt)
            .bind(input.story_type.as_str())
            .bind(input.length.as_str())
            .bind(&input.tone)
            .bind(&input.setting)
            .bind(Json(&input.characters))
            .bind(&input.themes)
            .bind(input.is_complete)
            .bind(input.status.id())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's stories, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Story>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stories
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_user(pool: &PgPool, user_id: UserId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stories WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Replace a story's text and bump its version.
    ///
    /// Returns `None` if no such story is owned by `user_id`.
    pub async fn update_content(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
        input: &UpdateStoryContent,
    ) -> Result<Option<Story>, sqlx::Error> {
        let query = format!(
            "UPDATE stories SET
                title = COALESCE($3, title),
                content = $4,
                is_complete = $5,
                status_id = $6,
                version = version + 1
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.is_complete)
            .bind(input.status.id())
            .fetch_optional(pool)
            .await
    }

    /// Move a story to `status` without touching its text or version.
    pub async fn set_status(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
        status: StoryStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE stories SET status_id = $3 WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .bind(status.id())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a story and, through the cascade, its images.
    pub async fn delete(pool: &PgPool, user_id: UserId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
