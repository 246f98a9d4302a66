//! Repository for the `places` table.

use dreamtales_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::place::{CreatePlace, Place, UpdatePlace};

const COLUMNS: &str = "id, user_id, name, location_type, description, created_at, updated_at";

/// Provides CRUD operations for a user's places.
pub struct PlaceRepo;

impl PlaceRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreatePlace,
    ) -> Result<Place, sqlx::Error> {
        let query = format!(
            "INSERT INTO places (user_id, name, location_type, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.location_type)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<Place>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM places WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Load the given places in the order their ids were passed, skipping
    /// ids the user does not own.
    pub async fn find_by_ids(
        pool: &PgPool,
        user_id: UserId,
        ids: &[DbId],
    ) -> Result<Vec<Place>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM places
             WHERE user_id = $1 AND id = ANY($2)
             ORDER BY array_position($2, id)"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(user_id)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_user(pool: &PgPool, user_id: UserId) -> Result<Vec<Place>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM places WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a place. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
        input: &UpdatePlace,
    ) -> Result<Option<Place>, sqlx::Error> {
        let query = format!(
            "UPDATE places SET
                name = COALESCE($3, name),
                location_type = COALESCE($4, location_type),
                description = COALESCE($5, description)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.location_type)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: UserId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
