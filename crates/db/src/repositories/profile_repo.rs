//! Repository for the `profiles` table.

use dreamtales_core::status::SubscriptionTier;
use dreamtales_core::types::UserId;
use sqlx::PgPool;

use crate::models::profile::{Profile, UpdateProfile};

const COLUMNS: &str = "id, email, display_name, subscription_tier_id, stories_this_month, \
     usage_period_start, created_at, updated_at";

/// The stored usage period began in an earlier UTC calendar month.
const NEW_PERIOD: &str = "date_trunc('month', usage_period_start AT TIME ZONE 'UTC') \
     < date_trunc('month', NOW() AT TIME ZONE 'UTC')";

/// Provides profile lookup, lazy creation and quota bookkeeping.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Return the profile for `id`, creating a free-tier one on first use.
    ///
    /// A known email is refreshed when the identity service provides one.
    pub async fn ensure(
        pool: &PgPool,
        id: UserId,
        email: Option<&str>,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, email)
             VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET email = COALESCE(EXCLUDED.email, profiles.email)
             RETURNING {COLUMNS}"
        );
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(email)
            .fetch_one(pool)
            .await?;
        tracing::debug!(user_id = %id, tier = profile.subscription_tier_id, "Profile ensured");
        Ok(profile)
    }

    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a profile update. Returns `None` if the profile is missing.
    pub async fn update_display_name(
        pool: &PgPool,
        id: UserId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET display_name = COALESCE($2, display_name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.display_name)
            .fetch_optional(pool)
            .await
    }

    /// Claim one story slot for the current month.
    ///
    /// The count goes up only while it is below `limit` (`None` means
    /// unlimited). A period that started in an earlier calendar month (UTC)
    /// restarts at 1 and moves to now. Check and increment are one
    /// statement, so concurrent generations cannot overshoot the limit.
    /// Returns `None` when the limit is reached or the profile is missing.
    pub async fn reserve_story(
        pool: &PgPool,
        id: UserId,
        limit: Option<i32>,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                stories_this_month = CASE WHEN {NEW_PERIOD} THEN 1 ELSE stories_this_month + 1 END,
                usage_period_start = CASE WHEN {NEW_PERIOD} THEN NOW() ELSE usage_period_start END
             WHERE id = $1
               AND ($2::INT IS NULL OR {NEW_PERIOD} OR stories_this_month < $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(limit)
            .fetch_optional(pool)
            .await
    }

    /// Give back a slot claimed by [`reserve_story`](Self::reserve_story)
    /// when no story came of it. Never goes below zero.
    pub async fn release_story(pool: &PgPool, id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles SET stories_this_month = GREATEST(stories_this_month - 1, 0)
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Change the subscription tier. Billing lives outside this service;
    /// this is the hook its webhook (and tests) use.
    pub async fn set_tier(
        pool: &PgPool,
        id: UserId,
        tier: SubscriptionTier,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE profiles SET subscription_tier_id = $2 WHERE id = $1")
            .bind(id)
            .bind(tier.id())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
