//! Profile bootstrap and tier checks shared by the generating endpoints.

use dreamtales_core::error::CoreError;
use dreamtales_core::tier;
use dreamtales_db::models::profile::Profile;
use dreamtales_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Load the caller's profile, creating it on first use.
pub async fn ensure_profile(state: &AppState, user: &AuthUser) -> AppResult<Profile> {
    Ok(ProfileRepo::ensure(&state.pool, user.user_id, user.email.as_deref()).await?)
}

/// Reject illustration or narration on the free tier.
pub fn require_media(profile: &Profile, feature: &str) -> Result<(), CoreError> {
    tier::require_media_features(profile.tier(), feature)
}

/// Claim one story from the caller's monthly allowance.
///
/// The claim is atomic in the database, so concurrent generations for the
/// same user cannot both take the last slot.
pub async fn reserve_story(
    state: &AppState,
    user: &AuthUser,
    profile: &Profile,
) -> AppResult<Profile> {
    let tier = profile.tier();
    let limit = tier.monthly_story_limit();
    match ProfileRepo::reserve_story(&state.pool, user.user_id, limit).await? {
        Some(updated) => Ok(updated),
        None => Err(tier::quota_exceeded(tier, limit.unwrap_or_default()).into()),
    }
}

/// Return a slot taken by [`reserve_story`] for a story that was never stored.
pub async fn release_story(state: &AppState, user: &AuthUser) {
    if let Err(e) = ProfileRepo::release_story(&state.pool, user.user_id).await {
        tracing::error!(user_id = %user.user_id, error = %e, "Failed to release story slot");
    }
}
