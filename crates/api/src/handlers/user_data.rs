//! Dashboard bootstrap and profile settings.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use dreamtales_core::pagination::DEFAULT_PAGE_LIMIT;
use dreamtales_db::models::profile::{UpdateProfile, UsageSummary, UserData};
use dreamtales_db::repositories::{CharacterRepo, PlaceRepo, ProfileRepo, StoryRepo};
use validator::Validate;

use crate::engine::quota;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/user-data
///
/// Profile and quota, characters, places and the most recent stories.
/// Creates the profile on first call.
pub async fn get_user_data(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = quota::ensure_profile(&state, &user).await?;
    let characters = CharacterRepo::list_by_user(&state.pool, user.user_id).await?;
    let places = PlaceRepo::list_by_user(&state.pool, user.user_id).await?;
    let stories = StoryRepo::list_by_user(&state.pool, user.user_id, DEFAULT_PAGE_LIMIT, 0).await?;

    Ok(Json(DataResponse::new(UserData {
        usage: UsageSummary::for_profile(&profile, Utc::now()),
        profile,
        characters,
        places,
        stories,
    })))
}

/// PUT /api/v1/profile
pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    quota::ensure_profile(&state, &user).await?;

    let profile = ProfileRepo::update_display_name(&state.pool, user.user_id, &input)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("profile {} vanished", user.user_id)))?;

    tracing::info!(user_id = %user.user_id, "Profile updated");
    Ok(Json(DataResponse::new(profile)))
}
