//! Story library: list, read, delete.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use dreamtales_core::error::CoreError;
use dreamtales_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use dreamtales_core::types::DbId;
use dreamtales_db::models::story::StoryWithImages;
use dreamtales_db::repositories::{StoryImageRepo, StoryRepo};

use crate::engine::story::load_story;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{DataResponse, Deleted, Page};
use crate::state::AppState;

/// GET /api/v1/stories?limit=&offset=
///
/// The caller's stories, newest first.
pub async fn list_stories(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = StoryRepo::list_by_user(&state.pool, user.user_id, limit, offset).await?;
    let total = StoryRepo::count_by_user(&state.pool, user.user_id).await?;

    Ok(Json(DataResponse::new(Page {
        items,
        total,
        limit,
        offset,
    })))
}

/// GET /api/v1/stories/{id}
///
/// One story with its illustrations in section order.
pub async fn get_story(
    user: AuthUser,
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let story = load_story(&state, user.user_id, story_id).await?;
    let images = StoryImageRepo::list_by_story(&state.pool, user.user_id, story_id).await?;

    Ok(Json(DataResponse::new(StoryWithImages { story, images })))
}

/// DELETE /api/v1/stories/{id}
///
/// Delete a story; its images go with it.
pub async fn delete_story(
    user: AuthUser,
    State(state): State<AppState>,
    Path(story_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !StoryRepo::delete(&state.pool, user.user_id, story_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Story",
            id: story_id,
        }));
    }

    tracing::info!(user_id = %user.user_id, story_id, "Story deleted");
    Ok(Json(DataResponse::new(Deleted {
        id: story_id,
        deleted: true,
    })))
}
