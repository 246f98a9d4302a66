//! Handler for the multi-operation story engine.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use dreamtales_db::models::story_engine::{StoryEngineRequest, StoryEngineResponse};

use crate::engine;
use crate::error::AppResult;
use crate::handlers::parse_tagged;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/story-engine
///
/// Body: `{ "operation": "generate" | "continue" | "edit" | "coach" | "illustrate", ... }`.
/// `generate` answers 201, every other operation 200.
pub async fn story_engine(
    user: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let request: StoryEngineRequest =
        parse_tagged(body, "operation", StoryEngineRequest::OPERATIONS)?;
    let operation = request.operation();
    tracing::debug!(user_id = %user.user_id, operation, "Story engine request");

    let response = engine::dispatch(state, user, request).await?;
    let status = match response {
        StoryEngineResponse::Generate(_) => StatusCode::CREATED,
        _ => StatusCode::OK,
    };
    Ok((status, Json(DataResponse::new(response))))
}
