//! Story engine: the operations behind `POST /story-engine`.
//!
//! Each operation is an async function taking the shared state and the
//! authenticated caller. [`dispatch`] validates the payload and routes it to
//! the matching operation on a spawned task.

pub mod illustration;
pub mod quota;
pub mod story;

use dreamtales_db::models::story_engine::{StoryEngineRequest, StoryEngineResponse};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Validate and run one story engine operation.
///
/// The operation runs on its own task, so a dropped request (client abort,
/// request timeout) cannot stop it between marking a story `generating` and
/// storing the result or restoring the status.
pub async fn dispatch(
    state: AppState,
    user: AuthUser,
    request: StoryEngineRequest,
) -> AppResult<StoryEngineResponse> {
    let operation = request.operation();
    tokio::spawn(async move { run(&state, &user, request).await })
        .await
        .map_err(|e| AppError::InternalError(format!("story engine {operation} task failed: {e}")))?
}

async fn run(
    state: &AppState,
    user: &AuthUser,
    request: StoryEngineRequest,
) -> AppResult<StoryEngineResponse> {
    match request {
        StoryEngineRequest::Generate(req) => {
            req.validate()?;
            story::generate(state, user, req)
                .await
                .map(StoryEngineResponse::Generate)
        }
        StoryEngineRequest::Continue(req) => {
            req.validate()?;
            story::continue_story(state, user, req)
                .await
                .map(StoryEngineResponse::Continue)
        }
        StoryEngineRequest::Edit(req) => {
            req.validate()?;
            story::edit(state, user, req)
                .await
                .map(StoryEngineResponse::Edit)
        }
        StoryEngineRequest::Coach(req) => {
            req.validate()?;
            story::coach(state, user, req)
                .await
                .map(StoryEngineResponse::Coach)
        }
        StoryEngineRequest::Illustrate(req) => {
            req.validate()?;
            story::illustrate(state, user, req)
                .await
                .map(StoryEngineResponse::Illustrate)
        }
    }
}
