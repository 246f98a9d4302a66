//! Character management, dispatched on `action`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dreamtales_core::error::CoreError;
use dreamtales_core::types::DbId;
use dreamtales_db::models::character::CharacterAction;
use dreamtales_db::repositories::CharacterRepo;
use validator::Validate;

use crate::engine::quota;
use crate::error::{AppError, AppResult};
use crate::handlers::parse_tagged;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, Deleted};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Character",
        id,
    })
}

/// POST /api/v1/manage-characters
///
/// Body: `{ "action": "list" | "create" | "update" | "delete", ... }`.
pub async fn manage_characters(
    user: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Response> {
    let action: CharacterAction = parse_tagged(body, "action", CharacterAction::ACTIONS)?;

    match action {
        CharacterAction::List => {
            let characters = CharacterRepo::list_by_user(&state.pool, user.user_id).await?;
            Ok(Json(DataResponse::new(characters)).into_response())
        }
        CharacterAction::Create { character } => {
            character.validate()?;
            quota::ensure_profile(&state, &user).await?;
            let created = CharacterRepo::create(&state.pool, user.user_id, &character).await?;

            tracing::info!(
                user_id = %user.user_id,
                character_id = created.id,
                name = %created.name,
                "Character created"
            );
            Ok((StatusCode::CREATED, Json(DataResponse::new(created))).into_response())
        }
        CharacterAction::Update { id, character } => {
            character.validate()?;
            let updated = CharacterRepo::update(&state.pool, user.user_id, id, &character)
                .await?
                .ok_or(not_found(id))?;

            tracing::info!(user_id = %user.user_id, character_id = id, "Character updated");
            Ok(Json(DataResponse::new(updated)).into_response())
        }
        CharacterAction::Delete { id } => {
            if !CharacterRepo::delete(&state.pool, user.user_id, id).await? {
                return Err(not_found(id));
            }

            tracing::info!(user_id = %user.user_id, character_id = id, "Character deleted");
            Ok(Json(DataResponse::new(Deleted { id, deleted: true })).into_response())
        }
    }
}
