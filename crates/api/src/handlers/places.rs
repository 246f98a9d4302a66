//! Place management, dispatched on `action`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dreamtales_core::error::CoreError;
use dreamtales_core::types::DbId;
use dreamtales_db::models::place::PlaceAction;
use dreamtales_db::repositories::PlaceRepo;
use validator::Validate;

use crate::engine::quota;
use crate::error::{AppError, AppResult};
use crate::handlers::parse_tagged;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, Deleted};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Place",
        id,
    })
}

/// POST /api/v1/manage-places
///
/// Body: `{ "action": "list" | "create" | "update" | "delete", ... }`.
pub async fn manage_places(
    user: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Response> {
    let action: PlaceAction = parse_tagged(body, "action", PlaceAction::ACTIONS)?;

    match action {
        PlaceAction::List => {
            let places = PlaceRepo::list_by_user(&state.pool, user.user_id).await?;
            Ok(Json(DataResponse::new(places)).into_response())
        }
        PlaceAction::Create { place } => {
            place.validate()?;
            quota::ensure_profile(&state, &user).await?;
            let created = PlaceRepo::create(&state.pool, user.user_id, &place).await?;

            tracing::info!(
                user_id = %user.user_id,
                place_id = created.id,
                name = %created.name,
                "Place created"
            );
            Ok((StatusCode::CREATED, Json(DataResponse::new(created))).into_response())
        }
        PlaceAction::Update { id, place } => {
            place.validate()?;
            let updated = PlaceRepo::update(&state.pool, user.user_id, id, &place)
                .await?
                .ok_or(not_found(id))?;

            tracing::info!(user_id = %user.user_id, place_id = id, "Place updated");
            Ok(Json(DataResponse::new(updated)).into_response())
        }
        PlaceAction::Delete { id } => {
            if !PlaceRepo::delete(&state.pool, user.user_id, id).await? {
                return Err(not_found(id));
            }

            tracing::info!(user_id = %user.user_id, place_id = id, "Place deleted");
            Ok(Json(DataResponse::new(Deleted { id, deleted: true })).into_response())
        }
    }
}
