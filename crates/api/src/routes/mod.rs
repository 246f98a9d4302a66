pub mod health;

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree. Every route requires a bearer token.
///
/// ```text
/// /story-engine          generate, continue, edit, coach, illustrate (POST)
/// /generate-image        one-off illustration (POST)
/// /text-to-speech        narration (POST)
/// /manage-characters     list, create, update, delete (POST)
/// /manage-places         list, create, update, delete (POST)
/// /user-data             dashboard bootstrap (GET)
/// /profile               update display name (PUT)
/// /stories               paginated list (GET)
/// /stories/{id}          get with images, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/story-engine", post(handlers::story_engine::story_engine))
        .route("/generate-image", post(handlers::images::generate_image))
        .route("/text-to-speech", post(handlers::speech::text_to_speech))
        .route(
            "/manage-characters",
            post(handlers::characters::manage_characters),
        )
        .route("/manage-places", post(handlers::places::manage_places))
        .route("/user-data", get(handlers::user_data::get_user_data))
        .route("/profile", put(handlers::user_data::update_profile))
        .route("/stories", get(handlers::stories::list_stories))
        .route(
            "/stories/{id}",
            get(handlers::stories::get_story).delete(handlers::stories::delete_story),
        )
}
