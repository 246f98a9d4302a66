//! One-off image generation.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use dreamtales_core::error::CoreError;
use dreamtales_db::models::story_image::{
    CreateStoryImage, GenerateImageRequest, GenerateImageResponse,
};
use dreamtales_db::repositories::StoryImageRepo;
use validator::Validate;

use crate::engine::quota;
use crate::engine::story::load_story;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/generate-image
///
/// Generate one image from a prompt. With `story_id` the image is also
/// stored against that story at `section_index` (default 0). Paid tiers only.
pub async fn generate_image(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateImageRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let prompt = input.prompt.trim();
    if prompt.is_empty() {
        return Err(CoreError::Validation("Prompt must not be empty".into()).into());
    }
    let provider = state.provider()?;

    let profile = quota::ensure_profile(&state, &user).await?;
    quota::require_media(&profile, "Illustration")?;

    let story = match input.story_id {
        Some(id) => Some(load_story(&state, user.user_id, id).await?),
        None => None,
    };

    let generated = state
        .config
        .generation
        .image_retry
        .run("image", move || provider.generate_image(prompt))
        .await?;

    let image = match story {
        Some(story) => {
            let image = StoryImageRepo::create(
                &state.pool,
                user.user_id,
                &CreateStoryImage {
                    story_id: story.id,
                    image_url: generated.url.clone(),
                    image_data: generated.b64_json.clone(),
                    section_index: input.section_index.unwrap_or(0),
                    prompt: prompt.to_string(),
                },
            )
            .await?;
            tracing::info!(
                user_id = %user.user_id,
                story_id = story.id,
                section_index = image.section_index,
                "Story image generated"
            );
            Some(image)
        }
        None => None,
    };

    Ok(Json(DataResponse::new(GenerateImageResponse {
        image_url: generated.url,
        image_data: generated.b64_json,
        revised_prompt: generated.revised_prompt,
        image,
    })))
}
