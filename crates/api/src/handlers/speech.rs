//! Narration.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dreamtales_core::error::CoreError;
use dreamtales_core::speech::{narration_text, resolve_voice, validate_speech_input, SPEECH_FORMAT};
use dreamtales_db::models::story_engine::{SpeechRequest, SpeechResponse};

use crate::engine::quota;
use crate::engine::story::load_story;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/text-to-speech
///
/// Narrate `text`, or a stored story by `story_id`, and return base64 MP3.
/// Paid tiers only.
pub async fn text_to_speech(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SpeechRequest>,
) -> AppResult<impl IntoResponse> {
    let voice = resolve_voice(input.voice.as_deref())?;
    let provider = state.provider()?;

    let profile = quota::ensure_profile(&state, &user).await?;
    quota::require_media(&profile, "Narration")?;

    let text = match (input.text, input.story_id) {
        (Some(text), _) => text,
        (None, Some(story_id)) => {
            let story = load_story(&state, user.user_id, story_id).await?;
            narration_text(&story.title, &story.content)
        }
        (None, None) => {
            return Err(
                CoreError::Validation("Provide either 'text' or 'story_id'".into()).into(),
            )
        }
    };
    let text = validate_speech_input(&text)?;

    let audio = provider.synthesize_speech(text, voice).await?;
    tracing::info!(
        user_id = %user.user_id,
        voice,
        chars = text.len(),
        bytes = audio.len(),
        "Narration synthesized"
    );

    Ok(Json(DataResponse::new(SpeechResponse {
        audio_content: BASE64.encode(&audio),
        format: SPEECH_FORMAT,
        voice,
    })))
}
