//! Narration rules: supported voices and input limits.

use crate::error::CoreError;
use crate::parsing::truncate_at_word;

/// Voices offered by the text-to-speech provider.
pub const VALID_VOICES: &[&str] = &["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

/// Voice used when the caller does not pick one.
pub const DEFAULT_VOICE: &str = "fable";

/// Longest input accepted by the speech endpoint in a single call.
pub const MAX_SPEECH_INPUT_CHARS: usize = 4096;

/// Audio container returned to clients.
pub const SPEECH_FORMAT: &str = "mp3";

/// Resolve the requested voice, defaulting to [`DEFAULT_VOICE`].
pub fn resolve_voice(voice: Option<&str>) -> Result<&'static str, CoreError> {
    let Some(requested) = voice.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_VOICE);
    };
    let lowered = requested.to_lowercase();
    VALID_VOICES
        .iter()
        .find(|v| **v == lowered)
        .copied()
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid voice '{requested}'. Must be one of: {}",
                VALID_VOICES.join(", ")
            ))
        })
}

/// Validate narration input: non-empty and within [`MAX_SPEECH_INPUT_CHARS`].
pub fn validate_speech_input(text: &str) -> Result<&str, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Text to narrate must not be empty".into()));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_SPEECH_INPUT_CHARS {
        return Err(CoreError::Validation(format!(
            "Text to narrate is {chars} characters; the limit is {MAX_SPEECH_INPUT_CHARS}"
        )));
    }
    Ok(trimmed)
}

/// Text read aloud for a stored story: the title, then as much of the body
/// as fits in one request. A cut story ends at the last full sentence that
/// fits, or at a word boundary when no sentence does.
pub fn narration_text(title: &str, content: &str) -> String {
    let full = format!("{}.\n\n{}", title.trim().trim_end_matches('.'), content.trim());
    if full.chars().count() <= MAX_SPEECH_INPUT_CHARS {
        return full;
    }
    let cut = truncate_at_word(&full, MAX_SPEECH_INPUT_CHARS);
    match cut.rfind(['.', '!', '?']) {
        Some(end) if end > cut.len() / 2 => cut[..=end].to_string(),
        _ => cut,
    }
}
