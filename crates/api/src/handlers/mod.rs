pub mod characters;
pub mod images;
pub mod places;
pub mod speech;
pub mod stories;
pub mod story_engine;
pub mod user_data;

use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// Parse a body dispatched on a tag field (`operation`, `action`).
///
/// A missing or unknown tag gets a message naming the accepted values;
/// any other shape error is reported as an invalid body.
pub(crate) fn parse_tagged<T: DeserializeOwned>(
    body: serde_json::Value,
    tag: &str,
    known: &[&str],
) -> AppResult<T> {
    match body.get(tag).and_then(serde_json::Value::as_str) {
        None => {
            return Err(AppError::BadRequest(format!(
                "Missing '{tag}'. Expected one of: {}",
                known.join(", ")
            )))
        }
        Some(name) if !known.contains(&name) => {
            return Err(AppError::BadRequest(format!(
                "Unknown {tag} '{name}'. Expected one of: {}",
                known.join(", ")
            )))
        }
        Some(_) => {}
    }

    serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}
