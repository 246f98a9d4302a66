//! Character entity model and DTOs.

use dreamtales_core::prompt::CharacterBrief;
use dreamtales_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub age: Option<i32>,
    pub appearance: Option<String>,
    /// NOT NULL in the database; defaults to `{}`.
    pub traits: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Character> for CharacterBrief {
    fn from(character: &Character) -> Self {
        CharacterBrief {
            name: character.name.clone(),
            age: character.age,
            description: character.description.clone(),
            appearance: character.appearance.clone(),
            traits: character.traits.clone(),
        }
    }
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCharacter {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
    #[validate(length(max = 500))]
    pub appearance: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub traits: Vec<String>,
}

/// DTO for updating an existing character. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCharacter {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
    #[validate(length(max = 500))]
    pub appearance: Option<String>,
    #[validate(length(max = 20))]
    pub traits: Option<Vec<String>>,
}

/// Body of `POST /manage-characters`, dispatched on `action`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CharacterAction {
    List,
    Create { character: CreateCharacter },
    Update { id: DbId, character: UpdateCharacter },
    Delete { id: DbId },
}

impl CharacterAction {
    /// Every accepted `action` tag.
    pub const ACTIONS: &'static [&'static str] = &["list", "create", "update", "delete"];
}
