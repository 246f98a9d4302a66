//! Place entity model and DTOs.

use dreamtales_core::prompt::PlaceBrief;
use dreamtales_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `places` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Place {
    pub id: DbId,
    pub user_id: UserId,
    pub name: String,
    /// Free-text tag such as `"forest"` or `"castle"`.
    pub location_type: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Place> for PlaceBrief {
    fn from(place: &Place) -> Self {
        PlaceBrief {
            name: place.name.clone(),
            location_type: place.location_type.clone(),
            description: place.description.clone(),
        }
    }
}

/// DTO for creating a new place.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlace {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub location_type: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// DTO for updating an existing place. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlace {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub location_type: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Body of `POST /manage-places`, dispatched on `action`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlaceAction {
    List,
    Create { place: CreatePlace },
    Update { id: DbId, place: UpdatePlace },
    Delete { id: DbId },
}

impl PlaceAction {
    /// Every accepted `action` tag.
    pub const ACTIONS: &'static [&'static str] = &["list", "create", "update", "delete"];
}
