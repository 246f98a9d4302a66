//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` + `Validate` DTOs for inserts and partial updates
//!
//! [`story_engine`] holds the request/response payloads of the story
//! engine operations, which are composed from the entity structs.

pub mod character;
pub mod place;
pub mod profile;
pub mod status;
pub mod story;
pub mod story_engine;
pub mod story_image;
