//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods on user-owned
//! tables also take the owner's id and return `None` / `false` for rows
//! that belong to someone else.

pub mod character_repo;
pub mod place_repo;
pub mod profile_repo;
pub mod story_image_repo;
pub mod story_repo;

pub use character_repo::CharacterRepo;
pub use place_repo::PlaceRepo;
pub use profile_repo::ProfileRepo;
pub use story_image_repo::StoryImageRepo;
pub use story_repo::StoryRepo;
