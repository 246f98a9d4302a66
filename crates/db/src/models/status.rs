//! Serialization helpers for SMALLINT lookup columns.
//!
//! Rows keep the raw lookup id (so `FromRow` maps the column directly) but
//! serialize it as the lowercase lookup name.

use serde::{Serialize, Serializer};

pub use dreamtales_core::status::{StatusId, StoryStatus, SubscriptionTier};

/// Serialize a `story_statuses` id as its name (`"paused"`).
pub fn serialize_story_status<S: Serializer>(id: &StatusId, serializer: S) -> Result<S::Ok, S::Error> {
    match StoryStatus::from_id(*id) {
        Ok(status) => status.serialize(serializer),
        Err(_) => serializer.serialize_i16(*id),
    }
}

/// Serialize a `subscription_tiers` id as its name (`"premium"`).
pub fn serialize_subscription_tier<S: Serializer>(
    id: &StatusId,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match SubscriptionTier::from_id(*id) {
        Ok(tier) => tier.serialize(serializer),
        Err(_) => serializer.serialize_i16(*id),
    }
}
