//! Profile entity model and DTOs.

use dreamtales_core::status::SubscriptionTier;
use dreamtales_core::tier;
use dreamtales_core::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::character::Character;
use crate::models::place::Place;
use crate::models::status::{serialize_subscription_tier, StatusId};
use crate::models::story::Story;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "subscription_tier", serialize_with = "serialize_subscription_tier")]
    pub subscription_tier_id: StatusId,
    pub stories_this_month: i32,
    pub usage_period_start: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    /// Tier of this profile. Unknown ids fall back to the free tier.
    pub fn tier(&self) -> SubscriptionTier {
        SubscriptionTier::from_id(self.subscription_tier_id).unwrap_or(SubscriptionTier::Free)
    }

    /// Stories used in the current calendar month as of `now`.
    pub fn stories_used(&self, now: Timestamp) -> i32 {
        tier::effective_usage(self.stories_this_month, self.usage_period_start, now)
    }
}

/// Quota snapshot returned alongside a profile.
#[derive(Debug, Clone, Serialize)]
pub struct UsageSummary {
    pub subscription_tier: SubscriptionTier,
    pub stories_this_month: i32,
    /// `None` when the tier is unlimited.
    pub monthly_limit: Option<i32>,
    pub stories_remaining: Option<i32>,
    pub media_features: bool,
}

impl UsageSummary {
    pub fn for_profile(profile: &Profile, now: Timestamp) -> Self {
        let tier = profile.tier();
        let used = profile.stories_used(now);
        Self {
            subscription_tier: tier,
            stories_this_month: used,
            monthly_limit: tier.monthly_story_limit(),
            stories_remaining: tier::remaining_stories(tier, used),
            media_features: tier.has_media_features(),
        }
    }
}

/// DTO for updating the caller's own profile.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(min = 1, max = 80))]
    pub display_name: Option<String>,
}

/// Everything the dashboard needs in one call: profile, quota, library.
#[derive(Debug, Clone, Serialize)]
pub struct UserData {
    pub profile: Profile,
    pub usage: UsageSummary,
    pub characters: Vec<Character>,
    pub places: Vec<Place>,
    pub stories: Vec<Story>,
}
