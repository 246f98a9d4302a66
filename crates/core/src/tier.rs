//! Subscription tier rules: monthly story quotas and paid-only features.

use chrono::Datelike;

use crate::error::CoreError;
use crate::status::SubscriptionTier;
use crate::types::Timestamp;

/// Stories per calendar month on the free tier.
pub const FREE_MONTHLY_STORIES: i32 = 3;
/// Stories per calendar month on the premium tier.
pub const PREMIUM_MONTHLY_STORIES: i32 = 30;

impl SubscriptionTier {
    /// Monthly story allowance. `None` means unlimited.
    pub fn monthly_story_limit(self) -> Option<i32> {
        match self {
            SubscriptionTier::Free => Some(FREE_MONTHLY_STORIES),
            SubscriptionTier::Premium => Some(PREMIUM_MONTHLY_STORIES),
            SubscriptionTier::Dreambook => None,
        }
    }

    /// Illustrations and narration are only offered on paid tiers.
    pub fn has_media_features(self) -> bool {
        !matches!(self, SubscriptionTier::Free)
    }
}

/// Whether `period_start` falls in an earlier UTC calendar month than `now`.
pub fn is_new_period(period_start: Timestamp, now: Timestamp) -> bool {
    (period_start.year(), period_start.month()) < (now.year(), now.month())
}

/// Stories used in the current period, treating a stale period as zero.
pub fn effective_usage(stored_count: i32, period_start: Timestamp, now: Timestamp) -> i32 {
    if is_new_period(period_start, now) {
        0
    } else {
        stored_count.max(0)
    }
}

/// Stories left this period. `None` means unlimited.
pub fn remaining_stories(tier: SubscriptionTier, used: i32) -> Option<i32> {
    tier.monthly_story_limit()
        .map(|limit| (limit - used).max(0))
}

/// The error returned when a tier has no stories left this month.
pub fn quota_exceeded(tier: SubscriptionTier, limit: i32) -> CoreError {
    CoreError::QuotaExceeded(format!(
        "Monthly story limit reached ({limit} stories on the {tier} plan). \
         Upgrade your plan or wait until next month."
    ))
}

/// Reject a media feature (illustration, narration) on the free tier.
pub fn require_media_features(tier: SubscriptionTier, feature: &str) -> Result<(), CoreError> {
    if tier.has_media_features() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "{feature} is available on the premium and dreambook plans"
        )))
    }
}
