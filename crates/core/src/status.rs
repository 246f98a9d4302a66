//! Enums mapping to SMALLINT lookup tables.
//!
//! Each variant's discriminant matches the seed data order (1-based) in the
//! corresponding lookup table (`story_statuses`, `subscription_tiers`).
//! Variants serialize as their lowercase name so API payloads never expose
//! raw ids.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in lookup-table order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Return the lowercase name stored in the lookup table.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Map a database id back to the enum.
            pub fn from_id(id: StatusId) -> Result<Self, CoreError> {
                match id {
                    $(x if x == $val => Ok($name::$variant),)+
                    other => Err(CoreError::Internal(format!(
                        "Unknown {} id {other}",
                        stringify!($name)
                    ))),
                }
            }

            /// Parse a lowercase name (as sent by clients).
            pub fn from_name(name: &str) -> Result<Self, CoreError> {
                match name {
                    $($label => Ok($name::$variant),)+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{other}'",
                        stringify!($name)
                    ))),
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                $name::from_name(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_status_enum! {
    /// Generation lifecycle of a story.
    StoryStatus {
        Draft = 1 => "draft",
        Generating = 2 => "generating",
        Paused = 3 => "paused",
        Complete = 4 => "complete",
    }
}

define_status_enum! {
    /// Subscription tier of a profile.
    SubscriptionTier {
        Free = 1 => "free",
        Premium = 2 => "premium",
        Dreambook = 3 => "dreambook",
    }
}
