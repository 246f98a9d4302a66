//! Story shape enums: length bucket, prompt-construction mode, and tone.
//!
//! Lengths and types are stored as lowercase TEXT columns; the `as_str` /
//! [`std::str::FromStr`] pair is the only conversion between the two.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Length
// ---------------------------------------------------------------------------

/// Length bucket chosen by the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryLength {
    Short,
    #[default]
    Medium,
    Long,
}

/// Maximum number of illustrations for a single story.
pub const MAX_IMAGES_PER_STORY: u32 = 4;

impl StoryLength {
    pub fn as_str(self) -> &'static str {
        match self {
            StoryLength::Short => "short",
            StoryLength::Medium => "medium",
            StoryLength::Long => "long",
        }
    }

    /// Completion token ceiling for a full story of this length.
    pub fn max_tokens(self) -> u32 {
        match self {
            StoryLength::Short => 800,
            StoryLength::Medium => 1500,
            StoryLength::Long => 2500,
        }
    }

    /// Token ceiling for a single continuation or edit pass.
    ///
    /// Continuations add roughly half a story; edits rewrite the whole text
    /// and use [`StoryLength::max_tokens`] instead.
    pub fn continuation_max_tokens(self) -> u32 {
        self.max_tokens() / 2
    }

    /// Target word range used in the prompt template.
    pub fn word_range(self) -> (u32, u32) {
        match self {
            StoryLength::Short => (300, 500),
            StoryLength::Medium => (600, 900),
            StoryLength::Long => (1200, 1800),
        }
    }

    /// Default number of illustrations generated for this length.
    pub fn image_count(self) -> u32 {
        match self {
            StoryLength::Short => 1,
            StoryLength::Medium => 2,
            StoryLength::Long => MAX_IMAGES_PER_STORY,
        }
    }
}

impl FromStr for StoryLength {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(StoryLength::Short),
            "medium" => Ok(StoryLength::Medium),
            "long" => Ok(StoryLength::Long),
            other => Err(CoreError::Validation(format!(
                "Invalid story length '{other}'. Must be one of: short, medium, long"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Type
// ---------------------------------------------------------------------------

/// How the prompt was built: the step-by-step wizard or the free-text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    Structured,
    #[default]
    Freeform,
}

impl StoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            StoryType::Structured => "structured",
            StoryType::Freeform => "freeform",
        }
    }
}

impl FromStr for StoryType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structured" => Ok(StoryType::Structured),
            "freeform" => Ok(StoryType::Freeform),
            other => Err(CoreError::Validation(format!(
                "Invalid story type '{other}'. Must be one of: structured, freeform"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tone
// ---------------------------------------------------------------------------

/// Tones offered by the story creator.
pub const VALID_TONES: &[&str] = &[
    "calm",
    "funny",
    "adventurous",
    "magical",
    "educational",
    "heartwarming",
];

/// Validate a tone against [`VALID_TONES`], case-insensitively.
///
/// Returns the normalized (lowercase) tone.
pub fn normalize_tone(tone: &str) -> Result<String, CoreError> {
    let lowered = tone.trim().to_lowercase();
    if VALID_TONES.contains(&lowered.as_str()) {
        Ok(lowered)
    } else {
        Err(CoreError::Validation(format!(
            "Invalid tone '{tone}'. Must be one of: {}",
            VALID_TONES.join(", ")
        )))
    }
}
