//! Prompt assembly for the story engine.
//!
//! Every operation produces a [`ChatPrompt`]: a system message, a user
//! message, and a completion token ceiling. Templates are fixed text; the
//! only inputs are the caller's story brief and, for follow-up operations,
//! the stored story.

use serde::{Deserialize, Serialize};

use crate::story::{StoryLength, StoryType};

/// Rough characters-per-token ratio used for budget estimates.
pub const CHARS_PER_TOKEN: usize = 4;

/// Characters of existing story text sent along with a continuation.
pub const CONTEXT_CHAR_BUDGET: usize = 6000;

/// Upper bound for a single completion, whatever the story length.
pub const MAX_COMPLETION_TOKENS: u32 = 4000;

/// Token ceiling for coaching replies.
pub const COACH_MAX_TOKENS: u32 = 600;

/// Instructions shared by every story-writing call.
pub const STORY_SYSTEM_PROMPT: &str = "You are a gentle, imaginative children's author who writes \
bedtime stories for children aged 3 to 10. Stories are warm, age-appropriate, free of violence \
and frightening imagery, and end on a calm, reassuring note that helps a child fall asleep. \
Use simple vocabulary, vivid but soft imagery, and short paragraphs separated by blank lines.";

/// Instructions for the writing coach.
pub const COACH_SYSTEM_PROMPT: &str = "You are a friendly writing coach helping a parent plan a \
personalized bedtime story. Reply with 3 to 5 short, concrete suggestions, one per line, each \
starting with \"- \". Do not write the story itself.";

/// A fully assembled completion request, independent of any provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Character details fed into a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterBrief {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<String>,
}

/// Place details fed into a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceBrief {
    pub name: String,
    pub location_type: String,
    pub description: Option<String>,
}

/// Everything the parent chose for a new story.
#[derive(Debug, Clone, Default)]
pub struct StoryBrief {
    pub prompt: Option<String>,
    pub story_type: StoryType,
    pub length: StoryLength,
    pub tone: Option<String>,
    pub setting: Option<String>,
    pub themes: Vec<String>,
    pub characters: Vec<CharacterBrief>,
    pub places: Vec<PlaceBrief>,
    /// `false` asks for an opening only (step-by-step builder).
    pub complete: bool,
}

/// Estimate the token count of `text` with the [`CHARS_PER_TOKEN`] heuristic.
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count();
    chars.div_ceil(CHARS_PER_TOKEN) as u32
}

/// Return the tail of `text` that fits in `max_chars`.
///
/// When the text is truncated the cut is moved forward to the next
/// paragraph (or, failing that, line) boundary so the model never sees a
/// half sentence at the start of its context.
pub fn tail_within_budget(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    let skip = total - max_chars;
    let start = text
        .char_indices()
        .nth(skip)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let tail = &text[start..];
    for separator in ["\n\n", "\n"] {
        if let Some(pos) = tail.find(separator) {
            let rest = &tail[pos + separator.len()..];
            if !rest.trim().is_empty() {
                return rest;
            }
        }
    }
    tail
}

/// Build the prompt for a brand-new story.
pub fn build_story_prompt(brief: &StoryBrief) -> ChatPrompt {
    let (min_words, max_words) = brief.length.word_range();
    let mut user = String::new();

    match brief.story_type {
        StoryType::Structured => user.push_str("Write a bedtime story using these details.\n"),
        StoryType::Freeform => user.push_str("Write a bedtime story based on this idea.\n"),
    }

    if let Some(prompt) = brief.prompt.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        user.push_str(&format!("\nStory idea: {prompt}\n"));
    }

    if !brief.characters.is_empty() {
        user.push_str("\nMain characters:\n");
        for character in &brief.characters {
            user.push_str(&format!("- {}\n", describe_character(character)));
        }
    }

    if !brief.places.is_empty() {
        user.push_str("\nPlaces in the story:\n");
        for place in &brief.places {
            user.push_str(&format!("- {}\n", describe_place(place)));
        }
    }

    if let Some(setting) = brief.setting.as_deref().filter(|s| !s.trim().is_empty()) {
        user.push_str(&format!("\nSetting: {}\n", setting.trim()));
    }
    if let Some(tone) = brief.tone.as_deref() {
        user.push_str(&format!("Tone: {tone}\n"));
    }
    if !brief.themes.is_empty() {
        user.push_str(&format!("Themes to weave in: {}\n", brief.themes.join(", ")));
    }

    if brief.complete {
        user.push_str(&format!(
            "\nLength: about {min_words}-{max_words} words. Give the story a clear beginning, \
             middle and a peaceful ending.\n"
        ));
    } else {
        user.push_str(&format!(
            "\nWrite only the opening of the story, about {} words, and stop at a gentle \
             moment where the story can continue later. Do not end the story.\n",
            min_words / 2
        ));
    }

    user.push_str(
        "\nFormat: put the story title alone on the first line, then a blank line, \
         then the story text.",
    );

    ChatPrompt {
        system: STORY_SYSTEM_PROMPT.to_string(),
        user,
        max_tokens: brief.length.max_tokens(),
    }
}

/// Build the prompt that extends a stored story.
pub fn build_continuation_prompt(
    title: &str,
    content: &str,
    length: StoryLength,
    direction: Option<&str>,
    finish: bool,
) -> ChatPrompt {
    let context = tail_within_budget(content, CONTEXT_CHAR_BUDGET);
    let mut user = format!("Here is the story \"{title}\" so far:\n\n{context}\n\n");

    if let Some(direction) = direction.map(str::trim).filter(|d| !d.is_empty()) {
        user.push_str(&format!("What should happen next: {direction}\n\n"));
    }

    if finish {
        user.push_str(
            "Continue the story from exactly where it stops and bring it to a calm, \
             satisfying ending.",
        );
    } else {
        user.push_str(
            "Continue the story from exactly where it stops with the next part only. \
             Do not end the story yet.",
        );
    }
    user.push_str(" Reply with the new text only: no title, no recap of earlier events.");

    ChatPrompt {
        system: STORY_SYSTEM_PROMPT.to_string(),
        user,
        max_tokens: length.continuation_max_tokens(),
    }
}

/// Build the prompt that rewrites a stored story per a parent's instruction.
pub fn build_edit_prompt(
    title: &str,
    content: &str,
    instruction: &str,
    length: StoryLength,
) -> ChatPrompt {
    let user = format!(
        "Here is the bedtime story \"{title}\":\n\n{content}\n\n\
         Rewrite the story following this request: {}\n\
         Keep everything the request does not mention. Reply with the full revised story \
         text only, without the title.",
        instruction.trim()
    );
    let needed = estimate_tokens(content) + 200;
    ChatPrompt {
        system: STORY_SYSTEM_PROMPT.to_string(),
        user,
        max_tokens: needed.max(length.max_tokens()).min(MAX_COMPLETION_TOKENS),
    }
}

/// Build the prompt for writing suggestions on a draft idea or story.
pub fn build_coach_prompt(idea: &str, story_excerpt: Option<&str>) -> ChatPrompt {
    let mut user = format!("The parent's story idea: {}\n", idea.trim());
    if let Some(excerpt) = story_excerpt {
        let excerpt = tail_within_budget(excerpt, CONTEXT_CHAR_BUDGET / 2);
        user.push_str(&format!("\nThe story so far:\n\n{excerpt}\n"));
    }
    user.push_str("\nHow could this bedtime story be made more engaging and soothing?");
    ChatPrompt {
        system: COACH_SYSTEM_PROMPT.to_string(),
        user,
        max_tokens: COACH_MAX_TOKENS,
    }
}

/// One-line description of a character for prompts.
pub fn describe_character(character: &CharacterBrief) -> String {
    let mut line = character.name.trim().to_string();
    if let Some(age) = character.age {
        line.push_str(&format!(", age {age}"));
    }
    if let Some(description) = non_empty(&character.description) {
        line.push_str(&format!(": {description}"));
    }
    if let Some(appearance) = non_empty(&character.appearance) {
        line.push_str(&format!(". Looks: {appearance}"));
    }
    if !character.traits.is_empty() {
        line.push_str(&format!(". Personality: {}", character.traits.join(", ")));
    }
    line
}

/// One-line description of a place for prompts.
pub fn describe_place(place: &PlaceBrief) -> String {
    let mut line = format!("{} ({})", place.name.trim(), place.location_type.trim());
    if let Some(description) = non_empty(&place.description) {
        line.push_str(&format!(": {description}"));
    }
    line
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
