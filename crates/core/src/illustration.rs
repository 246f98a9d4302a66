//! Illustration planning: how many images a story gets, which part of the
//! text each one shows, and the prompt sent to the image model.

use crate::error::CoreError;
use crate::parsing::truncate_at_word;
use crate::prompt::CharacterBrief;
use crate::story::{StoryLength, MAX_IMAGES_PER_STORY};

/// Style used when the caller does not pick one.
pub const DEFAULT_ILLUSTRATION_STYLE: &str =
    "Soft watercolor children's book illustration, warm pastel colors, gentle evening light";

/// Longest slice of story text quoted in a single image prompt.
pub const MAX_SECTION_EXCERPT_CHARS: usize = 600;

/// Longest image prompt sent to the provider.
pub const MAX_IMAGE_PROMPT_CHARS: usize = 1000;

/// One image to generate: its position in the story and its prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllustrationPlan {
    pub section_index: i32,
    pub prompt: String,
}

/// Resolve the number of images for a story.
///
/// `None` falls back to the length table. Explicit counts must be within
/// `1..=MAX_IMAGES_PER_STORY`.
pub fn resolve_image_count(requested: Option<u32>, length: StoryLength) -> Result<u32, CoreError> {
    match requested {
        None => Ok(length.image_count()),
        Some(n) if (1..=MAX_IMAGES_PER_STORY).contains(&n) => Ok(n),
        Some(n) => Err(CoreError::Validation(format!(
            "Image count {n} is out of range. Must be between 1 and {MAX_IMAGES_PER_STORY}"
        ))),
    }
}

/// Split story text into at most `count` contiguous sections.
///
/// Sections are built from whole paragraphs and balanced by length. A story
/// with fewer paragraphs than `count` yields one section per paragraph.
pub fn split_sections(content: &str, count: u32) -> Vec<String> {
    let paragraphs: Vec<&str> = content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let count = (count.max(1) as usize).min(paragraphs.len());
    if count == 0 {
        return Vec::new();
    }

    let total: usize = paragraphs.iter().map(|p| p.len()).sum();
    let target = total / count;

    let mut sections = Vec::with_capacity(count);
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for (i, paragraph) in paragraphs.iter().copied().enumerate() {
        current.push(paragraph);
        current_len += paragraph.len();

        let still_needed = count - sections.len() - 1;
        if still_needed == 0 {
            continue;
        }
        let left = paragraphs.len() - i - 1;
        if (current_len >= target && left >= still_needed) || left == still_needed {
            sections.push(current.join("\n\n"));
            current.clear();
            current_len = 0;
        }
    }
    if !current.is_empty() {
        sections.push(current.join("\n\n"));
    }
    sections
}

/// Build the image prompt for one section of a story.
pub fn build_image_prompt(
    title: &str,
    excerpt: &str,
    characters: &[CharacterBrief],
    style: Option<&str>,
) -> String {
    let style = style
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ILLUSTRATION_STYLE);
    let excerpt = truncate_at_word(excerpt.trim(), MAX_SECTION_EXCERPT_CHARS);

    let mut prompt = format!("{style}. Illustration for the bedtime story \"{title}\".");
    if !excerpt.is_empty() {
        prompt.push_str(&format!(" Scene: {excerpt}"));
    }

    let looks: Vec<String> = characters
        .iter()
        .map(|c| match c.appearance.as_deref().map(str::trim) {
            Some(appearance) if !appearance.is_empty() => format!("{} ({appearance})", c.name),
            _ => c.name.clone(),
        })
        .collect();
    if !looks.is_empty() {
        prompt.push_str(&format!(" Characters: {}.", looks.join(", ")));
    }

    let prompt = truncate_at_word(&prompt, MAX_IMAGE_PROMPT_CHARS - 60);
    format!("{prompt} Child-friendly, no text or lettering in the image.")
}

/// Plan every image for a story: one per section, indexed from zero.
///
/// An empty story still gets a single title-only illustration.
pub fn plan_illustrations(
    title: &str,
    content: &str,
    characters: &[CharacterBrief],
    count: u32,
    style: Option<&str>,
) -> Vec<IllustrationPlan> {
    let sections = split_sections(content, count);
    if sections.is_empty() {
        return vec![IllustrationPlan {
            section_index: 0,
            prompt: build_image_prompt(title, "", characters, style),
        }];
    }
    sections
        .iter()
        .enumerate()
        .map(|(i, section)| IllustrationPlan {
            section_index: i as i32,
            prompt: build_image_prompt(title, section, characters, style),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn count_defaults_to_length_table() {
        assert_eq!(resolve_image_count(None, StoryLength::Medium).unwrap(), 2);
        assert_eq!(resolve_image_count(Some(3), StoryLength::Short).unwrap(), 3);
        assert_matches!(
            resolve_image_count(Some(5), StoryLength::Long),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            resolve_image_count(Some(0), StoryLength::Long),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn balanced_split_keeps_order() {
        let content = "aaaa\n\nbbbb\n\ncccc\n\ndddd";
        let sections = split_sections(content, 2);
        assert_eq!(sections, vec!["aaaa\n\nbbbb", "cccc\n\ndddd"]);
    }

    #[test]
    fn split_returns_exact_count_when_paragraphs_allow() {
        let content = "a\n\nb\n\nc\n\nd\n\ne very long final paragraph indeed";
        let sections = split_sections(content, 4);
        assert_eq!(sections.len(), 4);
        assert!(sections.last().unwrap().contains("final"));
    }

    #[test]
    fn fewer_paragraphs_than_images() {
        let sections = split_sections("only one paragraph", 4);
        assert_eq!(sections, vec!["only one paragraph"]);
    }

    #[test]
    fn prompt_mentions_character_looks_and_stays_bounded() {
        let luna = CharacterBrief {
            name: "Luna".into(),
            appearance: Some("curly red hair".into()),
            ..Default::default()
        };
        let excerpt = "Luna tiptoed through the garden. ".repeat(50);
        let prompt = build_image_prompt("Moon Garden", &excerpt, &[luna], None);

        assert!(prompt.starts_with(DEFAULT_ILLUSTRATION_STYLE));
        assert!(prompt.chars().count() <= MAX_IMAGE_PROMPT_CHARS);
        assert!(prompt.ends_with("no text or lettering in the image."));
    }

    #[test]
    fn empty_story_gets_single_plan() {
        let plans = plan_illustrations("Untitled", "", &[], 3, Some("crayon drawing"));
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].section_index, 0);
        assert!(plans[0].prompt.starts_with("crayon drawing"));
    }

    #[test]
    fn plans_are_indexed_in_order() {
        let content = "a\n\nb\n\nc";
        let plans = plan_illustrations("T", content, &[], 3, None);
        let indexes: Vec<i32> = plans.iter().map(|p| p.section_index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }
}
