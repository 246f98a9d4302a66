//! Parsing of raw completion text into story parts and coaching tips.

use std::sync::LazyLock;

use regex::Regex;

/// Title used when the model returns a single block of text.
pub const DEFAULT_TITLE: &str = "A Bedtime Story";

/// Longest title kept; anything past it is cut at a word boundary.
pub const MAX_TITLE_CHARS: usize = 120;

/// Markdown heading marks, bold/italic markers, and a leading `Title:` label.
static TITLE_DECORATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^(?:#+\s*)?(?:\*\*|__|\*|_)?\s*(?:title\s*:\s*)?"#).expect("valid regex")
});

/// Bullet (`-`, `*`, `•`) or numbered (`1.`, `2)`) list prefix.
static LIST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+").expect("valid regex"));

/// A completion split into title and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStory {
    pub title: String,
    pub content: String,
}

/// Split a completion into a title (first non-empty line) and body (the rest).
///
/// A completion with a single line has no separate title; the whole text
/// becomes the body and [`DEFAULT_TITLE`] is used.
pub fn parse_story_completion(raw: &str) -> ParsedStory {
    let trimmed = raw.trim();
    let mut lines = trimmed.splitn(2, '\n');
    let first = lines.next().unwrap_or_default();
    let rest = lines.next().map(str::trim).unwrap_or_default();

    if rest.is_empty() {
        return ParsedStory {
            title: DEFAULT_TITLE.to_string(),
            content: trimmed.to_string(),
        };
    }

    let title = clean_title(first);
    ParsedStory {
        title: if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title
        },
        content: rest.to_string(),
    }
}

/// Strip markdown and label decoration from a title line.
pub fn clean_title(line: &str) -> String {
    let stripped = TITLE_DECORATION.replace(line.trim(), "");
    let stripped = stripped
        .trim()
        .trim_end_matches(['*', '_'])
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\u{201c}' || c == '\u{201d}')
        .trim();
    truncate_at_word(stripped, MAX_TITLE_CHARS)
}

/// Clean continuation or edit output: trims whitespace and drops a title line
/// the model added despite being asked not to.
pub fn clean_passage(raw: &str, title: &str) -> String {
    let trimmed = raw.trim();
    let mut lines = trimmed.splitn(2, '\n');
    let first = lines.next().unwrap_or_default();
    match lines.next() {
        Some(rest) if clean_title(first).eq_ignore_ascii_case(title.trim()) => {
            rest.trim().to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Extract suggestion lines from a coaching reply.
///
/// List items are returned without their markers. If the reply has no list
/// items at all, each non-empty paragraph is returned instead.
pub fn parse_suggestions(raw: &str) -> Vec<String> {
    let items: Vec<String> = raw
        .lines()
        .filter(|line| LIST_PREFIX.is_match(line))
        .map(|line| LIST_PREFIX.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if !items.is_empty() {
        return items;
    }

    raw.split("\n\n")
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

pub(crate) fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(pos) if pos > 0 => cut[..pos].trim_end().to_string(),
        _ => cut,
    }
}
