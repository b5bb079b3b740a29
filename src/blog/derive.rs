//! Fields derived from what the author types: slug and read time.

use regex::Regex;

/// Average reading speed used for the read-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

lazy_static::lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9 -]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHENS: Regex = Regex::new(r"-+").unwrap();
    /// Valid slug pattern: lowercase letters, numbers, and single inner hyphens
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// "AI Trends in 2024!!" -> "ai-trends-in-2024"
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let kept = DISALLOWED.replace_all(&lower, "");
    let dashed = WHITESPACE.replace_all(&kept, "-");
    let collapsed = HYPHENS.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Whole minutes, rounded up, never less than one.
pub fn read_time(content: &str) -> i32 {
    let minutes = word_count(content).div_ceil(WORDS_PER_MINUTE).max(1);
    i32::try_from(minutes).unwrap_or(i32::MAX)
}
