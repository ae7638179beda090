//! Turning free-text model output into structured results.
//!
//! The model's formatting is untrusted: nothing here fails. Unexpected shapes
//! degrade to empty or partial results.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::TagSet;

pub const DEFAULT_MAX_TITLES: usize = 8;
pub const MAX_PRIMARY_TAGS: usize = 7;
pub const MAX_SECONDARY_TAGS: usize = 10;
pub const MAX_TRENDING_TAGS: usize = 7;
pub const MAX_TAGS: usize = 20;

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\s*(.+)").expect("valid numbered-line regex"));

static TRAILING_PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)$").expect("valid parenthetical regex"));

static TAG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|]+").expect("valid separator regex"));

/// Collects the text of numbered lines ("1. Title"), in order, up to `max`.
///
/// A trailing parenthetical explanation is dropped, as is markdown bold or
/// quoting wrapped around the whole title.
pub fn extract_titles(response: &str, max: usize) -> Vec<String> {
    response
        .lines()
        .filter_map(|line| NUMBERED_LINE.captures(line))
        .filter_map(|caps| {
            let text = caps.get(1)?.as_str().trim();
            let text = TRAILING_PARENTHETICAL.replace(text, "");
            let title = unwrap_emphasis(&text);
            (!title.is_empty()).then(|| title.to_string())
        })
        .take(max)
        .collect()
}

fn unwrap_emphasis(text: &str) -> &str {
    let mut title = text.trim();
    loop {
        let stripped = title
            .strip_prefix("**")
            .and_then(|t| t.strip_suffix("**"))
            .or_else(|| title.strip_prefix('"').and_then(|t| t.strip_suffix('"')));
        match stripped {
            Some(inner) => title = inner.trim(),
            None => return title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagSection {
    Primary,
    Secondary,
    Trending,
}

static SECTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:(?P<primary>primary)|(?P<secondary>secondary)|trending) tags:")
        .expect("valid section-marker regex")
});

/// Finds a section marker in `line` (case-insensitive) and returns the section
/// together with whatever follows the marker on the same line.
fn find_marker(line: &str) -> Option<(TagSection, &str)> {
    let caps = SECTION_MARKER.captures(line)?;
    let marker = caps.get(0)?;
    let section = if caps.name("primary").is_some() {
        TagSection::Primary
    } else if caps.name("secondary").is_some() {
        TagSection::Secondary
    } else {
        TagSection::Trending
    };
    Some((section, &line[marker.end()..]))
}

fn split_tags(text: &str) -> impl Iterator<Item = &str> {
    TAG_SEPARATORS
        .split(text)
        .map(|tag| tag.trim_matches(|c: char| c.is_whitespace() || c == '*'))
}

/// Sorts tags into primary/secondary/trending when the response carries
/// "Primary tags:" style labels, or keeps a flat list otherwise.
///
/// Labels are matched case-insensitively. Text following a label on the same
/// line belongs to that label's section; text before the first label is
/// ignored.
pub fn extract_tags(response: &str) -> TagSet {
    if !SECTION_MARKER.is_match(response) {
        let all = split_tags(response)
            .filter(|tag| {
                let len = tag.chars().count();
                len > 2 && len < 30
            })
            .take(MAX_TAGS)
            .map(str::to_string)
            .collect();
        return TagSet {
            categorized: false,
            all,
            ..TagSet::default()
        };
    }

    let mut primary = Vec::new();
    let mut secondary = Vec::new();
    let mut trending = Vec::new();
    let mut current = None;

    for line in response.lines() {
        let content = match find_marker(line) {
            Some((section, rest)) => {
                current = Some(section);
                rest
            }
            None => line,
        };

        let Some(section) = current else {
            continue;
        };
        let bucket = match section {
            TagSection::Primary => &mut primary,
            TagSection::Secondary => &mut secondary,
            TagSection::Trending => &mut trending,
        };
        bucket.extend(
            split_tags(content)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string),
        );
    }

    primary.truncate(MAX_PRIMARY_TAGS);
    secondary.truncate(MAX_SECONDARY_TAGS);
    trending.truncate(MAX_TRENDING_TAGS);

    let all = primary
        .iter()
        .chain(&secondary)
        .chain(&trending)
        .take(MAX_TAGS)
        .cloned()
        .collect();

    TagSet {
        categorized: true,
        primary,
        secondary,
        trending,
        all,
    }
}
