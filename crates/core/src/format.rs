use std::fmt::Write as _;

use crate::{
    session::SessionState,
    types::{ContentMetrics, HistoryEntry, TagSet},
};

pub fn format_titles(titles: &[String]) -> String {
    let mut output = String::new();
    for (i, title) in titles.iter().enumerate() {
        let _ = writeln!(output, "{}. {}", i + 1, title);
    }
    output
}

/// Tags as comma-separated lines, one per category when categorized.
pub fn format_tags(tags: &TagSet) -> String {
    let mut output = String::new();
    if tags.categorized {
        let _ = writeln!(output, "All: {}", tags.all.join(", "));
        let _ = writeln!(output, "Primary: {}", tags.primary.join(", "));
        let _ = writeln!(output, "Secondary: {}", tags.secondary.join(", "));
        let _ = writeln!(output, "Trending: {}", tags.trending.join(", "));
    } else {
        let _ = writeln!(output, "{}", tags.all.join(", "));
    }
    output
}

pub fn format_metrics(metrics: &ContentMetrics) -> String {
    let mut output = format!(
        "Words: {} | Characters: {} | Reading time: {} min | Top keywords: {}\n",
        metrics.word_count,
        metrics.char_count,
        metrics.reading_time_minutes,
        metrics.top_keywords.len()
    );
    if !metrics.top_keywords.is_empty() {
        let keywords: Vec<String> = metrics
            .top_keywords
            .iter()
            .map(|(word, count)| format!("{word} ({count})"))
            .collect();
        let _ = writeln!(output, "Keywords: {}", keywords.join(", "));
    }
    output
}

pub fn format_history_entry(position: usize, entry: &HistoryEntry) -> String {
    format!(
        "{}. {} - {} - Keywords: {}",
        position,
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.video_type,
        entry.keywords
    )
}

/// Format a session's generated content as human-readable markdown
pub fn format_session_readable(session: &SessionState) -> String {
    let mut output = String::new();

    if let Some(metrics) = &session.metrics {
        output.push_str("## Content Analysis\n\n");
        output.push_str(&format_metrics(metrics));
        output.push('\n');
    }

    if !session.titles.is_empty() {
        output.push_str("## Generated Titles\n\n");
        output.push_str(&format_titles(&session.titles));
        if let Some(selected) = &session.selected_title {
            let _ = writeln!(output, "\nSelected: {selected}");
        }
        output.push('\n');
    }

    if !session.description.is_empty() {
        output.push_str("## Generated Description\n\n");
        output.push_str(&session.description);
        output.push_str("\n\n");
    }

    if !session.tags.is_empty() {
        output.push_str("## Generated Tags\n\n");
        output.push_str(&format_tags(&session.tags));
        output.push('\n');
    }

    if !session.thumbnail_concepts.is_empty() {
        output.push_str("## Thumbnail Concepts\n\n");
        output.push_str(&session.thumbnail_concepts);
        output.push_str("\n\n");
    }

    for failure in &session.failures {
        let _ = writeln!(output, "[{}] {}", failure.step.name(), failure.error);
    }

    output
}
