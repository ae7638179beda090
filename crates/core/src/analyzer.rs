use std::collections::HashMap;

use crate::types::ContentMetrics;

const WORDS_PER_MINUTE: usize = 200;
const TOP_KEYWORDS: usize = 10;
const MIN_KEYWORD_CHARS: usize = 4;

/// Word/character counts, reading time and the most frequent longer words.
pub fn analyze(text: &str) -> ContentMetrics {
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();

    // (word, count) in first-seen order; the index map points into it.
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for word in &words {
        let word = word.to_lowercase();
        if word.chars().count() < MIN_KEYWORD_CHARS {
            continue;
        }
        match index.get(&word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word.clone(), counts.len());
                counts.push((word, 1));
            }
        }
    }

    // Stable sort keeps encounter order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_KEYWORDS);

    ContentMetrics {
        word_count,
        char_count: text.chars().count(),
        reading_time_minutes: (word_count / WORDS_PER_MINUTE).max(1),
        top_keywords: counts,
    }
}
