use serde::Serialize;

use crate::{
    client::GenerationError,
    error::{Result, TubekitError},
    types::{ContentMetrics, GeneratedSummary, GenerationStep, HistoryEntry, TagSet},
};

/// How many history entries are shown.
pub const HISTORY_DISPLAY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    pub step: GenerationStep,
    pub error: GenerationError,
}

/// Everything one interactive session has generated so far.
///
/// Owned by the caller and handed to the pipeline by `&mut`; sessions never
/// share state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub titles: Vec<String>,
    pub description: String,
    pub tags: TagSet,
    pub thumbnail_concepts: String,
    pub metrics: Option<ContentMetrics>,
    pub selected_title: Option<String>,
    /// Failures of the most recent run only.
    pub failures: Vec<StepFailure>,
    history: Vec<HistoryEntry>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_results(&self) -> bool {
        !self.titles.is_empty()
            || !self.description.is_empty()
            || !self.tags.is_empty()
            || !self.thumbnail_concepts.is_empty()
    }

    /// Drops all generated content. The history survives a clear.
    pub fn clear(&mut self) {
        let history = std::mem::take(&mut self.history);
        *self = Self {
            history,
            ..Self::default()
        };
    }

    /// Back to a fresh session, history included.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Marks the 1-based `index`-th title as chosen and returns it.
    pub fn select_title(&mut self, index: usize) -> Result<&str> {
        let title = index
            .checked_sub(1)
            .and_then(|i| self.titles.get(i))
            .cloned()
            .ok_or(TubekitError::NoSuchTitle {
                index,
                available: self.titles.len(),
            })?;
        Ok(self.selected_title.insert(title).as_str())
    }

    pub fn summary(&self) -> GeneratedSummary {
        GeneratedSummary {
            titles: self.titles.len(),
            description: !self.description.is_empty(),
            tags: self.tags.all.len(),
            thumbnails: !self.thumbnail_concepts.is_empty(),
        }
    }

    pub fn push_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// Full history in insertion order.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The most recent entries, newest first.
    pub fn recent_history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().rev().take(HISTORY_DISPLAY_LIMIT)
    }
}
