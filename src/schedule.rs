//! The finished caption schedule handed to a renderer

use anyhow::{Context, Result};
use serde::Serialize;

use crate::types::{HighlightInterval, Page, ReconciledTimings, Word};

/// Pages in display order plus the timings they were built from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub pages: Vec<Page>,
    pub timings: ReconciledTimings,
}

impl Schedule {
    pub fn new(pages: Vec<Page>, timings: ReconciledTimings) -> Self {
        Self { pages, timings }
    }

    /// All words across all pages, in order
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.pages.iter().flat_map(|page| page.words())
    }

    pub fn word_count(&self) -> usize {
        self.pages.iter().map(Page::word_count).sum()
    }

    /// End of the last page, in seconds
    pub fn duration(&self) -> f64 {
        self.pages.last().map_or(0.0, |page| page.end_time)
    }

    /// Page on screen at absolute time `time`
    ///
    /// Windows are half-open. When a stretched page overlaps the next one, the
    /// later page wins.
    pub fn page_at(&self, time: f64) -> Option<&Page> {
        self.pages
            .iter()
            .rev()
            .find(|page| time >= page.start_time && time < page.end_time)
    }

    /// Word highlighted at absolute time `time`, with its interval
    pub fn active_word_at(&self, time: f64) -> Option<(&Word, &HighlightInterval)> {
        let page = self.page_at(time)?;
        let relative = time - page.start_time;
        let interval = page.highlights.iter().find(|h| h.contains(relative))?;
        let word = page.word(interval.position)?;
        Some((word, interval))
    }

    /// Serialize for an out-of-process renderer
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize caption schedule")
    }
}
