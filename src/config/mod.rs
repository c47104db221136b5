//! Schedule configuration
//!
//! [`ScheduleConfig`] is the typed value the pipeline runs with.
//! [`RuntimeScheduleConfig`] is its JSON-facing counterpart: parse, validate,
//! then convert with [`RuntimeScheduleConfig::to_config`].

use std::collections::BTreeSet;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::errors::ScheduleError;

/// Words per page used by fixed-count paging when nothing else is configured
pub const DEFAULT_WORDS_PER_PAGE: usize = 10;
/// Characters that close a page under punctuation paging
pub const DEFAULT_BREAK_PUNCTUATION: [char; 5] = [',', '.', '!', ')', '?'];
/// Frame rate the default highlight epsilon is derived from
pub const DEFAULT_FRAME_RATE: f64 = 24.0;

/// How words are grouped into pages
#[derive(Debug, Clone, PartialEq)]
pub enum Paging {
    /// Close a page every `words_per_page` words; each page is a single line
    FixedCount { words_per_page: usize },
    /// Break lines at line-start words, close pages after punctuation,
    /// and never exceed `max_words_per_page`
    Punctuation {
        max_words_per_page: usize,
        break_punctuation: BTreeSet<char>,
    },
}

/// Where a page's display window ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageEnd {
    /// At the onset of the page's last word
    #[default]
    #[serde(alias = "lastOnset")]
    LastOnset,
    /// At the next page's first onset, or at the audio end for the final page
    #[serde(alias = "fullWindow")]
    FullWindow,
}

/// Configuration for one scheduling run
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    pub paging: Paging,
    pub page_end: PageEnd,
    /// Shortest highlight interval the renderer can show, in seconds
    pub frame_epsilon: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::fixed_count(DEFAULT_WORDS_PER_PAGE)
    }
}

impl ScheduleConfig {
    pub fn fixed_count(words_per_page: usize) -> Self {
        Self {
            paging: Paging::FixedCount { words_per_page },
            page_end: PageEnd::default(),
            frame_epsilon: 1.0 / DEFAULT_FRAME_RATE,
        }
    }

    pub fn punctuation(max_words_per_page: usize) -> Self {
        Self {
            paging: Paging::Punctuation {
                max_words_per_page,
                break_punctuation: DEFAULT_BREAK_PUNCTUATION.into_iter().collect(),
            },
            page_end: PageEnd::default(),
            frame_epsilon: 1.0 / DEFAULT_FRAME_RATE,
        }
    }

    pub fn with_page_end(mut self, page_end: PageEnd) -> Self {
        self.page_end = page_end;
        self
    }

    pub fn with_frame_epsilon(mut self, frame_epsilon: f64) -> Self {
        self.frame_epsilon = frame_epsilon;
        self
    }

    /// Replace the break set; has no effect on fixed-count paging
    pub fn with_break_punctuation(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        if let Paging::Punctuation {
            break_punctuation, ..
        } = &mut self.paging
        {
            *break_punctuation = chars.into_iter().collect();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        let page_limit = match &self.paging {
            Paging::FixedCount { words_per_page } => *words_per_page,
            Paging::Punctuation {
                max_words_per_page, ..
            } => *max_words_per_page,
        };
        if page_limit == 0 {
            return Err(ScheduleError::InvalidConfig(
                "pages must hold at least one word".to_string(),
            ));
        }
        if !self.frame_epsilon.is_finite() || self.frame_epsilon <= 0.0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "frame epsilon must be a positive number of seconds, got {}",
                self.frame_epsilon
            )));
        }
        Ok(())
    }
}

/// Paging mode names accepted in JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagingMode {
    #[default]
    #[serde(alias = "fixed", alias = "fixedCount")]
    FixedCount,
    Punctuation,
}

/// Runtime-configurable schedule settings parsed from JSON
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeScheduleConfig {
    #[serde(default)]
    pub mode: PagingMode,
    #[serde(default, alias = "wordsPerPage")]
    pub words_per_page: Option<usize>,
    #[serde(default, alias = "maxWordsPerPage")]
    pub max_words_per_page: Option<usize>,
    /// Every character of the string is a break character
    #[serde(default, alias = "breakPunctuation")]
    pub break_punctuation: Option<String>,
    #[serde(default, alias = "frameEpsilon")]
    pub frame_epsilon: Option<f64>,
    /// Alternative to `frame_epsilon`: one frame at this rate
    #[serde(default, alias = "frameRate", alias = "fps")]
    pub frame_rate: Option<f64>,
    #[serde(default, alias = "pageEnd")]
    pub page_end: PageEnd,
}

impl RuntimeScheduleConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(words) = self.words_per_page {
            ensure!(words > 0, "wordsPerPage must be greater than zero");
        }
        if let Some(words) = self.max_words_per_page {
            ensure!(words > 0, "maxWordsPerPage must be greater than zero");
        }
        ensure!(
            self.frame_epsilon.is_none() || self.frame_rate.is_none(),
            "Specify either frameEpsilon or frameRate, not both"
        );
        if let Some(epsilon) = self.frame_epsilon {
            ensure!(
                epsilon.is_finite() && epsilon > 0.0,
                "frameEpsilon must be positive, got {}",
                epsilon
            );
        }
        if let Some(rate) = self.frame_rate {
            ensure!(
                rate.is_finite() && rate > 0.0,
                "frameRate must be positive, got {}",
                rate
            );
        }
        if self.mode == PagingMode::Punctuation {
            if let Some(chars) = &self.break_punctuation {
                ensure!(
                    chars.chars().all(|c| !c.is_whitespace()),
                    "breakPunctuation must not contain whitespace"
                );
            }
        }
        Ok(())
    }

    pub fn to_config(&self) -> ScheduleConfig {
        let mut config = match self.mode {
            PagingMode::FixedCount => ScheduleConfig::fixed_count(
                self.words_per_page.unwrap_or(DEFAULT_WORDS_PER_PAGE),
            ),
            PagingMode::Punctuation => ScheduleConfig::punctuation(
                self.max_words_per_page
                    .or(self.words_per_page)
                    .unwrap_or(DEFAULT_WORDS_PER_PAGE),
            ),
        };
        if let Some(chars) = &self.break_punctuation {
            config = config.with_break_punctuation(chars.chars());
        }
        if let Some(epsilon) = self.frame_epsilon {
            config = config.with_frame_epsilon(epsilon);
        } else if let Some(rate) = self.frame_rate {
            config = config.with_frame_epsilon(1.0 / rate);
        }
        config.with_page_end(self.page_end)
    }
}

/// Parse and validate a JSON schedule configuration
pub fn parse_runtime_config(raw: &str) -> Result<ScheduleConfig> {
    let runtime: RuntimeScheduleConfig =
        serde_json::from_str(raw).context("Failed to parse schedule configuration JSON")?;
    runtime
        .validate()
        .context("Schedule configuration validation failed")?;
    Ok(runtime.to_config())
}
