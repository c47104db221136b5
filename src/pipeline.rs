//! Pipeline entry point
//!
//! Stages run in a fixed order, each consuming the previous stage's full output:
//! reading tokens, reconciling onsets, assembling words, segmenting pages and
//! scheduling highlights. Any fatal error aborts the run before a page is emitted.

use std::fmt::{Display, Formatter};

use tracing::{info, info_span};

use crate::assembly::assemble_words;
use crate::config::ScheduleConfig;
use crate::errors::ScheduleError;
use crate::highlight::schedule_highlights;
use crate::schedule::Schedule;
use crate::segmenting::segment_pages;
use crate::timing::reconcile_onsets;
use crate::tokens::{parse_tokens, syllable_count};
use crate::types::Token;

/// Stages of one scheduling run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    ReadingTokens,
    Reconciling,
    Assembling,
    Segmenting,
    Scheduling,
    Done,
}

impl PipelineStage {
    pub fn name(self) -> &'static str {
        match self {
            PipelineStage::ReadingTokens => "reading_tokens",
            PipelineStage::Reconciling => "reconciling",
            PipelineStage::Assembling => "assembling",
            PipelineStage::Segmenting => "segmenting",
            PipelineStage::Scheduling => "scheduling",
            PipelineStage::Done => "done",
        }
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Build a caption schedule from tokens and detector onsets
///
/// # Arguments
/// * `tokens` - syllable tokens in sung order
/// * `onsets` - detector onsets in seconds
/// * `audio_duration` - total audio length in seconds
/// * `config` - paging and highlight settings
///
/// # Returns
/// The full schedule, or the first fatal error; no partial schedules are returned
pub fn build_schedule(
    tokens: &[Token],
    onsets: &[f64],
    audio_duration: f64,
    config: &ScheduleConfig,
) -> Result<Schedule, ScheduleError> {
    let syllables = {
        let _span = info_span!("stage", stage = %PipelineStage::ReadingTokens).entered();
        config.validate()?;
        let syllables = syllable_count(tokens);
        if syllables == 0 {
            return Err(ScheduleError::EmptyTokens);
        }
        syllables
    };

    let timings = {
        let _span = info_span!("stage", stage = %PipelineStage::Reconciling).entered();
        reconcile_onsets(onsets, syllables, audio_duration, config.frame_epsilon)?
    };

    let words = {
        let _span = info_span!("stage", stage = %PipelineStage::Assembling).entered();
        assemble_words(tokens, &timings)?
    };

    let layouts = {
        let _span = info_span!("stage", stage = %PipelineStage::Segmenting).entered();
        segment_pages(&words, config, audio_duration)
    };

    let pages = {
        let _span = info_span!("stage", stage = %PipelineStage::Scheduling).entered();
        schedule_highlights(layouts, config.frame_epsilon)
    };

    info!(
        syllables,
        words = words.len(),
        pages = pages.len(),
        synthesized = timings.synthesized,
        "caption schedule built"
    );
    Ok(Schedule::new(pages, timings))
}

/// Same as [`build_schedule`] for a syllable sheet held in memory
pub fn build_schedule_from_sheet(
    sheet: &str,
    onsets: &[f64],
    audio_duration: f64,
    config: &ScheduleConfig,
) -> Result<Schedule, ScheduleError> {
    build_schedule(&parse_tokens(sheet), onsets, audio_duration, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        assert!(PipelineStage::ReadingTokens < PipelineStage::Reconciling);
        assert!(PipelineStage::Scheduling < PipelineStage::Done);
        assert_eq!(PipelineStage::Segmenting.to_string(), "segmenting");
    }

    #[test]
    fn empty_sheet_fails_before_reconciling() {
        let err = build_schedule_from_sheet("\n\n", &[0.5], 2.0, &ScheduleConfig::default())
            .unwrap_err();
        assert_eq!(err, ScheduleError::EmptyTokens);
        assert_eq!(err.stage(), PipelineStage::ReadingTokens);
    }

    #[test]
    fn missing_onsets_abort_run() {
        let err = build_schedule_from_sheet("la\nla", &[], 2.0, &ScheduleConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InsufficientOnsets {
                tokens: 2,
                onsets: 0
            }
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ScheduleConfig::fixed_count(0);
        let err = build_schedule_from_sheet("la", &[0.1], 1.0, &config).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfig(_)));
    }
}
