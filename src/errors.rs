//! Error types for the scheduling pipeline
//!
//! Every fatal condition aborts the whole run before any page is produced.
//! Degenerate highlight intervals are not errors; the scheduler clamps them.

use thiserror::Error;

use crate::pipeline::PipelineStage;

/// Fatal conditions raised while building a schedule
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// The token input held no syllables at all
    #[error("reading tokens: no syllable tokens to schedule")]
    EmptyTokens,

    /// No onsets were supplied, so there is no anchor for the timeline
    #[error("reconciling: cannot schedule {tokens} syllables with {onsets} onsets")]
    InsufficientOnsets { tokens: usize, onsets: usize },

    /// An onset was negative or not a finite number
    #[error("reconciling: onset {index} is not a valid timestamp ({value})")]
    InvalidOnset { index: usize, value: f64 },

    /// The audio duration needed to place synthesized onsets is not a finite number
    #[error(
        "reconciling: audio duration {duration} cannot anchor {missing} synthesized onsets \
         after the last onset ({last_onset:.3}s)"
    )]
    InvalidDuration {
        duration: f64,
        last_onset: f64,
        missing: usize,
    },

    /// Tokens ran out while a word was still being assembled
    #[error("assembling: token input ends inside word '{pending}' ({tokens} tokens read)")]
    UnterminatedWord { pending: String, tokens: usize },

    /// The configuration cannot produce a schedule
    #[error("configuration: {0}")]
    InvalidConfig(String),
}

impl ScheduleError {
    /// Pipeline stage that raised this error
    pub fn stage(&self) -> PipelineStage {
        match self {
            ScheduleError::EmptyTokens | ScheduleError::InvalidConfig(_) => {
                PipelineStage::ReadingTokens
            }
            ScheduleError::InsufficientOnsets { .. }
            | ScheduleError::InvalidOnset { .. }
            | ScheduleError::InvalidDuration { .. } => PipelineStage::Reconciling,
            ScheduleError::UnterminatedWord { .. } => PipelineStage::Assembling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_counts() {
        let err = ScheduleError::InsufficientOnsets {
            tokens: 12,
            onsets: 0,
        };
        assert_eq!(
            err.to_string(),
            "reconciling: cannot schedule 12 syllables with 0 onsets"
        );
        assert_eq!(err.stage(), PipelineStage::Reconciling);
    }

    #[test]
    fn unterminated_word_reports_assembling_stage() {
        let err = ScheduleError::UnterminatedWord {
            pending: "syl".to_string(),
            tokens: 3,
        };
        assert_eq!(err.stage(), PipelineStage::Assembling);
        assert!(err.to_string().contains("'syl'"));
    }
}
