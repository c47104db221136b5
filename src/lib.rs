//! karaflow - karaoke caption scheduling
//!
//! Turns a syllable sheet and detected audio onsets into caption pages with
//! per-word highlight intervals. Audio analysis, text rendering and video
//! encoding belong to the caller.

pub mod assembly;
pub mod config;
pub mod errors;
pub mod highlight;
pub mod pipeline;
pub mod schedule;
pub mod segmenting;
pub mod timing;
pub mod tokens;
pub mod types;

pub use config::{PageEnd, Paging, ScheduleConfig};
pub use errors::ScheduleError;
pub use pipeline::{build_schedule, build_schedule_from_sheet, PipelineStage};
pub use schedule::Schedule;
pub use types::{HighlightInterval, Line, Page, Token, Word};
