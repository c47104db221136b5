//! Page/line segmentation - groups assembled words into caption pages

mod accumulator;


use tracing::debug;

use crate::config::{PageEnd, ScheduleConfig};
use crate::types::{PageLayout, Word};

use accumulator::PageAccumulator;

/// Pure function to split words into pages under the configured paging policy
///
/// Pages partition `words` in order. A page starts at its first word's onset;
/// where it ends depends on [`ScheduleConfig::page_end`].
pub fn segment_pages(
    words: &[Word],
    config: &ScheduleConfig,
    audio_duration: f64,
) -> Vec<PageLayout> {
    let mut accumulator = PageAccumulator::new();
    for word in words {
        accumulator.handle_word(word, &config.paging);
    }
    accumulator.finish_page();
    let mut pages = accumulator.into_pages();
    apply_page_end(&mut pages, words, config.page_end, audio_duration);
    debug!(
        pages = pages.len(),
        words = words.len(),
        "segmented words into pages"
    );
    pages
}

/// Pages leave the accumulator ending at their last word's onset, which is
/// [`PageEnd::LastOnset`]; a full window stretches each page to the next one
fn apply_page_end(
    pages: &mut [PageLayout],
    words: &[Word],
    policy: PageEnd,
    audio_duration: f64,
) {
    if policy != PageEnd::FullWindow {
        return;
    }
    let Some(last_word) = words.last() else {
        return;
    };
    let next_starts: Vec<Option<f64>> = pages
        .iter()
        .skip(1)
        .map(|page| Some(page.start_time))
        .chain(std::iter::once(None))
        .collect();
    for (page, next_start) in pages.iter_mut().zip(next_starts) {
        page.end_time = match next_start {
            Some(start) => start,
            None if audio_duration.is_finite() => audio_duration.max(last_word.start),
            None => last_word.start,
        };
    }
}
