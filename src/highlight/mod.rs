//! Highlight scheduling - per-word active windows within each page
//!
//! A word stays highlighted from its own onset until the next word's onset on
//! the same page; the page's last word runs to the end of the page window.
//! Intervals shorter than one frame are stretched to `frame_epsilon` and the
//! words after them shift along, so intervals stay contiguous.

use tracing::debug;

use crate::types::{HighlightInterval, Page, PageLayout};

/// Turn page layouts into pages with highlight intervals
pub fn schedule_highlights(layouts: Vec<PageLayout>, frame_epsilon: f64) -> Vec<Page> {
    let mut clamped_total = 0usize;
    let pages: Vec<Page> = layouts
        .into_iter()
        .enumerate()
        .map(|(index, layout)| {
            let (page, clamped) = schedule_page(index, layout, frame_epsilon);
            clamped_total += clamped;
            page
        })
        .collect();
    if clamped_total > 0 {
        debug!(
            clamped = clamped_total,
            frame_epsilon, "stretched degenerate highlight intervals"
        );
    }
    pages
}

fn schedule_page(index: usize, layout: PageLayout, frame_epsilon: f64) -> (Page, usize) {
    let base = layout.start_time;
    let word_count = layout.word_count();

    let placements: Vec<(usize, usize, usize, f64)> = layout
        .lines
        .iter()
        .enumerate()
        .flat_map(|(line_idx, line)| {
            line.words
                .iter()
                .enumerate()
                .map(move |(column, word)| (line_idx, column, word.index, word.start))
        })
        .collect();

    let mut highlights = Vec::with_capacity(word_count);
    let mut clamped = 0usize;
    let mut cursor = 0.0_f64;
    for (position, &(line, column, word_index, _)) in placements.iter().enumerate() {
        let raw_end = match placements.get(position + 1) {
            Some(&(_, _, _, next_start)) => next_start - base,
            None => layout.end_time - base,
        };
        let relative_start = cursor;
        let relative_end = if raw_end - relative_start < frame_epsilon {
            clamped += 1;
            relative_start + frame_epsilon
        } else {
            raw_end
        };
        highlights.push(HighlightInterval {
            word_index,
            position,
            line,
            column,
            relative_start,
            relative_end,
        });
        cursor = relative_end;
    }

    // A stretched tail pushes the page window out so the last interval fills it exactly
    let end_time = match highlights.last() {
        Some(last) if last.relative_end > layout.end_time - base => base + last.relative_end,
        _ => layout.end_time,
    };

    let page = Page {
        index,
        first_word: layout.first_word,
        start_time: layout.start_time,
        end_time,
        lines: layout.lines,
        highlights,
    };
    (page, clamped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Line, Word};
    use approx::assert_abs_diff_eq;

    const FRAME: f64 = 1.0 / 24.0;

    fn layout(starts: &[f64], first_word: usize, end_time: f64) -> PageLayout {
        let words = starts
            .iter()
            .enumerate()
            .map(|(offset, &start)| Word {
                index: first_word + offset,
                text: format!("w{}", first_word + offset),
                start,
                syllables: first_word + offset..first_word + offset + 1,
                starts_line: false,
            })
            .collect();
        PageLayout {
            first_word,
            start_time: starts[0],
            end_time,
            lines: vec![Line { words }],
        }
    }

    #[test]
    fn intervals_follow_onsets() {
        let pages = schedule_highlights(vec![layout(&[1.0, 1.5, 2.25], 0, 3.0)], FRAME);
        let spans: Vec<(f64, f64)> = pages[0]
            .highlights
            .iter()
            .map(|h| (h.relative_start, h.relative_end))
            .collect();
        assert_eq!(spans, vec![(0.0, 0.5), (0.5, 1.25), (1.25, 2.0)]);
        assert_abs_diff_eq!(pages[0].end_time, 3.0);
    }

    #[test]
    fn last_onset_tail_is_stretched_to_one_frame() {
        let pages = schedule_highlights(vec![layout(&[2.0, 3.0], 4, 3.0)], FRAME);
        let page = &pages[0];
        let last = page.highlights[1];
        assert_abs_diff_eq!(last.relative_start, 1.0);
        assert_abs_diff_eq!(last.duration(), FRAME, epsilon = 1e-12);
        assert_abs_diff_eq!(page.duration(), last.relative_end, epsilon = 1e-12);
        assert_eq!(last.word_index, 5);
    }

    #[test]
    fn duplicate_onsets_keep_contiguity() {
        let pages = schedule_highlights(vec![layout(&[0.0, 0.0, 0.0, 1.0], 0, 2.0)], FRAME);
        let highlights = &pages[0].highlights;
        for pair in highlights.windows(2) {
            assert_eq!(pair[0].relative_end, pair[1].relative_start);
        }
        for interval in highlights {
            assert!(interval.duration() >= FRAME - 1e-12);
        }
        assert_abs_diff_eq!(highlights[3].relative_end, 2.0);
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let mut page = layout(&[0.0, 0.5, 1.0], 0, 1.5);
        let second = page.lines[0].words.split_off(2);
        page.lines.push(Line { words: second });

        let pages = schedule_highlights(vec![page], FRAME);
        let coords: Vec<(usize, usize, usize)> = pages[0]
            .highlights
            .iter()
            .map(|h| (h.position, h.line, h.column))
            .collect();
        assert_eq!(coords, vec![(0, 0, 0), (1, 0, 1), (2, 1, 0)]);
        assert_eq!(pages[0].word(2).map(|w| w.index), Some(2));
    }
}
