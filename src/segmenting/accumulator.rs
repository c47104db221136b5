use crate::config::Paging;
use crate::types::{Line, PageLayout, Word};

pub(super) struct PageAccumulator {
    pages: Vec<PageLayout>,
    lines: Vec<Line>,
    current_line: Line,
    first_word: usize,
    word_count: usize,
}

impl PageAccumulator {
    pub(super) fn new() -> Self {
        Self {
            pages: Vec::new(),
            lines: Vec::new(),
            current_line: Line::default(),
            first_word: 0,
            word_count: 0,
        }
    }

    pub(super) fn handle_word(&mut self, word: &Word, paging: &Paging) {
        match paging {
            Paging::FixedCount { words_per_page } => {
                self.attach_word(word);
                if self.word_count >= *words_per_page {
                    self.finish_page();
                }
            }
            Paging::Punctuation {
                max_words_per_page,
                break_punctuation,
            } => {
                // No break before the first word of a page
                if word.starts_line && self.word_count > 0 {
                    self.break_line();
                }
                self.attach_word(word);
                let closes_phrase = word
                    .text
                    .trim_end()
                    .chars()
                    .next_back()
                    .is_some_and(|last| break_punctuation.contains(&last));
                if closes_phrase || self.word_count >= *max_words_per_page {
                    self.finish_page();
                }
            }
        }
    }

    pub(super) fn finish_page(&mut self) {
        if self.word_count == 0 {
            return;
        }
        self.break_line();
        let lines = std::mem::take(&mut self.lines);
        let start_time = lines
            .first()
            .and_then(|line| line.words.first())
            .map_or(0.0, |word| word.start);
        // last-onset window; widened later for full-window paging
        let end_time = lines
            .last()
            .and_then(|line| line.words.last())
            .map_or(start_time, |word| word.start);
        self.pages.push(PageLayout {
            first_word: self.first_word,
            start_time,
            end_time,
            lines,
        });
        self.first_word += self.word_count;
        self.word_count = 0;
    }

    pub(super) fn into_pages(self) -> Vec<PageLayout> {
        self.pages
    }

    fn attach_word(&mut self, word: &Word) {
        self.current_line.words.push(word.clone());
        self.word_count += 1;
    }

    fn break_line(&mut self) {
        if self.current_line.words.is_empty() {
            return;
        }
        self.lines.push(std::mem::take(&mut self.current_line));
    }
}
