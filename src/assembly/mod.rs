//! Word assembly - joins continued syllables into complete words
//!
//! Each syllable token owns the onset at its syllable index. A word closes on
//! its first non-continued syllable and takes that syllable's onset.

use tracing::debug;

use crate::errors::ScheduleError;
use crate::types::{ReconciledTimings, Token, Word};

/// Assemble words from tokens and their reconciled onsets
///
/// # Errors
/// * [`ScheduleError::UnterminatedWord`] when the tokens end on a continued syllable
/// * [`ScheduleError::InsufficientOnsets`] when `timings` holds fewer onsets than
///   there are syllable tokens
pub fn assemble_words(
    tokens: &[Token],
    timings: &ReconciledTimings,
) -> Result<Vec<Word>, ScheduleError> {
    let mut accumulator = WordAccumulator::new();
    for token in tokens {
        accumulator.handle_token(token, timings)?;
    }
    accumulator.finish(tokens.len())
}

/// Line starts are signalled by an uppercase letter or an opening parenthesis
pub fn opens_line(syllable: &str) -> bool {
    syllable
        .trim_start()
        .chars()
        .next()
        .is_some_and(|first| first.is_uppercase() || first == '(')
}

struct WordAccumulator {
    words: Vec<Word>,
    pending: String,
    pending_from: usize,
    pending_starts_line: bool,
    syllable_idx: usize,
    line_break_requested: bool,
}

impl WordAccumulator {
    fn new() -> Self {
        Self {
            words: Vec::new(),
            pending: String::new(),
            pending_from: 0,
            pending_starts_line: false,
            syllable_idx: 0,
            line_break_requested: false,
        }
    }

    fn handle_token(
        &mut self,
        token: &Token,
        timings: &ReconciledTimings,
    ) -> Result<(), ScheduleError> {
        match token {
            Token::LineBreak => {
                if self.is_assembling() {
                    debug!(
                        word = %self.pending,
                        "line break inside a word ignored"
                    );
                } else {
                    self.line_break_requested = true;
                }
                Ok(())
            }
            Token::Syllable { text, continues } => {
                if !self.is_assembling() {
                    self.begin_word(text);
                }
                self.pending.push_str(text);
                let syllable_idx = self.syllable_idx;
                self.syllable_idx += 1;
                if *continues {
                    return Ok(());
                }
                let start = timings.onsets.get(syllable_idx).copied().ok_or(
                    ScheduleError::InsufficientOnsets {
                        tokens: syllable_idx + 1,
                        onsets: timings.len(),
                    },
                )?;
                self.close_word(start);
                Ok(())
            }
        }
    }

    fn finish(self, token_count: usize) -> Result<Vec<Word>, ScheduleError> {
        if self.is_assembling() {
            return Err(ScheduleError::UnterminatedWord {
                pending: self.pending,
                tokens: token_count,
            });
        }
        Ok(self.words)
    }

    fn is_assembling(&self) -> bool {
        self.syllable_idx > self.pending_from
    }

    fn begin_word(&mut self, first_syllable: &str) {
        self.pending_from = self.syllable_idx;
        self.pending_starts_line = self.line_break_requested || opens_line(first_syllable);
        self.line_break_requested = false;
    }

    fn close_word(&mut self, start: f64) {
        self.words.push(Word {
            index: self.words.len(),
            text: std::mem::take(&mut self.pending),
            start,
            syllables: self.pending_from..self.syllable_idx,
            starts_line: self.pending_starts_line,
        });
        self.pending_from = self.syllable_idx;
    }
}
