//! Core types for the karaflow caption scheduling pipeline

use std::ops::Range;

use serde::Serialize;

/// Suffix marking a syllable that continues into the next token
pub const CONTINUATION_MARKER: char = '-';

/// One input token, as read from a syllable sheet (one token per line)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A syllable; `continues` is set when the raw token ended in the continuation marker
    Syllable { text: String, continues: bool },
    /// Explicit "start a new line" sentinel (a blank line in the source)
    LineBreak,
}

impl Token {
    /// Classify a raw token line
    ///
    /// Surrounding whitespace is trimmed, trailing continuation markers are stripped,
    /// and a blank line becomes [`Token::LineBreak`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Token::LineBreak;
        }
        if trimmed.ends_with(CONTINUATION_MARKER) {
            Token::continued(trimmed.trim_end_matches(CONTINUATION_MARKER))
        } else {
            Token::syllable(trimmed)
        }
    }

    /// Closing syllable (no continuation)
    pub fn syllable(text: impl Into<String>) -> Self {
        Token::Syllable {
            text: text.into(),
            continues: false,
        }
    }

    /// Syllable that joins with the next token
    pub fn continued(text: impl Into<String>) -> Self {
        Token::Syllable {
            text: text.into(),
            continues: true,
        }
    }

    pub fn is_syllable(&self) -> bool {
        matches!(self, Token::Syllable { .. })
    }
}

/// Onsets after reconciliation: exactly one per syllable token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledTimings {
    pub onsets: Vec<f64>, // seconds
    /// Onsets taken from the detector
    pub real: usize,
    /// Onsets synthesized to cover a shortfall
    pub synthesized: usize,
    /// Detector onsets left unused because there were more onsets than syllables
    pub dropped: usize,
}

impl ReconciledTimings {
    pub fn len(&self) -> usize {
        self.onsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.onsets.is_empty()
    }
}

/// A complete word assembled from one or more syllables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    /// Position in the full word sequence
    pub index: usize,
    pub text: String,
    /// Onset of the word's last syllable, in seconds
    pub start: f64,
    /// Indices of the syllable tokens this word was built from
    pub syllables: Range<usize>,
    /// A line-start sentinel or a capitalized first syllable preceded this word
    pub starts_line: bool,
}

/// Words displayed together on one row of a page
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Line {
    pub words: Vec<Word>,
}

impl Line {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Output of the segmenter: a page's layout and display window, before highlights
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    /// Global index of the page's first word
    pub first_word: usize,
    pub start_time: f64, // seconds
    pub end_time: f64,   // seconds
    pub lines: Vec<Line>,
}

impl PageLayout {
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|line| line.words.len()).sum()
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|line| line.words.iter())
    }
}

/// When one word is shown in the active style, relative to its page's start
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighlightInterval {
    /// Global word index
    pub word_index: usize,
    /// Position of the word on its page
    pub position: usize,
    /// Line of the page holding the word
    pub line: usize,
    /// Position of the word within that line
    pub column: usize,
    pub relative_start: f64,
    pub relative_end: f64,
}

impl HighlightInterval {
    pub fn duration(&self) -> f64 {
        self.relative_end - self.relative_start
    }

    pub fn contains(&self, relative_time: f64) -> bool {
        relative_time >= self.relative_start && relative_time < self.relative_end
    }
}

/// A caption page handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub index: usize,
    /// Global index of the page's first word
    pub first_word: usize,
    pub start_time: f64, // seconds
    pub end_time: f64,   // seconds
    pub lines: Vec<Line>,
    /// One interval per word, in page order
    pub highlights: Vec<HighlightInterval>,
}

impl Page {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn word_count(&self) -> usize {
        self.highlights.len()
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|line| line.words.iter())
    }

    /// Word at `position` on this page
    pub fn word(&self, position: usize) -> Option<&Word> {
        let interval = self.highlights.get(position)?;
        self.lines.get(interval.line)?.words.get(interval.column)
    }

    /// Page text, one line per row
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
