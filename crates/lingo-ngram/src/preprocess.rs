//! Text normalization for the trigram model.
//!
//! Text is lowercased, stripped to ASCII letters, ASCII digits, whitespace
//! and `.`, whitespace-collapsed, then split on `.` into sentences.
//!
//! Splitting is purely on the period character, so abbreviations such as
//! "Mr. Smith" produce two sentences (`mr` and `smith`). This is a known
//! limitation of period-based segmentation and is kept as-is.

/// Sentence and token extraction for [`TrigramModel::fit`](crate::TrigramModel::fit).
#[derive(Clone, Copy, Debug, Default)]
pub struct TextPreprocessor;

impl TextPreprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Normalize `text` and split it into token sequences, one per non-empty sentence.
    pub fn sentences(&self, text: &str) -> Vec<Vec<String>> {
        let cleaned = clean_text(text);
        split_sentences(&cleaned)
            .map(|s| tokenize(s).map(str::to_owned).collect())
            .collect()
    }
}

/// Lowercase, drop everything but ASCII alphanumerics, whitespace and `.`,
/// collapse whitespace runs to one space, and trim.
pub fn clean_text(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|&c| c.is_ascii_alphanumeric() || is_separator(c) || c == '.')
        .collect();
    kept.split(is_separator)
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unicode whitespace plus the ASCII information separators U+001C..=U+001F,
/// which most text tooling also splits words on.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Split cleaned text on `.`, skipping candidates that are blank after trimming.
pub fn split_sentences(cleaned: &str) -> impl Iterator<Item = &str> {
    cleaned.split('.').map(str::trim).filter(|s| !s.is_empty())
}

/// Whitespace tokenization.
pub fn tokenize(sentence: &str) -> impl Iterator<Item = &str> {
    sentence.split_whitespace()
}
