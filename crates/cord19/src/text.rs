//! Word frequencies and simple text metrics.
//!
//! Two tokenizers are provided. [title_tokens] splits a title on
//! whitespace and keeps hyphenated terms like `covid-19` intact, while
//! [words] extracts runs of ASCII letters and applies a larger stop
//! word list.

use std::sync::OnceLock;

use hashbrown::HashMap;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::dataset::Dataset;

/// Stop words removed by [title_tokens].
pub const TITLE_STOP_WORDS: [&str; 13] = [
    "the", "and", "or", "in", "on", "at", "to", "for", "of", "with", "by",
    "a", "an",
];

/// Stop words removed by [words].
pub const STOP_WORDS: [&str; 31] = [
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
    "by", "from", "up", "about", "into", "through", "during", "before",
    "after", "a", "an", "as", "are", "was", "were", "been", "be", "have",
    "has", "had",
];

const MIN_LENGTH: usize = 3;
const PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ':', ';'];

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[a-zA-Z]+\b").unwrap())
}

#[inline]
fn normalize(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

/// Splits a title into lowercase tokens.
///
/// Leading and trailing punctuation (`.,!?:;`) is removed from each
/// token; tokens shorter than three characters and stop words are
/// dropped.
pub fn title_tokens(title: &str) -> Vec<String> {
    normalize(title)
        .split_whitespace()
        .map(|token| token.trim_matches(&PUNCTUATION[..]))
        .filter(|token| {
            token.chars().count() >= MIN_LENGTH
                && !TITLE_STOP_WORDS.contains(token)
        })
        .map(String::from)
        .collect()
}

/// Extracts the lowercase words (runs of ASCII letters) of a text.
pub fn words(text: &str) -> Vec<String> {
    let text = normalize(text);
    word_re()
        .find_iter(&text)
        .map(|m| m.as_str())
        .filter(|word| word.len() >= MIN_LENGTH && !STOP_WORDS.contains(word))
        .map(String::from)
        .collect()
}

/// A word frequency table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordFreq(HashMap<String, u64>);

impl WordFreq {
    /// Returns the number of distinct words.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, word: &str) -> u64 {
        self.0.get(word).copied().unwrap_or_default()
    }

    /// Returns the `k` most frequent words, ordered by decreasing count
    /// and alphabetically within the same count.
    pub fn most_common(&self, k: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(&String, &u64)> = self.0.iter().collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        entries
            .into_iter()
            .take(k)
            .map(|(word, count)| (word.clone(), *count))
            .collect()
    }
}

impl Extend<String> for WordFreq {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for word in iter {
            self.0
                .entry(word)
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
    }
}

impl FromIterator<String> for WordFreq {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut freq = Self::default();
        freq.extend(iter);
        freq
    }
}

/// Counts the title tokens (see [title_tokens]) of all records.
pub fn title_frequencies(dataset: &Dataset) -> WordFreq {
    dataset
        .iter()
        .filter_map(|paper| paper.title.as_deref())
        .flat_map(title_tokens)
        .collect()
}

/// Counts the title words (see [words]) of all records.
pub fn word_frequencies(dataset: &Dataset) -> WordFreq {
    dataset
        .iter()
        .filter_map(|paper| paper.title.as_deref())
        .flat_map(words)
        .collect()
}

/// Returns the arithmetic mean, or `None` if there are no values.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), value| (sum + value, n + 1));

    if n > 0 {
        Some(sum / n as f64)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TitleStats {
    pub titles: usize,
    /// Average title length in characters.
    pub avg_length: Option<f64>,
    /// Average number of whitespace-separated words per title.
    pub avg_words: Option<f64>,
}

impl TitleStats {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let titles: Vec<&str> = dataset
            .iter()
            .filter_map(|paper| paper.title.as_deref())
            .collect();

        Self {
            titles: titles.len(),
            avg_length: mean(
                titles.iter().map(|title| title.chars().count() as f64),
            ),
            avg_words: mean(
                titles
                    .iter()
                    .map(|title| title.split_whitespace().count() as f64),
            ),
        }
    }
}
