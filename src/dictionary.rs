//! Word-frequency dictionary backing the spell checker.
//!
//! Words are stored lowercase with an occurrence count. The count ranks
//! candidate corrections: the more frequent word wins.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::error::McpSpellcheckError;

/// Project and tool names that are never reported as misspelled.
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "haystack", "github", "mcp", "json", "readme", "markdown", "api",
];

static EMBEDDED_ENGLISH: &str = include_str!("../data/en_words.txt");

#[derive(Debug, Clone, Default)]
pub struct WordFrequency {
    counts: HashMap<String, u64>,
    letters: BTreeSet<char>,
    longest_word_length: usize,
}

impl WordFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// The English word list compiled into the binary.
    pub fn english() -> Self {
        let mut dict = Self::new();
        dict.load_text(EMBEDDED_ENGLISH);
        dict
    }

    /// Load a word list in which each line is `word count` or a bare `word`.
    ///
    /// Blank lines and `#` comments are skipped. A bare word, or one whose
    /// count does not parse, counts once. Returns the number of entries read.
    pub fn load_text(&mut self, text: &str) -> usize {
        let mut loaded = 0;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let count = parts.next().and_then(|c| c.parse().ok()).unwrap_or(1);
            self.add(word, count);
            loaded += 1;
        }
        loaded
    }

    pub fn load_file(&mut self, path: &Path) -> Result<usize, McpSpellcheckError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            McpSpellcheckError::Dictionary {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let loaded = self.load_text(&text);
        tracing::debug!(path = %path.display(), words = loaded, "Loaded word list");
        Ok(loaded)
    }

    /// Add each word once, on top of any existing count.
    pub fn load_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.add(word.as_ref(), 1);
        }
    }

    pub fn add(&mut self, word: &str, count: u64) {
        let word = word.to_lowercase();
        if word.is_empty() {
            return;
        }
        self.longest_word_length = self.longest_word_length.max(word.chars().count());
        self.letters.extend(word.chars());
        *self.counts.entry(word).or_insert(0) += count;
    }

    /// Expects a lowercase word.
    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    /// Occurrence count, zero for unknown words. Expects a lowercase word.
    pub fn frequency(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Every character that appears in some dictionary word.
    pub fn letters(&self) -> &BTreeSet<char> {
        &self.letters
    }

    pub fn longest_word_length(&self) -> usize {
        self.longest_word_length
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
