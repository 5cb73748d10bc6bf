//! Frequency-ranked spell checking over a [`WordFrequency`] dictionary.
//!
//! Corrections are the most frequent known word within edit distance one,
//! falling back to distance two. Lookups are case-insensitive.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dictionary::WordFrequency;
use crate::markdown::{clean_markdown, extract_words};

/// Outcome of spellchecking one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellcheckReport {
    /// Unknown words, lowercase and sorted.
    pub misspelled: Vec<String>,
    /// Best correction for each misspelled word, `None` when nothing is close.
    pub suggestions: BTreeMap<String, Option<String>>,
}

impl SpellcheckReport {
    pub fn is_clean(&self) -> bool {
        self.misspelled.is_empty()
    }
}

/// Spell checker made of a shared base dictionary plus per-checker words.
///
/// The base is never mutated. Allow-listed words go into the checker's own
/// overlay, so every checker starts from the same state.
#[derive(Debug, Clone)]
pub struct SpellChecker {
    base: Arc<WordFrequency>,
    overlay: WordFrequency,
    /// Alphabet for generating edits: letters of the base and the overlay.
    letters: Vec<char>,
}

impl SpellChecker {
    pub fn new(base: Arc<WordFrequency>) -> Self {
        let letters = base.letters().iter().copied().collect();
        Self {
            base,
            overlay: WordFrequency::new(),
            letters,
        }
    }

    /// Checker that also accepts `allow_list` words in any casing.
    pub fn with_allow_list<S: AsRef<str>>(base: Arc<WordFrequency>, allow_list: &[S]) -> Self {
        let mut overlay = WordFrequency::new();
        overlay.load_words(allow_list);
        let letters = base.letters().union(overlay.letters()).copied().collect();
        Self {
            base,
            overlay,
            letters,
        }
    }

    pub fn frequency(&self, word: &str) -> u64 {
        self.base.frequency(word) + self.overlay.frequency(word)
    }

    fn contains(&self, word: &str) -> bool {
        self.base.contains(word) || self.overlay.contains(word)
    }

    fn longest_word_length(&self) -> usize {
        self.base
            .longest_word_length()
            .max(self.overlay.longest_word_length())
    }

    /// Whether a word is eligible for checking at all.
    ///
    /// Lone punctuation, numbers, `nan`, and words far longer than anything
    /// in the dictionary are never flagged.
    fn should_check(&self, word: &str) -> bool {
        let len = word.chars().count();
        if len == 1 && word.chars().all(|c| c.is_ascii_punctuation()) {
            return false;
        }
        if len > self.longest_word_length() + 3 {
            return false;
        }
        if word.eq_ignore_ascii_case("nan") {
            return false;
        }
        word.parse::<f64>().is_err()
    }

    /// Lowercased words that are not in the dictionary.
    pub fn unknown<I, S>(&self, words: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .filter(|w| !self.contains(w) && self.should_check(w))
            .collect()
    }

    /// Lowercased words that are in the dictionary.
    pub fn known<I, S>(&self, words: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .filter(|w| self.contains(w) && self.should_check(w))
            .collect()
    }

    /// Possible spellings of `word`, closest edit distance first.
    ///
    /// A known word (or one that is not checked) is its own only candidate.
    pub fn candidates(&self, word: &str) -> Option<BTreeSet<String>> {
        let word = word.to_lowercase();
        if self.contains(&word) || !self.should_check(&word) {
            return Some(BTreeSet::from([word]));
        }

        let letters = &self.letters;
        let first = edits1(&word, letters);
        let known = self.known(&first);
        if !known.is_empty() {
            return Some(known);
        }

        let second: BTreeSet<String> = first
            .iter()
            .flat_map(|e| edits1(e, letters))
            .filter(|e| self.contains(e))
            .collect();
        if second.is_empty() {
            None
        } else {
            Some(second)
        }
    }

    /// The most frequent candidate, ties going to the alphabetically first.
    pub fn correction(&self, word: &str) -> Option<String> {
        let candidates = self.candidates(word)?;
        let mut best: Option<(u64, String)> = None;
        for candidate in candidates {
            let freq = self.frequency(&candidate);
            if best.as_ref().map_or(true, |(top, _)| freq > *top) {
                best = Some((freq, candidate));
            }
        }
        best.map(|(_, word)| word)
    }

    /// Check a list of words and suggest a correction for each unknown one.
    pub fn check_words<I, S>(&self, words: I) -> SpellcheckReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let misspelled = self.unknown(words);
        let suggestions = misspelled
            .iter()
            .map(|w| (w.clone(), self.correction(w)))
            .collect();
        SpellcheckReport {
            misspelled: misspelled.into_iter().collect(),
            suggestions,
        }
    }
}

/// All strings one delete, transpose, replace, or insert away from `word`.
fn edits1(word: &str, letters: &[char]) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut out: HashSet<String> = HashSet::with_capacity((n + 1) * (letters.len() * 2 + 2));

    for i in 0..=n {
        let (left, right) = chars.split_at(i);
        if !right.is_empty() {
            // delete
            out.insert(left.iter().chain(&right[1..]).collect());
            // replace
            for &c in letters {
                out.insert(
                    left.iter()
                        .copied()
                        .chain(std::iter::once(c))
                        .chain(right[1..].iter().copied())
                        .collect(),
                );
            }
        }
        if right.len() > 1 {
            // transpose
            out.insert(
                left.iter()
                    .chain([&right[1], &right[0]])
                    .chain(&right[2..])
                    .collect(),
            );
        }
        // insert
        for &c in letters {
            out.insert(
                left.iter()
                    .copied()
                    .chain(std::iter::once(c))
                    .chain(right.iter().copied())
                    .collect(),
            );
        }
    }
    out
}

/// Strip markdown from `text` and spellcheck what is left.
///
/// A fresh checker is built for each call from the shared dictionary and the
/// allow-list, so calls never observe each other's state.
pub fn spellcheck_text<S: AsRef<str>>(
    text: &str,
    dictionary: &Arc<WordFrequency>,
    allow_list: &[S],
) -> SpellcheckReport {
    let cleaned = clean_markdown(text);
    let words = extract_words(&cleaned);
    let checker = SpellChecker::with_allow_list(Arc::clone(dictionary), allow_list);
    let report = checker.check_words(&words);
    tracing::debug!(
        words = words.len(),
        misspelled = report.misspelled.len(),
        "Spellchecked text"
    );
    report
}
