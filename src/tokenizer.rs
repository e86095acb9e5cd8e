// src/tokenizer.rs
//! Negation-aware tokenizer.
//!
//! A negation trigger puts exactly the next word under negation. That word is
//! replaced by its antonym when one exists and is not a stop-word, otherwise it
//! is emitted with the `neg_` marker. The antonym lookup runs for every negated
//! word, stop-words included; the stop-word filter only applies to words that
//! are not negated.

use std::sync::Arc;

use crate::antonym::AntonymSource;
use crate::lexicon::{is_negation_trigger, is_stop_word, NEGATION_MARKER};

#[derive(Clone)]
pub struct NegationTokenizer {
    antonyms: Arc<dyn AntonymSource>,
}

impl NegationTokenizer {
    pub fn new(antonyms: Arc<dyn AntonymSource>) -> Self {
        Self { antonyms }
    }

    pub fn antonym_source(&self) -> &dyn AntonymSource {
        self.antonyms.as_ref()
    }

    /// Tokens in emission order. Expects normalized text.
    pub fn tokenize(&self, normalized: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut negate = false;

        for word in normalized.split_whitespace() {
            if is_negation_trigger(word) {
                negate = true;
                continue;
            }

            if negate {
                match self.antonyms.antonym_of(word) {
                    Some(ant) if !is_stop_word(&ant) => out.push(ant),
                    _ => out.push(format!("{NEGATION_MARKER}{word}")),
                }
                negate = false;
            } else if !is_stop_word(word) {
                out.push(word.to_string());
            }
        }
        out
    }

    /// Tokens joined with single spaces, the string handed to the vectorizer.
    pub fn clean_text(&self, normalized: &str) -> String {
        self.tokenize(normalized).join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antonym::{AntonymTable, NoAntonyms};

    fn tok() -> NegationTokenizer {
        NegationTokenizer::new(Arc::new(AntonymTable::new([
            ("good", "bad"),
            ("happy", "unhappy"),
            ("empty", "full"),
        ])))
    }

    #[test]
    fn negated_word_takes_antonym() {
        assert_eq!(tok().tokenize("not good"), vec!["bad"]);
    }

    #[test]
    fn negated_word_without_antonym_gets_marker() {
        let t = NegationTokenizer::new(Arc::new(NoAntonyms));
        assert_eq!(t.tokenize("not good"), vec!["neg_good"]);
    }

    #[test]
    fn negation_consumes_stop_word() {
        // "the" is negated before any stop-word check, so the scope ends there
        assert_eq!(tok().tokenize("not the best movie"), vec!["neg_the", "best", "movie"]);
    }

    #[test]
    fn stop_word_antonym_is_rejected() {
        assert_eq!(tok().tokenize("never empty"), vec!["neg_empty"]);
    }

    #[test]
    fn trailing_trigger_emits_nothing() {
        assert!(tok().tokenize("never").is_empty());
        assert_eq!(tok().tokenize("movie without"), vec!["movie"]);
    }

    #[test]
    fn scope_is_exactly_one_word() {
        assert_eq!(tok().tokenize("not happy happy"), vec!["unhappy", "happy"]);
        // consecutive triggers keep the flag set
        assert_eq!(tok().tokenize("no never good"), vec!["bad"]);
    }

    #[test]
    fn end_to_end_sentence() {
        assert_eq!(tok().clean_text("i am not happy"), "unhappy");
        assert_eq!(tok().clean_text(""), "");
    }
}
