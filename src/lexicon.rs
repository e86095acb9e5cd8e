// src/lexicon.rs
//! Static word tables: negation triggers, English stop-words, the
//! emotion→sentiment map and the correction choices offered to users.
//! Built once, never mutated.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Words that put the next word under negation.
pub const NEGATION_TRIGGERS: [&str; 9] = [
    "not", "no", "never", "none", "nothing", "nobody", "neither", "nowhere", "without",
];

/// Prefix for a negated word that has no usable antonym.
pub const NEGATION_MARKER: &str = "neg_";

/// scikit-learn's `ENGLISH_STOP_WORDS` (318 entries).
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
    "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
    "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
    "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
    "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
    "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
    "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
    "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
    "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
    "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
    "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

static STOP_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

static NEGATION_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NEGATION_TRIGGERS.iter().copied().collect());

/// Coarse polarity derived from an emotion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static SENTIMENT_MAP: Lazy<HashMap<&'static str, Sentiment>> = Lazy::new(|| {
    HashMap::from([
        ("sad", Sentiment::Negative),
        ("fear", Sentiment::Negative),
        ("anger", Sentiment::Negative),
        ("love", Sentiment::Positive),
        ("joy", Sentiment::Positive),
        ("surprise", Sentiment::Neutral),
    ])
});

/// Labels a user may pick when correcting a prediction.
pub const CORRECTION_CHOICES: [&str; 7] =
    ["Love", "Fear", "Joy", "Surprise", "Sad", "Anger", "Neutral"];

pub fn is_stop_word(word: &str) -> bool {
    STOP_SET.contains(word)
}

pub fn is_negation_trigger(word: &str) -> bool {
    NEGATION_SET.contains(word)
}

/// Case-insensitive lookup; unmapped labels are `Neutral`.
pub fn sentiment_for(label: &str) -> Sentiment {
    SENTIMENT_MAP
        .get(label.to_lowercase().as_str())
        .copied()
        .unwrap_or(Sentiment::Neutral)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_word_list_is_complete_and_unique() {
        assert_eq!(STOP_WORDS.len(), 318);
        assert_eq!(STOP_SET.len(), 318);
        assert!(is_stop_word("the"));
        assert!(is_stop_word("full"));
        assert!(!is_stop_word("happy"));
    }

    #[test]
    fn every_trigger_is_recognised() {
        for w in NEGATION_TRIGGERS {
            assert!(is_negation_trigger(w), "{w}");
        }
        assert!(!is_negation_trigger("nor"));
    }

    #[test]
    fn sentiment_mapping() {
        assert_eq!(sentiment_for("joy"), Sentiment::Positive);
        assert_eq!(sentiment_for("Joy"), Sentiment::Positive);
        assert_eq!(sentiment_for("anger"), Sentiment::Negative);
        assert_eq!(sentiment_for("surprise"), Sentiment::Neutral);
        assert_eq!(sentiment_for("boredom"), Sentiment::Neutral);
        assert_eq!(Sentiment::Negative.to_string(), "Negative");
    }
}
