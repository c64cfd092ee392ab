/*!
 * Rule-based glossing: punctuation stripping, stopword removal and lemmatization.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::lemma::lemmatize;

/// Words dropped by the rule-based glosser: forms of "be", articles, common
/// prepositions and conjunctions, auxiliaries and modals, personal pronouns
pub static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "is", "am", "are", "was", "were", "be", "been", "being",
        "a", "an", "the", "to", "of", "in", "on", "at", "by",
        "as", "for", "about", "into", "from", "that",
        "this", "those", "these", "just", "do", "does", "did",
        "have", "has", "had", "having", "so", "because",
        "will", "would", "can", "could", "should", "shall", "may",
        "might", "must", "and", "or", "but", "if", "than", "then",
        "i", "me", "you", "he", "she", "it", "we", "us", "they", "them",
    ])
});

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s]").expect("punctuation pattern is valid")
});

/// Check if a lowercase word is a stopword
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Remove every character that is neither a word character nor whitespace
pub fn strip_punctuation(text: &str) -> String {
    PUNCTUATION.replace_all(text, "").into_owned()
}

/// Bring arbitrary text into gloss shape: no punctuation, uppercase, single spaces
pub fn normalize_gloss(text: &str) -> String {
    strip_punctuation(text)
        .split_whitespace()
        .map(|token| token.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deterministic glossing: drop stopwords, lemmatize, uppercase, keep order
pub fn rule_based_gloss(text: &str) -> String {
    let cleaned = strip_punctuation(text).to_lowercase();

    cleaned
        .split_whitespace()
        .filter(|word| !is_stopword(word))
        .map(|word| lemmatize(word).to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}
