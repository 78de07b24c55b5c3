//! Term frequencies over review text.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde::Serialize;

/// Maximum number of terms kept in a summary.
pub const MAX_TOP_TERMS: usize = 50;

/// Shortest token counted as a term.
const MIN_TERM_LEN: usize = 3;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "about", "above", "after", "again", "against", "all", "also", "and", "any", "are",
        "because", "been", "before", "being", "below", "between", "both", "but", "can", "could",
        "did", "does", "doing", "down", "during", "each", "even", "few", "for", "from", "further",
        "get", "got", "had", "has", "have", "having", "her", "here", "hers", "herself", "him",
        "himself", "his", "how", "into", "its", "itself", "just", "more", "most", "myself", "nor",
        "not", "now", "off", "once", "only", "other", "our", "ours", "ourselves", "out", "over",
        "own", "same", "she", "should", "some", "such", "than", "that", "the", "their", "theirs",
        "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "too",
        "under", "until", "very", "was", "were", "what", "when", "where", "which", "while", "who",
        "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// A term and how often it occurs.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Split text into lowercase alphabetic terms, dropping short tokens and
/// stop words.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|token| token.chars().count() >= MIN_TERM_LEN)
        .map(str::to_lowercase)
        .filter(|token| !STOP_WORDS.contains(token.as_str()))
}

/// Count terms across `texts` and return the most frequent ones.
///
/// Sorted by count descending, ties broken alphabetically, at most `limit`.
pub fn top_terms<'a>(texts: impl IntoIterator<Item = &'a str>, limit: usize) -> Vec<TermCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for term in tokenize(text) {
            *counts.entry(term).or_default() += 1;
        }
    }

    let mut terms: Vec<TermCount> = counts
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    terms.truncate(limit);
    terms
}
