//! Fixed English stopword set.
//!
//! Built once at first use and never mutated afterwards. Membership is
//! checked against lowercase input; callers case-fold before asking.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Common English stopwords, lowercase.
const COMMON_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can't", "cannot", "could", "couldn't", "did", "didn't", "do", "does", "doesn't",
    "doing", "don't", "down", "during", "each", "few", "for", "from", "further", "had", "hadn't",
    "has", "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i", "i'd", "i'll",
    "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "let's",
    "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on",
    "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "same", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "so", "some",
    "such", "than", "that", "that's", "the", "their", "theirs", "them", "themselves", "then",
    "there", "there's", "these", "they", "they'd", "they'll", "they're", "they've", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we",
    "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when", "when's",
    "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with",
    "won't", "would", "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
    "yourself", "yourselves",
];

static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| COMMON_STOPWORDS.iter().copied().collect());

/// Check whether a (lowercase) word is a stopword.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_words_are_stopwords() {
        assert!(is_stopword("the"));
        assert!(is_stopword("and"));
        assert!(is_stopword("about"));
        assert!(is_stopword("i"));
    }

    #[test]
    fn test_content_words_are_not_stopwords() {
        assert!(!is_stopword("profit"));
        assert!(!is_stopword("acme"));
        assert!(!is_stopword("market"));
    }

    #[test]
    fn test_membership_is_case_sensitive_lowercase() {
        // Callers case-fold before asking; uppercase input is not a member.
        assert!(!is_stopword("The"));
    }
}
