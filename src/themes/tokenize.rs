//! Tokenizer shared by keyword extraction and clustering

use std::collections::HashSet;

const STOPWORDS: &[&str] = &[
    // articles, conjunctions, prepositions
    "the", "and", "but", "for", "nor", "yet", "with", "from", "into", "onto", "about", "above",
    "after", "again", "against", "before", "below", "between", "during", "over", "under",
    "through", "until", "upon", "off", "out", "than", "then", "too", "very", "via",
    // pronouns and determiners
    "you", "your", "yours", "yourself", "they", "them", "their", "theirs", "this", "that",
    "these", "those", "his", "her", "hers", "him", "its", "our", "ours", "she", "who", "whom",
    "whose", "which", "what", "there", "here", "some", "any", "each", "every", "all", "both",
    "few", "more", "most", "other", "such", "own", "same",
    // auxiliaries and common verbs
    "are", "was", "were", "been", "being", "have", "has", "had", "having", "does", "did",
    "doing", "done", "will", "would", "could", "should", "shall", "might", "must", "can",
    "cannot", "may", "get", "got", "just", "also", "only", "even", "still", "really",
    // contractions split by punctuation stripping
    "don", "doesn", "didn", "isn", "aren", "wasn", "weren", "won", "wouldn", "couldn",
    "shouldn", "ain", "let",
    // discourse
    "how", "why", "when", "where", "not", "now", "one", "much", "many", "well", "lol", "omg",
];

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// A comment split for analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Every lowercase word, punctuation stripped, in order
    pub words: Vec<String>,
    /// Meaningful tokens in order, with repeats
    pub tokens: Vec<String>,
    pub token_set: HashSet<String>,
}

/// Lowercase, strip non-word characters, drop stopwords, numbers and words of
/// two characters or fewer.
pub fn tokenize(text: &str) -> Document {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
        .collect();

    let words: Vec<String> = stripped.split_whitespace().map(str::to_string).collect();
    let tokens: Vec<String> = words.iter().filter(|w| is_meaningful(w)).cloned().collect();
    let token_set = tokens.iter().cloned().collect();

    Document { words, tokens, token_set }
}

fn is_meaningful(word: &str) -> bool {
    word.chars().count() > 2
        && !word.chars().all(|c| c.is_numeric())
        && !is_stopword(word)
}
