//! TF-IDF keyword extraction

use std::collections::{HashMap, HashSet};

use super::tokenize::Document;
use crate::types::{KeywordData, Sentiment, SentimentTally};

const MAX_CONTEXTS: usize = 5;
const CONTEXT_RADIUS: usize = 2;
const MIN_FREQUENCY: usize = 2;

#[derive(Default)]
struct TermStats {
    frequency: usize,
    document_frequency: usize,
    votes: SentimentTally,
    contexts: Vec<String>,
}

/// Score every token by `(tf / total_tokens) * ln(N / df)`.
///
/// Terms seen fewer than twice, or present in every document (score 0), are
/// dropped. Sorted by score descending, then frequency, then word.
pub fn extract_keywords(
    docs: &[Document],
    sentiments: &[Sentiment],
    max_keywords: usize,
) -> Vec<KeywordData> {
    let total_tokens: usize = docs.iter().map(|d| d.tokens.len()).sum();
    if total_tokens == 0 {
        return Vec::new();
    }
    let total_docs = docs.len() as f64;

    let mut terms: HashMap<&str, TermStats> = HashMap::new();

    for (i, doc) in docs.iter().enumerate() {
        let sentiment = sentiments.get(i).copied().unwrap_or_default();

        for (pos, word) in doc.words.iter().enumerate() {
            if !doc.token_set.contains(word) {
                continue;
            }
            let stats = terms.entry(word.as_str()).or_default();
            stats.frequency += 1;
            if stats.contexts.len() < MAX_CONTEXTS {
                stats.contexts.push(context_window(&doc.words, pos));
            }
        }

        let unique: HashSet<&str> = doc.token_set.iter().map(String::as_str).collect();
        for word in unique {
            if let Some(stats) = terms.get_mut(word) {
                stats.document_frequency += 1;
                stats.votes.add(sentiment);
            }
        }
    }

    let mut keywords: Vec<KeywordData> = terms
        .into_iter()
        .filter(|(_, s)| s.frequency >= MIN_FREQUENCY && s.document_frequency > 0)
        .filter_map(|(word, s)| {
            let tf = s.frequency as f64 / total_tokens as f64;
            let idf = (total_docs / s.document_frequency as f64).ln();
            let tfidf_score = tf * idf;
            if tfidf_score <= 0.0 {
                return None;
            }

            let sentiment = s.votes.majority();
            let sentiment_score = if s.votes.total() == 0 {
                0.0
            } else {
                s.votes.count(sentiment) as f64 / s.votes.total() as f64
            };

            Some(KeywordData {
                word: word.to_string(),
                frequency: s.frequency,
                sentiment,
                contexts: s.contexts,
                tfidf_score,
                sentiment_score,
            })
        })
        .collect();

    keywords.sort_by(|a, b| {
        b.tfidf_score
            .total_cmp(&a.tfidf_score)
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.word.cmp(&b.word))
    });
    keywords.truncate(max_keywords);
    keywords
}

fn context_window(words: &[String], pos: usize) -> String {
    let start = pos.saturating_sub(CONTEXT_RADIUS);
    let end = (pos + CONTEXT_RADIUS + 1).min(words.len());
    words[start..end].join(" ")
}
