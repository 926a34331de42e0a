//! Theme naming, representative comments and theme keywords

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::{HashMap, HashSet};

use super::tokenize::Document;
use crate::types::{KeywordData, PreprocessedComment};

const MAX_REPRESENTATIVES: usize = 3;
const MAX_THEME_KEYWORDS: usize = 5;
const LENGTH_WEIGHT: f64 = 0.7;
const LIKES_WEIGHT: f64 = 0.3;

/// Name from the most frequent cluster tokens, preferring global keywords.
///
/// Two tokens for clusters under three members, three otherwise. Title-cased
/// and joined with " & ".
pub fn theme_name(members: &[usize], docs: &[Document], global_keywords: &HashSet<&str>) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &i in members {
        for token in &docs[i].tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(wa, ca), (wb, cb)| {
        global_keywords
            .contains(wb)
            .cmp(&global_keywords.contains(wa))
            .then_with(|| cb.cmp(ca))
            .then_with(|| wa.cmp(wb))
    });

    let take = if members.len() < 3 { 2 } else { 3 };
    let words: Vec<String> = ranked.into_iter().take(take).map(|(w, _)| title_case(w)).collect();

    if words.is_empty() {
        placeholder_name()
    } else {
        words.join(" & ")
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn placeholder_name() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(5)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("Theme {suffix}")
}

/// Top member texts by `0.7 * length + 0.3 * likes`
pub fn representative_comments(members: &[usize], comments: &[PreprocessedComment]) -> Vec<String> {
    let mut scored: Vec<(f64, &PreprocessedComment)> = members
        .iter()
        .filter_map(|&i| comments.get(i))
        .map(|c| {
            let score = LENGTH_WEIGHT * c.cleaned_text.chars().count() as f64
                + LIKES_WEIGHT * c.like_count() as f64;
            (score, c)
        })
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(MAX_REPRESENTATIVES)
        .map(|(_, c)| c.cleaned_text.clone())
        .collect()
}

/// Global keywords (already sorted by TF-IDF) that occur in the cluster
pub fn theme_keywords(members: &[usize], docs: &[Document], keywords: &[KeywordData]) -> Vec<String> {
    let tokens: HashSet<&str> = members
        .iter()
        .flat_map(|&i| docs[i].token_set.iter().map(String::as_str))
        .collect();

    keywords
        .iter()
        .filter(|k| tokens.contains(k.word.as_str()))
        .take(MAX_THEME_KEYWORDS)
        .map(|k| k.word.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::CommentPreprocessor;
    use crate::themes::tokenize::tokenize;
    use crate::types::Comment;

    #[test]
    fn test_name_prefers_global_keywords() {
        let docs = vec![
            tokenize("audio quality terrible audio"),
            tokenize("audio quality poor"),
            tokenize("quality sound mixing"),
        ];
        let global: HashSet<&str> = ["mixing"].into_iter().collect();
        assert_eq!(theme_name(&[0, 1, 2], &docs, &global), "Mixing & Audio & Quality");
    }

    #[test]
    fn test_singleton_name_uses_two_tokens() {
        let docs = vec![tokenize("This video is amazing!")];
        assert_eq!(theme_name(&[0], &docs, &HashSet::new()), "Amazing & Video");
    }

    #[test]
    fn test_placeholder_when_no_tokens() {
        let docs = vec![tokenize("it is what it is")];
        let name = theme_name(&[0], &docs, &HashSet::new());
        assert!(name.starts_with("Theme "));
        assert_eq!(name.len(), "Theme ".len() + 5);
    }

    #[test]
    fn test_representatives_rank_by_length_and_likes() {
        let p = CommentPreprocessor::default();
        let comments = vec![
            p.analyze(&Comment::new("a", "short one")),
            p.analyze(&Comment::new("b", "a somewhat longer comment here").with_likes(0)),
            p.analyze(&Comment::new("c", "tiny").with_likes(100)),
            p.analyze(&Comment::new("d", "mid length text")),
        ];
        let reps = representative_comments(&[0, 1, 2, 3], &comments);
        assert_eq!(reps, vec!["tiny", "a somewhat longer comment here", "mid length text"]);
    }
}
