//! Text normalization and token-set similarity

use std::collections::HashSet;

fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200F}' | '\u{2060}' | '\u{FEFF}')
        || (c.is_control() && !c.is_whitespace())
}

/// Strip control and zero-width characters, collapse runs of the same
/// punctuation mark to one, and collapse whitespace.
pub fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev: Option<char> = None;

    for c in raw.chars().filter(|c| !is_invisible(*c)) {
        if c.is_ascii_punctuation() && prev == Some(c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase, punctuation-free, single-spaced copy
pub fn normalize_text(cleaned: &str) -> String {
    let lowered: String = cleaned
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distinct words of a normalized string
pub fn word_set(normalized: &str) -> HashSet<&str> {
    normalized.split_whitespace().collect()
}

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`. Two empty sets are identical (1.0).
pub fn jaccard_similarity<T>(a: &HashSet<T>, b: &HashSet<T>) -> f64
where
    T: Eq + std::hash::Hash,
{
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_punctuation_and_whitespace() {
        assert_eq!(clean_text("  Wow!!!!   so   good??  "), "Wow! so good?");
        assert_eq!(clean_text("zero\u{200B}width"), "zerowidth");
        assert_eq!(clean_text("line\nbreak\ttab"), "line break tab");
    }

    #[test]
    fn test_clean_keeps_distinct_punctuation() {
        assert_eq!(clean_text("what?!"), "what?!");
        assert_eq!(clean_text("...and then"), ".and then");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_text("This Video, is AMAZING!"), "this video is amazing");
        assert_eq!(normalize_text("don't"), "don t");
    }

    #[test]
    fn test_jaccard_symmetric_and_reflexive() {
        let a = word_set("the audio is terrible");
        let b = word_set("audio is great");
        assert!((jaccard_similarity(&a, &b) - jaccard_similarity(&b, &a)).abs() < 1e-12);
        assert!((jaccard_similarity(&a, &a) - 1.0).abs() < 1e-12);
        assert!((jaccard_similarity(&a, &b) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_jaccard_empty_sets() {
        let empty: HashSet<&str> = HashSet::new();
        let a = word_set("hello");
        assert!((jaccard_similarity(&empty, &empty) - 1.0).abs() < 1e-12);
        assert_eq!(jaccard_similarity(&empty, &a), 0.0);
    }
}
