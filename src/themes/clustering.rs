//! Greedy token-set clustering
//!
//! The full n x n similarity matrix is built up front. That is fine for the
//! few hundred comments of a typical post; much larger corpora would need an
//! inverted index over tokens instead.

use crate::config::ThemeConfig;
use crate::preprocess::jaccard_similarity;
use crate::types::Sentiment;

use super::tokenize::Document;

/// Pairwise Jaccard similarity over token sets
pub fn similarity_matrix(docs: &[Document]) -> Vec<Vec<f64>> {
    let n = docs.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let sim = jaccard_similarity(&docs[i].token_set, &docs[j].token_set);
            matrix[i][j] = sim;
            matrix[j][i] = sim;
        }
    }
    matrix
}

/// Group document indices into clusters, largest first.
///
/// Each unassigned seed takes every later unassigned document at or above the
/// similarity threshold. A seed left alone gets a relaxed pass: any unassigned
/// document sharing one token and the same sentiment, or two tokens regardless.
/// Undersized clusters are dropped and their non-seed members released, except
/// that a corpus of at most `small_corpus_limit` documents keeps singletons
/// with at least one token.
pub fn cluster_documents(
    docs: &[Document],
    sentiments: &[Sentiment],
    matrix: &[Vec<f64>],
    config: &ThemeConfig,
) -> Vec<Vec<usize>> {
    let n = docs.len();
    let sentiment_of = |i: usize| sentiments.get(i).copied().unwrap_or_default();
    let small_corpus = n <= config.small_corpus_limit;

    let mut assigned = vec![false; n];
    let mut clusters: Vec<Vec<usize>> = Vec::new();

    for seed in 0..n {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];

        for j in (seed + 1)..n {
            if !assigned[j] && matrix[seed][j] >= config.similarity_threshold {
                assigned[j] = true;
                members.push(j);
            }
        }

        if members.len() == 1 {
            for j in 0..n {
                if assigned[j] {
                    continue;
                }
                let shared = docs[seed].token_set.intersection(&docs[j].token_set).count();
                if (shared >= 1 && sentiment_of(seed) == sentiment_of(j)) || shared >= 2 {
                    assigned[j] = true;
                    members.push(j);
                }
            }
        }

        let keep = members.len() >= config.min_cluster_size
            || (members.len() == 1 && small_corpus && !docs[seed].token_set.is_empty());

        if keep {
            clusters.push(members);
        } else {
            for &m in &members[1..] {
                assigned[m] = false;
            }
        }
    }

    clusters.sort_by(|a, b| b.len().cmp(&a.len()));
    clusters.truncate(config.max_clusters);

    tracing::debug!(documents = n, clusters = clusters.len(), "Clustering complete");
    clusters
}

/// Mean pairwise similarity of the members; 0.5 for a singleton
pub fn coherence(members: &[usize], matrix: &[Vec<f64>]) -> f64 {
    if members.len() < 2 {
        return 0.5;
    }
    let mut sum = 0.0;
    let mut pairs = 0usize;
    for (a, &i) in members.iter().enumerate() {
        for &j in &members[a + 1..] {
            sum += matrix[i][j];
            pairs += 1;
        }
    }
    sum / pairs as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::tokenize::tokenize;
    use std::collections::HashSet;

    fn docs(texts: &[&str]) -> Vec<Document> {
        texts.iter().map(|t| tokenize(t)).collect()
    }

    fn assert_disjoint(clusters: &[Vec<usize>]) {
        let mut seen = HashSet::new();
        for c in clusters {
            for m in c {
                assert!(seen.insert(*m), "document {m} in two clusters");
            }
        }
    }

    #[test]
    fn test_matrix_symmetric() {
        let corpus = docs(&["audio terrible", "audio great", "video amazing"]);
        let m = similarity_matrix(&corpus);
        for i in 0..3 {
            assert_eq!(m[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(m[i][j], m[j][i]);
            }
        }
        assert!((m[0][1] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_three_unrelated_comments_stay_single() {
        let corpus = docs(&["This video is amazing!", "The audio is terrible", "I loved it"]);
        let sentiments = [Sentiment::Positive, Sentiment::Negative, Sentiment::Positive];
        let m = similarity_matrix(&corpus);
        let clusters = cluster_documents(&corpus, &sentiments, &m, &ThemeConfig::default());
        assert_eq!(clusters, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_similar_comments_grouped() {
        let corpus = docs(&[
            "audio quality terrible",
            "great tutorial thanks",
            "audio quality bad",
            "tutorial really helped thanks",
            "random unrelated remark",
            "another different topic",
            "audio levels quality",
        ]);
        let sentiments = vec![Sentiment::Neutral; corpus.len()];
        let m = similarity_matrix(&corpus);
        let clusters = cluster_documents(&corpus, &sentiments, &m, &ThemeConfig::default());

        assert_disjoint(&clusters);
        assert_eq!(clusters[0], vec![0, 2, 6]);
        assert_eq!(clusters[1], vec![1, 3]);
        // seven documents: unrelated singletons are dropped
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_relaxed_merge_requires_matching_sentiment_for_one_token() {
        let corpus = docs(&[
            "camera work stunning beautiful shots everywhere",
            "camera angles were clumsy awkward throughout",
            "lighting camera setup",
        ]);
        let threshold_config = ThemeConfig { similarity_threshold: 0.5, ..ThemeConfig::default() };
        let sentiments = [Sentiment::Positive, Sentiment::Negative, Sentiment::Positive];
        let m = similarity_matrix(&corpus);
        let clusters = cluster_documents(&corpus, &sentiments, &m, &threshold_config);
        assert_disjoint(&clusters);
        assert_eq!(clusters[0], vec![0, 2]);
        assert_eq!(clusters[1], vec![1]);
    }

    #[test]
    fn test_max_clusters_cap() {
        let corpus = docs(&["alpha beta", "alpha beta", "gamma delta", "gamma delta"]);
        let sentiments = vec![Sentiment::Neutral; 4];
        let m = similarity_matrix(&corpus);
        let config = ThemeConfig { max_clusters: 1, ..ThemeConfig::default() };
        assert_eq!(cluster_documents(&corpus, &sentiments, &m, &config).len(), 1);
    }

    #[test]
    fn test_coherence() {
        let corpus = docs(&["audio terrible", "audio great"]);
        let m = similarity_matrix(&corpus);
        assert!((coherence(&[0, 1], &m) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(coherence(&[0], &m), 0.5);
    }
}
