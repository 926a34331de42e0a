//! Comment Preprocessor
//!
//! Cleans and normalizes each comment, then sorts it into exactly one of four
//! buckets:
//! - **spam**: length, shouting, spam phrases, repetition, links, symbol density
//! - **toxic**: insult words, masked profanity, hate-speech patterns
//! - **duplicate**: word-set Jaccard similarity above threshold with an
//!   earlier valid comment
//! - **valid**: everything else
//!
//! A comment that is both spam and toxic lands in the spam bucket; both reason
//! lists are kept. Pure and synchronous; never fails.

mod rules;
mod text;

pub use rules::{caps_ratio, longest_char_run, special_char_ratio};
pub use text::{clean_text, jaccard_similarity, normalize_text, word_set};

use std::collections::HashSet;

use crate::config::PreprocessingConfig;
use crate::types::{Comment, PreprocessedComment};

/// Bucket sizes for one preprocessing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessingStats {
    pub total: usize,
    pub valid: usize,
    pub spam: usize,
    pub toxic: usize,
    pub duplicate: usize,
}

impl PreprocessingStats {
    pub fn filtered(&self) -> usize {
        self.spam + self.toxic + self.duplicate
    }

    /// Filtered share of all input (0.0 for empty input)
    pub fn filter_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.filtered() as f64 / self.total as f64
        }
    }
}

impl std::fmt::Display for PreprocessingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} total: {} valid, {} spam, {} toxic, {} duplicate",
            self.total, self.valid, self.spam, self.toxic, self.duplicate
        )
    }
}

/// Output of `CommentPreprocessor::process`
#[derive(Debug, Clone, Default)]
pub struct PreprocessingResult {
    pub valid: Vec<PreprocessedComment>,
    pub spam: Vec<PreprocessedComment>,
    pub toxic: Vec<PreprocessedComment>,
    pub duplicates: Vec<PreprocessedComment>,
    pub stats: PreprocessingStats,
}

impl PreprocessingResult {
    /// Every flagged comment, with `is_filtered` and `filter_reason` set
    pub fn filtered_comments(&self) -> impl Iterator<Item = &Comment> {
        self.spam
            .iter()
            .chain(&self.toxic)
            .chain(&self.duplicates)
            .map(|p| &p.comment)
    }
}

pub struct CommentPreprocessor {
    config: PreprocessingConfig,
}

impl CommentPreprocessor {
    pub fn new(config: PreprocessingConfig) -> Self {
        Self { config }
    }

    /// Clean, flag and bucket every comment. Input order is kept within buckets.
    pub fn process(&self, comments: &[Comment]) -> PreprocessingResult {
        let mut result = PreprocessingResult::default();
        // Word sets of every earlier comment that was neither spam nor toxic,
        // duplicates included, with their ids
        let mut seen: Vec<(String, HashSet<String>)> = Vec::new();

        for comment in comments {
            let mut item = self.analyze(comment);

            if item.is_spam {
                let reason = item.spam_reasons.first().map_or("unknown", |r| r.as_str());
                mark_filtered(&mut item, format!("spam:{reason}"));
                result.spam.push(item);
                continue;
            }
            if item.is_toxic {
                let reason = item.toxic_reasons.first().map_or("unknown", |r| r.as_str());
                mark_filtered(&mut item, format!("toxic:{reason}"));
                result.toxic.push(item);
                continue;
            }

            let words: HashSet<String> =
                word_set(&item.normalized_text).into_iter().map(str::to_string).collect();

            let original = seen.iter().find(|(_, prior)| {
                jaccard_similarity(prior, &words) > self.config.duplicate_similarity_threshold
            });

            if let Some((original_id, _)) = original {
                let original_id = original_id.clone();
                mark_filtered(&mut item, format!("duplicate:{original_id}"));
                item.duplicate_of = Some(original_id);
                seen.push((item.comment.id.clone(), words));
                result.duplicates.push(item);
            } else {
                seen.push((item.comment.id.clone(), words));
                result.valid.push(item);
            }
        }

        result.stats = PreprocessingStats {
            total: comments.len(),
            valid: result.valid.len(),
            spam: result.spam.len(),
            toxic: result.toxic.len(),
            duplicate: result.duplicates.len(),
        };

        tracing::debug!(stats = %result.stats, "Preprocessing complete");
        result
    }

    /// Derive text forms and flags for one comment without bucketing it
    pub fn analyze(&self, comment: &Comment) -> PreprocessedComment {
        let cleaned_text = clean_text(&comment.text);
        let normalized_text = normalize_text(&cleaned_text);
        let spam_reasons =
            rules::spam_reasons(&comment.text, &cleaned_text, &normalized_text, &self.config);
        let toxic_reasons = rules::toxic_reasons(&cleaned_text);

        PreprocessedComment {
            comment: comment.clone(),
            is_spam: !spam_reasons.is_empty(),
            is_toxic: !toxic_reasons.is_empty(),
            cleaned_text,
            normalized_text,
            spam_reasons,
            toxic_reasons,
            duplicate_of: None,
        }
    }
}

impl Default for CommentPreprocessor {
    fn default() -> Self {
        Self::new(PreprocessingConfig::default())
    }
}

fn mark_filtered(item: &mut PreprocessedComment, reason: String) {
    item.comment.is_filtered = true;
    item.comment.filter_reason = Some(reason);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SpamReason, ToxicReason};

    fn comments(texts: &[&str]) -> Vec<Comment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Comment::new(format!("c{i}"), *t))
            .collect()
    }

    #[test]
    fn test_buckets_partition_input() {
        let input = comments(&[
            "This video is amazing!",
            "THIS IS AMAZING OK",
            "you are an idiot",
            "This video is amazing!!!",
            "The audio is terrible",
            "subscribe to my channel for free money",
        ]);
        let result = CommentPreprocessor::default().process(&input);
        let s = result.stats;
        assert_eq!(s.valid + s.spam + s.toxic + s.duplicate, s.total);
        assert_eq!(s.total, 6);
        assert_eq!(s.valid, 2);
        assert_eq!(s.spam, 2);
        assert_eq!(s.toxic, 1);
        assert_eq!(s.duplicate, 1);
    }

    #[test]
    fn test_too_long_comment_excluded() {
        let long = "a".repeat(3) + &" lorem".repeat(1000);
        let result = CommentPreprocessor::default().process(&comments(&[&long]));
        assert!(result.valid.is_empty());
        assert!(result.spam[0].spam_reasons.contains(&SpamReason::TooLong));
        assert!(result.spam[0].comment.is_filtered);
    }

    #[test]
    fn test_caps_comment_flagged_despite_positive_words() {
        let result = CommentPreprocessor::default().process(&comments(&["THIS IS AMAZING OK"]));
        assert_eq!(result.spam.len(), 1);
        assert_eq!(
            result.spam[0].comment.filter_reason.as_deref(),
            Some("spam:excessive_caps")
        );
    }

    #[test]
    fn test_duplicate_points_to_first_occurrence() {
        let input = comments(&[
            "Great tutorial, thanks a lot",
            "Different comment about audio",
            "great tutorial thanks a lot!!",
        ]);
        let result = CommentPreprocessor::default().process(&input);
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(result.duplicates[0].duplicate_of.as_deref(), Some("c0"));
        assert_eq!(result.valid.len(), 2);
        assert_eq!(result.valid[0].id(), "c0");
    }

    #[test]
    fn test_duplicate_chain_compares_against_duplicates() {
        let a = "one two three four five six seven eight nine ten";
        let b = format!("{a} eleven");
        let c = format!("{b} twelve");
        let result = CommentPreprocessor::default().process(&comments(&[a, &b, &c]));

        let valid: Vec<&str> = result.valid.iter().map(|p| p.id()).collect();
        assert_eq!(valid, vec!["c0"]);
        let links: Vec<(&str, Option<&str>)> = result
            .duplicates
            .iter()
            .map(|p| (p.id(), p.duplicate_of.as_deref()))
            .collect();
        assert_eq!(links, vec![("c1", Some("c0")), ("c2", Some("c1"))]);
        assert_eq!(result.duplicates[1].comment.filter_reason.as_deref(), Some("duplicate:c1"));
    }

    #[test]
    fn test_spam_takes_precedence_over_toxic() {
        let result = CommentPreprocessor::default()
            .process(&comments(&["STUPID VIDEO SUBSCRIBE TO ME"]));
        assert_eq!(result.spam.len(), 1);
        assert!(result.toxic.is_empty());
        assert!(result.spam[0].is_toxic);
        assert!(result.spam[0].toxic_reasons.contains(&ToxicReason::ToxicKeywords));
    }

    #[test]
    fn test_spam_and_toxic_ignored_for_duplicates() {
        // the spam copy must not shadow the later valid comment
        let input = comments(&["NICE VIDEO MAN", "nice video man"]);
        let result = CommentPreprocessor::default().process(&input);
        assert_eq!(result.spam.len(), 1);
        assert_eq!(result.valid.len(), 1);
        assert_eq!(result.valid[0].id(), "c1");
    }

    #[test]
    fn test_empty_input() {
        let result = CommentPreprocessor::default().process(&[]);
        assert_eq!(result.stats, PreprocessingStats::default());
        assert_eq!(result.stats.filter_rate(), 0.0);
    }

    #[test]
    fn test_filtered_comments_iterates_all_buckets() {
        let input = comments(&["ok", "you idiot", "fine video here", "fine video here"]);
        let result = CommentPreprocessor::default().process(&input);
        assert_eq!(result.filtered_comments().count(), 3);
        assert!(result.filtered_comments().all(|c| c.is_filtered));
        assert!((result.stats.filter_rate() - 0.75).abs() < 1e-9);
    }
}
