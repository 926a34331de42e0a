//! Summary self-check

use regex::Regex;
use std::sync::OnceLock;

use crate::config::SummaryConfig;
use crate::types::{EmotionInsight, SummaryValidation};

use super::prompt::word_count;

const WORD_RANGE_PENALTY: f64 = 0.2;
const MIN_CHARACTERS_PENALTY: f64 = 0.3;
const PERCENTAGE_PENALTY: f64 = 0.2;
const EMOTION_SUM_PENALTY: f64 = 0.1;
const EMPTY_INSIGHTS_PENALTY: f64 = 0.1;
const EMPTY_RECOMMENDATIONS_PENALTY: f64 = 0.1;

fn percentage_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+(\.\d+)?\s?%").ok()).as_ref()
}

/// Summary fields under check
pub struct SummaryDraft<'a> {
    pub text: &'a str,
    pub emotions: &'a [EmotionInsight],
    pub key_insights: &'a [String],
    pub recommendations: &'a [String],
    pub total_comments: usize,
}

pub fn validate_summary(draft: &SummaryDraft<'_>, config: &SummaryConfig) -> SummaryValidation {
    let mut score: f64 = 1.0;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();
    let has_data = draft.total_comments > 0;

    let words = word_count(draft.text);
    if words < config.min_words || words > config.max_words {
        score -= WORD_RANGE_PENALTY;
        issues.push(format!(
            "word count {words} outside {}-{}",
            config.min_words, config.max_words
        ));
        recommendations.push(format!(
            "Rewrite the summary to between {} and {} words",
            config.min_words, config.max_words
        ));
    }

    let chars = draft.text.chars().count();
    if chars < config.min_characters {
        score -= MIN_CHARACTERS_PENALTY;
        issues.push(format!("summary has {chars} characters, minimum is {}", config.min_characters));
        recommendations.push("Expand the summary with more detail".to_string());
    }

    if has_data && !percentage_pattern().is_some_and(|re| re.is_match(draft.text)) {
        score -= PERCENTAGE_PENALTY;
        issues.push("summary contains no percentage figure".to_string());
        recommendations.push("Cite at least one sentiment percentage".to_string());
    }

    let emotion_sum: f64 = draft.emotions.iter().map(|e| e.prevalence).sum();
    if emotion_sum > 100.0 {
        score -= EMOTION_SUM_PENALTY;
        issues.push(format!("emotion prevalence sums to {emotion_sum:.1}%"));
        recommendations.push("Check emotion prevalence for overlapping themes".to_string());
    }

    if has_data && draft.key_insights.is_empty() {
        score -= EMPTY_INSIGHTS_PENALTY;
        issues.push("no key insights".to_string());
        recommendations.push("Add at least one key insight".to_string());
    }

    if has_data && draft.recommendations.is_empty() {
        score -= EMPTY_RECOMMENDATIONS_PENALTY;
        issues.push("no recommendations".to_string());
        recommendations.push("Add at least one recommendation".to_string());
    }

    let quality_score = score.max(0.0);
    SummaryValidation {
        is_valid: quality_score >= config.min_quality_score,
        issues,
        quality_score,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        let mut text = vec!["word"; n].join(" ");
        text.push_str(" with 60% positive.");
        text
    }

    fn draft<'a>(text: &'a str, insights: &'a [String], recs: &'a [String]) -> SummaryDraft<'a> {
        SummaryDraft {
            text,
            emotions: &[],
            key_insights: insights,
            recommendations: recs,
            total_comments: 10,
        }
    }

    #[test]
    fn test_clean_summary_scores_full() {
        let text = words(80);
        let items = vec!["x".to_string()];
        let v = validate_summary(&draft(&text, &items, &items), &SummaryConfig::default());
        assert!(v.is_valid);
        assert!(v.issues.is_empty());
        assert_eq!(v.quality_score, 1.0);
    }

    #[test]
    fn test_short_summary_without_percentage() {
        let items = vec!["x".to_string()];
        let v = validate_summary(&draft("Too short.", &items, &items), &SummaryConfig::default());
        assert!(!v.is_valid);
        assert_eq!(v.issues.len(), 3);
        assert_eq!(v.recommendations.len(), 3);
        assert!((v.quality_score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_emotion_sum_flag_only() {
        let text = words(80);
        let items = vec!["x".to_string()];
        let emotions = vec![
            EmotionInsight {
                name: "joy".into(),
                prevalence: 70.0,
                description: String::new(),
                representative_comments: Vec::new(),
            },
            EmotionInsight {
                name: "anger".into(),
                prevalence: 40.0,
                description: String::new(),
                representative_comments: Vec::new(),
            },
        ];
        let mut d = draft(&text, &items, &items);
        d.emotions = &emotions;
        let v = validate_summary(&d, &SummaryConfig::default());
        assert!((v.quality_score - 0.9).abs() < 1e-9);
        assert_eq!(emotions[0].prevalence, 70.0);
    }

    #[test]
    fn test_empty_lists_penalized_when_data_exists() {
        let text = words(80);
        let v = validate_summary(&draft(&text, &[], &[]), &SummaryConfig::default());
        assert!((v.quality_score - 0.8).abs() < 1e-9);
        assert!(v.is_valid);
    }

    #[test]
    fn test_percentage_not_required_without_data() {
        let text = vec!["word"; 80].join(" ");
        let mut d = draft(&text, &[], &[]);
        d.total_comments = 0;
        let v = validate_summary(&d, &SummaryConfig::default());
        assert_eq!(v.quality_score, 1.0);
    }
}
