//! Post-hoc quality checks on sentiment results. Findings are logged, never applied.

use crate::types::{Sentiment, SentimentResult};

const LOW_AVERAGE_CONFIDENCE: f64 = 0.5;
const VERY_LOW_CONFIDENCE: f64 = 0.3;
const MAX_VERY_LOW_SHARE: f64 = 0.4;
const MAX_SINGLE_CLASS_SHARE: f64 = 0.95;
const MIN_EMOTION_COVERAGE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentValidation {
    /// 1.0 minus penalties, floored at 0
    pub quality_score: f64,
    pub issues: Vec<String>,
}

pub fn validate_results(results: &[SentimentResult]) -> SentimentValidation {
    if results.is_empty() {
        return SentimentValidation { quality_score: 1.0, issues: Vec::new() };
    }

    let n = results.len() as f64;
    let mut score: f64 = 1.0;
    let mut issues = Vec::new();

    let avg_confidence = results.iter().map(|r| r.confidence).sum::<f64>() / n;
    if avg_confidence < LOW_AVERAGE_CONFIDENCE {
        score -= 0.2;
        issues.push(format!("average confidence {avg_confidence:.2} is low"));
    }

    let very_low = results.iter().filter(|r| r.confidence < VERY_LOW_CONFIDENCE).count() as f64;
    if very_low / n > MAX_VERY_LOW_SHARE {
        score -= 0.2;
        issues.push(format!(
            "{:.0}% of results have confidence below {VERY_LOW_CONFIDENCE}",
            very_low / n * 100.0
        ));
    }

    for class in [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral] {
        let share = results.iter().filter(|r| r.sentiment == class).count() as f64 / n;
        if share > MAX_SINGLE_CLASS_SHARE {
            score -= 0.2;
            issues.push(format!("{:.0}% of results are {class}", share * 100.0));
        }
    }

    let with_emotions = results.iter().filter(|r| !r.emotions.is_empty()).count() as f64;
    if with_emotions / n < MIN_EMOTION_COVERAGE {
        score -= 0.15;
        issues.push(format!(
            "only {:.0}% of results carry emotions",
            with_emotions / n * 100.0
        ));
    }

    SentimentValidation { quality_score: score.max(0.0), issues }
}
