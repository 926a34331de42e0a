//! Rule-based sentiment used when the model result is missing

use crate::types::{EmotionScore, Sentiment, SentimentResult};

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "beautiful", "best", "brilliant", "enjoy", "enjoyed", "excellent",
    "fantastic", "favorite", "good", "great", "happy", "helpful", "incredible", "like", "liked",
    "love", "loved", "lovely", "nice", "perfect", "thanks", "thank", "useful", "wonderful", "wow",
];

const NEGATIVE_WORDS: &[&str] = &[
    "annoying", "awful", "bad", "boring", "broken", "confusing", "disappointed",
    "disappointing", "dislike", "hate", "hated", "horrible", "poor", "sad", "terrible",
    "useless", "waste", "worse", "worst", "wrong",
];

/// Confidence with no keyword evidence
const BASE_CONFIDENCE: f64 = 0.3;
/// Added per keyword of margin between the two lists
const CONFIDENCE_STEP: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.6;

/// Classify by counting positive and negative keywords.
///
/// Equal counts (including none) give NEUTRAL at the base confidence.
pub fn fallback_sentiment(text: &str) -> SentimentResult {
    let lowered = text.to_lowercase();
    let (positive, negative) = lowered
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .fold((0usize, 0usize), |(p, n), w| {
            (
                p + usize::from(POSITIVE_WORDS.contains(&w)),
                n + usize::from(NEGATIVE_WORDS.contains(&w)),
            )
        });

    let margin = positive.abs_diff(negative);
    let confidence = (BASE_CONFIDENCE + CONFIDENCE_STEP * margin as f64).min(MAX_CONFIDENCE);

    let (sentiment, emotion) = match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => (Sentiment::Positive, Some("joy")),
        std::cmp::Ordering::Less => (Sentiment::Negative, Some("frustration")),
        std::cmp::Ordering::Equal => (Sentiment::Neutral, None),
    };

    SentimentResult {
        sentiment,
        confidence,
        emotions: emotion
            .map(|name| vec![EmotionScore { name: name.to_string(), score: confidence }])
            .unwrap_or_default(),
        is_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amazing_is_positive() {
        let r = fallback_sentiment("This video is amazing!");
        assert_eq!(r.sentiment, Sentiment::Positive);
        assert!(r.confidence >= 0.3);
        assert!(r.is_fallback);
        assert_eq!(r.emotions[0].name, "joy");
    }

    #[test]
    fn test_negative_words() {
        let r = fallback_sentiment("The audio is terrible and the editing is bad");
        assert_eq!(r.sentiment, Sentiment::Negative);
        assert!((r.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_evidence_is_neutral() {
        let r = fallback_sentiment("Posted at noon");
        assert_eq!(r.sentiment, Sentiment::Neutral);
        assert!((r.confidence - 0.3).abs() < 1e-9);
        assert!(r.emotions.is_empty());
    }

    #[test]
    fn test_confidence_capped() {
        let r = fallback_sentiment("great great amazing awesome love perfect wonderful");
        assert!((r.confidence - 0.6).abs() < 1e-9);
    }
}
