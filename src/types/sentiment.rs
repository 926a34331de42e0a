//! Sentiment types: Sentiment, EmotionScore, SentimentResult, SentimentBreakdown

use serde::{Deserialize, Serialize};

/// Sentiment class assigned to a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    /// Parse a sentiment label, case-insensitive.
    ///
    /// Returns `None` for anything outside POSITIVE / NEGATIVE / NEUTRAL.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(Sentiment::Positive),
            "NEGATIVE" => Some(Sentiment::Negative),
            "NEUTRAL" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
        }
    }

    /// Lowercase label for narrative text
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Majority vote over tallied counts. Ties resolve to NEUTRAL.
    pub fn majority(positive: usize, negative: usize, neutral: usize) -> Self {
        if positive > negative && positive > neutral {
            Sentiment::Positive
        } else if negative > positive && negative > neutral {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running tally of sentiment votes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentTally {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentTally {
    pub fn add(&mut self, sentiment: Sentiment) {
        self.add_weighted(sentiment, 1);
    }

    pub fn add_weighted(&mut self, sentiment: Sentiment, weight: usize) {
        match sentiment {
            Sentiment::Positive => self.positive += weight,
            Sentiment::Negative => self.negative += weight,
            Sentiment::Neutral => self.neutral += weight,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    pub fn majority(&self) -> Sentiment {
        Sentiment::majority(self.positive, self.negative, self.neutral)
    }

    /// Count for a single class
    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }
}

/// Named emotion with an intensity score in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub name: String,
    pub score: f64,
}

/// Sentiment classification for one valid comment (index-aligned with input)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// At most 3 emotions
    #[serde(default)]
    pub emotions: Vec<EmotionScore>,
    /// True when produced by the rule-based fallback rather than the model
    #[serde(default)]
    pub is_fallback: bool,
}

/// Aggregate sentiment over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentBreakdown {
    /// Fraction of POSITIVE results (0-1)
    pub positive: f64,
    /// Fraction of NEGATIVE results (0-1)
    pub negative: f64,
    /// Fraction of NEUTRAL results (0-1)
    pub neutral: f64,
    /// Mean confidence across all results
    pub confidence_score: f64,
}

impl SentimentBreakdown {
    /// Compute per-class fractions and mean confidence
    pub fn from_results(results: &[SentimentResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }
        let mut tally = SentimentTally::default();
        let mut confidence_sum = 0.0;
        for r in results {
            tally.add(r.sentiment);
            confidence_sum += r.confidence;
        }
        let n = results.len() as f64;
        Self {
            positive: tally.positive as f64 / n,
            negative: tally.negative as f64 / n,
            neutral: tally.neutral as f64 / n,
            confidence_score: confidence_sum / n,
        }
    }

    /// Class with the largest share. Ties resolve to NEUTRAL.
    pub fn dominant(&self) -> (Sentiment, f64) {
        if self.positive > self.negative && self.positive > self.neutral {
            (Sentiment::Positive, self.positive)
        } else if self.negative > self.positive && self.negative > self.neutral {
            (Sentiment::Negative, self.negative)
        } else {
            (Sentiment::Neutral, self.neutral)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(sentiment: Sentiment, confidence: f64) -> SentimentResult {
        SentimentResult { sentiment, confidence, emotions: Vec::new(), is_fallback: false }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Sentiment::parse("positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse(" Negative "), Some(Sentiment::Negative));
        assert_eq!(Sentiment::parse("NEUTRAL"), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::parse("mixed"), None);
    }

    #[test]
    fn test_majority_tie_is_neutral() {
        assert_eq!(Sentiment::majority(2, 2, 0), Sentiment::Neutral);
        assert_eq!(Sentiment::majority(2, 1, 0), Sentiment::Positive);
        assert_eq!(Sentiment::majority(0, 3, 1), Sentiment::Negative);
    }

    #[test]
    fn test_breakdown_fractions() {
        let results = vec![
            result(Sentiment::Positive, 0.9),
            result(Sentiment::Positive, 0.7),
            result(Sentiment::Negative, 0.8),
            result(Sentiment::Neutral, 0.6),
        ];
        let b = SentimentBreakdown::from_results(&results);
        assert!((b.positive - 0.5).abs() < 1e-9);
        assert!((b.negative - 0.25).abs() < 1e-9);
        assert!((b.neutral - 0.25).abs() < 1e-9);
        assert!((b.confidence_score - 0.75).abs() < 1e-9);
        assert_eq!(b.dominant().0, Sentiment::Positive);
    }

    #[test]
    fn test_breakdown_empty() {
        let b = SentimentBreakdown::from_results(&[]);
        assert_eq!(b, SentimentBreakdown::default());
    }

    #[test]
    fn test_serde_uppercase() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"NEGATIVE\"");
    }
}
