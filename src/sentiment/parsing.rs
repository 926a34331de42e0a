//! Line-tolerant parser for the one-JSON-object-per-line contract

use serde::Deserialize;

use crate::types::{EmotionScore, Sentiment, SentimentResult};

const MAX_EMOTIONS: usize = 3;

/// Confidence assumed when a line omits it
const DEFAULT_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Deserialize)]
struct RawLine {
    #[serde(rename = "commentIndex", alias = "comment_index", alias = "index")]
    comment_index: serde_json::Value,
    sentiment: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    emotions: Vec<RawEmotion>,
}

#[derive(Debug, Deserialize)]
struct RawEmotion {
    name: String,
    #[serde(default)]
    score: Option<f64>,
}

/// Per-slot parse results for one batch
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBatch {
    /// One slot per comment in the batch, `None` where no usable line was found
    pub results: Vec<Option<SentimentResult>>,
    /// Non-empty lines that could not be used
    pub dropped_lines: usize,
}

impl ParsedBatch {
    pub fn parsed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_some()).count()
    }

    pub fn missing_count(&self) -> usize {
        self.results.len() - self.parsed_count()
    }
}

/// Parse a model response for a batch of `batch_len` comments.
///
/// Malformed lines, unknown sentiments and out-of-range indices are dropped.
/// The first usable line for an index wins.
pub fn parse_batch_response(response: &str, batch_len: usize) -> ParsedBatch {
    let mut results: Vec<Option<SentimentResult>> = vec![None; batch_len];
    let mut dropped_lines = 0;

    for line in response.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("```") || line == "[" || line == "]" {
            continue;
        }

        let Some((index, result)) = parse_line(line) else {
            dropped_lines += 1;
            continue;
        };

        match index.checked_sub(1).and_then(|i| results.get_mut(i)) {
            Some(slot) => {
                if slot.is_none() {
                    *slot = Some(result);
                }
            }
            None => dropped_lines += 1,
        }
    }

    ParsedBatch { results, dropped_lines }
}

fn parse_line(line: &str) -> Option<(usize, SentimentResult)> {
    let start = line.find('{')?;
    let end = line.rfind('}')?;
    if end < start {
        return None;
    }

    let raw: RawLine = serde_json::from_str(&line[start..=end]).ok()?;
    let index = index_value(&raw.comment_index)?;
    let sentiment = Sentiment::parse(&raw.sentiment)?;
    let confidence = raw.confidence.filter(|c| c.is_finite()).unwrap_or(DEFAULT_CONFIDENCE);

    let emotions = raw
        .emotions
        .into_iter()
        .filter(|e| !e.name.trim().is_empty())
        .take(MAX_EMOTIONS)
        .map(|e| EmotionScore {
            name: e.name.trim().to_lowercase(),
            score: e.score.filter(|s| s.is_finite()).unwrap_or(0.5).clamp(0.0, 1.0),
        })
        .collect();

    Some((
        index,
        SentimentResult {
            sentiment,
            confidence: confidence.clamp(0.0, 1.0),
            emotions,
            is_fallback: false,
        },
    ))
}

/// Accepts `3`, `3.0` and `"3"`
fn index_value(value: &serde_json::Value) -> Option<usize> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| usize::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
