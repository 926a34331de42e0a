//! Rule-template insights and recommendations

use crate::config::SummaryConfig;
use crate::types::Sentiment;

use super::SummaryInput;

const MAX_INSIGHTS: usize = 4;
const MAX_RECOMMENDATIONS: usize = 3;

fn filter_rate(input: &SummaryInput<'_>) -> f64 {
    if input.total_comments == 0 {
        0.0
    } else {
        input.filtered_comments as f64 / input.total_comments as f64
    }
}

pub fn key_insights(input: &SummaryInput<'_>, config: &SummaryConfig) -> Vec<String> {
    let mut insights = Vec::new();
    if input.valid_comments == 0 {
        return insights;
    }

    let (sentiment, share) = input.breakdown.dominant();
    if share > config.dominant_sentiment_threshold {
        insights.push(format!(
            "{:.0}% of comments are {}, a clear majority",
            share * 100.0,
            sentiment.label()
        ));
    }

    if let Some(theme) = input.themes.first() {
        insights.push(format!(
            "\"{}\" is the leading theme, raised in {:.0}% of comments",
            theme.name,
            theme.frequency as f64 / input.valid_comments as f64 * 100.0
        ));
    }

    if let Some(keyword) = input.keywords.first() {
        insights.push(format!(
            "\"{}\" is the most distinctive keyword, mentioned {} times",
            keyword.word, keyword.frequency
        ));
    }

    let rate = filter_rate(input);
    if rate > config.high_filter_rate {
        insights.push(format!(
            "{:.0}% of comments were filtered out as low quality",
            rate * 100.0
        ));
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

pub fn recommendations(input: &SummaryInput<'_>, config: &SummaryConfig) -> Vec<String> {
    let mut recs = Vec::new();
    if input.valid_comments == 0 {
        return recs;
    }

    let b = &input.breakdown;
    if b.positive > b.negative {
        recs.push("Leverage the positive momentum with more content in the same style".to_string());
    } else if b.negative > b.positive {
        recs.push("Address the concerns raised in the comments directly".to_string());
    }

    if let Some(theme) = input.themes.first() {
        let rec = match theme.sentiment {
            Sentiment::Positive => format!("Expand on \"{}\", which resonates with the audience", theme.name),
            Sentiment::Negative => format!("Address the issues around \"{}\"", theme.name),
            Sentiment::Neutral => format!("Follow up on \"{}\" with clearer answers", theme.name),
        };
        recs.push(rec);
    }

    if input.valid_comments < config.low_engagement_comments {
        recs.push("Encourage more interaction, for example with a question to viewers".to_string());
    }

    if filter_rate(input) > config.moderation_filter_rate {
        recs.push("Review comment moderation settings to curb spam and abuse".to_string());
    }

    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeywordData, SentimentBreakdown, ThemeCluster};

    fn breakdown(positive: f64, negative: f64, neutral: f64) -> SentimentBreakdown {
        SentimentBreakdown { positive, negative, neutral, confidence_score: 0.8 }
    }

    fn audio_theme() -> ThemeCluster {
        ThemeCluster {
            id: "theme-1".into(),
            name: "Audio & Quality".into(),
            comments: vec!["a".into(), "b".into(), "c".into()],
            sentiment: Sentiment::Negative,
            frequency: 3,
            representative_comments: Vec::new(),
            keywords: Vec::new(),
            coherence_score: 0.4,
        }
    }

    fn audio_keyword() -> KeywordData {
        KeywordData {
            word: "audio".into(),
            frequency: 5,
            sentiment: Sentiment::Negative,
            contexts: Vec::new(),
            tfidf_score: 0.1,
            sentiment_score: 1.0,
        }
    }

    #[test]
    fn test_insights_all_rules() {
        let themes = vec![audio_theme()];
        let keywords = vec![audio_keyword()];
        let input = SummaryInput {
            total_comments: 20,
            valid_comments: 12,
            filtered_comments: 8,
            breakdown: breakdown(0.1, 0.75, 0.15),
            themes: &themes,
            keywords: &keywords,
        };
        let insights = key_insights(&input, &SummaryConfig::default());
        assert_eq!(insights.len(), 4);
        assert_eq!(insights[0], "75% of comments are negative, a clear majority");
        assert_eq!(insights[1], "\"Audio & Quality\" is the leading theme, raised in 25% of comments");
        assert!(insights[2].contains("mentioned 5 times"));
        assert!(insights[3].starts_with("40%"));
    }

    #[test]
    fn test_no_dominant_callout_for_balanced_mix() {
        let input = SummaryInput {
            total_comments: 10,
            valid_comments: 10,
            filtered_comments: 0,
            breakdown: breakdown(0.4, 0.3, 0.3),
            themes: &[],
            keywords: &[],
        };
        assert!(key_insights(&input, &SummaryConfig::default()).is_empty());
    }

    #[test]
    fn test_tied_split_has_no_dominant_label() {
        let config = SummaryConfig { dominant_sentiment_threshold: 0.4, ..SummaryConfig::default() };
        let input = SummaryInput {
            total_comments: 10,
            valid_comments: 10,
            filtered_comments: 0,
            breakdown: breakdown(0.5, 0.5, 0.0),
            themes: &[],
            keywords: &[],
        };
        let insights = key_insights(&input, &config);
        assert!(insights.iter().all(|i| !i.contains("clear majority")), "{insights:?}");
    }

    #[test]
    fn test_recommendations_capped_at_three() {
        let themes = vec![audio_theme()];
        let input = SummaryInput {
            total_comments: 10,
            valid_comments: 5,
            filtered_comments: 5,
            breakdown: breakdown(0.2, 0.6, 0.2),
            themes: &themes,
            keywords: &[],
        };
        let recs = recommendations(&input, &SummaryConfig::default());
        assert_eq!(recs.len(), 3);
        assert!(recs[0].starts_with("Address the concerns"));
        assert_eq!(recs[1], "Address the issues around \"Audio & Quality\"");
        assert!(recs[2].starts_with("Encourage more interaction"));
    }

    #[test]
    fn test_moderation_recommendation() {
        let input = SummaryInput {
            total_comments: 40,
            valid_comments: 20,
            filtered_comments: 20,
            breakdown: breakdown(0.5, 0.5, 0.0),
            themes: &[],
            keywords: &[],
        };
        let recs = recommendations(&input, &SummaryConfig::default());
        assert_eq!(recs, vec!["Review comment moderation settings to curb spam and abuse"]);
    }
}
