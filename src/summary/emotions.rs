//! Heuristic emotion inference from theme sentiment and vocabulary

use crate::types::{EmotionInsight, Sentiment, ThemeCluster};

const MAX_EMOTIONS: usize = 3;
const MAX_EMOTION_EXAMPLES: usize = 3;

/// (sentiment, trigger words, emotion). First match wins; an empty trigger
/// list is the default for that sentiment.
const EMOTION_TABLE: &[(Sentiment, &[&str], &str)] = &[
    (Sentiment::Positive, &["love", "loved", "amazing", "great", "awesome", "beautiful"], "joy"),
    (Sentiment::Positive, &["thanks", "thank", "grateful", "appreciate", "helpful"], "gratitude"),
    (Sentiment::Positive, &["excited", "hype", "wait", "cant", "finally"], "excitement"),
    (Sentiment::Positive, &[], "satisfaction"),
    (Sentiment::Negative, &["angry", "hate", "terrible", "awful", "worst", "disgusting"], "anger"),
    (Sentiment::Negative, &["disappointed", "disappointing", "expected", "worse", "sad"], "disappointment"),
    (Sentiment::Negative, &[], "frustration"),
    (Sentiment::Neutral, &["question", "curious", "wonder", "why", "how"], "curiosity"),
    (Sentiment::Neutral, &[], "interest"),
];

/// Map a theme to an emotion name through the lookup table
pub fn theme_emotion(theme: &ThemeCluster) -> &'static str {
    let name_lower = theme.name.to_lowercase();
    let vocabulary: Vec<&str> = theme
        .keywords
        .iter()
        .map(String::as_str)
        .chain(name_lower.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()))
        .collect();

    EMOTION_TABLE
        .iter()
        .filter(|(sentiment, _, _)| *sentiment == theme.sentiment)
        .find(|(_, triggers, _)| {
            triggers.is_empty() || vocabulary.iter().any(|w| triggers.contains(w))
        })
        .map(|(_, _, emotion)| *emotion)
        .unwrap_or("interest")
}

fn describe(emotion: &str) -> &'static str {
    match emotion {
        "joy" => "Viewers are openly delighted with the content",
        "gratitude" => "Viewers are thankful and appreciative",
        "excitement" => "Viewers are eager and enthusiastic about what comes next",
        "satisfaction" => "Viewers are broadly content with what they saw",
        "anger" => "Viewers express strong displeasure",
        "disappointment" => "Viewers expected more than they got",
        "frustration" => "Viewers are running into problems or annoyances",
        "curiosity" => "Viewers are asking questions and want to learn more",
        _ => "Viewers are engaged without strong feelings either way",
    }
}

/// Emotions across all themes, merged by name.
///
/// Prevalence is the summed theme frequency over `valid_comments`, as a
/// percentage rounded to one decimal. Top three by prevalence are kept.
pub fn infer_emotions(themes: &[ThemeCluster], valid_comments: usize) -> Vec<EmotionInsight> {
    if valid_comments == 0 {
        return Vec::new();
    }

    let mut merged: Vec<(&'static str, usize, Vec<String>)> = Vec::new();
    for theme in themes {
        let emotion = theme_emotion(theme);
        let entry = match merged.iter_mut().position(|(name, _, _)| *name == emotion) {
            Some(pos) => &mut merged[pos],
            None => {
                merged.push((emotion, 0, Vec::new()));
                let last = merged.len() - 1;
                &mut merged[last]
            }
        };
        entry.1 += theme.frequency;
        for example in &theme.representative_comments {
            if entry.2.len() < MAX_EMOTION_EXAMPLES {
                entry.2.push(example.clone());
            }
        }
    }

    let mut emotions: Vec<EmotionInsight> = merged
        .into_iter()
        .map(|(name, frequency, examples)| EmotionInsight {
            name: name.to_string(),
            prevalence: round1(frequency as f64 / valid_comments as f64 * 100.0),
            description: describe(name).to_string(),
            representative_comments: examples,
        })
        .collect();

    emotions.sort_by(|a, b| b.prevalence.total_cmp(&a.prevalence).then_with(|| a.name.cmp(&b.name)));
    emotions.truncate(MAX_EMOTIONS);
    emotions
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(name: &str, sentiment: Sentiment, frequency: usize, keywords: &[&str]) -> ThemeCluster {
        ThemeCluster {
            id: format!("theme-{name}"),
            name: name.to_string(),
            comments: (0..frequency).map(|i| format!("c{i}")).collect(),
            sentiment,
            frequency,
            representative_comments: vec![format!("{name} example")],
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            coherence_score: 0.5,
        }
    }

    #[test]
    fn test_lookup_table() {
        assert_eq!(theme_emotion(&theme("Video & Amazing", Sentiment::Positive, 2, &[])), "joy");
        assert_eq!(theme_emotion(&theme("Editing", Sentiment::Positive, 2, &["editing"])), "satisfaction");
        assert_eq!(theme_emotion(&theme("Audio", Sentiment::Negative, 2, &["terrible"])), "anger");
        assert_eq!(theme_emotion(&theme("Audio", Sentiment::Negative, 2, &["audio"])), "frustration");
        assert_eq!(theme_emotion(&theme("Question & Part", Sentiment::Neutral, 2, &[])), "curiosity");
        assert_eq!(theme_emotion(&theme("Part", Sentiment::Neutral, 2, &[])), "interest");
    }

    #[test]
    fn test_prevalence_merged_and_rounded() {
        let themes = vec![
            theme("Love", Sentiment::Positive, 2, &["love"]),
            theme("Great", Sentiment::Positive, 1, &["great"]),
            theme("Audio", Sentiment::Negative, 1, &["audio"]),
        ];
        let emotions = infer_emotions(&themes, 7);
        assert_eq!(emotions.len(), 2);
        assert_eq!(emotions[0].name, "joy");
        assert_eq!(emotions[0].prevalence, 42.9);
        assert_eq!(emotions[0].representative_comments.len(), 2);
        assert_eq!(emotions[1].name, "frustration");
        assert_eq!(emotions[1].prevalence, 14.3);
    }

    #[test]
    fn test_top_three_only() {
        let themes = vec![
            theme("Love", Sentiment::Positive, 4, &[]),
            theme("Thanks", Sentiment::Positive, 3, &[]),
            theme("Hate", Sentiment::Negative, 2, &[]),
            theme("Why", Sentiment::Neutral, 1, &[]),
        ];
        let emotions = infer_emotions(&themes, 10);
        let names: Vec<&str> = emotions.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["joy", "gratitude", "anger"]);
    }

    #[test]
    fn test_no_valid_comments() {
        assert!(infer_emotions(&[theme("Love", Sentiment::Positive, 1, &[])], 0).is_empty());
    }
}
