//! Deterministic narrative built from aggregate numbers only

use super::SummaryInput;

pub const EMPTY_SUMMARY_TEXT: &str =
    "No comments available for analysis. Once viewers start commenting, a summary of their reactions will appear here.";

pub fn template_summary(input: &SummaryInput<'_>) -> String {
    let b = &input.breakdown;
    let mut sentences = vec![format!(
        "Analysis of {} comments shows {:.0}% positive, {:.0}% negative and {:.0}% neutral sentiment.",
        input.valid_comments,
        b.positive * 100.0,
        b.negative * 100.0,
        b.neutral * 100.0
    )];

    let overall = if b.positive > b.negative && b.positive > b.neutral {
        "Overall the audience response is favorable."
    } else if b.negative > b.positive && b.negative > b.neutral {
        "Overall the audience response leans critical."
    } else {
        "Overall the audience response is mixed."
    };
    sentences.push(overall.to_string());

    let theme_names: Vec<&str> = input.themes.iter().take(3).map(|t| t.name.as_str()).collect();
    if !theme_names.is_empty() {
        sentences.push(format!("The main discussion themes are {}.", theme_names.join(", ")));
    }

    let keywords: Vec<&str> = input.keywords.iter().take(5).map(|k| k.word.as_str()).collect();
    if !keywords.is_empty() {
        sentences.push(format!("Frequently mentioned terms include {}.", keywords.join(", ")));
    }

    if input.filtered_comments > 0 {
        sentences.push(format!(
            "{} of {} comments were filtered before analysis.",
            input.filtered_comments, input.total_comments
        ));
    }

    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentimentBreakdown;

    #[test]
    fn test_template_uses_numbers() {
        let input = SummaryInput {
            total_comments: 12,
            valid_comments: 10,
            filtered_comments: 2,
            breakdown: SentimentBreakdown {
                positive: 0.7,
                negative: 0.2,
                neutral: 0.1,
                confidence_score: 0.8,
            },
            themes: &[],
            keywords: &[],
        };
        let text = template_summary(&input);
        assert!(text.starts_with("Analysis of 10 comments shows 70% positive, 20% negative and 10% neutral"));
        assert!(text.contains("favorable"));
        assert!(text.ends_with("2 of 12 comments were filtered before analysis."));
    }
}
