//! Narrative prompt and response cleanup

use super::SummaryInput;

const SUMMARY_PROMPT: &str = r#"You are an audience insights analyst summarizing reactions to a social media post.

### DATA
Valid comments analyzed: {count}
Sentiment: {positive}% positive, {negative}% negative, {neutral}% neutral

### TOP THEMES
{themes}

### TOP KEYWORDS
{keywords}

### INSTRUCTIONS
1. Write 3-5 sentences (75-150 words) of plain prose.
2. Mention at least one percentage from the data.
3. Describe the overall mood, the main themes and what the audience cares about.
4. No headings, no bullet points, no markdown."#;

const MAX_PROMPT_THEMES: usize = 3;
const MAX_PROMPT_KEYWORDS: usize = 5;

pub fn build_summary_prompt(input: &SummaryInput<'_>) -> String {
    let themes = if input.themes.is_empty() {
        "No recurring themes found.".to_string()
    } else {
        input
            .themes
            .iter()
            .take(MAX_PROMPT_THEMES)
            .map(|t| format!("- {} ({} comments, {})", t.name, t.frequency, t.sentiment.label()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let keywords = if input.keywords.is_empty() {
        "None".to_string()
    } else {
        input
            .keywords
            .iter()
            .take(MAX_PROMPT_KEYWORDS)
            .map(|k| k.word.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    SUMMARY_PROMPT
        .replace("{count}", &input.valid_comments.to_string())
        .replace("{positive}", &format!("{:.0}", input.breakdown.positive * 100.0))
        .replace("{negative}", &format!("{:.0}", input.breakdown.negative * 100.0))
        .replace("{neutral}", &format!("{:.0}", input.breakdown.neutral * 100.0))
        .replace("{themes}", &themes)
        .replace("{keywords}", &keywords)
}

/// Strip markdown, collapse whitespace, capitalize the first letter and make
/// sure the text ends with terminal punctuation.
pub fn clean_response(raw: &str) -> String {
    let stripped: Vec<String> = raw
        .lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.trim_start_matches('#').trim_start();
            let line = line
                .strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .unwrap_or(line);
            line.replace("**", "").replace("__", "").replace('`', "")
        })
        .collect();

    let text = stripped.join(" ").split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return text;
    }

    let mut chars = text.chars();
    let mut out: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    if !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    out
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
