//! Sentiment prompt templates

const BATCH_PROMPT: &str = r#"You are a sentiment analyst for social media comments.
Classify each numbered comment below.

### COMMENTS
{comments}

### INSTRUCTIONS
1. Judge the sentiment of each comment as POSITIVE, NEGATIVE or NEUTRAL.
2. Give a confidence between 0 and 1.
3. List up to 3 emotions (e.g. joy, anger, frustration, curiosity, gratitude) with scores between 0 and 1.
4. Output exactly one JSON object per line, one line per comment. No preamble. No markdown.

### OUTPUT FORMAT
{"commentIndex": 1, "sentiment": "POSITIVE", "confidence": 0.92, "emotions": [{"name": "joy", "score": 0.8}]}"#;

/// Longest comment text embedded in a prompt (chars)
const MAX_PROMPT_COMMENT_CHARS: usize = 1_000;

/// Build one prompt for a batch; comments are numbered from 1
pub fn build_batch_prompt<S: AsRef<str>>(texts: &[S]) -> String {
    let comments = texts
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, prompt_safe(t.as_ref())))
        .collect::<Vec<_>>()
        .join("\n");
    BATCH_PROMPT.replace("{comments}", &comments)
}

/// Newlines would break the numbered list
fn prompt_safe(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > MAX_PROMPT_COMMENT_CHARS {
        let mut cut: String = flat.chars().take(MAX_PROMPT_COMMENT_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_are_one_indexed() {
        let prompt = build_batch_prompt(&["first", "second\nline"]);
        assert!(prompt.contains("1. first\n2. second line"));
        assert!(prompt.contains("commentIndex"));
        assert!(!prompt.contains("{comments}"));
    }

    #[test]
    fn test_long_comment_truncated() {
        let long = "x".repeat(2_000);
        let prompt = build_batch_prompt(&[long]);
        assert!(prompt.contains("..."));
        assert!(!prompt.contains(&"x".repeat(MAX_PROMPT_COMMENT_CHARS + 1)));
    }
}
