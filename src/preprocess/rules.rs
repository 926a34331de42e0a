//! Spam and toxicity rules

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::config::PreprocessingConfig;
use crate::types::{SpamReason, ToxicReason};

// ============================================================================
// Word Lists
// ============================================================================

const SPAM_PHRASES: &[&str] = &[
    "subscribe",
    "sub4sub",
    "follow me",
    "follow for follow",
    "click here",
    "check out my",
    "visit my channel",
    "free money",
    "giveaway",
    "dm me",
    "promo code",
    "earn cash",
];

const TOXIC_WORDS: &[&str] = &[
    "idiot",
    "idiots",
    "stupid",
    "moron",
    "morons",
    "loser",
    "dumb",
    "pathetic",
    "shut up",
    "stfu",
    "scum",
    "worthless",
];

// ============================================================================
// Compiled Patterns
// ============================================================================

fn phrase_regex(phrases: &[&str]) -> Option<Regex> {
    let alternation = phrases
        .iter()
        .map(|p| regex::escape(p).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).ok()
}

fn spam_phrase_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| phrase_regex(SPAM_PHRASES)).as_ref()
}

fn toxic_word_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| phrase_regex(TOXIC_WORDS)).as_ref()
}

fn url_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:https?://|www\.)\S+|\b[a-z0-9-]+\.(?:com|net|org|io|ly|co|me|gg|tv|xyz|info|biz)\b",
        )
        .ok()
    })
    .as_ref()
}

fn masked_profanity_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b[a-z]+[*#$%]+[a-z]+\b|\b[a-z][*#$%]{2,}").ok())
        .as_ref()
}

fn hate_speech_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:kill\s+your\s*self|kys|i\s+hate\s+you|you\s+should\s+die|go\s+die|nobody\s+likes\s+you)\b",
        )
        .ok()
    })
    .as_ref()
}

fn matches(re: Option<&Regex>, text: &str) -> bool {
    re.is_some_and(|re| re.is_match(text))
}

// ============================================================================
// Spam
// ============================================================================

/// Every spam rule the comment trips, in rule order
pub fn spam_reasons(
    raw: &str,
    cleaned: &str,
    normalized: &str,
    config: &PreprocessingConfig,
) -> Vec<SpamReason> {
    let mut reasons = Vec::new();

    // too long on the text as posted, too short on what survives cleaning
    if cleaned.chars().count() < config.min_length {
        reasons.push(SpamReason::TooShort);
    }
    if raw.chars().count() > config.max_length {
        reasons.push(SpamReason::TooLong);
    }

    if caps_ratio(cleaned) > config.caps_ratio_threshold {
        reasons.push(SpamReason::ExcessiveCaps);
    }

    if matches(spam_phrase_regex(), cleaned) {
        reasons.push(SpamReason::SpamKeywords);
    }

    if longest_char_run(raw) >= config.repeated_char_run
        || dominant_token_share(normalized) > config.repeated_token_ratio
    {
        reasons.push(SpamReason::RepetitiveContent);
    }

    if matches(url_regex(), cleaned) {
        reasons.push(SpamReason::ContainsUrl);
    }

    if special_char_ratio(raw) > config.special_char_ratio {
        reasons.push(SpamReason::ExcessiveSpecialChars);
    }

    reasons
}

/// Uppercase letters over all letters (0.0 when there are no letters)
pub fn caps_ratio(text: &str) -> f64 {
    let (letters, upper) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(l, u), c| (l + 1, u + usize::from(c.is_uppercase())));
    if letters == 0 {
        0.0
    } else {
        upper as f64 / letters as f64
    }
}

/// Longest run of one repeated non-whitespace character
pub fn longest_char_run(text: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if c.is_whitespace() {
            run = 0;
            prev = None;
            continue;
        }
        let lc = c.to_lowercase().next().unwrap_or(c);
        if prev == Some(lc) {
            run += 1;
        } else {
            run = 1;
            prev = Some(lc);
        }
        longest = longest.max(run);
    }

    longest
}

/// Share of words taken by the most repeated word.
///
/// Only words occurring more than once count, and comments under three words
/// are never repetitive by this measure.
pub fn dominant_token_share(normalized: &str) -> f64 {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.len() < 3 {
        return 0.0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for w in &words {
        *counts.entry(w).or_insert(0) += 1;
    }

    counts
        .values()
        .filter(|&&n| n > 1)
        .max()
        .map_or(0.0, |&n| n as f64 / words.len() as f64)
}

/// Non-alphanumeric share of non-whitespace characters (emoji count as special)
pub fn special_char_ratio(text: &str) -> f64 {
    let (total, special) = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0usize, 0usize), |(t, s), c| (t + 1, s + usize::from(!c.is_alphanumeric())));
    if total == 0 {
        0.0
    } else {
        special as f64 / total as f64
    }
}

// ============================================================================
// Toxicity
// ============================================================================

/// Every toxicity rule the comment trips
pub fn toxic_reasons(cleaned: &str) -> Vec<ToxicReason> {
    let mut reasons = Vec::new();
    if matches(toxic_word_regex(), cleaned) {
        reasons.push(ToxicReason::ToxicKeywords);
    }
    if matches(masked_profanity_regex(), cleaned) {
        reasons.push(ToxicReason::MaskedProfanity);
    }
    if matches(hate_speech_regex(), cleaned) {
        reasons.push(ToxicReason::HateSpeech);
    }
    reasons
}
