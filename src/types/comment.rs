//! Comment types: Comment, PreprocessedComment, SpamReason, ToxicReason

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Source Comments
// ============================================================================

/// A social-media comment as fetched from the comment store.
///
/// Immutable once fetched. Only `is_filtered` / `filter_reason` are set, and
/// only on the preprocessor's own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default = "Utc::now")]
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub is_filtered: bool,
    #[serde(default)]
    pub filter_reason: Option<String>,
}

impl Comment {
    /// Build an unfiltered comment published now
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            author_name: String::new(),
            published_at: Utc::now(),
            like_count: 0,
            is_filtered: false,
            filter_reason: None,
        }
    }

    /// Set the like count
    pub fn with_likes(mut self, like_count: u64) -> Self {
        self.like_count = like_count;
        self
    }

    /// Set the author display name
    pub fn with_author(mut self, author_name: impl Into<String>) -> Self {
        self.author_name = author_name.into();
        self
    }
}

// ============================================================================
// Filter Reasons
// ============================================================================

/// Why a comment was flagged as spam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpamReason {
    TooShort,
    TooLong,
    ExcessiveCaps,
    SpamKeywords,
    RepetitiveContent,
    ContainsUrl,
    ExcessiveSpecialChars,
}

impl SpamReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpamReason::TooShort => "too_short",
            SpamReason::TooLong => "too_long",
            SpamReason::ExcessiveCaps => "excessive_caps",
            SpamReason::SpamKeywords => "spam_keywords",
            SpamReason::RepetitiveContent => "repetitive_content",
            SpamReason::ContainsUrl => "contains_url",
            SpamReason::ExcessiveSpecialChars => "excessive_special_chars",
        }
    }
}

impl std::fmt::Display for SpamReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a comment was flagged as toxic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToxicReason {
    ToxicKeywords,
    MaskedProfanity,
    HateSpeech,
}

impl ToxicReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToxicReason::ToxicKeywords => "toxic_keywords",
            ToxicReason::MaskedProfanity => "masked_profanity",
            ToxicReason::HateSpeech => "hate_speech",
        }
    }
}

impl std::fmt::Display for ToxicReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Preprocessed Comments
// ============================================================================

/// Comment plus the derived text forms and moderation flags.
///
/// Derived per run, never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessedComment {
    pub comment: Comment,
    /// Whitespace-collapsed text with control characters and repeated punctuation removed
    pub cleaned_text: String,
    /// Lowercased, punctuation-free copy used for similarity
    pub normalized_text: String,
    pub is_spam: bool,
    pub is_toxic: bool,
    pub spam_reasons: Vec<SpamReason>,
    pub toxic_reasons: Vec<ToxicReason>,
    /// Id of the first occurrence when this comment is a near-duplicate
    #[serde(default)]
    pub duplicate_of: Option<String>,
}

impl PreprocessedComment {
    pub fn id(&self) -> &str {
        &self.comment.id
    }

    pub fn text(&self) -> &str {
        &self.comment.text
    }

    pub fn like_count(&self) -> u64 {
        self.comment.like_count
    }
}
