//! Pre-run checks reported as structured errors instead of failures

use serde::Serialize;

use crate::storage::{PrerequisiteChecker, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrerequisiteError {
    #[error("source item {source_id} not found")]
    SourceNotFound { source_id: String },
    #[error("user {user_id} does not own source item {source_id}")]
    Unauthorized { user_id: String, source_id: String },
    #[error("only {found} valid comments, at least {required} required")]
    InsufficientComments { found: usize, required: usize },
    #[error("user {user_id} has no linked account")]
    NoLinkedAccount { user_id: String },
    #[error("{check} lookup failed: {message}")]
    LookupFailed { check: String, message: String },
}

impl PrerequisiteError {
    fn lookup_failed(check: &str, err: StoreError) -> Self {
        Self::LookupFailed { check: check.to_string(), message: err.to_string() }
    }
}

/// Every unmet prerequisite for `user_id` analyzing `source_id`.
///
/// An empty list means the run can go ahead. A store lookup that fails is
/// reported as `LookupFailed` alongside the other entries.
pub async fn validate_prerequisites(
    checker: &dyn PrerequisiteChecker,
    user_id: &str,
    source_id: &str,
    min_comments: usize,
) -> Vec<PrerequisiteError> {
    let mut errors = Vec::new();

    match checker.source_owner(source_id).await {
        Err(e) => errors.push(PrerequisiteError::lookup_failed("source_owner", e)),
        Ok(None) => errors.push(PrerequisiteError::SourceNotFound { source_id: source_id.to_string() }),
        Ok(Some(owner)) if owner != user_id => errors.push(PrerequisiteError::Unauthorized {
            user_id: user_id.to_string(),
            source_id: source_id.to_string(),
        }),
        Ok(Some(_)) => match checker.count_valid_comments(source_id).await {
            Err(e) => errors.push(PrerequisiteError::lookup_failed("count_valid_comments", e)),
            Ok(found) if found < min_comments => {
                errors.push(PrerequisiteError::InsufficientComments { found, required: min_comments })
            }
            Ok(_) => {}
        },
    }

    match checker.has_linked_account(user_id).await {
        Err(e) => errors.push(PrerequisiteError::lookup_failed("has_linked_account", e)),
        Ok(false) => errors.push(PrerequisiteError::NoLinkedAccount { user_id: user_id.to_string() }),
        Ok(true) => {}
    }

    if !errors.is_empty() {
        tracing::info!(user_id, source_id, errors = errors.len(), "Prerequisites not met");
    }
    errors
}
