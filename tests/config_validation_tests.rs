//! Config Validation Tests
//!
//! Typo detection on unknown keys and range validation of parsed values,
//! exercised independently from the rest of the pipeline.

use comment_insights::config::validation::{
    known_config_keys, suggest_correction, validate_suspicious_values, validate_unknown_keys,
};
use comment_insights::config::{AnalysisConfig, ConfigError};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_batch_size_warns_with_suggestion() {
    let toml_str = r#"
[sentiment]
bach_size = 20
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("bach_size"));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("sentiment.batch_size"));
}

#[test]
fn typo_in_nested_stage_weights_warns() {
    let toml_str = r#"
[pipeline.stage_weights]
sentimnt = 0.3
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("pipeline.stage_weights.sentiment")
    );
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[preprocessing]
min_length = 2
max_length = 4000
caps_ratio_threshold = 0.75

[sentiment]
batch_size = 20
advanced_mode = true

[themes]
similarity_threshold = 0.2
max_clusters = 8

[summary]
min_words = 60

[pipeline]
cache_ttl_hours = 12

[pipeline.stage_weights]
preprocessing = 0.2
sentiment = 0.3
themes = 0.3
summary = 0.15
persistence = 0.05

[llm]
endpoint = "https://api.example.com/v1"
model = "small-model"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "Unexpected warnings: {:?}", warnings);
}

#[test]
fn unknown_section_without_close_match_has_no_suggestion() {
    let warnings = validate_unknown_keys("[dashboard]\ntheme = \"dark\"\n");
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|w| w.suggestion.is_none()));
}

#[test]
fn suggestion_limited_to_edit_distance_three() {
    let known = known_config_keys();
    assert_eq!(
        suggest_correction("themes.max_cluster", &known).as_deref(),
        Some("themes.max_clusters")
    );
    assert_eq!(suggest_correction("themes.completely_wrong", &known), None);
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn empty_file_is_a_valid_config() {
    let config = AnalysisConfig::from_toml_str("").unwrap();
    assert_eq!(config.sentiment.batch_size, 10);
    assert_eq!(config.pipeline.cache_ttl_hours, 24);
    assert!((config.pipeline.stage_weights.sum() - 1.0).abs() < 1e-9);
}

#[test]
fn unknown_keys_never_fail_loading() {
    let config = AnalysisConfig::from_toml_str("[sentiment]\nbach_size = 99\n").unwrap();
    assert_eq!(config.sentiment.batch_size, 10);
}

#[test]
fn out_of_range_values_are_all_reported() {
    let toml_str = r#"
[preprocessing]
caps_ratio_threshold = 1.5

[sentiment]
batch_size = 0

[pipeline.stage_weights]
summary = 0.5
"#;
    match AnalysisConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 3, "errors: {:?}", errors);
            assert!(errors.iter().any(|e| e.contains("caps_ratio_threshold")));
            assert!(errors.iter().any(|e| e.contains("batch_size")));
            assert!(errors.iter().any(|e| e.contains("stage_weights")));
        }
        other => panic!("Expected validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn oversized_cache_ttl_is_rejected() {
    match AnalysisConfig::from_toml_str("[pipeline]\ncache_ttl_hours = 9000000000000000\n") {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("cache_ttl_hours"));
        }
        other => panic!("Expected validation error, got {:?}", other.map(|_| ())),
    }
    assert!(AnalysisConfig::from_toml_str("[pipeline]\ncache_ttl_hours = 8760\n").is_ok());
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        AnalysisConfig::from_toml_str("[sentiment\nbatch_size = 3"),
        Err(ConfigError::Parse(_, _))
    ));
}

#[test]
fn suspicious_values_warn_without_failing() {
    let mut config = AnalysisConfig::default();
    config.sentiment.batch_size = 80;
    config.pipeline.cache_ttl_hours = 0;
    config.llm.endpoint = Some("http://localhost:8000/v1".into());
    assert!(config.validate().is_ok());

    let fields: Vec<String> = validate_suspicious_values(&config)
        .into_iter()
        .map(|w| w.field)
        .collect();
    assert_eq!(fields, vec!["sentiment.batch_size", "pipeline.cache_ttl_hours"]);
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("insights_config.toml");

    let mut config = AnalysisConfig::default();
    config.themes.max_clusters = 4;
    config.save_to_file(&path).unwrap();

    let loaded = AnalysisConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.themes, config.themes);
}
