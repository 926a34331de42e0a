//! Analysis Configuration Module
//!
//! Every pipeline threshold (spam rules, batch sizes, retry delays, cluster
//! limits, summary bounds, stage weights) is a TOML value with a built-in
//! default.
//!
//! ## Loading Order
//!
//! 1. `COMMENT_INSIGHTS_CONFIG` environment variable (path to TOML file)
//! 2. `insights_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! ```ignore
//! // In main():
//! config::init(AnalysisConfig::load());
//!
//! // Anywhere else:
//! let batch = config::get().sentiment.batch_size;
//! ```
//!
//! Library components take their section by value, so tests construct
//! configs directly and never touch the global.

mod analysis_config;
pub mod defaults;
pub mod validation;

pub use analysis_config::*;

use std::sync::OnceLock;

/// Global analysis configuration, set once at startup.
static ANALYSIS_CONFIG: OnceLock<AnalysisConfig> = OnceLock::new();

/// Install the global configuration. Later calls are ignored.
pub fn init(config: AnalysisConfig) {
    if ANALYSIS_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Global configuration, or built-in defaults if `init()` was never called.
pub fn get() -> &'static AnalysisConfig {
    ANALYSIS_CONFIG.get_or_init(AnalysisConfig::default)
}
