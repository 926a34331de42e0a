//! comment-insights - social-media comment analysis CLI
//!
//! # Usage
//!
//! ```bash
//! # Analyze a JSON array of comments (fallback mode without [llm] endpoint)
//! comment-insights analyze --input comments.json --source-id video-42 --output report.json
//!
//! # Keep results and job status in a sled database between runs
//! comment-insights analyze --input comments.json --source-id video-42 --db ./data/insights.db
//!
//! # Rough run-time estimate
//! comment-insights estimate --count 250
//!
//! # Check a config file
//! comment-insights validate-config --config insights_config.toml
//! ```
//!
//! # Environment Variables
//!
//! - `COMMENT_INSIGHTS_CONFIG`: Path to the TOML config (default: ./insights_config.toml)
//! - `COMMENT_INSIGHTS_API_KEY`: Bearer token for the LLM endpoint (name configurable)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use comment_insights::config::{self, AnalysisConfig};
use comment_insights::{
    build_backend, estimate_analysis_time, AnalysisRequest, Comment, InMemoryStore,
    PipelineOrchestrator, PipelineRun, SledStore,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "comment-insights")]
#[command(about = "Sentiment, theme and summary analysis for social-media comments")]
#[command(version)]
struct CliArgs {
    /// Config file (overrides COMMENT_INSIGHTS_CONFIG and ./insights_config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "COMMENT_INSIGHTS_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run the full pipeline over a JSON array of comments
    Analyze {
        /// JSON file holding an array of comments
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Post or video the comments belong to (cache key)
        #[arg(long)]
        source_id: String,
        /// Write the analysis result here instead of stdout
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// sled database directory; in-memory when omitted
        #[arg(long, value_name = "DIR")]
        db: Option<PathBuf>,
        /// Job id (random UUID when omitted)
        #[arg(long)]
        job_id: Option<String>,
    },

    /// Estimate analysis time for a number of comments
    Estimate {
        #[arg(long)]
        count: usize,
    },

    /// Load and validate configuration
    ValidateConfig,
}

// ============================================================================
// Commands
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => Ok(AnalysisConfig::load()),
    }
}

fn read_comments(path: &Path) -> Result<Vec<Comment>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid comment JSON in {}", path.display()))
}

async fn run_analyze(
    input: &Path,
    source_id: &str,
    output: Option<&Path>,
    db: Option<&Path>,
    job_id: Option<String>,
) -> Result<()> {
    let config = config::get();
    let comments = read_comments(input)?;
    let comment_ids: Vec<String> = comments.iter().map(|c| c.id.clone()).collect();
    let job_id = job_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    info!(job_id = %job_id, source_id, comments = comments.len(), "Loaded comments from {}", input.display());

    let backend = build_backend(&config.llm, config.sentiment.request_timeout_secs);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, cancelling analysis");
        shutdown_token.cancel();
    });

    let pipeline = match db {
        Some(path) => {
            let store = SledStore::open(path)
                .with_context(|| format!("Failed to open database at {}", path.display()))?;
            store.put_comments(&comments).context("Failed to store comments")?;
            PipelineOrchestrator::with_store(config, backend, Arc::new(store))
        }
        None => {
            let store = InMemoryStore::new();
            store
                .insert_source(source_id, "cli", comments)
                .context("Failed to store comments")?;
            PipelineOrchestrator::with_store(config, backend, Arc::new(store))
        }
    };

    let request = AnalysisRequest::new(job_id, source_id, comment_ids);
    let run: PipelineRun = pipeline
        .run(&request, &cancel_token)
        .await
        .context("Analysis failed")?;

    if run.cache_hit {
        info!(cached_job = %run.record.job_id, "Reused cached analysis");
    }

    let json = serde_json::to_string_pretty(&run.record.result).context("Failed to serialize result")?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    match args.command {
        SubCommand::Estimate { count } => {
            println!("{:.1}", estimate_analysis_time(count));
            Ok(())
        }
        SubCommand::ValidateConfig => {
            let config = load_config(args.config.as_deref())?;
            config.validate().context("Configuration invalid")?;
            println!("Configuration OK");
            println!("{}", config.to_toml().context("Failed to render configuration")?);
            Ok(())
        }
        SubCommand::Analyze { input, source_id, output, db, job_id } => {
            config::init(load_config(args.config.as_deref())?);
            run_analyze(&input, &source_id, output.as_deref(), db.as_deref(), job_id).await
        }
    }
}
