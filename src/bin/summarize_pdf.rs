//! `summarize-pdf`: stream `{"progress": n}` lines while a PDF is turned
//! into study HTML, then print `{"summary": "...", "progress": 100}`.

use anyhow::{Context, Result};
use clap::Parser;
use pdfstudy::cli::{self, CommonArgs, LlmArgs};
use pdfstudy::{
    resolve_provider, summarize, JsonLinesProgress, ProgressTracker, ProviderGenerator,
    StudyConfig, SummaryOutput, SummarySettings,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;

/// Summarize or transform a PDF with an LLM, chunk by chunk.
#[derive(Parser, Debug)]
#[command(
    name = "summarize-pdf",
    version,
    arg_required_else_help = true,
    after_help = "SETTINGS is a JSON object, e.g. '{\"focus\": \"Exam Practice Questions\", \"language\": \"French\"}'."
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// JSON settings with optional `focus` and `language` keys.
    settings: Option<String>,

    #[command(flatten)]
    llm: LlmArgs,

    /// Maximum characters per chunk.
    #[arg(long, env = "PDFSTUDY_CHUNK_SIZE", default_value_t = pdfstudy::config::MAX_CHUNK_SIZE)]
    chunk_size: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    cli::init_logging(cli.common.verbose);
    cli::finish(run(&cli).await)
}

async fn run(cli: &Cli) -> Result<SummaryOutput> {
    let settings = SummarySettings::from_json(cli.settings.as_deref())?;
    let config = cli
        .llm
        .apply(cli.common.apply(StudyConfig::builder()))
        .max_chunk_size(cli.chunk_size)
        .build()
        .context("Invalid configuration")?;

    let provider = resolve_provider(&config)?;
    let generator = ProviderGenerator::new(provider, &config);
    let progress = Arc::new(ProgressTracker::new(Arc::new(JsonLinesProgress)));

    let output = summarize(&cli.common.input, &settings, &config, &generator, &progress).await?;
    if output.failed_chunks() > 0 {
        warn!(
            "{} of {} chunks failed and were replaced by placeholders",
            output.failed_chunks(),
            output.chunks.len()
        );
    }
    Ok(output)
}
