//! Command-line plumbing shared by the `improve-cv`, `extract-text` and
//! `summarize-pdf` binaries.
//!
//! Stdout is reserved for JSON lines; everything human-readable goes to
//! stderr through `tracing`.

use crate::config::StudyConfigBuilder;
use crate::error::PdfStudyError;
use crate::output::{emit_json_line, ErrorOutput};
use anyhow::Context;
use serde::Serialize;
use std::io;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Flags every command accepts.
#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Local PDF file path or HTTP/HTTPS URL.
    pub input: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFSTUDY_PASSWORD")]
    pub password: Option<String>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDFSTUDY_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    pub download_timeout: u64,

    /// Enable DEBUG-level tracing logs on stderr.
    #[arg(short, long, env = "PDFSTUDY_VERBOSE")]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn apply(&self, builder: StudyConfigBuilder) -> StudyConfigBuilder {
        let builder = builder.download_timeout_secs(self.download_timeout);
        match self.password {
            Some(ref pwd) => builder.password(pwd),
            None => builder,
        }
    }
}

/// Flags for commands that call the LLM.
#[derive(clap::Args, Debug, Clone)]
pub struct LlmArgs {
    /// LLM model ID (e.g. gpt-4o-mini, gpt-4.1, claude-sonnet-4-20250514).
    #[arg(long, env = "PDFSTUDY_MODEL")]
    pub model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "PDFSTUDY_PROVIDER")]
    pub provider: Option<String>,

    /// Number of concurrent LLM calls.
    #[arg(short, long, env = "PDFSTUDY_CONCURRENCY", default_value_t = 8)]
    pub concurrency: usize,

    /// Max LLM output tokens per call.
    #[arg(long, env = "PDFSTUDY_MAX_TOKENS", default_value_t = 3000)]
    pub max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PDFSTUDY_TEMPERATURE", default_value_t = 0.3)]
    pub temperature: f32,

    /// Retries per call on LLM failure.
    #[arg(long, env = "PDFSTUDY_MAX_RETRIES", default_value_t = 2)]
    pub max_retries: u32,

    /// Per-call LLM timeout in seconds.
    #[arg(long, env = "PDFSTUDY_API_TIMEOUT", default_value_t = 120)]
    pub api_timeout: u64,
}

impl LlmArgs {
    pub fn apply(&self, builder: StudyConfigBuilder) -> StudyConfigBuilder {
        let mut builder = builder
            .concurrency(self.concurrency)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .max_retries(self.max_retries)
            .api_timeout_secs(self.api_timeout);
        if let Some(ref model) = self.model {
            builder = builder.model(model);
        }
        if let Some(ref provider) = self.provider {
            builder = builder.provider_name(provider);
        }
        builder
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the level.
pub fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Write one JSON object as a line on stdout.
pub fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    emit_json_line(&mut out, value).context("Failed to write to stdout")
}

/// Log `err` in full, print its short form as `{"error": ...}` and return
/// the failure exit code.
pub fn report_failure(err: &anyhow::Error) -> ExitCode {
    error!("{:#}", err);
    let message = err
        .downcast_ref::<PdfStudyError>()
        .map(PdfStudyError::summary)
        .unwrap_or_else(|| err.to_string());
    if let Err(e) = emit(&ErrorOutput { error: message }) {
        error!("{:#}", e);
    }
    ExitCode::FAILURE
}

/// Emit `result` on success, otherwise report it. Returns the exit code.
pub fn finish<T: Serialize>(result: anyhow::Result<T>) -> ExitCode {
    match result.and_then(|value| emit(&value)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StudyConfig;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        llm: LlmArgs,
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = TestCli::try_parse_from([
            "test",
            "cv.pdf",
            "--model",
            "gpt-4.1",
            "--concurrency",
            "3",
            "--api-timeout",
            "30",
            "--password",
            "secret",
        ])
        .unwrap();
        let config = cli
            .llm
            .apply(cli.common.apply(StudyConfig::builder()))
            .build()
            .unwrap();

        assert_eq!(cli.common.input, "cv.pdf");
        assert_eq!(config.model_or_default(), "gpt-4.1");
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.api_timeout_secs, 30);
        assert_eq!(config.password.as_deref(), Some("secret"));
    }

    #[test]
    fn zero_timeout_is_rejected_at_build() {
        let cli = TestCli::try_parse_from(["test", "x.pdf", "--api-timeout", "0"]).unwrap();
        let err = cli
            .llm
            .apply(cli.common.apply(StudyConfig::builder()))
            .build()
            .unwrap_err();
        assert!(matches!(err, PdfStudyError::InvalidConfig(_)));
    }
}
