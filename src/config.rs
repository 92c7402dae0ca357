//! Configuration types.
//!
//! [`StudyConfig`] carries every knob shared by the three commands: how the
//! LLM is reached, how chunks are dispatched, and where the CV lands. It is
//! built once at process start via [`StudyConfigBuilder`] and passed by
//! reference to every stage that needs it.
//!
//! [`SummarySettings`] is the per-invocation JSON object the parent process
//! hands to `summarize-pdf` (`{"focus": "...", "language": "..."}`).

use crate::error::PdfStudyError;
use crate::prompts::{FocusMode, DEFAULT_LANGUAGE};
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Largest chunk, in characters, sent to the model in one request.
pub const MAX_CHUNK_SIZE: usize = 5000;

/// Default number of chunk requests in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// File name of the rewritten CV inside [`StudyConfig::cv_output_dir`].
pub const CV_FILE_NAME: &str = "Improved-CV.pdf";

/// Shared configuration for extraction, summarizing and CV rewriting.
///
/// # Example
/// ```rust
/// use pdfstudy::StudyConfig;
///
/// let config = StudyConfig::builder()
///     .concurrency(4)
///     .model("gpt-4o-mini")
///     .build()
///     .unwrap();
/// assert_eq!(config.max_chunk_size, 5000);
/// ```
#[derive(Clone)]
pub struct StudyConfig {
    /// Number of concurrent chunk requests. Default: 8.
    ///
    /// Fixed for the lifetime of the invocation. Chunks beyond this number
    /// wait for a free slot; lower it if the provider answers with 429s.
    pub concurrency: usize,

    /// Maximum characters per chunk. Default: [`MAX_CHUNK_SIZE`].
    pub max_chunk_size: usize,

    /// LLM model identifier. If None, uses [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is detected from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for chunk transforms. Default: 0.3.
    pub temperature: f32,

    /// Maximum tokens generated per request. Default: 3000.
    pub max_tokens: usize,

    /// Retries per request after the first attempt. Default: 2.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds, doubled per attempt. Default: 500.
    pub retry_backoff_ms: u64,

    /// Per-attempt LLM timeout in seconds. Default: 120.
    ///
    /// An expired attempt counts as a failed attempt; in the summarize
    /// pipeline the chunk then resolves to its error placeholder.
    pub api_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Directory that receives the rewritten CV. Default: `<tmp>/improvedCvs`.
    pub cv_output_dir: PathBuf,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_chunk_size: MAX_CHUNK_SIZE,
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.3,
            max_tokens: 3000,
            max_retries: 2,
            retry_backoff_ms: 500,
            api_timeout_secs: 120,
            download_timeout_secs: 120,
            password: None,
            cv_output_dir: std::env::temp_dir().join("improvedCvs"),
        }
    }
}

impl fmt::Debug for StudyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyConfig")
            .field("concurrency", &self.concurrency)
            .field("max_chunk_size", &self.max_chunk_size)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("cv_output_dir", &self.cv_output_dir)
            .finish()
    }
}

impl StudyConfig {
    /// Create a new builder for `StudyConfig`.
    pub fn builder() -> StudyConfigBuilder {
        StudyConfigBuilder {
            config: Self::default(),
        }
    }

    /// Model to request, falling back to [`DEFAULT_MODEL`].
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Full path of the rewritten CV.
    pub fn cv_output_path(&self) -> PathBuf {
        self.cv_output_dir.join(CV_FILE_NAME)
    }
}

/// Builder for [`StudyConfig`].
#[derive(Debug)]
pub struct StudyConfigBuilder {
    config: StudyConfig,
}

impl StudyConfigBuilder {
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn max_chunk_size(mut self, n: usize) -> Self {
        self.config.max_chunk_size = n;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn cv_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cv_output_dir = dir.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<StudyConfig, PdfStudyError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl StudyConfig {
    /// Check the constraints [`StudyConfigBuilder::build`] enforces.
    ///
    /// The fields are public, so entry points that take a `&StudyConfig`
    /// call this again before using it.
    pub fn validate(&self) -> Result<(), PdfStudyError> {
        let c = self;
        if c.max_chunk_size == 0 {
            return Err(PdfStudyError::InvalidConfig(
                "Chunk size must be ≥ 1 character".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(PdfStudyError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(PdfStudyError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        Ok(())
    }
}

/// Per-invocation settings for `summarize-pdf`.
///
/// Missing keys take their defaults and unknown keys are ignored, so the
/// parent process can send partial objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Which template to apply. Default: "Key Concepts & Definitions".
    pub focus: FocusMode,
    /// Output language label, passed verbatim to the model. Default: "English".
    pub language: String,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            focus: FocusMode::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl SummarySettings {
    /// Parse the optional settings argument. `None` yields the defaults.
    pub fn from_json(raw: Option<&str>) -> Result<Self, PdfStudyError> {
        match raw {
            None => Ok(Self::default()),
            Some(s) => Ok(serde_json::from_str(s)?),
        }
    }
}
