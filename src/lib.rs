//! # pdfstudy
//!
//! Study tools over PDF documents, backed by a hosted LLM.
//!
//! Three commands share this library:
//!
//! | Binary          | Output                                   |
//! |-----------------|------------------------------------------|
//! | `extract-text`  | `{"text": "..."}`                        |
//! | `summarize-pdf` | `{"progress": n}` lines, then `{"summary": "...", "progress": 100}` |
//! | `improve-cv`    | `{"file": "<path to Improved-CV.pdf>"}`  |
//!
//! Failures print `{"error": "..."}` and exit non-zero. Stdout carries JSON
//! lines only; logs go to stderr.
//!
//! ## Summarize Pipeline
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     resolve local file or download from URL
//!  ├─ 2. Extract   page text via pdfium (spawn_blocking)      progress 0 → 50
//!  ├─ 3. Chunk     ≤ 5000 characters per chunk
//!  ├─ 4. Dispatch  ≤ 8 concurrent LLM calls, failures → placeholder sections
//!  ├─ 5. Collect   write-once slots restore chunk order      progress 50 → 100
//!  └─ 6. Join      sections joined with a blank line
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfstudy::{resolve_provider, summarize, ProgressTracker, ProviderGenerator,
//!     StudyConfig, SummarySettings};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StudyConfig::default();
//!     let generator = ProviderGenerator::new(resolve_provider(&config)?, &config);
//!     let settings = SummarySettings::from_json(Some(r#"{"focus": "Formulas and Equations"}"#))?;
//!     let progress = Arc::new(ProgressTracker::noop());
//!
//!     let output = summarize("lecture.pdf", &settings, &config, &generator, &progress).await?;
//!     println!("{}", output.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the binaries (clap + anyhow + tracing-subscriber + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{StudyConfig, StudyConfigBuilder, SummarySettings};
pub use convert::{extract_text, improve_cv, resolve_provider, summarize, summarize_text};
pub use error::{LlmCallError, PdfStudyError};
pub use output::{ChunkOutcome, CvOutput, ErrorOutput, ProgressUpdate, SummaryOutput, TextOutput};
pub use pipeline::llm::{ProviderGenerator, TextGenerator};
pub use pipeline::render::{ChromeRenderer, HtmlRenderer};
pub use progress::{JsonLinesProgress, NoopProgress, ProgressSink, ProgressTracker};
pub use prompts::{FocusMode, Prompt};
