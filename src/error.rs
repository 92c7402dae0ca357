//! Error types for the pdfstudy library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PdfStudyError`]: **Fatal**: the invocation cannot produce its result
//!   (unreadable PDF, no extractable text, provider not configured, the CV
//!   could not be rendered). Returned as `Err(PdfStudyError)` from the
//!   top-level functions in [`crate::convert`].
//!
//! * [`LlmCallError`]: **Non-fatal** inside the summarize pipeline: one chunk
//!   failed (timeout, transient API error) but its siblings are fine. Stored in
//!   [`crate::output::ChunkOutcome`] and replaced by a placeholder section so the
//!   joined document stays well-formed.
//!
//! Binaries print [`PdfStudyError::summary`] as the JSON `error` field and
//! send the full `Display` text to stderr.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfstudy library.
#[derive(Debug, Error)]
pub enum PdfStudyError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The input string is neither a file path nor an HTTP/HTTPS URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}' (first bytes: {magic:?})")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not parse the document.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided, or it was wrong.
    #[error("PDF '{path}' is encrypted and the password is missing or wrong")]
    PasswordRequired { path: PathBuf },

    /// Text extraction failed on a given page (1-indexed).
    #[error("Text extraction failed for page {page}: {detail}")]
    ExtractionFailed { page: usize, detail: String },

    /// The document parsed but contains no text (scanned image, blank).
    #[error("No text extracted from PDF '{path}'")]
    EmptyText { path: PathBuf },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The single LLM call of a one-shot command failed.
    #[error("LLM API error: {0}")]
    LlmApiError(#[from] LlmCallError),

    // ── Output errors ─────────────────────────────────────────────────────
    /// HTML → PDF rendering failed.
    #[error("Failed to render PDF: {0}")]
    RenderFailed(String),

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The settings JSON passed to `summarize-pdf` could not be parsed.
    #[error("Invalid settings JSON: {0}")]
    InvalidSettings(#[from] serde_json::Error),

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PdfStudyError {
    /// Short, caller-facing description used for the JSON `error` field.
    ///
    /// Paths, provider hints and library error text stay out of it; they are
    /// logged to stderr instead.
    pub fn summary(&self) -> String {
        match self {
            Self::FileNotFound { .. } => "Failed to read PDF: file not found".into(),
            Self::PermissionDenied { .. } => "Failed to read PDF: permission denied".into(),
            Self::InvalidInput { .. } => "Failed to read PDF: invalid path or URL".into(),
            Self::DownloadFailed { .. } | Self::DownloadTimeout { .. } => {
                "Failed to read PDF: download failed".into()
            }
            Self::NotAPdf { .. } => "Failed to read PDF: file is not a PDF".into(),
            Self::CorruptPdf { .. } => "Failed to read PDF: document is corrupt".into(),
            Self::PasswordRequired { .. } => "Failed to read PDF: document is encrypted".into(),
            Self::ExtractionFailed { page, .. } => {
                format!("Failed to read PDF: text extraction failed on page {page}")
            }
            Self::EmptyText { .. } => "No text extracted from PDF".into(),
            Self::ProviderNotConfigured { provider, .. } => {
                format!("LLM provider '{provider}' is not configured")
            }
            Self::LlmApiError(e) => format!("OpenAI API error: {}", e.kind()),
            Self::RenderFailed(_) | Self::OutputWriteFailed { .. } => {
                "Failed to create PDF".into()
            }
            Self::InvalidConfig(msg) => format!("Invalid configuration: {msg}"),
            Self::InvalidSettings(_) => "Invalid settings JSON".into(),
            Self::PdfiumBindingFailed(_) => "PDF engine unavailable".into(),
            Self::Internal(_) => "Internal error".into(),
        }
    }
}

/// A failed LLM call.
///
/// Inside the summarize pipeline this is non-fatal and kept alongside the
/// chunk's placeholder; in one-shot commands it is wrapped by
/// [`PdfStudyError::LlmApiError`].
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum LlmCallError {
    /// Provider returned an error on every attempt.
    #[error("LLM call failed after {attempts} attempt(s): {detail}")]
    Failed { attempts: u32, detail: String },

    /// The last attempt exceeded the per-call timeout.
    #[error("LLM call timed out after {secs}s ({attempts} attempt(s))")]
    Timeout { attempts: u32, secs: u64 },

    /// The provider answered with no content.
    #[error("LLM returned empty content ({attempts} attempt(s))")]
    EmptyResponse { attempts: u32 },
}

impl LlmCallError {
    /// One-word category, safe to show to end users.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Failed { .. } => "request failed",
            Self::Timeout { .. } => "request timed out",
            Self::EmptyResponse { .. } => "empty response",
        }
    }
}
