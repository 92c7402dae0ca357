//! Top-level entry points, one per command.
//!
//! Each function runs a whole invocation: resolve the input, extract the text,
//! then either return it ([`extract_text`]), chunk and transform it
//! ([`summarize`]) or rewrite and render it ([`improve_cv`]). The LLM and the
//! renderer are passed in, so callers build them once and tests substitute
//! fakes.

use crate::config::{StudyConfig, SummarySettings};
use crate::error::PdfStudyError;
use crate::output::{CvOutput, SummaryOutput, TextOutput};
use crate::pipeline::dispatch::{join_outcomes, transform_chunks};
use crate::pipeline::extract::{self, PageJoin};
use crate::pipeline::llm::TextGenerator;
use crate::pipeline::render::{write_pdf_atomic, HtmlRenderer};
use crate::pipeline::{chunk, input, postprocess};
use crate::progress::ProgressTracker;
use crate::prompts::cv_prompt;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Extract the raw text of a PDF file or URL.
///
/// Pages are concatenated without separators. An empty result is returned
/// as-is; deciding whether that is a problem is left to the caller.
pub async fn extract_text(
    input_str: impl AsRef<str>,
    config: &StudyConfig,
) -> Result<TextOutput, PdfStudyError> {
    let input_str = input_str.as_ref();
    info!("Extracting text: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let text = extract::extract_text(
        resolved.path(),
        config.password.as_deref(),
        PageJoin::Concatenate,
        |_, _| {},
    )
    .await?;

    Ok(TextOutput { text })
}

/// Transform a PDF into study HTML according to `settings`.
///
/// Progress runs 0→50 while pages are extracted and 50→100 while chunks
/// resolve. Chunk failures do not fail the call; they show up as placeholder
/// sections (see [`SummaryOutput::failed_chunks`]).
///
/// # Errors
/// Only input and extraction problems are fatal.
pub async fn summarize<G: TextGenerator>(
    input_str: impl AsRef<str>,
    settings: &SummarySettings,
    config: &StudyConfig,
    generator: &G,
    progress: &Arc<ProgressTracker>,
) -> Result<SummaryOutput, PdfStudyError> {
    let input_str = input_str.as_ref();
    info!("Summarizing: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;

    let tracker = Arc::clone(progress);
    let text = extract::extract_text(
        resolved.path(),
        config.password.as_deref(),
        PageJoin::NewlineAfterEach,
        move |done, total| tracker.extraction(done, total),
    )
    .await?;

    summarize_text(&text, settings, config, generator, progress).await
}

/// Chunk, transform and join already-extracted text.
///
/// Empty text produces an empty summary without any LLM call.
///
/// # Errors
/// [`PdfStudyError::InvalidConfig`] when `config` fails
/// [`StudyConfig::validate`], for example a hand-built zero chunk size.
pub async fn summarize_text<G: TextGenerator>(
    text: &str,
    settings: &SummarySettings,
    config: &StudyConfig,
    generator: &G,
    progress: &ProgressTracker,
) -> Result<SummaryOutput, PdfStudyError> {
    config.validate()?;
    let start = Instant::now();
    let chunks = chunk::chunk_text(text, config.max_chunk_size);
    debug!(
        "{} chars → {} chunks of ≤{}",
        text.chars().count(),
        chunks.len(),
        config.max_chunk_size
    );

    let outcomes =
        transform_chunks(generator, &chunks, settings, config.concurrency, progress).await?;

    let output = SummaryOutput {
        summary: join_outcomes(&outcomes),
        progress: progress.complete(),
        chunks: outcomes,
    };
    info!(
        "Summary complete: {} chunks ({} failed) in {:?}",
        output.chunks.len(),
        output.failed_chunks(),
        start.elapsed()
    );
    Ok(output)
}

/// Rewrite a résumé into a styled PDF.
///
/// The PDF is written atomically to [`StudyConfig::cv_output_path`], replacing
/// the output of any earlier run.
///
/// # Errors
/// Every step is fatal here: unreadable input, empty text, the LLM call, the
/// render and the write.
pub async fn improve_cv<G: TextGenerator, R: HtmlRenderer>(
    input_str: impl AsRef<str>,
    config: &StudyConfig,
    generator: &G,
    renderer: &R,
) -> Result<CvOutput, PdfStudyError> {
    let input_str = input_str.as_ref();
    info!("Improving CV: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let text = extract::extract_text(
        resolved.path(),
        config.password.as_deref(),
        PageJoin::NewlineAfterEach,
        |_, _| {},
    )
    .await?;

    if text.trim().is_empty() {
        return Err(PdfStudyError::EmptyText {
            path: resolved.path().to_path_buf(),
        });
    }

    let raw = generator.generate(&cv_prompt(&text)).await?;
    let html = postprocess::clean_html(&raw);
    debug!("CV HTML: {} bytes", html.len());

    let bytes = renderer.render_pdf(&html).await?;
    let path = config.cv_output_path();
    write_pdf_atomic(&path, &bytes).await?;
    info!("CV written to {}", path.display());

    Ok(CvOutput { file: path })
}

// ── Provider resolution ──────────────────────────────────────────────────

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, PdfStudyError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PdfStudyError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider + model** (`config.provider_name`). The factory reads
///    the matching API key from the environment.
/// 3. **Environment pair** (`PDFSTUDY_LLM_PROVIDER` + `PDFSTUDY_MODEL`), both
///    non-empty.
/// 4. **`OPENAI_API_KEY`** present → OpenAI with the configured model.
/// 5. **Full auto-detection** (`ProviderFactory::from_env`).
pub fn resolve_provider(config: &StudyConfig) -> Result<Arc<dyn LLMProvider>, PdfStudyError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        return create_provider(name, config.model_or_default());
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("PDFSTUDY_LLM_PROVIDER"),
        std::env::var("PDFSTUDY_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            return create_provider("openai", config.model_or_default());
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| PdfStudyError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmCallError;
    use crate::prompts::Prompt;

    struct Fixed(&'static str);

    impl TextGenerator for Fixed {
        async fn generate(&self, _prompt: &Prompt) -> Result<String, LlmCallError> {
            Ok(self.0.to_string())
        }
    }

    struct NeverRenders;

    impl HtmlRenderer for NeverRenders {
        async fn render_pdf(&self, _html: &str) -> Result<Vec<u8>, PdfStudyError> {
            Err(PdfStudyError::RenderFailed("not in tests".into()))
        }
    }

    #[tokio::test]
    async fn empty_text_skips_the_model() {
        struct Unreachable;
        impl TextGenerator for Unreachable {
            async fn generate(&self, _prompt: &Prompt) -> Result<String, LlmCallError> {
                panic!("no chunk should be sent");
            }
        }

        let tracker = ProgressTracker::noop();
        let out = summarize_text(
            "",
            &SummarySettings::default(),
            &StudyConfig::default(),
            &Unreachable,
            &tracker,
        )
        .await
        .unwrap();
        assert_eq!(out.summary, "");
        assert_eq!(out.progress, 100);
        assert!(out.chunks.is_empty());
    }

    #[tokio::test]
    async fn summarize_joins_with_blank_line() {
        let config = StudyConfig::builder().max_chunk_size(4).build().unwrap();
        let out = summarize_text(
            "abcdefgh",
            &SummarySettings::default(),
            &config,
            &Fixed("<section>x</section>"),
            &ProgressTracker::noop(),
        )
        .await
        .unwrap();
        assert_eq!(out.summary, "<section>x</section>\n\n<section>x</section>");
    }

    #[tokio::test]
    async fn improve_cv_rejects_missing_file_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.pdf");
        let err = improve_cv(
            missing.to_string_lossy(),
            &StudyConfig::default(),
            &Fixed("<html></html>"),
            &NeverRenders,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PdfStudyError::FileNotFound { .. }));
    }
}
