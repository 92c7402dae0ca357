//! Concurrent chunk dispatch with ordered reassembly.
//!
//! One transform future per chunk is fed to `buffer_unordered`, which keeps at
//! most `concurrency` calls in flight and yields results as they finish. Each
//! result carries its chunk index and lands in its own slot of an
//! [`OrderedSlots`] store, so completion order never leaks into the output.
//! A failed call becomes a placeholder section instead of an error; the batch
//! always runs to the end.

use crate::config::SummarySettings;
use crate::error::PdfStudyError;
use crate::output::ChunkOutcome;
use crate::pipeline::chunk::Chunk;
use crate::pipeline::collect::OrderedSlots;
use crate::pipeline::llm::TextGenerator;
use crate::pipeline::postprocess::clean_html;
use crate::progress::ProgressTracker;
use crate::prompts::chunk_prompt;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

/// Transform every chunk and return the outcomes in index order.
///
/// Progress is reported after each chunk resolves, success or failure.
/// The only error is an internal one: a result arriving for a slot that is
/// out of range or already filled.
pub async fn transform_chunks<G: TextGenerator>(
    generator: &G,
    chunks: &[Chunk<'_>],
    settings: &SummarySettings,
    concurrency: usize,
    progress: &ProgressTracker,
) -> Result<Vec<ChunkOutcome>, PdfStudyError> {
    let total = chunks.len();
    info!(
        "Transforming {} chunks ({}, {}) with concurrency {}",
        total, settings.focus, settings.language, concurrency
    );

    let mut slots = OrderedSlots::new(total);
    let mut pending = stream::iter(chunks.iter().map(|chunk| async move {
        let prompt = chunk_prompt(&settings.focus, &settings.language, chunk.text);
        (chunk.index, generator.generate(&prompt).await)
    }))
    .buffer_unordered(concurrency.max(1));

    let mut received = 0;
    while let Some((index, result)) = pending.next().await {
        let outcome = match result {
            Ok(raw) => {
                let html = clean_html(&raw);
                debug!("Chunk {}: {} bytes", index, html.len());
                progress.chunk_complete(index, total, html.len());
                ChunkOutcome::success(index, html)
            }
            Err(e) => {
                warn!("Chunk processing failed (index {}): {}", index, e);
                progress.chunk_error(index, total, &e.to_string());
                ChunkOutcome::failure(index, e)
            }
        };

        slots
            .fill(index, outcome)
            .map_err(|e| PdfStudyError::Internal(e.to_string()))?;
        received += 1;
        progress.transformation(received, total);
    }

    slots
        .into_ordered()
        .map_err(|e| PdfStudyError::Internal(e.to_string()))
}

/// Join chunk outputs in index order with a blank line.
pub fn join_outcomes(outcomes: &[ChunkOutcome]) -> String {
    outcomes
        .iter()
        .map(|o| o.html.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
