//! Result types and the JSON-lines wire format.
//!
//! Every object written to stdout by the binaries is one of the structs
//! below, serialised on a single line and flushed immediately so the parent
//! process can parse the stream incrementally.

use crate::error::LlmCallError;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::PathBuf;

/// `{"progress": n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub progress: u8,
}

/// `{"text": "..."}`: the result of `extract-text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOutput {
    pub text: String,
}

/// `{"file": "..."}`: the result of `improve-cv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvOutput {
    pub file: PathBuf,
}

/// `{"error": "..."}`: any fatal failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub error: String,
}

/// The outcome of one chunk transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOutcome {
    /// 0-based chunk index.
    pub index: usize,
    /// Cleaned model output, or the placeholder section on failure.
    pub html: String,
    /// Set when `html` is a placeholder.
    pub error: Option<LlmCallError>,
}

impl ChunkOutcome {
    pub fn success(index: usize, html: String) -> Self {
        Self {
            index,
            html,
            error: None,
        }
    }

    /// Placeholder section standing in for a chunk whose call failed.
    pub fn failure(index: usize, error: LlmCallError) -> Self {
        Self {
            index,
            html: placeholder_section(index),
            error: Some(error),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.error.is_some()
    }
}

/// HTML shown in place of a failed chunk (1-indexed in the heading).
pub fn placeholder_section(index: usize) -> String {
    format!(
        "<section><h2>Error Processing Chunk {}</h2>\
<p>Could not generate summary for this section due to an API error.</p></section>",
        index + 1
    )
}

/// `{"summary": "...", "progress": 100}`: the terminal object of `summarize-pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// Chunk outputs joined in index order with a blank line.
    pub summary: String,
    /// Always 100 once the batch phase has finished.
    pub progress: u8,
    /// Per-chunk detail, in index order. Not part of the wire format.
    #[serde(skip)]
    pub chunks: Vec<ChunkOutcome>,
}

impl SummaryOutput {
    pub fn failed_chunks(&self) -> usize {
        self.chunks.iter().filter(|c| c.is_placeholder()).count()
    }
}

/// Serialise `value` as one JSON line and flush.
pub fn emit_json_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_wire_format_omits_chunks() {
        let out = SummaryOutput {
            summary: "<section>a</section>".into(),
            progress: 100,
            chunks: vec![ChunkOutcome::success(0, "<section>a</section>".into())],
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"summary": "<section>a</section>", "progress": 100})
        );
    }

    #[test]
    fn placeholder_is_one_indexed_section() {
        let c = ChunkOutcome::failure(
            2,
            LlmCallError::EmptyResponse { attempts: 1 },
        );
        assert!(c.is_placeholder());
        assert!(c.html.starts_with("<section><h2>Error Processing Chunk 3</h2>"));
        assert!(c.html.ends_with("</section>"));
    }

    #[test]
    fn json_lines_are_newline_terminated() {
        let mut buf = Vec::new();
        emit_json_line(&mut buf, &ProgressUpdate { progress: 42 }).unwrap();
        emit_json_line(&mut buf, &ErrorOutput { error: "boom".into() }).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "{\"progress\":42}\n{\"error\":\"boom\"}\n");
    }

    #[test]
    fn cv_output_serialises_path_as_string() {
        let json = serde_json::to_string(&CvOutput {
            file: PathBuf::from("/tmp/improvedCvs/Improved-CV.pdf"),
        })
        .unwrap();
        assert_eq!(json, r#"{"file":"/tmp/improvedCvs/Improved-CV.pdf"}"#);
    }
}
