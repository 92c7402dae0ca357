//! Pipeline stages shared by the three commands.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ chunk ──▶ dispatch ──▶ collect ──▶ joined HTML
//! (URL/path) (pdfium)   (5000 ch)  (llm ×8)    (by index)
//!
//! input ──▶ extract ──▶ llm ──▶ postprocess ──▶ render ──▶ Improved-CV.pdf
//! ```
//!
//! 1. [`input`]: canonicalise the user-supplied path or URL to a local file
//! 2. [`extract`]: page-by-page text extraction; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`chunk`]: split the text into fixed-size character chunks
//! 4. [`dispatch`]: bounded concurrent transforms; failures become
//!    placeholder sections
//! 5. [`collect`]: write-once slot store that restores chunk order
//! 6. [`llm`]: the chat call with retry/backoff; the only stage with
//!    LLM network I/O
//! 7. [`postprocess`]: deterministic cleanup of model HTML
//! 8. [`render`]: HTML → PDF through headless Chrome

pub mod chunk;
pub mod collect;
pub mod dispatch;
pub mod extract;
pub mod input;
pub mod llm;
pub mod postprocess;
pub mod render;
