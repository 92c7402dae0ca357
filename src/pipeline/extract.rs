//! PDF text extraction via pdfium.
//!
//! pdfium is a C++ library with thread-local state and blocking calls, so the
//! whole extraction runs inside `tokio::task::spawn_blocking`. Pages are read
//! in order; after each page the `on_page(done, total)` hook fires so the
//! summarize pipeline can report extraction progress.

use crate::error::PdfStudyError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How page texts are glued together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageJoin {
    /// Pages concatenated as-is.
    #[default]
    Concatenate,
    /// A `\n` appended after every page.
    NewlineAfterEach,
}

/// Extract the text of every page, in order.
pub async fn extract_text<F>(
    pdf_path: &Path,
    password: Option<&str>,
    join: PageJoin,
    on_page: F,
) -> Result<String, PdfStudyError>
where
    F: Fn(usize, usize) + Send + 'static,
{
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        extract_text_blocking(&path, password.as_deref(), join, on_page)
    })
    .await
    .map_err(|e| PdfStudyError::Internal(format!("Extraction task panicked: {}", e)))?
}

fn extract_text_blocking<F>(
    pdf_path: &Path,
    password: Option<&str>,
    join: PageJoin,
    on_page: F,
) -> Result<String, PdfStudyError>
where
    F: Fn(usize, usize),
{
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| classify_load_error(pdf_path.to_path_buf(), format!("{:?}", e)))?;

    let pages = document.pages();
    let total = pages.len() as usize;
    info!("PDF loaded: {} pages", total);

    let mut text = String::new();
    for (i, page) in pages.iter().enumerate() {
        let page_text = page
            .text()
            .map_err(|e| PdfStudyError::ExtractionFailed {
                page: i + 1,
                detail: format!("{:?}", e),
            })?
            .all();
        debug!("Page {}: {} chars", i + 1, page_text.chars().count());

        text.push_str(&page_text);
        if join == PageJoin::NewlineAfterEach {
            text.push('\n');
        }
        on_page(i + 1, total);
    }

    Ok(text)
}

fn classify_load_error(path: PathBuf, detail: String) -> PdfStudyError {
    if detail.contains("Password") || detail.contains("password") {
        PdfStudyError::PasswordRequired { path }
    } else {
        PdfStudyError::CorruptPdf { path, detail }
    }
}

/// Bind to pdfium: `PDFIUM_LIB_PATH` first, then the working directory,
/// then the system library search path.
fn bind_pdfium() -> Result<Pdfium, PdfStudyError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) if !path.is_empty() => Pdfium::bind_to_library(&path),
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| PdfStudyError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}
