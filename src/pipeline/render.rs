//! HTML → PDF rendering for the rewritten CV.
//!
//! The production renderer drives a headless Chrome through the DevTools
//! protocol (`chromiumoxide`): load the HTML into a blank page, print it to
//! PDF, shut the browser down. The browser lives for one render only.

use crate::error::PdfStudyError;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Turns a complete HTML document into PDF bytes.
pub trait HtmlRenderer: Send + Sync {
    fn render_pdf(&self, html: &str) -> impl Future<Output = Result<Vec<u8>, PdfStudyError>> + Send;
}

/// Headless Chrome renderer.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer {
    /// Chrome/Chromium binary. When `None`, chromiumoxide searches the usual
    /// install locations.
    pub executable: Option<PathBuf>,
}

impl ChromeRenderer {
    /// Renderer using `CHROME_PATH` when it is set.
    pub fn from_env() -> Self {
        Self {
            executable: std::env::var_os("CHROME_PATH").map(PathBuf::from),
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, PdfStudyError> {
        let mut builder = BrowserConfig::builder().no_sandbox();
        if let Some(ref exe) = self.executable {
            builder = builder.chrome_executable(exe);
        }
        builder
            .build()
            .map_err(|e| PdfStudyError::RenderFailed(format!("browser config: {e}")))
    }
}

impl HtmlRenderer for ChromeRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, PdfStudyError> {
        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| PdfStudyError::RenderFailed(format!("launch: {e}")))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = print_page(&browser, html).await;

        shutdown_step("close", browser.close().await);
        shutdown_step("wait for exit", browser.wait().await);
        events.abort();

        let bytes = result?;
        info!("Rendered {} bytes of PDF", bytes.len());
        Ok(bytes)
    }
}

async fn print_page(browser: &Browser, html: &str) -> Result<Vec<u8>, PdfStudyError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| PdfStudyError::RenderFailed(format!("new page: {e}")))?;
    page.set_content(html)
        .await
        .map_err(|e| PdfStudyError::RenderFailed(format!("set content: {e}")))?;
    debug!("Loaded {} bytes of HTML", html.len());

    let params = PrintToPdfParams {
        print_background: Some(true),
        prefer_css_page_size: Some(true),
        ..Default::default()
    };
    page.pdf(params)
        .await
        .map_err(|e| PdfStudyError::RenderFailed(format!("print: {e}")))
}

/// Log a failed browser shutdown step. Shutdown never fails the render.
///
/// Returns whether the step succeeded.
fn shutdown_step<T, E: std::fmt::Display>(step: &str, result: Result<T, E>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            warn!("Browser shutdown ({}) did not complete cleanly: {}", step, e);
            false
        }
    }
}

/// Write `bytes` to `path` atomically (temp file + rename), creating parent
/// directories as needed.
pub async fn write_pdf_atomic(path: &Path, bytes: &[u8]) -> Result<(), PdfStudyError> {
    let write_err = |e| PdfStudyError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}
