//! `improve-cv`: rewrite a résumé PDF into a styled one and print
//! `{"file": "<path>"}`.

use anyhow::{Context, Result};
use clap::Parser;
use pdfstudy::cli::{self, CommonArgs, LlmArgs};
use pdfstudy::{improve_cv, resolve_provider, ChromeRenderer, CvOutput, ProviderGenerator, StudyConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// Rewrite a CV with an LLM and render it to PDF.
#[derive(Parser, Debug)]
#[command(
    name = "improve-cv",
    version,
    arg_required_else_help = true,
    after_help = "Set CHROME_PATH to choose the Chrome/Chromium binary used for rendering."
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    llm: LlmArgs,

    /// Directory for Improved-CV.pdf. Default: <temp dir>/improvedCvs.
    #[arg(long, env = "PDFSTUDY_CV_DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    cli::init_logging(cli.common.verbose);
    cli::finish(run(&cli).await)
}

async fn run(cli: &Cli) -> Result<CvOutput> {
    let mut builder = cli.llm.apply(cli.common.apply(StudyConfig::builder()));
    if let Some(ref dir) = cli.output_dir {
        builder = builder.cv_output_dir(dir);
    }
    let config = builder.build().context("Invalid configuration")?;

    let provider = resolve_provider(&config)?;
    let generator = ProviderGenerator::uncapped(provider, &config);
    let renderer = ChromeRenderer::from_env();

    Ok(improve_cv(&cli.common.input, &config, &generator, &renderer).await?)
}
