//! `extract-text`: print the raw text of a PDF as `{"text": "..."}`.

use anyhow::Result;
use clap::Parser;
use pdfstudy::cli::{self, CommonArgs};
use pdfstudy::{extract_text, StudyConfig, TextOutput};
use std::process::ExitCode;

/// Extract the text of a PDF file or URL.
#[derive(Parser, Debug)]
#[command(name = "extract-text", version, arg_required_else_help = true)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    cli::init_logging(cli.common.verbose);
    cli::finish(run(&cli).await)
}

async fn run(cli: &Cli) -> Result<TextOutput> {
    let config = cli.common.apply(StudyConfig::builder()).build()?;
    Ok(extract_text(&cli.common.input, &config).await?)
}
