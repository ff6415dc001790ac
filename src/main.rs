//! `docqa` command line: one document in, one `_qa.jsonl` file out.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use docqa::{OllamaClient, Pipeline, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(about = "Generate question-answer JSONL from a text or markdown document", long_about = None)]
struct Cli {
    /// Input document (.txt, .md, .text, .markdown)
    #[arg(long)]
    file: PathBuf,

    /// Maximum chunk size in characters [default: 1000]
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Overlap between chunks in characters [default: 200]
    #[arg(long)]
    overlap: Option<usize>,

    /// Directory for the <name>_qa.jsonl output [default: .]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// JSON settings file; flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generation endpoint
    #[arg(long)]
    api_url: Option<String>,

    /// Model name
    #[arg(long)]
    model: Option<String>,

    /// Prompt template file containing a {document} placeholder
    #[arg(long)]
    prompt_file: Option<PathBuf>,

    /// Largest "N. " enumerator treated as a question [default: 3]
    #[arg(long)]
    max_enumerator: Option<u32>,

    /// Request timeout in seconds [default: 300]
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(v) = self.chunk_size {
            settings.chunk_size = v;
        }
        if let Some(v) = self.overlap {
            settings.overlap = v;
        }
        if let Some(v) = &self.output_dir {
            settings.output_dir.clone_from(v);
        }
        if let Some(v) = &self.api_url {
            settings.api_url.clone_from(v);
        }
        if let Some(v) = &self.model {
            settings.model.clone_from(v);
        }
        if let Some(v) = &self.prompt_file {
            settings.prompt_file = Some(v.clone());
        }
        if let Some(v) = self.max_enumerator {
            settings.max_enumerator = v;
        }
        if let Some(v) = self.timeout_secs {
            settings.timeout_secs = v;
        }
        Ok(settings)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "docqa=debug" } else { "docqa=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = cli.settings()?;
    let chunker = settings.chunker().context("Invalid chunking settings")?;
    let prompt = settings.prompt().context("Could not load prompt template")?;

    let client = OllamaClient::new(
        &settings.api_url,
        &settings.model,
        Duration::from_secs(settings.timeout_secs),
    )
    .context("Could not build HTTP client")?;
    tracing::info!(url = client.url(), model = client.model(), "using generation endpoint");

    let pipeline = Pipeline::new(chunker, client, prompt)
        .with_parser(settings.parser())
        .with_extensions(settings.extensions.clone());

    let output = pipeline
        .process_file(&cli.file, &settings.output_dir)
        .with_context(|| format!("Failed to process {}", cli.file.display()))?;

    println!("✅ Pairs saved to {}", output.display());
    Ok(())
}
