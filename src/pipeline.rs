//! Document to pairs, one chunk at a time.
//!
//! ```text
//! document ──chunk──▶ [c0, c1, ...] ──generate──▶ raw reply ──parse──▶ pairs
//!                                                                        │
//!                         <stem>_qa.jsonl ◀──write── accumulated pairs ◀─┘
//! ```
//!
//! Chunks are processed strictly in document order. A chunk whose generation
//! call fails contributes no pairs and the run moves on; only configuration
//! and persistence errors stop it.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::generate::{Generator, PromptTemplate};
use crate::source::{self, default_extensions};
use crate::{Chunker, JsonlWriter, QaPair, ResponseParser, Result};

/// Outcome of running the pipeline over one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// All pairs, in chunk order then reply order.
    pub pairs: Vec<QaPair>,
    /// Number of chunks the document was split into.
    pub chunks: usize,
    /// Chunks whose generation call failed.
    pub failed_chunks: usize,
    /// Chunks whose reply parsed to nothing.
    pub empty_chunks: usize,
}

/// Chunker, generator, and parser wired together.
pub struct Pipeline<G> {
    chunker: Box<dyn Chunker>,
    generator: G,
    prompt: PromptTemplate,
    parser: ResponseParser,
    extensions: Vec<String>,
    writer: JsonlWriter,
}

impl<G: Generator> Pipeline<G> {
    /// Build a pipeline with the default parser and extension list.
    pub fn new(chunker: impl Chunker + 'static, generator: G, prompt: PromptTemplate) -> Self {
        Self {
            chunker: Box::new(chunker),
            generator,
            prompt,
            parser: ResponseParser::default(),
            extensions: default_extensions(),
            writer: JsonlWriter,
        }
    }

    /// Replace the response parser.
    #[must_use]
    pub fn with_parser(mut self, parser: ResponseParser) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the accepted input extensions (with leading dots).
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Chunk `text`, generate and parse each chunk, and collect the pairs.
    ///
    /// # Errors
    ///
    /// Only chunking can fail; generation failures are counted in the report.
    pub fn run(&self, text: &str) -> Result<Report> {
        let chunks = self.chunker.chunk(text)?;
        let total = chunks.len();
        info!(chunks = total, "split document");

        let mut report = Report {
            chunks: total,
            ..Report::default()
        };

        for chunk in &chunks {
            let n = chunk.index + 1;
            info!("processing chunk {n}/{total}");

            let raw = match self.generator.generate(&chunk.text, &self.prompt) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(chunk = n, error = %e, "generation failed, skipping chunk");
                    report.failed_chunks += 1;
                    continue;
                }
            };

            let parsed = self.parser.extract(&raw);
            if parsed.is_empty() {
                warn!(chunk = n, reply_len = raw.len(), "no pairs recognized in reply");
                report.empty_chunks += 1;
            }
            info!(chunk = n, pairs = parsed.pairs.len(), "parsed chunk");
            report.pairs.extend(parsed.pairs);
        }

        Ok(report)
    }

    /// Read `input`, run the pipeline, and write `<stem>_qa.jsonl` into
    /// `output_dir`. Returns the path written.
    ///
    /// # Errors
    ///
    /// Missing or unsupported input fails before any chunk is generated.
    /// Failure to write the output is returned after the pairs are built.
    pub fn process_file(&self, input: &Path, output_dir: &Path) -> Result<PathBuf> {
        info!(path = %input.display(), "reading document");
        let text = source::read_document(input, &self.extensions)?;

        let report = self.run(&text)?;
        info!(
            pairs = report.pairs.len(),
            chunks = report.chunks,
            failed = report.failed_chunks,
            "generated pairs"
        );

        let output = source::output_path(input, output_dir);
        self.writer
            .write(&report.pairs, &output)
            .inspect_err(|e| error!(error = %e, pairs = report.pairs.len(), "could not save pairs"))?;
        Ok(output)
    }
}
