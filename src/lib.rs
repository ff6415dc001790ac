//! # docqa
//!
//! Turn plain-text and markdown documents into question-answer training
//! records.
//!
//! ## The Problem
//!
//! A language model can write good question-answer pairs about a passage, but
//! not about a whole book: the document has to be cut into windows that fit
//! the model's context, and the model's reply has to be turned back into
//! structured records. Both halves are fiddly.
//!
//! - A window cut mid-sentence gives the model half a thought
//! - Windows need some overlap, or facts on the seam are lost
//! - Models ignore output format instructions some of the time
//!
//! ## Chunking
//!
//! [`BoundaryChunker`] produces fixed-size windows with overlap, but pulls
//! each cut back to a paragraph break, or failing that a sentence break, when
//! one exists in the second half of the window.
//!
//! ```text
//! size = 100, overlap = 20
//!
//! |<------------------ 100 ------------------>|
//! | ...sentence.  ...sentence.\n\n ...sente|nce...
//!                  midpoint  ^   ^cut here  ^ raw end
//! ```
//!
//! ## Parsing
//!
//! [`ResponseParser`] tries a JSON array of `{"question","answer"}` objects
//! first, then falls back to scanning lines for `Q:` / `A:` style labels
//! (English and Chinese) and numbered questions.
//!
//! ## Quick Start
//!
//! ```rust
//! use docqa::{BoundaryChunker, Chunker, ResponseParser};
//!
//! let text = "First paragraph about X.\n\nSecond paragraph about Y.";
//!
//! let chunker = BoundaryChunker::new(1000, 200).unwrap();
//! let chunks = chunker.chunk(text).unwrap();
//! assert_eq!(chunks.len(), 1);
//!
//! let parser = ResponseParser::default();
//! let pairs = parser.parse("Q: What is X?\nA: The first topic.");
//! assert_eq!(pairs[0].question, "What is X?");
//! ```
//!
//! ## End to End
//!
//! [`Pipeline`] wires a chunker, a [`Generator`] (e.g. [`OllamaClient`] with
//! the `http` feature) and a parser together, and [`JsonlWriter`] persists
//! the result as `{"prompt", "response"}` lines.
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use docqa::{BoundaryChunker, OllamaClient, Pipeline, PromptTemplate};
//!
//! let client = OllamaClient::new(docqa::generate::DEFAULT_API_URL, "qwen2.5:latest", Duration::from_secs(300))?;
//! let pipeline = Pipeline::new(BoundaryChunker::new(1000, 200)?, client, PromptTemplate::default());
//! let written = pipeline.process_file("notes.md".as_ref(), ".".as_ref())?;
//! ```

mod boundary;
mod chunk;
mod error;
mod qa;
mod sink;

pub mod config;
pub mod generate;
pub mod parse;
pub mod pipeline;
pub mod source;

pub use boundary::{split, BoundaryChunker};
pub use chunk::Chunk;
pub use config::Settings;
pub use error::{Error, Result};
pub use generate::{GenerationError, Generator, PromptTemplate};
pub use parse::{Parsed, ResponseParser};
pub use pipeline::{Pipeline, Report};
pub use qa::QaPair;
pub use sink::JsonlWriter;

#[cfg(feature = "http")]
pub use generate::OllamaClient;

/// A document chunking strategy.
///
/// The pipeline holds a `Box<dyn Chunker>`, so alternative strategies can be
/// swapped in:
///
/// ```rust
/// use docqa::{BoundaryChunker, Chunker};
///
/// fn count(chunker: &dyn Chunker, text: &str) -> usize {
///     chunker.chunk(text).map(|c| c.len()).unwrap_or(0)
/// }
///
/// let chunker = BoundaryChunker::new(100, 20).unwrap();
/// assert_eq!(count(&chunker, "Hello world. This is a test."), 1);
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// Each [`Chunk`] carries its text and byte offsets in the original
    /// document.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured window cannot make progress.
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>>;

    /// Estimate the number of chunks for a given text length in characters.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        // Conservative default
        (text_len / 500).max(1)
    }
}
