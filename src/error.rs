//! Error types for docqa.
//!
//! Only fatal conditions live here. Per-chunk generation failures are
//! [`GenerationError`](crate::GenerationError) and never leave the pipeline;
//! parse failures are not errors at all (they produce an empty batch).

use std::path::PathBuf;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap exceeds chunk size.
    #[error("overlap {overlap} exceeds chunk size {size}")]
    OverlapExceedsSize {
        /// The chunk size.
        size: usize,
        /// The overlap that exceeded the size.
        overlap: usize,
    },

    /// A boundary-adjusted chunk was shorter than the overlap, so the next
    /// window would not start past the current one.
    #[error("chunking stalled at {start}..{end}: overlap {overlap} does not leave room to advance")]
    Stalled {
        /// Character offset where the stalled chunk starts.
        start: usize,
        /// Character offset where the stalled chunk ends.
        end: usize,
        /// The configured overlap.
        overlap: usize,
    },

    /// The input document does not exist.
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// The input document has an extension we do not read.
    #[error("unsupported file extension {ext:?} for {}; supported: {supported}", path.display())]
    UnsupportedExtension {
        /// The offending path.
        path: PathBuf,
        /// Its extension (with leading dot, empty if none).
        ext: String,
        /// Comma-separated list of accepted extensions.
        supported: String,
    },

    /// Reading the input document failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A prompt template without the `{document}` placeholder.
    #[error("prompt template has no {{document}} placeholder")]
    MissingPlaceholder,

    /// A configuration file could not be loaded.
    #[error("invalid configuration in {}: {reason}", path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Writing the output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Persist {
        /// The output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Result type for docqa operations.
pub type Result<T> = std::result::Result<T, Error>;
