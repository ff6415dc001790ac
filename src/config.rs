//! Run configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! { "model": "llama3:8b", "chunk_size": 1500, "overlap": 300 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::generate::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::parse::DEFAULT_MAX_ENUMERATOR;
use crate::source::default_extensions;
use crate::{BoundaryChunker, Error, PromptTemplate, ResponseParser, Result};

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap in characters.
pub const DEFAULT_OVERLAP: usize = 200;

/// Default per-request timeout for the generation endpoint.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Settings for one run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Generation endpoint URL.
    pub api_url: String,
    /// Model name sent with each request.
    pub model: String,
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in characters.
    pub overlap: usize,
    /// Directory the `_qa.jsonl` file is written to.
    pub output_dir: PathBuf,
    /// Accepted input extensions, with leading dots.
    pub extensions: Vec<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Largest `N. ` enumerator treated as a question start.
    pub max_enumerator: u32,
    /// File holding a custom prompt template; the built-in one if unset.
    pub prompt_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
            output_dir: PathBuf::from("."),
            extensions: default_extensions(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_enumerator: DEFAULT_MAX_ENUMERATOR,
            prompt_file: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let invalid = |reason: String| Error::Config {
            path: path.to_path_buf(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))
    }

    /// The chunker these settings describe.
    pub fn chunker(&self) -> Result<BoundaryChunker> {
        BoundaryChunker::new(self.chunk_size, self.overlap)
    }

    /// The prompt template, read from `prompt_file` when set.
    pub fn prompt(&self) -> Result<PromptTemplate> {
        match &self.prompt_file {
            Some(path) => {
                let template = fs::read_to_string(path).map_err(|source| Error::Read {
                    path: path.clone(),
                    source,
                })?;
                PromptTemplate::new(template)
            }
            None => Ok(PromptTemplate::default()),
        }
    }

    /// The response parser these settings describe.
    pub fn parser(&self) -> ResponseParser {
        ResponseParser::with_max_enumerator(self.max_enumerator)
    }
}
