//! Reading input documents and naming output files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Extensions read by default.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = [".txt", ".md", ".text", ".markdown"];

/// Suffix appended to the input stem to name the output file.
pub const OUTPUT_SUFFIX: &str = "_qa.jsonl";

/// Read a UTF-8 document after checking it exists and has an accepted
/// extension. Extensions are compared case-insensitively and include the
/// leading dot.
pub fn read_document(path: &Path, extensions: &[String]) -> Result<String> {
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    if !extensions.iter().any(|allowed| allowed.to_lowercase() == ext) {
        return Err(Error::UnsupportedExtension {
            path: path.to_path_buf(),
            ext,
            supported: extensions.join(", "),
        });
    }

    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// `<output_dir>/<input stem>_qa.jsonl`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}{OUTPUT_SUFFIX}"))
}

/// The default extension list as owned strings.
pub fn default_extensions() -> Vec<String> {
    SUPPORTED_EXTENSIONS.iter().map(|&s| s.to_string()).collect()
}
