//! Writing pairs as JSON Lines.
//!
//! One object per line, `{"prompt": <question>, "response": <answer>}`.
//! Non-ASCII text is written literally, not `\u`-escaped.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::{Error, QaPair, Result};

#[derive(Serialize)]
struct Record<'a> {
    prompt: &'a str,
    response: &'a str,
}

/// JSON Lines writer for finished pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlWriter;

impl JsonlWriter {
    /// Write `pairs` to `path`, replacing any existing file and creating
    /// missing parent directories.
    pub fn write(&self, pairs: &[QaPair], path: &Path) -> Result<()> {
        let persist = |source| Error::Persist {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(persist)?;
        }

        let file = File::create(path).map_err(persist)?;
        let mut out = BufWriter::new(file);
        self.write_to(pairs, &mut out).map_err(persist)?;
        out.flush().map_err(persist)?;

        info!(pairs = pairs.len(), path = %path.display(), "wrote pairs");
        Ok(())
    }

    /// Write `pairs` to any writer.
    pub fn write_to<W: Write>(&self, pairs: &[QaPair], out: &mut W) -> io::Result<()> {
        for pair in pairs {
            let record = Record {
                prompt: &pair.question,
                response: &pair.answer,
            };
            serde_json::to_writer(&mut *out, &record)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn pairs() -> Vec<QaPair> {
        vec![
            QaPair::new("What is \"X\"?", "X is Y.").unwrap(),
            QaPair::new("什么是Z？", "Z是W。").unwrap(),
        ]
    }

    #[test]
    fn test_one_object_per_line() {
        let mut buf = Vec::new();
        JsonlWriter.write_to(&pairs(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"prompt":"What is \"X\"?","response":"X is Y."}"#);
        assert_eq!(lines[1], r#"{"prompt":"什么是Z？","response":"Z是W。"}"#);
    }

    #[test]
    fn test_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/doc_qa.jsonl");
        JsonlWriter.write(&pairs(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_empty_batch_writes_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty_qa.jsonl");
        JsonlWriter.write(&[], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempdir().unwrap();
        // A directory cannot be opened as a file.
        let err = JsonlWriter.write(&pairs(), dir.path()).unwrap_err();
        assert!(matches!(err, Error::Persist { .. }));
    }
}
