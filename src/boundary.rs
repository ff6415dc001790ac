//! Boundary-aware chunking with overlap.
//!
//! Fixed-size windows, except that a window which does not reach the end of
//! the document is pulled back to the nearest paragraph or sentence break,
//! provided the break lies in the second half of the window.
//!
//! ## How It Works
//!
//! ```text
//! size = 100, overlap = 20, midpoint = start + 50
//!
//! 1. candidate end = min(start + 100, len)
//! 2. last "\n\n" in [start, end) past the midpoint?   end = pos + 2
//! 3. else last of ". " "? " "! " "\n" past midpoint?  end = pos + 2
//! 4. else keep the candidate (hard cut)
//! 5. next start = end - overlap
//! ```
//!
//! Every marker is treated as two characters wide, so a cut after `"\n"`
//! also takes the character that follows it.
//!
//! Sizes are counted in characters, not bytes, so CJK text gets windows of
//! the same visual length as ASCII text.
//!
//! ## Termination
//!
//! A hard cut always advances by `size - overlap`. A pulled-back cut can be as
//! short as `size / 2 + 3` characters, so an overlap larger than that can stop
//! the window from moving forward. That case is reported as
//! [`Error::Stalled`] instead of looping.

use crate::{Chunk, Chunker, Error, Result};

/// Paragraph separator, preferred over any sentence break.
const PARAGRAPH: &str = "\n\n";

/// Sentence and line breaks, searched independently; the rightmost wins.
const SENTENCE_BREAKS: [&str; 4] = [". ", "? ", "! ", "\n"];

/// Width every boundary marker consumes when a cut is placed after it.
const MARKER_WIDTH: usize = 2;

/// Chunker that prefers paragraph, then sentence, boundaries.
///
/// ## Example
///
/// ```rust
/// use docqa::{BoundaryChunker, Chunker};
///
/// let chunker = BoundaryChunker::new(100, 20).unwrap();
/// let text = format!("{}\n\n{}", "a".repeat(60), "b".repeat(60));
/// let chunks = chunker.chunk(&text).unwrap();
///
/// // The paragraph break at 60 is past the midpoint (50), so the first
/// // chunk ends right after it.
/// assert_eq!(chunks[0].text, format!("{}\n\n", "a".repeat(60)));
/// assert_eq!(chunks.last().unwrap().end, text.len());
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryChunker {
    size: usize,
    overlap: usize,
}

impl BoundaryChunker {
    /// Create a new boundary-aware chunker.
    ///
    /// # Arguments
    ///
    /// * `size` - Maximum chunk size in characters
    /// * `overlap` - Characters to overlap between adjacent chunks
    ///
    /// # Errors
    ///
    /// Returns an error if `size == 0` or `overlap >= size`.
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidChunkSize(size));
        }
        if overlap >= size {
            return Err(Error::OverlapExceedsSize { size, overlap });
        }
        Ok(Self { size, overlap })
    }

    /// Create a chunker with no overlap.
    pub fn no_overlap(size: usize) -> Result<Self> {
        Self::new(size, 0)
    }

    /// Pull `end` back to a paragraph or sentence break past the midpoint.
    ///
    /// `offsets` maps character positions to byte offsets; `start` and `end`
    /// are character positions.
    fn adjust_end(&self, text: &str, offsets: &[usize], start: usize, end: usize) -> usize {
        let base = offsets[start];
        let window = &text[base..offsets[end]];
        let midpoint = start + self.size / 2;

        // Markers start with an ASCII byte, so every hit is a char boundary.
        let to_char = |rel: usize| offsets.partition_point(|&b| b < base + rel);

        if let Some(pos) = window.rfind(PARAGRAPH).map(to_char) {
            if pos > midpoint {
                return pos + MARKER_WIDTH;
            }
        }

        let sentence = SENTENCE_BREAKS
            .iter()
            .filter_map(|&marker| window.rfind(marker))
            .max()
            .map(to_char);

        match sentence {
            Some(pos) if pos > midpoint => pos + MARKER_WIDTH,
            _ => end,
        }
    }
}

impl Chunker for BoundaryChunker {
    fn chunk(&self, text: &str) -> Result<Vec<Chunk>> {
        if text.is_empty() {
            return Ok(vec![]);
        }

        // Byte offset of every character, plus the end of the text.
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let len = offsets.len() - 1;

        let mut chunks = Vec::with_capacity(self.estimate_chunks(len));
        let mut start = 0;

        while start < len {
            let mut end = (start + self.size).min(len);
            if end < len {
                end = self.adjust_end(text, &offsets, start, end);
            }

            let (from, to) = (offsets[start], offsets[end]);
            chunks.push(Chunk::new(&text[from..to], from, to, chunks.len()));

            if end == len {
                break;
            }

            start = match end.checked_sub(self.overlap) {
                Some(next) if next > start => next,
                _ => {
                    return Err(Error::Stalled {
                        start,
                        end,
                        overlap: self.overlap,
                    })
                }
            };
        }

        Ok(chunks)
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        if text_len == 0 {
            return 0;
        }
        text_len.div_ceil(self.size - self.overlap)
    }
}

/// Split `content` into overlapping windows of at most `size` characters
/// (plus boundary slack), returning just the text of each window.
///
/// ```rust
/// let parts = docqa::split("One. Two. Three.", 1000, 200).unwrap();
/// assert_eq!(parts, vec!["One. Two. Three."]);
/// ```
pub fn split(content: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
    let chunks = BoundaryChunker::new(size, overlap)?.chunk(content)?;
    Ok(chunks.into_iter().map(|c| c.text).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let chunker = BoundaryChunker::new(10, 2).unwrap();
        assert!(chunker.chunk("").unwrap().is_empty());
    }

    #[test]
    fn test_text_smaller_than_chunk() {
        let chunker = BoundaryChunker::new(100, 20).unwrap();
        let chunks = chunker.chunk("small").unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "small");
    }

    #[test]
    fn test_prefers_paragraph_break() {
        let chunker = BoundaryChunker::no_overlap(100).unwrap();
        let text = format!("{}\n\n{}", "a".repeat(60), "b".repeat(60));
        let chunks = chunker.chunk(&text).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, format!("{}\n\n", "a".repeat(60)));
        assert_eq!(chunks[1].text, "b".repeat(60));
    }

    #[test]
    fn test_early_paragraph_falls_back_to_sentence() {
        let chunker = BoundaryChunker::no_overlap(100).unwrap();
        let text = format!(
            "{}\n\n{}. {}",
            "a".repeat(20),
            "b".repeat(40),
            "c".repeat(60)
        );
        let chunks = chunker.chunk(&text).unwrap();

        assert_eq!(chunks[0].end, 64);
        assert!(chunks[0].text.ends_with(". "));
        assert_eq!(chunks[1].text, "c".repeat(60));
    }

    #[test]
    fn test_newline_cut_takes_following_char() {
        let chunker = BoundaryChunker::no_overlap(100).unwrap();
        let text = format!("{}\n{}", "a".repeat(70), "b".repeat(70));
        let chunks = chunker.chunk(&text).unwrap();

        assert_eq!(chunks[0].text, format!("{}\nb", "a".repeat(70)));
    }

    #[test]
    fn test_hard_cut_without_boundaries() {
        let chunker = BoundaryChunker::new(100, 20).unwrap();
        let text = "x".repeat(250);
        let chunks = chunker.chunk(&text).unwrap();

        let spans: Vec<_> = chunks.iter().map(Chunk::span).collect();
        assert_eq!(spans, vec![0..100, 80..180, 160..250]);
    }

    #[test]
    fn test_sizes_count_characters() {
        let chunker = BoundaryChunker::new(100, 10).unwrap();
        let text = "日".repeat(250);
        let chunks = chunker.chunk(&text).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].char_len(), 100);
        assert_eq!(chunks[1].start, 90 * '日'.len_utf8());
        for chunk in &chunks {
            assert_eq!(&text[chunk.span()], chunk.text);
        }
    }

    #[test]
    fn test_stall_is_reported() {
        let chunker = BoundaryChunker::new(100, 90).unwrap();
        let text = format!("{}. {}", "a".repeat(60), "b".repeat(100));

        match chunker.chunk(&text) {
            Err(Error::Stalled { start, end, overlap }) => {
                assert_eq!((start, end, overlap), (0, 62, 90));
            }
            other => panic!("expected stall, got {other:?}"),
        }
    }

    #[test]
    fn test_split_returns_text() {
        let parts = split(&"y".repeat(30), 10, 0).unwrap();
        assert_eq!(parts, vec!["y".repeat(10); 3]);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            BoundaryChunker::new(0, 0),
            Err(Error::InvalidChunkSize(0))
        ));
    }

    #[test]
    fn test_overlap_exceeds_size_rejected() {
        assert!(matches!(
            BoundaryChunker::new(10, 10),
            Err(Error::OverlapExceedsSize { size: 10, overlap: 10 })
        ));
    }
}
