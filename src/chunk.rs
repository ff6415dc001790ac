//! One window of a document, as handed to the generator.

/// A window of text with its position in the source document.
///
/// Chunks are transient: produced in order by a [`Chunker`](crate::Chunker),
/// each one is rendered into a prompt once and then dropped. Only `text`
/// reaches the generator; the span and index feed progress logs and let
/// callers map a window back onto the document.
///
/// `start` and `end` are byte offsets, derived from the character-counted
/// window, so they always land on character boundaries:
///
/// ```rust
/// use docqa::{BoundaryChunker, Chunker};
///
/// let doc = "第一段。\n\n第二段。";
/// let chunks = BoundaryChunker::no_overlap(6).unwrap().chunk(doc).unwrap();
///
/// for chunk in &chunks {
///     assert_eq!(&doc[chunk.span()], chunk.text);
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The window text.
    pub text: String,
    /// Byte offset of the first character in the document.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Position in the chunk sequence, from 0.
    pub index: usize,
}

impl Chunk {
    pub(crate) fn new(text: &str, start: usize, end: usize, index: usize) -> Self {
        Self {
            text: text.to_string(),
            start,
            end,
            index,
        }
    }

    /// Window length in characters, the unit chunk sizes are configured in.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The byte range of this window in the document.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_scalars() {
        let chunk = Chunk::new("日本語", 0, 9, 0);
        assert_eq!(chunk.char_len(), 3);
        assert_eq!(chunk.span().len(), 9);
    }
}
