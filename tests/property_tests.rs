//! Property-based tests for chunking and reply parsing.
//!
//! Chunking invariants:
//! - Coverage: chunks start at 0, end at the text length, and leave no gaps
//! - Ordered: chunk starts strictly increase
//! - Bounds: no chunk exceeds the size by more than one character of slack
//! - Termination: any size/overlap pair returns, with or without a stall error
//!
//! Parsing invariants:
//! - Never panics on arbitrary input
//! - Every emitted pair has non-blank, trimmed fields

use proptest::prelude::*;
use docqa::{BoundaryChunker, Chunk, Chunker, Error, ResponseParser};

// =============================================================================
// Test Generators
// =============================================================================

/// Arbitrary text, including multi-byte characters and newlines.
fn arbitrary_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("(?s).{0,600}").unwrap()
}

/// Prose with every boundary marker the chunker looks for.
fn prose_text() -> impl Strategy<Value = String> {
    let separator = prop_oneof![
        4 => Just(" "),
        1 => Just(". "),
        1 => Just("? "),
        1 => Just("! "),
        1 => Just("\n"),
        1 => Just("\n\n"),
    ];
    prop::collection::vec(
        (prop::string::string_regex("[A-Za-z日本語]{1,12}").unwrap(), separator),
        1..150,
    )
    .prop_map(|parts| {
        parts
            .into_iter()
            .map(|(word, sep)| format!("{word}{sep}"))
            .collect::<String>()
    })
}

// =============================================================================
// Invariant Helpers
// =============================================================================

/// Chunks start at 0, end at the text length, and overlap or touch.
fn chunks_cover_input(chunks: &[Chunk], text: &str) -> bool {
    if chunks.is_empty() {
        return text.is_empty();
    }
    if chunks[0].start != 0 || chunks.last().map(|c| c.end) != Some(text.len()) {
        return false;
    }
    chunks.windows(2).all(|w| w[1].start <= w[0].end)
}

fn chunks_strictly_advance(chunks: &[Chunk]) -> bool {
    chunks.windows(2).all(|w| w[0].start < w[1].start && w[0].end < w[1].end)
}

fn chunk_text_matches(chunks: &[Chunk], text: &str) -> bool {
    chunks.iter().all(|c| text.get(c.span()) == Some(c.text.as_str()))
}

fn indices_sequential(chunks: &[Chunk]) -> bool {
    chunks.iter().enumerate().all(|(i, c)| c.index == i)
}

// =============================================================================
// BoundaryChunker Tests
// =============================================================================

proptest! {
    #[test]
    fn boundary_covers_input(text in prose_text(), size in 10usize..300) {
        let chunker = BoundaryChunker::new(size, size / 4).unwrap();
        let chunks = chunker.chunk(&text).unwrap();
        prop_assert!(chunks_cover_input(&chunks, &text));
    }

    #[test]
    fn boundary_arbitrary_text_valid(text in arbitrary_text(), size in 1usize..120) {
        let chunker = BoundaryChunker::new(size, size / 2).unwrap();
        let chunks = chunker.chunk(&text).unwrap();
        prop_assert!(chunks_cover_input(&chunks, &text));
        prop_assert!(chunk_text_matches(&chunks, &text));
        prop_assert!(indices_sequential(&chunks));
    }

    #[test]
    fn boundary_chunks_advance(text in prose_text(), size in 10usize..300) {
        let chunker = BoundaryChunker::new(size, size / 3).unwrap();
        let chunks = chunker.chunk(&text).unwrap();
        prop_assert!(chunks_strictly_advance(&chunks));
    }

    #[test]
    fn boundary_respects_size(
        text in prose_text(),
        size in 5usize..300,
        overlap_frac in 0usize..50
    ) {
        let overlap = size * overlap_frac / 100;
        let chunker = BoundaryChunker::new(size, overlap).unwrap();
        let chunks = chunker.chunk(&text).unwrap();

        // A cut after "\n" takes one extra character.
        for chunk in &chunks {
            prop_assert!(
                chunk.char_len() <= size + 1,
                "Chunk of {} chars exceeds max {}",
                chunk.char_len(),
                size
            );
        }
    }

    #[test]
    fn boundary_always_terminates(
        text in prose_text(),
        size in 1usize..200,
        overlap_seed in 0usize..1000
    ) {
        let overlap = overlap_seed % size;
        let chunker = BoundaryChunker::new(size, overlap).unwrap();
        match chunker.chunk(&text) {
            Ok(chunks) => prop_assert!(chunks_cover_input(&chunks, &text)),
            Err(Error::Stalled { start, end, overlap: o }) => {
                prop_assert_eq!(o, overlap);
                prop_assert!(end <= start + o);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn boundary_deterministic(text in prose_text()) {
        let chunker = BoundaryChunker::new(80, 20).unwrap();
        prop_assert_eq!(chunker.chunk(&text).unwrap(), chunker.chunk(&text).unwrap());
    }
}

// =============================================================================
// ResponseParser Tests
// =============================================================================

/// Replies built from labels, enumerators, and noise.
fn reply_like_text() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        prop::string::string_regex("Q: [a-z ?]{0,20}").unwrap(),
        prop::string::string_regex("A: [a-z .]{0,20}").unwrap(),
        prop::string::string_regex("问：[一-龥？]{0,8}").unwrap(),
        prop::string::string_regex("[0-9]{0,2}\\.? ?[a-z?]{0,10}").unwrap(),
        prop::string::string_regex("[\\[\\]{}\":, a-z]{0,20}").unwrap(),
        Just(String::new()),
    ];
    prop::collection::vec(line, 0..20).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn parser_never_panics(text in arbitrary_text()) {
        let _ = ResponseParser::default().parse(&text);
    }

    #[test]
    fn parser_pairs_are_clean(text in reply_like_text()) {
        for pair in ResponseParser::with_max_enumerator(99).parse(&text) {
            prop_assert!(!pair.question.is_empty());
            prop_assert!(!pair.answer.is_empty());
            prop_assert_eq!(pair.question.trim(), pair.question.as_str());
            prop_assert_eq!(pair.answer.trim(), pair.answer.as_str());
        }
    }

    #[test]
    fn parser_recovers_labelled_pairs(
        pairs in prop::collection::vec(
            (
                prop::string::string_regex("[a-z]{1,8}( [a-z]{1,8}){0,4}").unwrap(),
                prop::string::string_regex("[a-z]{1,8}( [a-z]{1,8}){0,4}").unwrap(),
            ),
            1..8
        )
    ) {
        let reply: Vec<String> = pairs
            .iter()
            .map(|(q, a)| format!("Q: {q}?\nA: {a}."))
            .collect();
        let parsed = ResponseParser::default().parse(&reply.join("\n\n"));

        prop_assert_eq!(parsed.len(), pairs.len());
        for (got, (q, a)) in parsed.iter().zip(&pairs) {
            prop_assert_eq!(&got.question, &format!("{q}?"));
            prop_assert_eq!(&got.answer, &format!("{a}."));
        }
    }
}
