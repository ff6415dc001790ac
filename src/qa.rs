//! Question-answer pairs.

use serde::{Deserialize, Serialize};

/// One generated training record.
///
/// Pairs keep generation order and are never deduplicated: the same question
/// produced from two overlapping chunks is kept twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    /// The question text.
    pub question: String,
    /// The answer text.
    pub answer: String,
}

impl QaPair {
    /// Build a pair from trimmed question and answer text.
    ///
    /// Returns `None` when either side is empty after trimming.
    pub fn new(question: &str, answer: &str) -> Option<Self> {
        let (question, answer) = (question.trim(), answer.trim());
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Self {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}
