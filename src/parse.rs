//! Recovering question-answer pairs from free-form model output.
//!
//! Models asked for "question/answer pairs" reply in whatever shape they like.
//! The parser runs an ordered list of extraction strategies and keeps the
//! first one that finds anything:
//!
//! 1. [`JsonArray`]: the reply is a JSON array of `{"question", "answer"}`
//!    objects.
//! 2. [`LineScan`]: the reply is lines of labelled or numbered questions,
//!    each followed by its answer lines.
//!
//! ```text
//! Q: What is X?              <- question start (label)
//! A: X is Y.                 <- answer (label stripped)
//! It is also Z.              <- answer continues
//! 2. Why does X matter?      <- question start (enumerator + '?')
//! Because of W.
//! ```
//!
//! Parsing never fails. A reply with nothing recognizable yields an empty
//! batch, which the pipeline treats as "no pairs from this chunk".

use serde::Deserialize;
use tracing::debug;

use crate::QaPair;

/// Labels that open a question line, checked in order.
pub const QUESTION_LABELS: [&str; 4] = ["Q:", "问题:", "Question:", "问："];

/// Labels that open an answer line, checked in order.
pub const ANSWER_LABELS: [&str; 4] = ["A:", "答案:", "Answer:", "答："];

/// Largest numeric enumerator (`"3. "`) accepted as a question start by default.
pub const DEFAULT_MAX_ENUMERATOR: u32 = 3;

/// One way of pulling pairs out of a raw reply.
pub trait ExtractStrategy: Send + Sync {
    /// Short name used in logs and [`Parsed::strategy`].
    fn name(&self) -> &'static str;

    /// Extract pairs, or `None` when this strategy found nothing.
    ///
    /// Implementations never return `Some` with an empty vector.
    fn extract(&self, raw: &str) -> Option<Vec<QaPair>>;
}

/// The result of running a [`ResponseParser`] over one reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    /// Extracted pairs in reply order.
    pub pairs: Vec<QaPair>,
    /// Name of the strategy that produced them, `None` if nothing matched.
    pub strategy: Option<&'static str>,
}

impl Parsed {
    /// Whether no pairs were recovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A JSON array of `{"question": ..., "answer": ...}` records.
///
/// Only tried when the trimmed reply starts with `[` and ends with `]`.
/// Records missing either field, with non-string fields, or with blank text
/// are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonArray;

#[derive(Deserialize)]
struct Record {
    question: String,
    answer: String,
}

impl ExtractStrategy for JsonArray {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extract(&self, raw: &str) -> Option<Vec<QaPair>> {
        let trimmed = raw.trim();
        if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
            return None;
        }

        let items: Vec<serde_json::Value> = match serde_json::from_str(trimmed) {
            Ok(items) => items,
            Err(e) => {
                debug!(error = %e, "bracketed reply is not a JSON array");
                return None;
            }
        };

        let pairs: Vec<QaPair> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<Record>(item).ok())
            .filter_map(|r| QaPair::new(&r.question, &r.answer))
            .collect();

        (!pairs.is_empty()).then_some(pairs)
    }
}

/// Line-oriented scan for labelled or numbered questions.
///
/// A line starts a question when, after trimming, it
///
/// * begins with a question label (`Q:`, `Question:`, ...), or
/// * begins with an enumerator `N. ` with `1 <= N <= max_enumerator` and
///   contains a `?`.
///
/// Every following line up to the next question start is answer text; a
/// leading answer label is stripped, and the trimmed lines (blank ones
/// included) are joined with single spaces.
///
/// ```rust
/// use docqa::parse::{ExtractStrategy, LineScan};
///
/// let reply = "1. What is X?\nX is Y.\n2. What is Z?\nZ is W.";
/// let pairs = LineScan::default().extract(reply).unwrap();
///
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[1].question, "What is Z?");
/// ```
#[derive(Debug, Clone)]
pub struct LineScan {
    question_labels: Vec<String>,
    answer_labels: Vec<String>,
    max_enumerator: u32,
}

impl Default for LineScan {
    fn default() -> Self {
        Self {
            question_labels: QUESTION_LABELS.iter().map(|&s| s.to_string()).collect(),
            answer_labels: ANSWER_LABELS.iter().map(|&s| s.to_string()).collect(),
            max_enumerator: DEFAULT_MAX_ENUMERATOR,
        }
    }
}

impl LineScan {
    /// Accept enumerators `1. ` through `max. ` as question starts.
    ///
    /// `0` disables enumerated questions entirely.
    #[must_use]
    pub fn with_max_enumerator(mut self, max: u32) -> Self {
        self.max_enumerator = max;
        self
    }

    /// Replace the question labels.
    #[must_use]
    pub fn with_question_labels(mut self, labels: &[&str]) -> Self {
        self.question_labels = labels.iter().map(|&s| s.to_string()).collect();
        self
    }

    /// Replace the answer labels.
    #[must_use]
    pub fn with_answer_labels(mut self, labels: &[&str]) -> Self {
        self.answer_labels = labels.iter().map(|&s| s.to_string()).collect();
        self
    }

    /// The question text if `line` starts a question.
    fn question_start<'a>(&self, line: &'a str) -> Option<&'a str> {
        if let Some(rest) = strip_label(line, &self.question_labels) {
            return Some(rest.trim());
        }
        if line.contains('?') {
            return self.strip_enumerator(line).map(str::trim);
        }
        None
    }

    /// The text after a leading `N. `, if `N` is within bounds and has no
    /// leading zero.
    fn strip_enumerator<'a>(&self, line: &'a str) -> Option<&'a str> {
        let digits = line.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || line.starts_with('0') {
            return None;
        }
        let rest = line[digits..].strip_prefix(". ")?;
        let n: u32 = line[..digits].parse().ok()?;
        (1..=self.max_enumerator).contains(&n).then_some(rest)
    }

    fn answer_text<'a>(&self, line: &'a str) -> &'a str {
        strip_label(line, &self.answer_labels).unwrap_or(line).trim()
    }
}

fn strip_label<'a>(line: &'a str, labels: &[String]) -> Option<&'a str> {
    labels.iter().find_map(|label| line.strip_prefix(label.as_str()))
}

impl ExtractStrategy for LineScan {
    fn name(&self) -> &'static str {
        "lines"
    }

    fn extract(&self, raw: &str) -> Option<Vec<QaPair>> {
        let lines: Vec<&str> = raw.split('\n').map(str::trim).collect();
        let mut pairs = Vec::new();

        // `i` seeks the next question; `j` collects its answer.
        let mut i = 0;
        while i < lines.len() {
            let Some(question) = self.question_start(lines[i]) else {
                i += 1;
                continue;
            };

            let mut answer = Vec::new();
            let mut j = i + 1;
            while j < lines.len() && self.question_start(lines[j]).is_none() {
                answer.push(self.answer_text(lines[j]));
                j += 1;
            }

            if let Some(pair) = QaPair::new(question, &answer.join(" ")) {
                pairs.push(pair);
            }
            i = j;
        }

        (!pairs.is_empty()).then_some(pairs)
    }
}

/// Ordered list of extraction strategies; the first non-empty result wins.
///
/// ```rust
/// use docqa::ResponseParser;
///
/// let parser = ResponseParser::default();
/// let pairs = parser.parse(r#"[{"question":"Q1","answer":"A1"}]"#);
///
/// assert_eq!(pairs.len(), 1);
/// assert_eq!(pairs[0].answer, "A1");
/// ```
pub struct ResponseParser {
    strategies: Vec<Box<dyn ExtractStrategy>>,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::with_max_enumerator(DEFAULT_MAX_ENUMERATOR)
    }
}

impl std::fmt::Debug for ResponseParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("ResponseParser")
            .field("strategies", &names)
            .finish()
    }
}

impl ResponseParser {
    /// Build a parser from an explicit strategy list, tried in order.
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn ExtractStrategy>>) -> Self {
        Self { strategies }
    }

    /// JSON first, then line scan with the given enumerator bound.
    #[must_use]
    pub fn with_max_enumerator(max: u32) -> Self {
        Self::new(vec![
            Box::new(JsonArray),
            Box::new(LineScan::default().with_max_enumerator(max)),
        ])
    }

    /// Run the strategies and report which one matched.
    pub fn extract(&self, raw: &str) -> Parsed {
        for strategy in &self.strategies {
            if let Some(pairs) = strategy.extract(raw) {
                debug!(strategy = strategy.name(), pairs = pairs.len(), "parsed reply");
                return Parsed {
                    pairs,
                    strategy: Some(strategy.name()),
                };
            }
        }
        Parsed::default()
    }

    /// Extract pairs from a raw reply; empty when nothing is recognized.
    pub fn parse(&self, raw: &str) -> Vec<QaPair> {
        self.extract(raw).pairs
    }
}
