//! Text generation: prompt templates and the endpoint client.
//!
//! The pipeline only sees the [`Generator`] trait. [`OllamaClient`] is the
//! HTTP implementation (feature `http`), speaking the non-streaming
//! `/api/generate` protocol:
//!
//! ```text
//! POST /api/generate  {"model": "...", "prompt": "...", "stream": false}
//! 200 OK              {"response": "<generated text>", ...}
//! ```

use crate::{Error, Result};

/// Placeholder replaced with the chunk text.
pub const PLACEHOLDER: &str = "{document}";

/// Default endpoint for a local Ollama server.
pub const DEFAULT_API_URL: &str = "http://localhost:11434/api/generate";

/// Default model name.
pub const DEFAULT_MODEL: &str = "qwen2.5:latest";

const DEFAULT_TEMPLATE: &str = "\
Read the document below and write 5 high-quality question-answer pairs about it.
Questions should cover the important concepts, facts and arguments in the document.
Answers should be accurate, complete and informative.

Document:
{document}

Write the pairs in exactly this format, with a blank line between pairs:

Q: <question>
A: <answer>

Q: <question>
A: <answer>
";

/// A per-chunk generation failure.
///
/// These never abort a run: the pipeline logs them and counts the chunk as
/// having produced no pairs.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for the log.
        body: String,
    },

    /// The reply had no `response` text field.
    #[error("reply has no response text")]
    MissingResponse,

    /// The request could not be sent or the reply could not be read.
    #[error("transport error: {0}")]
    Transport(String),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Transport(e.to_string())
    }
}

/// An instruction template with a single `{document}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Wrap a template string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPlaceholder`] if `{document}` does not appear.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(PLACEHOLDER) {
            return Err(Error::MissingPlaceholder);
        }
        Ok(Self { template })
    }

    /// Substitute the chunk text into the template.
    ///
    /// ```rust
    /// use docqa::PromptTemplate;
    ///
    /// let prompt = PromptTemplate::new("Summarize: {document}").unwrap();
    /// assert_eq!(prompt.render("abc"), "Summarize: abc");
    /// ```
    #[must_use]
    pub fn render(&self, chunk: &str) -> String {
        self.template.replace(PLACEHOLDER, chunk)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

/// Anything that can turn one chunk plus a prompt into raw model output.
pub trait Generator {
    /// Generate a reply for `chunk` using `prompt`.
    fn generate(
        &self,
        chunk: &str,
        prompt: &PromptTemplate,
    ) -> std::result::Result<String, GenerationError>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn generate(
        &self,
        chunk: &str,
        prompt: &PromptTemplate,
    ) -> std::result::Result<String, GenerationError> {
        (**self).generate(chunk, prompt)
    }
}

#[cfg(feature = "http")]
pub use http::OllamaClient;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use reqwest::blocking::Client;
    use serde::Serialize;
    use serde_json::Value;
    use tracing::debug;

    use super::{GenerationError, Generator, PromptTemplate};

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    #[derive(Serialize)]
    struct GenerateRequest<'a> {
        model: &'a str,
        prompt: &'a str,
        stream: bool,
    }

    /// Blocking client for an Ollama-style `/api/generate` endpoint.
    #[derive(Debug, Clone)]
    pub struct OllamaClient {
        http: Client,
        url: String,
        model: String,
    }

    impl OllamaClient {
        /// Create a client for `url` using `model`, with a per-request timeout.
        ///
        /// # Errors
        ///
        /// Returns [`GenerationError::Transport`] if the HTTP client cannot be
        /// built (for example, TLS backend initialization fails).
        pub fn new(url: &str, model: &str, timeout: Duration) -> Result<Self, GenerationError> {
            let http = Client::builder()
                .timeout(timeout)
                .connect_timeout(CONNECT_TIMEOUT)
                .build()?;
            Ok(Self {
                http,
                url: url.to_string(),
                model: model.to_string(),
            })
        }

        /// The endpoint URL.
        pub fn url(&self) -> &str {
            &self.url
        }

        /// The model name sent with each request.
        pub fn model(&self) -> &str {
            &self.model
        }
    }

    impl Generator for OllamaClient {
        fn generate(
            &self,
            chunk: &str,
            prompt: &PromptTemplate,
        ) -> Result<String, GenerationError> {
            let prompt = prompt.render(chunk);
            let body = GenerateRequest {
                model: &self.model,
                prompt: &prompt,
                stream: false,
            };

            debug!(url = %self.url, model = %self.model, prompt_len = prompt.len(), "sending generate request");
            let resp = self.http.post(&self.url).json(&body).send()?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().unwrap_or_default();
                return Err(GenerationError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let reply: Value = resp.json()?;
            reply
                .get("response")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(GenerationError::MissingResponse)
        }
    }
}
