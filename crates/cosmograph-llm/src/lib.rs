//! Cosmograph LLM Provider Layer
//!
//! Pluggable language-model provider implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from
//! `cosmograph-domain`. Providers only transport requests; chunking, retry
//! and approval live in `cosmograph-extractor`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scripted mock for testing
//! - `AnthropicProvider`: Messages API with structured outputs and token counting
//!
//! # Examples
//!
//! ```
//! use cosmograph_domain::{LlmProvider, LlmRequest};
//! use cosmograph_llm::MockProvider;
//!
//! let provider = MockProvider::new(r#"{"entities": [], "relationships": []}"#);
//! let request = LlmRequest {
//!     model: "claude-sonnet-4-5".to_string(),
//!     system: String::new(),
//!     content: "text".to_string(),
//!     max_tokens: 1024,
//! };
//! let result = provider.generate_structured(&request, "{}").unwrap();
//! assert!(result.contains("entities"));
//! ```

#![warn(missing_docs)]

pub mod anthropic;

use cosmograph_domain::{LlmProvider, LlmRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use anthropic::AnthropicProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Rate limit exceeded; the only retryable condition
    #[error("Rate limit exceeded")]
    RateLimited {
        /// Wait requested by the provider, if any
        retry_after: Option<Duration>,
    },

    /// Credentials missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// No API key configured
    #[error("API key not set; export {0}")]
    MissingApiKey(String),

    /// Response did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The schema handed to the provider was not valid JSON
    #[error("Invalid output schema: {0}")]
    InvalidSchema(String),

    /// The model declined to produce the output
    #[error("Model refused the request")]
    Refused,

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Any other non-success API status
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider message
        message: String,
    },
}

impl LlmError {
    /// Whether this error is a rate-limit response
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// Wait requested by the provider, for rate-limit errors
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured outcomes without making any network calls. Outcomes
/// queued with [`MockProvider::push_response`] and [`MockProvider::push_error`]
/// are consumed in order; once the queue is empty the default response is
/// returned.
///
/// # Examples
///
/// ```
/// use cosmograph_domain::{LlmProvider, LlmRequest};
/// use cosmograph_llm::{LlmError, MockProvider};
///
/// let provider = MockProvider::new("default");
/// provider.push_error(LlmError::RateLimited { retry_after: None });
///
/// let request = LlmRequest {
///     model: "m".to_string(),
///     system: String::new(),
///     content: String::new(),
///     max_tokens: 1,
/// };
/// assert!(provider.generate_structured(&request, "{}").is_err());
/// assert_eq!(provider.generate_structured(&request, "{}").unwrap(), "default");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    token_count: u64,
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    outcomes: VecDeque<Result<String, LlmError>>,
    requests: Vec<LlmRequest>,
    call_count: usize,
    count_calls: usize,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            token_count: 100,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Token count reported for every counting request
    pub fn with_token_count(mut self, token_count: u64) -> Self {
        self.token_count = token_count;
        self
    }

    /// Queue a response for the next unanswered generate call
    pub fn push_response(&self, response: impl Into<String>) {
        self.state().outcomes.push_back(Ok(response.into()));
    }

    /// Queue an error for the next unanswered generate call
    pub fn push_error(&self, error: LlmError) {
        self.state().outcomes.push_back(Err(error));
    }

    /// Number of generate calls made
    pub fn call_count(&self) -> usize {
        self.state().call_count
    }

    /// Number of token counting calls made
    pub fn count_calls(&self) -> usize {
        self.state().count_calls
    }

    /// Generate requests received so far
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.state().requests.clone()
    }

    /// Reset counters and recorded requests
    pub fn reset(&self) {
        let mut state = self.state();
        state.call_count = 0;
        state.count_calls = 0;
        state.requests.clear();
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not poison the other clones
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(r#"{"entities": [], "relationships": []}"#)
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn count_tokens(&self, _request: &LlmRequest) -> Result<u64, Self::Error> {
        self.state().count_calls += 1;
        Ok(self.token_count)
    }

    fn generate_structured(&self, request: &LlmRequest, _schema: &str) -> Result<String, Self::Error> {
        let mut state = self.state();
        state.call_count += 1;
        state.requests.push(request.clone());

        match state.outcomes.pop_front() {
            Some(outcome) => outcome,
            None => Ok(self.default_response.clone()),
        }
    }
}
