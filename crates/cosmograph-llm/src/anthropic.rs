//! Anthropic Provider Implementation
//!
//! Talks to the Anthropic Messages API. Extraction requests use the
//! structured-outputs beta so the model's reply is constrained to the
//! supplied JSON schema; token counts come from the `count_tokens` endpoint,
//! which is free and exact for the target model.
//!
//! # Features
//!
//! - Blocking HTTP communication (the extraction pipeline is synchronous)
//! - Configurable endpoint and request timeout
//! - Rate-limit responses surface as `LlmError::RateLimited` with the
//!   provider's `retry-after` hint; retrying is the caller's decision
//!
//! # Examples
//!
//! ```no_run
//! use cosmograph_llm::AnthropicProvider;
//!
//! // Reads ANTHROPIC_API_KEY
//! let provider = AnthropicProvider::from_env().unwrap();
//! ```

use crate::LlmError;
use cosmograph_domain::{LlmProvider, LlmRequest};
use reqwest::blocking::{Client, Response};
use reqwest::header::RETRY_AFTER;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// API version header value
pub const API_VERSION: &str = "2023-06-01";

/// Beta flag enabling schema-constrained output
pub const STRUCTURED_OUTPUTS_BETA: &str = "structured-outputs-2025-11-13";

/// Default timeout for a single request (5 minutes, large chunks are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct OutputFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    schema: serde_json::Value,
}

/// Request body for the messages endpoint
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
    output_format: OutputFormat,
}

/// Request body for the token counting endpoint
#[derive(Serialize)]
struct CountTokensRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct CountTokensResponse {
    input_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Response from the messages endpoint
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl AnthropicProvider {
    /// Create a provider with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a provider using the key from `ANTHROPIC_API_KEY`
    pub fn from_env() -> Result<Self, LlmError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::new(key),
            _ => Err(LlmError::MissingApiKey(API_KEY_ENV.to_string())),
        }
    }

    /// Use a different endpoint (proxies, test servers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn post<T: Serialize>(&self, path: &str, body: &T, model: &str) -> Result<Response, LlmError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("POST {} (model {})", url, model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("anthropic-beta", STRUCTURED_OUTPUTS_BETA)
            .json(body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_retry_after);
        let body = response.text().unwrap_or_default();

        Err(classify_status(status, retry_after, &body, model))
    }
}

impl LlmProvider for AnthropicProvider {
    type Error = LlmError;

    fn count_tokens(&self, request: &LlmRequest) -> Result<u64, Self::Error> {
        let body = CountTokensRequest {
            model: &request.model,
            system: &request.system,
            messages: vec![Message {
                role: "user",
                content: &request.content,
            }],
        };

        let response = self.post("/v1/messages/count_tokens", &body, &request.model)?;
        let counted: CountTokensResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse token count: {}", e)))?;

        Ok(counted.input_tokens)
    }

    fn generate_structured(&self, request: &LlmRequest, schema: &str) -> Result<String, Self::Error> {
        let schema: serde_json::Value =
            serde_json::from_str(schema).map_err(|e| LlmError::InvalidSchema(e.to_string()))?;

        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: vec![Message {
                role: "user",
                content: &request.content,
            }],
            output_format: OutputFormat {
                kind: "json_schema",
                schema,
            },
        };

        let response = self.post("/v1/messages", &body, &request.model)?;
        let message: MessagesResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        structured_text(message)
    }
}

/// Pull the structured JSON text out of a messages response
fn structured_text(message: MessagesResponse) -> Result<String, LlmError> {
    match message.stop_reason.as_deref() {
        Some("refusal") => return Err(LlmError::Refused),
        Some("max_tokens") => {
            return Err(LlmError::InvalidResponse(
                "output truncated at max_tokens".to_string(),
            ))
        }
        _ => {}
    }

    message
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| LlmError::InvalidResponse("no text block in response".to_string()))
}

/// Map a non-success HTTP status to an error
fn classify_status(status: u16, retry_after: Option<Duration>, body: &str, model: &str) -> LlmError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        429 => LlmError::RateLimited { retry_after },
        401 | 403 => LlmError::Authentication(message),
        404 => LlmError::ModelNotAvailable(model.to_string()),
        _ => LlmError::Api { status, message },
    }
}

/// Parse a `retry-after` header given in seconds
fn parse_retry_after(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
}
