//! Configuration for the language-model extractor

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Price per million tokens for one model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// USD per million input tokens
    pub input_per_mtok: f64,

    /// USD per million output tokens
    pub output_per_mtok: f64,
}

impl ModelPricing {
    /// Create a price entry
    pub const fn new(input_per_mtok: f64, output_per_mtok: f64) -> Self {
        Self {
            input_per_mtok,
            output_per_mtok,
        }
    }

    /// Cost in USD of the given token counts
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 / 1_000_000.0) * self.input_per_mtok
            + (output_tokens as f64 / 1_000_000.0) * self.output_per_mtok
    }
}

/// Price of the default model, used when the table has no usable entry
const FALLBACK_PRICING: ModelPricing = ModelPricing::new(3.0, 15.0);

/// Rate-limit retry policy
///
/// Waits are random exponential: attempt `n` sleeps a uniformly random time
/// between `min_wait_ms` and `min(max_wait_ms, min_wait_ms * 2^(n-1))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first call
    pub max_attempts: u32,

    /// Lower bound of every wait (milliseconds)
    pub min_wait_ms: u64,

    /// Upper bound of every wait (milliseconds)
    pub max_wait_ms: u64,
}

impl RetryPolicy {
    /// Lower bound of every wait
    pub fn min_wait(&self) -> Duration {
        Duration::from_millis(self.min_wait_ms)
    }

    /// Upper bound of every wait
    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    /// A single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            min_wait_ms: 1_000,
            max_wait_ms: 60_000,
        }
    }
}

/// Configuration for the language-model extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmExtractorConfig {
    /// Target model identifier
    pub model: String,

    /// Maximum chunk size (characters)
    pub max_chunk_chars: usize,

    /// Characters shared by consecutive chunks
    pub overlap_chars: usize,

    /// Output token cap per chunk request
    pub max_output_tokens: u32,

    /// Price table keyed by model identifier
    pub pricing: BTreeMap<String, ModelPricing>,

    /// Rate-limit retry policy
    pub retry: RetryPolicy,
}

impl LlmExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.max_chunk_chars == 0 {
            return Err("max_chunk_chars must be greater than 0".to_string());
        }
        if self.overlap_chars >= self.max_chunk_chars {
            return Err("overlap_chars must be smaller than max_chunk_chars".to_string());
        }
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
        }
        if self.retry.max_attempts == 0 {
            return Err("retry.max_attempts must be greater than 0".to_string());
        }
        if self.retry.min_wait_ms > self.retry.max_wait_ms {
            return Err("retry.min_wait_ms cannot exceed retry.max_wait_ms".to_string());
        }
        Ok(())
    }

    /// Price entry for the configured model
    ///
    /// Unknown models are priced as the default model.
    pub fn pricing_for_model(&self) -> ModelPricing {
        self.pricing
            .get(&self.model)
            .or_else(|| self.pricing.get(DEFAULT_MODEL))
            .copied()
            .unwrap_or(FALLBACK_PRICING)
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

fn default_pricing() -> BTreeMap<String, ModelPricing> {
    BTreeMap::from([
        ("claude-sonnet-4-5".to_string(), ModelPricing::new(3.0, 15.0)),
        ("claude-haiku-4-5".to_string(), ModelPricing::new(1.0, 5.0)),
        ("claude-opus-4-5".to_string(), ModelPricing::new(5.0, 25.0)),
    ])
}

impl Default for LlmExtractorConfig {
    /// Default configuration: ~100K-token chunks on the default model
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_chunk_chars: 400_000,
            overlap_chars: 2_000,
            max_output_tokens: 4_096,
            pricing: default_pricing(),
            retry: RetryPolicy::default(),
        }
    }
}

impl LlmExtractorConfig {
    /// Aggressive preset: cheaper model, smaller chunks, fewer retries
    pub fn aggressive() -> Self {
        Self {
            model: "claude-haiku-4-5".to_string(),
            max_chunk_chars: 200_000,
            overlap_chars: 1_000,
            max_output_tokens: 4_096,
            pricing: default_pricing(),
            retry: RetryPolicy {
                max_attempts: 3,
                min_wait_ms: 500,
                max_wait_ms: 10_000,
            },
        }
    }

    /// Lenient preset: larger overlap and a more patient retry policy
    pub fn lenient() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_chunk_chars: 400_000,
            overlap_chars: 8_000,
            max_output_tokens: 8_192,
            pricing: default_pricing(),
            retry: RetryPolicy {
                max_attempts: 10,
                min_wait_ms: 2_000,
                max_wait_ms: 120_000,
            },
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
