//! Token and cost estimation

use crate::config::LlmExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cost estimate shown before any extraction request is sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenEstimate {
    /// Exact input tokens over all chunks, system prompt included
    pub input_tokens: u64,

    /// Conservative output estimate
    pub estimated_output_tokens: u64,

    /// Estimated cost in USD
    pub estimated_cost_usd: f64,

    /// Model the estimate was computed for
    pub model: String,

    /// Number of chunks that will be sent
    pub chunk_count: usize,
}

impl TokenEstimate {
    /// Derive the estimate from counted input tokens
    ///
    /// Extraction output is typically under a quarter of the input, and each
    /// chunk is capped at `max_output_tokens`.
    pub fn from_input_tokens(input_tokens: u64, chunk_count: usize, config: &LlmExtractorConfig) -> Self {
        let output_cap = u64::from(config.max_output_tokens).saturating_mul(chunk_count as u64);
        let estimated_output_tokens = (input_tokens / 4).min(output_cap);
        let estimated_cost_usd = config
            .pricing_for_model()
            .cost(input_tokens, estimated_output_tokens);

        Self {
            input_tokens,
            estimated_output_tokens,
            estimated_cost_usd,
            model: config.model.clone(),
            chunk_count,
        }
    }
}

impl fmt::Display for TokenEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} input tokens, ~{} output tokens, {} chunk(s) on {}: ~${:.4}",
            self.input_tokens,
            self.estimated_output_tokens,
            self.chunk_count,
            self.model,
            self.estimated_cost_usd
        )
    }
}
