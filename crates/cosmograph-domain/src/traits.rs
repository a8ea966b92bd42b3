//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the graph model and the
//! infrastructure. Implementations live in other crates.

use crate::graph::{ExtractionSummary, Graph};
use std::path::Path;

/// Capability contract shared by every extraction strategy
///
/// Implemented by the application layer (cosmograph-extractor)
pub trait ExtractionStrategy {
    /// Error type for extraction operations
    type Error;

    /// Short strategy name for logs and messages
    fn name(&self) -> &'static str;

    /// Whether this strategy can process the file (no side effects)
    fn supports(&self, path: &Path) -> bool;

    /// Extract entities and relationships from the file into `graph`
    ///
    /// Either every addition is applied and a summary returned, or an error
    /// is returned and the graph is left untouched.
    fn extract(&self, path: &Path, graph: &mut Graph) -> Result<ExtractionSummary, Self::Error>;
}

/// A single request to a language model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmRequest {
    /// Target model identifier
    pub model: String,

    /// System prompt
    pub system: String,

    /// User content (the document chunk)
    pub content: String,

    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Trait for language-model provider operations
///
/// Implemented by the infrastructure layer (cosmograph-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Exact input token count for the request, as the provider counts it
    fn count_tokens(&self, request: &LlmRequest) -> Result<u64, Self::Error>;

    /// Generate output constrained to the given JSON schema
    fn generate_structured(&self, request: &LlmRequest, schema: &str) -> Result<String, Self::Error>;
}
