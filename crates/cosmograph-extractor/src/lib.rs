//! Cosmograph Extractor
//!
//! Turns documents into entities and relationships in a shared
//! [`Graph`](cosmograph_domain::Graph).
//!
//! # Strategies
//!
//! | Strategy | Input | Approach |
//! |---|---|---|
//! | [`LegalExtractor`] | `.txt`, `.md` | constitution / code / ordinance structure |
//! | [`TextExtractor`] | `.txt`, `.md`, `.text` | markdown headers, definitions, references |
//! | [`GenericExtractor`] | `.txt`, `.md`, `.text` | [`PatternConfig`] regexes with an occurrence threshold |
//! | [`PdfExtractor`] | `.pdf` | text layer handed to the legal extractor |
//! | [`LlmExtractor`] | `.txt`, `.md`, `.pdf` | structured-output language model |
//!
//! # Language-model pipeline
//!
//! ```text
//! text → chunk → count tokens → estimate → approval gate → generate (retry) → parse → merge
//! ```
//!
//! # Example Usage
//!
//! ```
//! use cosmograph_domain::{ExtractionStrategy, Graph};
//! use cosmograph_extractor::{AutoApprove, LlmExtractor, LlmExtractorConfig};
//! use cosmograph_llm::MockProvider;
//! use std::path::Path;
//!
//! let provider = MockProvider::new(
//!     r#"{"entities": [{"id": "council", "name": "Council", "category": "organization", "description": ""}],
//!        "relationships": []}"#,
//! );
//! let extractor = LlmExtractor::new(provider, LlmExtractorConfig::default()).with_approval(AutoApprove);
//!
//! let mut graph = Graph::default();
//! let summary = extractor
//!     .extract_text("The Council met.", Path::new("minutes.txt"), &mut graph)
//!     .unwrap();
//! assert_eq!(summary.nodes_added, 1);
//! ```

#![warn(missing_docs)]

mod approval;
mod chunking;
mod config;
mod document;
mod error;
mod estimate;
mod generic;
mod legal;
mod llm;
mod parser;
mod patterns;
mod pdf;
mod prompt;
mod retry;
mod strategy;
mod text;

#[cfg(test)]
mod tests;

pub use approval::{fingerprint, AlwaysDecline, ApprovalGate, ApprovalRequest, AutoApprove, FINGERPRINT_HEX_CHARS};
pub use chunking::DocumentChunker;
pub use config::{LlmExtractorConfig, ModelPricing, RetryPolicy, DEFAULT_MODEL};
pub use error::{ExtractorError, PatternConfigError};
pub use estimate::TokenEstimate;
pub use generic::{CompiledPattern, GenericExtractor};
pub use legal::{DocumentType, LegalExtractor};
pub use llm::LlmExtractor;
pub use parser::{parse_chunk_response, ChunkExtraction, ExtractedEntity, ExtractedRelationship};
pub use patterns::{ConfigFormat, EntityPattern, PatternConfig, RelationshipTrigger};
pub use pdf::{load_pdf_text, read_pdf, PdfExtractor, PdfText};
pub use prompt::{output_schema, SYSTEM_PROMPT};
pub use strategy::{Strategy, StrategyKind};
pub use text::TextExtractor;
