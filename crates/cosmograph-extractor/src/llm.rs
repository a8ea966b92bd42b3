//! Language-model extraction pipeline
//!
//! `estimate -> approve -> chunk & extract -> merge`. Nothing is sent for
//! generation before the approval gate accepts the estimate, and nothing is
//! merged until every chunk has been extracted and parsed, so a failure
//! part-way through leaves the graph untouched.
//!
//! Document content is never logged; the fingerprint stands in for it.

use crate::approval::{fingerprint, AlwaysDecline, ApprovalGate, ApprovalRequest};
use crate::chunking::DocumentChunker;
use crate::config::LlmExtractorConfig;
use crate::document::{file_name, has_extension, read_text};
use crate::error::ExtractorError;
use crate::estimate::TokenEstimate;
use crate::parser::{parse_chunk_response, ChunkExtraction};
use crate::pdf::read_pdf;
use crate::prompt::{output_schema, SYSTEM_PROMPT};
use cosmograph_domain::{ExtractionStrategy, ExtractionSummary, Graph, LlmProvider, LlmRequest};
use cosmograph_llm::LlmError;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Extractor backed by a structured-output language model
pub struct LlmExtractor<P> {
    provider: P,
    config: LlmExtractorConfig,
    gate: Box<dyn ApprovalGate>,
    sleep: Box<dyn Fn(Duration)>,
}

impl<P> LlmExtractor<P>
where
    P: LlmProvider<Error = LlmError>,
{
    /// Create an extractor that sleeps for real and declines every run
    ///
    /// Install a gate with [`LlmExtractor::with_approval`]; pass
    /// [`AutoApprove`](crate::AutoApprove) to run non-interactively.
    pub fn new(provider: P, config: LlmExtractorConfig) -> Self {
        Self {
            provider,
            config,
            gate: Box::new(AlwaysDecline),
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the approval gate
    pub fn with_approval(mut self, gate: impl ApprovalGate + 'static) -> Self {
        self.gate = Box::new(gate);
        self
    }

    /// Replace the sleep used between retries
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &LlmExtractorConfig {
        &self.config
    }

    /// The underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Split text into the chunks that would be sent
    pub fn chunks<'a>(&self, text: &'a str) -> Vec<&'a str> {
        DocumentChunker::new(self.config.max_chunk_chars, self.config.overlap_chars).chunk(text)
    }

    /// Count tokens and price the extraction without generating anything
    pub fn estimate(&self, text: &str) -> Result<TokenEstimate, ExtractorError> {
        self.config.validate().map_err(ExtractorError::Config)?;
        self.estimate_chunks(&self.chunks(text))
    }

    fn estimate_chunks(&self, chunks: &[&str]) -> Result<TokenEstimate, ExtractorError> {
        let mut input_tokens = 0u64;
        for chunk in chunks {
            input_tokens += self.provider.count_tokens(&self.request(chunk))?;
        }
        Ok(TokenEstimate::from_input_tokens(input_tokens, chunks.len(), &self.config))
    }

    fn request(&self, chunk: &str) -> LlmRequest {
        LlmRequest {
            model: self.config.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            content: chunk.to_string(),
            max_tokens: self.config.max_output_tokens,
        }
    }

    /// Run the pipeline over already-loaded text
    ///
    /// `path` names the document; nothing is read from it. Returns
    /// [`ExtractorError::Declined`] without any generate call when the gate
    /// refuses.
    pub fn extract_text(&self, text: &str, path: &Path, graph: &mut Graph) -> Result<ExtractionSummary, ExtractorError> {
        self.config.validate().map_err(ExtractorError::Config)?;

        let source = file_name(path);
        let content_fingerprint = fingerprint(text);
        let chunks = self.chunks(text);
        info!(
            "Preparing {} (fingerprint {}, {} chars, {} chunk(s))",
            source,
            content_fingerprint,
            text.chars().count(),
            chunks.len()
        );

        let estimate = self.estimate_chunks(&chunks)?;
        info!("Estimate for {}: {}", content_fingerprint, estimate);

        let request = ApprovalRequest {
            file_name: source.clone(),
            fingerprint: content_fingerprint.clone(),
            estimate,
        };
        if !self.gate.approve(&request) {
            info!("Extraction of {} declined", content_fingerprint);
            return Err(ExtractorError::Declined);
        }

        let schema = output_schema().to_string();
        let mut extractions = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            debug!("Extracting chunk {}/{} of {}", index + 1, chunks.len(), content_fingerprint);
            let chunk_request = self.request(chunk);
            let response = self.config.retry.run(
                || self.provider.generate_structured(&chunk_request, &schema),
                |delay| (self.sleep)(delay),
            )?;
            extractions.push(parse_chunk_response(&response)?);
        }

        let summary = merge(&extractions, &source, graph);
        info!(
            "Merged {} chunk(s) of {}: {} nodes, {} edges added",
            extractions.len(),
            content_fingerprint,
            summary.nodes_added,
            summary.edges_added
        );
        Ok(summary)
    }
}

/// Add every chunk's entities, then its relationships, in chunk order
fn merge(extractions: &[ChunkExtraction], source: &str, graph: &mut Graph) -> ExtractionSummary {
    let mark = graph.mark();
    for extraction in extractions {
        for entity in &extraction.entities {
            graph.add_node(&entity.id, &entity.name, &entity.category, &entity.description, source);
        }
        for relationship in &extraction.relationships {
            graph.add_edge(
                &relationship.source_id,
                &relationship.target_id,
                &relationship.relationship_type,
            );
        }
    }
    ExtractionSummary::since(mark, graph, source)
}

impl<P> fmt::Debug for LlmExtractor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmExtractor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P> ExtractionStrategy for LlmExtractor<P>
where
    P: LlmProvider<Error = LlmError>,
{
    type Error = ExtractorError;

    fn name(&self) -> &'static str {
        "llm"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, &["txt", "md", "pdf"])
    }

    fn extract(&self, path: &Path, graph: &mut Graph) -> Result<ExtractionSummary, Self::Error> {
        let text = if has_extension(path, &["pdf"]) {
            read_pdf(path)?
        } else {
            read_text(path)?
        };
        self.extract_text(&text, path, graph)
    }
}
