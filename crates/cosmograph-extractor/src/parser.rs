//! Parse structured model output into chunk extractions

use cosmograph_llm::LlmError;
use serde::Deserialize;
use tracing::warn;

/// An entity reported by the model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractedEntity {
    /// Model-chosen id, becomes the node key
    pub id: String,

    /// Display name, becomes the node label
    pub name: String,

    /// Category tag
    pub category: String,

    /// Short description
    #[serde(default)]
    pub description: String,
}

/// A relationship reported by the model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractedRelationship {
    /// Source entity id
    pub source_id: String,

    /// Target entity id
    pub target_id: String,

    /// Relation label
    pub relationship_type: String,
}

/// Everything extracted from one chunk
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChunkExtraction {
    /// Entities in report order
    pub entities: Vec<ExtractedEntity>,

    /// Relationships in report order
    pub relationships: Vec<ExtractedRelationship>,
}

/// Parse a structured response
///
/// Output that does not match the schema shape is an
/// [`LlmError::InvalidResponse`]. Entities with a blank id or name and
/// relationships with a blank endpoint or type are dropped with a warning.
pub fn parse_chunk_response(response: &str) -> Result<ChunkExtraction, LlmError> {
    let mut extraction: ChunkExtraction = serde_json::from_str(response.trim())
        .map_err(|e| LlmError::InvalidResponse(format!("Output does not match schema: {}", e)))?;

    let entity_count = extraction.entities.len();
    extraction
        .entities
        .retain(|entity| !entity.id.trim().is_empty() && !entity.name.trim().is_empty());
    if extraction.entities.len() < entity_count {
        warn!(
            "Skipped {} entities without id or name",
            entity_count - extraction.entities.len()
        );
    }

    let relationship_count = extraction.relationships.len();
    extraction.relationships.retain(|relationship| {
        !relationship.source_id.trim().is_empty()
            && !relationship.target_id.trim().is_empty()
            && !relationship.relationship_type.trim().is_empty()
    });
    if extraction.relationships.len() < relationship_count {
        warn!(
            "Skipped {} incomplete relationships",
            relationship_count - extraction.relationships.len()
        );
    }

    Ok(extraction)
}
