//! Cosmograph Domain Layer
//!
//! This crate contains the graph data model that every extraction strategy
//! populates, together with the trait interfaces the infrastructure crates
//! implement. Its only external dependency is `serde`, used for the snapshot
//! handed to renderers and transports.
//!
//! ## Key Concepts
//!
//! - **Node**: an entity identified by its normalized id
//! - **Edge**: a typed relation, identified by (source, target, type)
//! - **Graph**: the deduplicating container, first write wins
//! - **Normalized id**: the canonical form of a raw label
//!
//! ## Architecture
//!
//! - Pure data model and invariants only
//! - Strategies and providers live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod graph;
pub mod node;
pub mod normalize;
pub mod traits;

// Re-exports for convenience
pub use graph::{EdgeRecord, ExtractionSummary, Graph, GraphMark, GraphSnapshot, GraphStats, NodeRecord};
pub use node::{Edge, Node};
pub use normalize::{normalize_id, MAX_ID_CHARS};
pub use traits::{ExtractionStrategy, LlmProvider, LlmRequest};
