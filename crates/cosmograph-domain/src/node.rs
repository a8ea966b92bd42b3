//! Node and edge types

use std::collections::BTreeMap;

/// An entity in the graph
///
/// Identity is the normalized `id`: two nodes with the same id are the same
/// node, whatever their labels say.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Normalized id (see [`crate::normalize_id`])
    pub id: String,

    /// Display label
    pub label: String,

    /// Free-form tag such as "document", "section" or "person"
    pub category: String,

    /// Longer description, may be empty
    pub description: String,

    /// Name of the file the node was first extracted from
    pub source_file: String,

    /// Open key-value map for producer-specific annotations
    pub metadata: BTreeMap<String, String>,
}

impl Node {
    /// Create a node; the id is used as given
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: category.into(),
            description: String::new(),
            source_file: String::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the source file
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = source_file.into();
        self
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A typed relation between two node ids
///
/// Identity is the triple (source, target, edge_type). Edges are stored
/// directed even though most relations are read as undirected.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Relation label such as "contains" or "defines"
    pub edge_type: String,

    /// Relation strength
    pub weight: f64,

    /// Open key-value map for producer-specific annotations
    pub metadata: BTreeMap<String, String>,
}

impl Edge {
    /// Create an edge with the default weight of 1.0
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type: edge_type.into(),
            weight: 1.0,
            metadata: BTreeMap::new(),
        }
    }

    /// The identity triple of this edge
    pub fn key(&self) -> (String, String, String) {
        (
            self.source.clone(),
            self.target.clone(),
            self.edge_type.clone(),
        )
    }
}
