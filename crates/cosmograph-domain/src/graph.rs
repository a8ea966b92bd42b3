//! Graph store
//!
//! The [`Graph`] accumulates nodes and edges from any number of extractor
//! calls. Duplicates and self-loops are expected when many overlapping
//! documents are processed, so they are reported through return values
//! rather than errors.
//!
//! The store has no internal locking: one extraction run owns one graph.

use crate::node::{Edge, Node};
use crate::normalize::normalize_id;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Default graph title
pub const DEFAULT_TITLE: &str = "Knowledge Graph";

/// Display limit for node labels in the snapshot
pub const LABEL_DISPLAY_CHARS: usize = 60;

/// Display limit for node descriptions in the snapshot
pub const DESCRIPTION_DISPLAY_CHARS: usize = 150;

/// A deduplicating entity-relationship graph
#[derive(Debug, Clone)]
pub struct Graph {
    /// Title shown by renderers
    pub title: String,

    /// Optional free-form description
    pub description: String,

    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_keys: HashSet<(String, String, String)>,
}

impl Graph {
    /// Create an empty graph with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            edge_keys: HashSet::new(),
        }
    }

    /// Add a node, returning its normalized id
    ///
    /// If a node with the same normalized id already exists it is kept
    /// unchanged (first write wins) and its id is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmograph_domain::Graph;
    ///
    /// let mut graph = Graph::default();
    /// let id = graph.add_node("X", "First", "cat", "", "");
    /// graph.add_node("X", "Second", "cat2", "", "");
    ///
    /// assert_eq!(graph.node_count(), 1);
    /// assert_eq!(graph.node(&id).unwrap().label, "First");
    /// ```
    pub fn add_node(
        &mut self,
        id: &str,
        label: &str,
        category: &str,
        description: &str,
        source_file: &str,
    ) -> String {
        self.insert_node(
            Node::new(id, label, category)
                .with_description(description)
                .with_source_file(source_file),
        )
    }

    /// Insert a prepared node, normalizing its id first
    ///
    /// Same first-write-wins policy as [`Graph::add_node`]; use this when the
    /// node carries metadata.
    pub fn insert_node(&mut self, mut node: Node) -> String {
        let id = normalize_id(&node.id);
        if !self.index.contains_key(&id) {
            node.id = id.clone();
            self.index.insert(id.clone(), self.nodes.len());
            self.nodes.push(node);
        }
        id
    }

    /// Add an edge between two (raw or normalized) ids
    ///
    /// Returns `false` without touching the graph when the edge would be a
    /// self-loop or when the (source, target, type) triple already exists.
    /// The endpoints are not required to exist as nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmograph_domain::Graph;
    ///
    /// let mut graph = Graph::default();
    /// assert!(graph.add_edge("A", "B", "relates"));
    /// assert!(!graph.add_edge("A", "B", "relates"));
    /// assert!(graph.add_edge("A", "B", "contains"));
    /// assert!(!graph.add_edge("A", "A", "relates"));
    /// assert_eq!(graph.edge_count(), 2);
    /// ```
    pub fn add_edge(&mut self, source: &str, target: &str, edge_type: &str) -> bool {
        self.insert_edge(Edge::new(source, target, edge_type))
    }

    /// Insert a prepared edge, normalizing both endpoints first
    pub fn insert_edge(&mut self, mut edge: Edge) -> bool {
        edge.source = normalize_id(&edge.source);
        edge.target = normalize_id(&edge.target);

        if edge.source == edge.target {
            return false;
        }

        let key = edge.key();
        if self.edge_keys.contains(&key) {
            return false;
        }

        self.edge_keys.insert(key);
        self.edges.push(edge);
        true
    }

    /// Look up a node by raw or normalized id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index
            .get(&normalize_id(id))
            .map(|&position| &self.nodes[position])
    }

    /// Whether the given edge triple is present
    pub fn contains_edge(&self, source: &str, target: &str, edge_type: &str) -> bool {
        self.edge_keys.contains(&(
            normalize_id(source),
            normalize_id(target),
            edge_type.to_string(),
        ))
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes and no edges
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Node and edge counts with a per-category breakdown
    pub fn stats(&self) -> GraphStats {
        let mut category_counts = BTreeMap::new();
        for node in &self.nodes {
            *category_counts.entry(node.category.clone()).or_insert(0) += 1;
        }

        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            category_counts,
        }
    }

    /// Record the current size, to measure what a later operation added
    pub fn mark(&self) -> GraphMark {
        GraphMark {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
        }
    }

    /// Complete, order-stable snapshot for renderers and transports
    pub fn serialize(&self) -> GraphSnapshot {
        GraphSnapshot {
            title: self.title.clone(),
            nodes: self.nodes.iter().map(NodeRecord::from).collect(),
            edges: self.edges.iter().map(EdgeRecord::from).collect(),
            stats: self.stats(),
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

/// Graph size at a point in time, see [`Graph::mark`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphMark {
    /// Node count when the mark was taken
    pub nodes: usize,

    /// Edge count when the mark was taken
    pub edges: usize,
}

/// What a single `extract` call added to the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Name of the processed file
    pub source_file: String,

    /// Nodes that did not exist before the call
    pub nodes_added: usize,

    /// Edges that did not exist before the call
    pub edges_added: usize,
}

impl ExtractionSummary {
    /// Summarize what was added to `graph` since `mark`
    pub fn since(mark: GraphMark, graph: &Graph, source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            nodes_added: graph.node_count().saturating_sub(mark.nodes),
            edges_added: graph.edge_count().saturating_sub(mark.edges),
        }
    }
}

/// Graph statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of nodes
    pub node_count: usize,

    /// Number of edges
    pub edge_count: usize,

    /// Number of nodes per category
    pub category_counts: BTreeMap<String, usize>,
}

/// Serializable snapshot of a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Graph title
    pub title: String,

    /// Nodes in insertion order
    pub nodes: Vec<NodeRecord>,

    /// Edges in insertion order
    pub edges: Vec<EdgeRecord>,

    /// Counts at snapshot time
    pub stats: GraphStats,
}

/// Display form of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Normalized id
    pub id: String,

    /// Label, truncated for display
    pub label: String,

    /// Category tag
    pub category: String,

    /// Description, truncated for display
    pub description: String,

    /// Originating file
    pub source_file: String,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            label: truncate_chars(&node.label, LABEL_DISPLAY_CHARS),
            category: node.category.clone(),
            description: truncate_chars(&node.description, DESCRIPTION_DISPLAY_CHARS),
            source_file: node.source_file.clone(),
        }
    }
}

/// Display form of an edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Relation label
    #[serde(rename = "type")]
    pub edge_type: String,
}

impl From<&Edge> for EdgeRecord {
    fn from(edge: &Edge) -> Self {
        Self {
            source: edge.source.clone(),
            target: edge.target.clone(),
            edge_type: edge.edge_type.clone(),
        }
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn graph_with_nodes() -> Graph {
        let mut graph = Graph::default();
        graph.add_node("node1", "Node One", "test", "First test node", "");
        graph.add_node("node2", "Node Two", "test", "Second test node", "");
        graph.add_node("node3", "Node Three", "test", "Third test node", "");
        graph
    }

    #[test]
    fn test_adds_new_node() {
        let mut graph = Graph::default();
        let id = graph.add_node("Council", "Council", "definition", "", "code.txt");
        assert_eq!(id, "Council");
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node("Council").unwrap().source_file, "code.txt");
    }

    #[test]
    fn test_first_write_wins() {
        let mut graph = Graph::default();
        graph.add_node("X", "First", "cat", "first description", "");
        let id = graph.add_node("X", "Second", "cat2", "second description", "");

        let node = graph.node(&id).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(node.label, "First");
        assert_eq!(node.category, "cat");
        assert_eq!(node.description, "first description");
    }

    #[test]
    fn test_returns_normalized_id() {
        let mut graph = Graph::default();
        let id = graph.add_node("Test!@#Node", "Test", "test", "", "");
        assert_eq!(id, "TestNode");
    }

    #[test]
    fn test_equivalent_raw_ids_resolve_to_one_node() {
        let mut graph = Graph::default();
        let first = graph.add_node("Tribal  Council", "Tribal Council", "authority", "", "");
        let second = graph.add_node("Tribal Council!", "Council", "other", "", "");
        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_insert_node_keeps_metadata() {
        let mut graph = Graph::default();
        let id = graph.insert_node(Node::new("a b", "A B", "person").with_metadata("chunk", "2"));
        assert_eq!(graph.node(&id).unwrap().metadata["chunk"], "2");
    }

    #[test]
    fn test_adds_edge_successfully() {
        let mut graph = graph_with_nodes();
        assert!(graph.add_edge("node1", "node2", "relates"));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge("node1", "node2", "relates"));
    }

    #[test]
    fn test_prevents_self_loops() {
        let mut graph = graph_with_nodes();
        assert!(!graph.add_edge("A", "A", "relates"));
        assert!(!graph.add_edge("node1", "node1!", "relates"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_prevents_duplicate_edges() {
        let mut graph = graph_with_nodes();
        assert!(graph.add_edge("node1", "node2", "relates"));
        assert!(!graph.add_edge("node1", "node2", "relates"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_allows_different_edge_types() {
        let mut graph = graph_with_nodes();
        assert!(graph.add_edge("A", "B", "relates"));
        assert!(graph.add_edge("A", "B", "contains"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_direction_is_part_of_identity() {
        let mut graph = Graph::default();
        assert!(graph.add_edge("A", "B", "relates"));
        assert!(graph.add_edge("B", "A", "relates"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_cleans_source_and_target_ids() {
        let mut graph = graph_with_nodes();
        assert!(graph.add_edge("node1!", "  node2 ", "relates"));
        let edge = &graph.edges()[0];
        assert_eq!(edge.source, "node1");
        assert_eq!(edge.target, "node2");
        assert!(!graph.add_edge("node1", "node2", "relates"));
    }

    #[test]
    fn test_edges_may_reference_missing_nodes() {
        let mut graph = Graph::default();
        assert!(graph.add_edge("ghost", "phantom", "haunts"));
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_stats_counts_categories() {
        let mut graph = graph_with_nodes();
        graph.add_node("p", "Person", "person", "", "");
        graph.add_edge("node1", "p", "mentions");

        let stats = graph.stats();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.edge_count, 1);
        assert_eq!(stats.category_counts["test"], 3);
        assert_eq!(stats.category_counts["person"], 1);
    }

    #[test]
    fn test_stats_empty_graph() {
        let stats = Graph::default().stats();
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.edge_count, 0);
        assert!(stats.category_counts.is_empty());
    }

    #[test]
    fn test_serialize_preserves_order_and_truncates() {
        let mut graph = Graph::new("Codes");
        graph.add_node("b", &"L".repeat(80), "test", &"d".repeat(200), "b.txt");
        graph.add_node("a", "A", "test", "", "a.txt");
        graph.add_edge("b", "a", "references");

        let snapshot = graph.serialize();
        assert_eq!(snapshot.title, "Codes");
        assert_eq!(snapshot.nodes[0].id, "b");
        assert_eq!(snapshot.nodes[1].id, "a");
        assert_eq!(snapshot.nodes[0].label.chars().count(), LABEL_DISPLAY_CHARS);
        assert_eq!(
            snapshot.nodes[0].description.chars().count(),
            DESCRIPTION_DISPLAY_CHARS
        );
        assert_eq!(snapshot.nodes[0].source_file, "b.txt");
        assert_eq!(snapshot.edges[0].edge_type, "references");
        assert_eq!(snapshot.stats.node_count, 2);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut graph = Graph::default();
        graph.add_node("a", "A", "test", "", "");
        graph.add_node("b", "B", "test", "", "");
        graph.add_edge("a", "b", "references");

        let json = serde_json::to_value(graph.serialize()).unwrap();
        assert_eq!(json["edges"][0]["type"], "references");
        assert!(json["edges"][0].get("edge_type").is_none());
        assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(json["stats"]["edge_count"], 1);
    }

    #[test]
    fn test_extraction_summary_since_mark() {
        let mut graph = graph_with_nodes();
        let mark = graph.mark();
        graph.add_node("node1", "dup", "test", "", "");
        graph.add_node("node4", "Node Four", "test", "", "");
        graph.add_edge("node1", "node4", "relates");

        let summary = ExtractionSummary::since(mark, &graph, "doc.txt");
        assert_eq!(summary.nodes_added, 1);
        assert_eq!(summary.edges_added, 1);
        assert_eq!(summary.source_file, "doc.txt");
    }

    proptest! {
        #[test]
        fn prop_edges_are_unique_and_loop_free(
            ops in proptest::collection::vec(("[a-c]{1,2}", "[a-c]{1,2}", "(relates|contains)"), 0..60)
        ) {
            let mut graph = Graph::default();
            for (source, target, kind) in &ops {
                graph.add_edge(source, target, kind);
            }

            let mut seen = HashSet::new();
            for edge in graph.edges() {
                prop_assert_ne!(&edge.source, &edge.target);
                prop_assert!(seen.insert(edge.key()));
            }
        }
    }
}
