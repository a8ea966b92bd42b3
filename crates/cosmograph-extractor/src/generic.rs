//! Configurable pattern extractor
//!
//! Counts every pattern's captured values across the document and keeps
//! only values that occur at least `min_occurrences` times. Single matches
//! are mostly fragments of surrounding text, so the threshold doubles as a
//! noise filter.

use crate::document::{file_name, file_stem, has_extension, read_text};
use crate::error::ExtractorError;
use crate::patterns::PatternConfig;
use cosmograph_domain::{ExtractionStrategy, ExtractionSummary, Graph};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// A validated, compiled entity pattern
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Pattern name
    pub name: String,

    /// Category of produced nodes
    pub category: String,

    /// Minimum captured length (characters)
    pub min_length: usize,

    regex: Regex,
}

/// Extractor driven by a [`PatternConfig`]
#[derive(Debug, Clone)]
pub struct GenericExtractor {
    patterns: Vec<CompiledPattern>,
    min_occurrences: usize,
}

impl GenericExtractor {
    /// Build an extractor from a configuration, validating it first
    pub fn new(config: &PatternConfig) -> Result<Self, ExtractorError> {
        config.validate()?;

        let patterns = config
            .entity_patterns
            .iter()
            .map(|pattern| -> Result<CompiledPattern, ExtractorError> {
                Ok(CompiledPattern {
                    name: pattern.name.clone(),
                    category: pattern.category.clone(),
                    min_length: pattern.min_length,
                    regex: pattern.compile()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Compiled {} patterns from configuration '{}'",
            patterns.len(),
            config.name
        );

        Ok(Self {
            patterns,
            min_occurrences: config.min_occurrences,
        })
    }

    /// Extractor using the bundled default patterns
    pub fn with_defaults() -> Result<Self, ExtractorError> {
        Self::new(&PatternConfig::default_patterns()?)
    }

    /// Occurrence threshold in effect
    pub fn min_occurrences(&self) -> usize {
        self.min_occurrences
    }

    /// Compiled patterns in configuration order
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Extract from already-loaded text
    pub fn extract_text(&self, text: &str, path: &Path, graph: &mut Graph) -> ExtractionSummary {
        let mark = graph.mark();
        let source = file_name(path);
        let stem = file_stem(path);

        let doc_id = graph.add_node(&stem, &stem, "document", &format!("Source: {}", source), &source);

        for pattern in &self.patterns {
            let counted = count_matches(pattern, text);
            let mut kept = 0;

            for (entity, count) in counted {
                if count < self.min_occurrences {
                    continue;
                }
                let description = format!("Occurs {} times", count);
                let id = graph.add_node(&entity, &entity, &pattern.category, &description, &source);
                graph.add_edge(&doc_id, &id, "mentions");
                kept += 1;
            }

            debug!("Pattern '{}' produced {} entities", pattern.name, kept);
        }

        let summary = ExtractionSummary::since(mark, graph, source);
        info!(
            "Extracted {} nodes and {} edges from {}",
            summary.nodes_added, summary.edges_added, summary.source_file
        );
        summary
    }
}

/// Captured values with their counts, in order of first occurrence
fn count_matches(pattern: &CompiledPattern, text: &str) -> Vec<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for caps in pattern.regex.captures_iter(text) {
        let Some(value) = caps.get(1) else {
            continue;
        };
        let entity = value.as_str().trim();
        if entity.chars().count() < pattern.min_length {
            continue;
        }

        match index.get(entity) {
            Some(&position) => order[position].1 += 1,
            None => {
                index.insert(entity.to_string(), order.len());
                order.push((entity.to_string(), 1));
            }
        }
    }

    order
}

impl ExtractionStrategy for GenericExtractor {
    type Error = ExtractorError;

    fn name(&self) -> &'static str {
        "generic"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, &["txt", "md", "text"])
    }

    fn extract(&self, path: &Path, graph: &mut Graph) -> Result<ExtractionSummary, Self::Error> {
        let text = read_text(path)?;
        Ok(self.extract_text(&text, path, graph))
    }
}
