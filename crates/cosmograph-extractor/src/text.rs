//! Header-based extractor for plain text and markdown
//!
//! Markdown headers form the section tree. Quoted definitions and
//! "see ..." references attach to the section they appear in.

use crate::document::{file_name, file_stem, has_extension, read_text, title_case, truncate_chars};
use crate::error::ExtractorError;
use crate::legal::{DEFINITION_CHARS, DEFINITION_RE};
use cosmograph_domain::{ExtractionStrategy, ExtractionSummary, Graph};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,6})[ \t]+(.+)$").unwrap());
static REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:see|refer to|pursuant to)\s+([A-Za-z \t\d\-]+)").unwrap());

const MIN_HEADER_CHARS: usize = 4;
const HEADER_DESCRIPTION_CHARS: usize = 100;

/// A header with its position and depth
struct Header {
    offset: usize,
    level: usize,
    id: String,
}

/// Extractor for markdown-style text documents
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new text extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract from already-loaded text
    pub fn extract_text(&self, text: &str, path: &Path, graph: &mut Graph) -> ExtractionSummary {
        let mark = graph.mark();
        let source = file_name(path);
        let stem = file_stem(path);

        let doc_id = graph.add_node(&stem, &stem, "document", &format!("Source: {}", source), &source);

        let headers = add_headers(text, &doc_id, &source, graph);
        info!("Extracted {} sections from {}", headers.len(), source);

        let enclosing = |offset: usize| -> String {
            let index = headers.partition_point(|header| header.offset < offset);
            match index {
                0 => doc_id.clone(),
                i => headers[i - 1].id.clone(),
            }
        };

        for caps in DEFINITION_RE.captures_iter(text) {
            let term = title_case(caps[1].trim());
            let length = term.chars().count();
            if length <= 2 || length >= 40 {
                continue;
            }
            let definition = truncate_chars(caps[2].trim(), DEFINITION_CHARS);
            let id = graph.add_node(&term, &term, "definition", &definition, &source);
            let parent = enclosing(caps.get(0).map_or(0, |m| m.start()));
            graph.add_edge(&parent, &id, "defines");
        }

        for caps in REFERENCE_RE.captures_iter(text) {
            let target = caps[1].trim();
            if target.chars().count() <= 2 {
                continue;
            }
            let description = format!("Referenced from {}", source);
            let id = graph.add_node(target, target, "reference", &description, &source);
            let parent = enclosing(caps.get(0).map_or(0, |m| m.start()));
            graph.add_edge(&parent, &id, "references");
        }

        let summary = ExtractionSummary::since(mark, graph, source);
        debug!("{} nodes and {} edges added", summary.nodes_added, summary.edges_added);
        summary
    }
}

/// Add header nodes, each linked from the nearest shallower header
fn add_headers(text: &str, doc_id: &str, source: &str, graph: &mut Graph) -> Vec<Header> {
    let mut headers = Vec::new();
    let mut open: Vec<(usize, String)> = Vec::new();

    for caps in HEADER_RE.captures_iter(text) {
        let level = caps[1].len();
        let title = caps[2].trim();
        if title.chars().count() < MIN_HEADER_CHARS {
            continue;
        }

        while open.last().is_some_and(|(depth, _)| *depth >= level) {
            open.pop();
        }
        let parent = open.last().map_or(doc_id, |(_, id)| id.as_str()).to_string();

        let description = truncate_chars(title, HEADER_DESCRIPTION_CHARS);
        let id = graph.add_node(title, title, "section", &description, source);
        graph.add_edge(&parent, &id, "contains");

        open.push((level, id.clone()));
        headers.push(Header {
            offset: caps.get(0).map_or(0, |m| m.start()),
            level,
            id,
        });
    }

    debug!(
        "Deepest header level in {}: {}",
        source,
        headers.iter().map(|h| h.level).max().unwrap_or(0)
    );
    headers
}

impl ExtractionStrategy for TextExtractor {
    type Error = ExtractorError;

    fn name(&self) -> &'static str {
        "text"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, &["txt", "md", "text"])
    }

    fn extract(&self, path: &Path, graph: &mut Graph) -> Result<ExtractionSummary, Self::Error> {
        let text = read_text(path)?;
        Ok(self.extract_text(&text, path, graph))
    }
}
