//! Hierarchical extractor for legal documents
//!
//! Classifies a document as a constitution, code or ordinance and walks its
//! structural units in document order. Units are `contains`-linked from
//! their parent, quoted definitions are `defines`-linked from the unit they
//! appear in, and well-known authorities are `references`-linked from the
//! document.

use crate::document::{file_name, file_stem, has_extension, read_text, title_case, truncate_chars};
use crate::error::ExtractorError;
use cosmograph_domain::{ExtractionStrategy, ExtractionSummary, Graph};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

static ARTICLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ARTICLE\s+([IVX]+)[—\-\s]+([A-Z][A-Z \t]*)").unwrap());
static CONSTITUTION_SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:SECTION|SEC\.?)\s+(\d+)\.").unwrap());
static ORDINANCE_SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Section\s+(\d+)[.:\s]+([A-Za-z][A-Za-z \t]*)").unwrap());
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"TITLE\s+([IVXLC\d]+)[:\s—\-]+([A-Z][A-Z \t]*)").unwrap());
static CHAPTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CHAPTER\s+([IVXLC\d]+)[,:\s—\-]+([A-Z][A-Z \t]*)").unwrap());
static OFFENSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:guilty of|commits?) (?:the offense of |an offense of )?([A-Za-z\s]+?)(?:\s+if|\s+when|\s+shall)",
    )
    .unwrap()
});
pub(crate) static DEFINITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([A-Za-z\s]+)"\s+(?:means|shall mean|is defined as)\s+([^.]+)"#).unwrap()
});

/// Authorities referenced by most tribal legal documents
const KEY_ENTITIES: [(&str, &str, &str); 4] = [
    ("Tribal Council", "authority", "Governing body of the tribe"),
    ("Tribal Court", "authority", "Judicial body of the tribe"),
    ("Tribal Chairman", "authority", "Elected leader"),
    ("Chief Judge", "authority", "Head of court system"),
];

const TYPE_SNIFF_CHARS: usize = 2_000;
const UNIT_NAME_CHARS: usize = 40;
const SECTION_TITLE_CHARS: usize = 50;
pub(crate) const DEFINITION_CHARS: usize = 100;

/// Kind of legal document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    /// Articles and sections
    Constitution,
    /// Titles, chapters, offenses and definitions
    Code,
    /// Numbered sections
    Ordinance,
}

impl DocumentType {
    /// Classify by file name and the opening text
    pub fn detect(name: &str, text: &str) -> Self {
        let name = name.to_lowercase();
        let opening = truncate_chars(text, TYPE_SNIFF_CHARS).to_lowercase();

        if name.contains("constitution") || opening.contains("constitution") {
            DocumentType::Constitution
        } else if name.contains("ordinance") {
            DocumentType::Ordinance
        } else {
            DocumentType::Code
        }
    }

    /// Category of the document node
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Constitution => "constitution",
            DocumentType::Code => "code",
            DocumentType::Ordinance => "ordinance",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A match positioned in the document
enum Unit {
    Article { number: String, name: String },
    Section { number: String },
    OrdinanceSection { number: String, name: String },
    Title { number: String, name: String },
    Chapter { number: String, name: String },
    Offense { name: String },
    Definition { term: String, definition: String },
}

/// Extractor for constitutions, codes and ordinances
#[derive(Debug, Clone, Copy, Default)]
pub struct LegalExtractor;

impl LegalExtractor {
    /// Create a new legal extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract from already-loaded text
    ///
    /// `path` only supplies the document name; nothing is read from it.
    pub fn extract_text(&self, text: &str, path: &Path, graph: &mut Graph) -> ExtractionSummary {
        let mark = graph.mark();
        let source = file_name(path);
        let stem = file_stem(path);

        let doc_type = DocumentType::detect(&stem, text);
        info!("Extracting {} as {} document", source, doc_type);

        let doc_id = graph.add_node(
            &stem,
            &stem,
            doc_type.as_str(),
            &format!("Legal document: {}", source),
            &source,
        );

        let units = collect_units(text, doc_type);
        debug!("Found {} structural matches in {}", units.len(), source);
        apply_units(units, &doc_id, &source, graph);

        add_key_entities(text, &doc_id, graph);

        ExtractionSummary::since(mark, graph, source)
    }
}

/// All units of the document type, in document order
fn collect_units(text: &str, doc_type: DocumentType) -> Vec<(usize, Unit)> {
    let mut units = Vec::new();

    match doc_type {
        DocumentType::Constitution => {
            for caps in ARTICLE_RE.captures_iter(text) {
                units.push((
                    caps.get(0).map_or(0, |m| m.start()),
                    Unit::Article {
                        number: caps[1].to_string(),
                        name: title_case(caps[2].trim()),
                    },
                ));
            }
            for caps in CONSTITUTION_SECTION_RE.captures_iter(text) {
                units.push((
                    caps.get(0).map_or(0, |m| m.start()),
                    Unit::Section {
                        number: caps[1].to_string(),
                    },
                ));
            }
        }
        DocumentType::Ordinance => {
            for caps in ORDINANCE_SECTION_RE.captures_iter(text) {
                units.push((
                    caps.get(0).map_or(0, |m| m.start()),
                    Unit::OrdinanceSection {
                        number: caps[1].to_string(),
                        name: truncate_chars(caps[2].trim(), SECTION_TITLE_CHARS),
                    },
                ));
            }
        }
        DocumentType::Code => {
            for caps in TITLE_RE.captures_iter(text) {
                units.push((
                    caps.get(0).map_or(0, |m| m.start()),
                    Unit::Title {
                        number: caps[1].to_string(),
                        name: truncate_chars(&title_case(caps[2].trim()), UNIT_NAME_CHARS),
                    },
                ));
            }
            for caps in CHAPTER_RE.captures_iter(text) {
                units.push((
                    caps.get(0).map_or(0, |m| m.start()),
                    Unit::Chapter {
                        number: caps[1].to_string(),
                        name: truncate_chars(&title_case(caps[2].trim()), UNIT_NAME_CHARS),
                    },
                ));
            }
            for caps in OFFENSE_RE.captures_iter(text) {
                let name = title_case(caps[1].trim());
                let length = name.chars().count();
                if length > 5 && length < 50 {
                    units.push((caps.get(0).map_or(0, |m| m.start()), Unit::Offense { name }));
                }
            }
        }
    }

    for caps in DEFINITION_RE.captures_iter(text) {
        let term = title_case(caps[1].trim());
        let length = term.chars().count();
        if length > 2 && length < 40 {
            units.push((
                caps.get(0).map_or(0, |m| m.start()),
                Unit::Definition {
                    term,
                    definition: truncate_chars(caps[2].trim(), DEFINITION_CHARS),
                },
            ));
        }
    }

    // Stable: equal offsets keep pattern order
    units.sort_by_key(|(offset, _)| *offset);
    units
}

/// Add units to the graph, linking each to its enclosing unit
fn apply_units(units: Vec<(usize, Unit)>, doc_id: &str, source: &str, graph: &mut Graph) {
    // Most recent article or title, and most recent unit of any level
    let mut top: Option<String> = None;
    let mut innermost: Option<String> = None;

    for (_, unit) in units {
        match unit {
            Unit::Article { number, name } => {
                let label = format!("Article {} - {}", number, name);
                let id = graph.add_node(&format!("Article {}", number), &label, "article", &name, source);
                graph.add_edge(doc_id, &id, "contains");
                top = Some(id.clone());
                innermost = Some(id);
            }
            Unit::Section { number } => {
                let parent = top.as_deref().unwrap_or(doc_id).to_string();
                let raw_id = match &top {
                    Some(article) => format!("{} Section {}", article, number),
                    None => format!("Section {}", number),
                };
                let label = format!("Section {}", number);
                let id = graph.add_node(&raw_id, &label, "section", "", source);
                graph.add_edge(&parent, &id, "contains");
                innermost = Some(id);
            }
            Unit::OrdinanceSection { number, name } => {
                let label = format!("Section {} - {}", number, name);
                let id = graph.add_node(&format!("{} Sec {}", source, number), &label, "section", &name, source);
                graph.add_edge(doc_id, &id, "contains");
                innermost = Some(id);
            }
            Unit::Title { number, name } => {
                let label = format!("Title {} - {}", number, name);
                let id = graph.add_node(&label, &label, "title", &name, source);
                graph.add_edge(doc_id, &id, "contains");
                top = Some(id.clone());
                innermost = Some(id);
            }
            Unit::Chapter { number, name } => {
                let label = format!("Chapter {} - {}", number, name);
                let id = graph.add_node(&label, &label, "chapter", &name, source);
                graph.add_edge(top.as_deref().unwrap_or(doc_id), &id, "contains");
                innermost = Some(id);
            }
            Unit::Offense { name } => {
                let description = format!("Offense defined in {}", source);
                let id = graph.add_node(&name, &name, "offense", &description, source);
                graph.add_edge(doc_id, &id, "defines");
            }
            Unit::Definition { term, definition } => {
                let id = graph.add_node(&term, &term, "definition", &definition, source);
                graph.add_edge(innermost.as_deref().unwrap_or(doc_id), &id, "defines");
            }
        }
    }
}

fn add_key_entities(text: &str, doc_id: &str, graph: &mut Graph) {
    let lowered = text.to_lowercase();
    for (name, category, description) in KEY_ENTITIES {
        if lowered.contains(&name.to_lowercase()) {
            let id = graph.add_node(name, name, category, description, "");
            graph.add_edge(doc_id, &id, "references");
        }
    }
}

impl ExtractionStrategy for LegalExtractor {
    type Error = ExtractorError;

    fn name(&self) -> &'static str {
        "legal"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, &["txt", "md"])
    }

    fn extract(&self, path: &Path, graph: &mut Graph) -> Result<ExtractionSummary, Self::Error> {
        let text = read_text(path)?;
        Ok(self.extract_text(&text, path, graph))
    }
}
