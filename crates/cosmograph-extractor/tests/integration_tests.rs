//! Integration tests for cosmograph-extractor
//!
//! These tests drive extraction from files on disk through the public API
//! and check the resulting graph snapshot.

use cosmograph_domain::{ExtractionStrategy, Graph};
use cosmograph_extractor::{
    AutoApprove, ConfigFormat, ExtractorError, GenericExtractor, LlmExtractor, LlmExtractorConfig, PatternConfig,
    PatternConfigError, Strategy, StrategyKind,
};
use cosmograph_llm::{LlmError, MockProvider};
use std::path::PathBuf;
use tempfile::TempDir;

const CONSTITUTION: &str = "\
CONSTITUTION OF THE EXAMPLE TRIBE

ARTICLE I — TERRITORY
SECTION 1. The jurisdiction of the tribe extends to all lands within the reservation.

ARTICLE II — MEMBERSHIP
SECTION 1. \"Member\" means a person enrolled under this article.
SECTION 2. The Tribal Council shall keep the membership roll.
";

const ORDINANCE: &str = "\
Section 1. Short title
This ordinance may be cited as the Water Ordinance.
Section 2: Permits required
No person shall divert water without a permit from the Tribal Council.
";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_constitution_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "constitution.txt", CONSTITUTION);

    let mut graph = Graph::new("Tribal Law");
    let strategy = Strategy::<MockProvider>::pattern(StrategyKind::Auto.resolve(&path), None).unwrap();
    strategy.extract(&path, &mut graph).unwrap();

    let snapshot = graph.serialize();
    assert_eq!(snapshot.title, "Tribal Law");
    assert_eq!(snapshot.stats.node_count, graph.node_count());

    let json = serde_json::to_value(&snapshot).unwrap();
    let edges = json["edges"].as_array().unwrap();
    assert!(edges.iter().any(|e| e["source"] == "Article II"
        && e["target"] == "Article II Section 1"
        && e["type"] == "contains"));
    assert!(edges
        .iter()
        .any(|e| e["source"] == "Article II Section 1" && e["target"] == "Member" && e["type"] == "defines"));
    assert!(edges
        .iter()
        .any(|e| e["source"] == "constitution" && e["target"] == "Tribal Council" && e["type"] == "references"));
}

#[test]
fn test_ordinance_sections_do_not_collide_across_files() {
    let dir = tempfile::tempdir().unwrap();
    let water = write(&dir, "water_ordinance.txt", ORDINANCE);
    let fishing = write(&dir, "fishing_ordinance.txt", ORDINANCE);

    let strategy = Strategy::<MockProvider>::pattern(StrategyKind::Legal, None).unwrap();
    let mut graph = Graph::default();
    strategy.extract(&water, &mut graph).unwrap();
    strategy.extract(&fishing, &mut graph).unwrap();

    assert!(graph.node("water_ordinancetxt Sec 1").is_some());
    assert!(graph.node("fishing_ordinancetxt Sec 1").is_some());
    // Both documents reference the same authority node
    assert!(graph.contains_edge("water_ordinance", "Tribal Council", "references"));
    assert!(graph.contains_edge("fishing_ordinance", "Tribal Council", "references"));
}

#[test]
fn test_json_pattern_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write(
        &dir,
        "patterns.json",
        r#"{
            "name": "statutes",
            "min_occurrences": 2,
            "entity_patterns": [
                {"name": "usc", "pattern": "(\\d+ U\\.S\\.C\\. \\d+)", "category": "statute"}
            ]
        }"#,
    );
    assert_eq!(ConfigFormat::from_path(&config_path), ConfigFormat::Json);

    let doc = write(&dir, "brief.md", "See 25 U.S.C. 1302 and again 25 U.S.C. 1302, but 18 U.S.C. 1153 once.");
    let config = PatternConfig::load(&config_path).unwrap();
    let extractor = GenericExtractor::new(&config).unwrap();

    let mut graph = Graph::default();
    let summary = extractor.extract(&doc, &mut graph).unwrap();

    assert_eq!(summary.nodes_added, 2);
    let statute = graph.node("25 USC 1302").unwrap();
    assert_eq!(statute.label, "25 U.S.C. 1302");
    assert_eq!(statute.category, "statute");
    assert!(graph.node("18 USC 1153").is_none());
}

#[test]
fn test_empty_and_malformed_configs() {
    let dir = tempfile::tempdir().unwrap();

    let empty = write(&dir, "empty.toml", "   \n");
    assert!(matches!(PatternConfig::load(&empty), Err(PatternConfigError::Empty { .. })));

    let malformed = write(&dir, "broken.toml", "entity_patterns = [");
    assert!(matches!(
        PatternConfig::load(&malformed),
        Err(PatternConfigError::Malformed { .. })
    ));

    let missing = dir.path().join("missing.toml");
    assert!(matches!(PatternConfig::load(&missing), Err(PatternConfigError::Io { .. })));
}

#[test]
fn test_generic_over_unsupported_extension() {
    let strategy = Strategy::<MockProvider>::pattern(StrategyKind::Generic, None).unwrap();
    let mut graph = Graph::default();

    let result = strategy.extract(std::path::Path::new("scan.tiff"), &mut graph);
    assert!(matches!(result, Err(ExtractorError::UnsupportedFile { .. })));
}

#[test]
fn test_llm_batch_with_rate_limit() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(&dir, "one.txt", "The Council appoints the Judge.");
    let second = write(&dir, "two.txt", "The Judge reports to the Council.");

    let provider = MockProvider::new(
        r#"{"entities": [
            {"id": "council", "name": "Council", "category": "government_body", "description": "Appoints judges"},
            {"id": "judge", "name": "Judge", "category": "person", "description": ""}
        ], "relationships": [
            {"source_id": "council", "target_id": "judge", "relationship_type": "authorizes"},
            {"source_id": "judge", "target_id": "judge", "relationship_type": "reports_to"}
        ]}"#,
    );
    provider.push_error(LlmError::RateLimited { retry_after: None });

    let extractor = LlmExtractor::new(provider.clone(), LlmExtractorConfig::default())
        .with_approval(AutoApprove)
        .with_sleep(|_| {});
    let strategy = Strategy::Llm(extractor);

    let mut graph = Graph::default();
    let first_summary = strategy.extract(&first, &mut graph).unwrap();
    let second_summary = strategy.extract(&second, &mut graph).unwrap();

    assert_eq!((first_summary.nodes_added, first_summary.edges_added), (2, 1));
    assert_eq!((second_summary.nodes_added, second_summary.edges_added), (0, 0));
    // One rate-limited attempt plus one call per file
    assert_eq!(provider.call_count(), 3);
    assert_eq!(graph.node("council").unwrap().source_file, "one.txt");
}
