//! Scenario tests across strategies sharing one graph

#[cfg(test)]
mod tests {
    use crate::pdf::tests::make_test_pdf;
    use crate::{
        ApprovalRequest, AutoApprove, ExtractorError, GenericExtractor, LegalExtractor, LlmExtractor, LlmExtractorConfig,
        PatternConfig, Strategy, StrategyKind, TextExtractor,
    };
    use cosmograph_domain::{ExtractionStrategy, Graph};
    use cosmograph_llm::{LlmError, MockProvider};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_title_and_definition_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "tribal_code.txt", "TITLE I — DEFINITIONS\n\n\"Council\" means the governing body.\n".as_bytes());

        let mut graph = Graph::default();
        let summary = LegalExtractor::new().extract(&path, &mut graph).unwrap();

        assert_eq!(summary.source_file, "tribal_code.txt");
        assert_eq!((summary.nodes_added, summary.edges_added), (3, 2));
        assert!(graph.contains_edge("tribal_code", "Title I - Definitions", "contains"));
        assert!(graph.contains_edge("Title I - Definitions", "Council", "defines"));
        assert_eq!(graph.node("Council").unwrap().source_file, "tribal_code.txt");
    }

    #[test]
    fn test_rerun_over_same_file_adds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "notes.md", b"# Overview\n## Details\n\"Quorum\" means a majority of members.\n");

        let extractor = TextExtractor::new();
        let mut graph = Graph::default();
        extractor.extract(&path, &mut graph).unwrap();
        let (nodes, edges) = (graph.node_count(), graph.edge_count());

        let summary = extractor.extract(&path, &mut graph).unwrap();
        assert_eq!((summary.nodes_added, summary.edges_added), (0, 0));
        assert_eq!((graph.node_count(), graph.edge_count()), (nodes, edges));
    }

    #[test]
    fn test_strategies_share_one_graph() {
        let dir = tempfile::tempdir().unwrap();
        let code = write(&dir, "code.txt", b"The Tribal Council meets monthly.\n");
        let notes = write(&dir, "notes.md", b"# Tribal Council\nSee the minutes.\n");

        let mut graph = Graph::default();
        LegalExtractor::new().extract(&code, &mut graph).unwrap();
        TextExtractor::new().extract(&notes, &mut graph).unwrap();

        // First write wins: the legal extractor created the node
        let council = graph.node("Tribal Council").unwrap();
        assert_eq!(council.category, "authority");
        assert!(graph.contains_edge("code", "Tribal Council", "references"));
        assert!(graph.contains_edge("notes", "Tribal Council", "contains"));
        assert_eq!(graph.nodes().iter().filter(|n| n.id == "Tribal Council").count(), 1);
    }

    #[test]
    fn test_occurrence_threshold_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write(
            &dir,
            "patterns.toml",
            br#"
name = "agencies"
min_occurrences = 3

[[entity_patterns]]
name = "agency"
pattern = '\b(BIA|IHS|EPA)\b'
category = "agency"
"#,
        );
        let doc = write(&dir, "report.txt", b"BIA, BIA and BIA. IHS and IHS. EPA.");

        let config = PatternConfig::load(&config_path).unwrap();
        let extractor = GenericExtractor::new(&config).unwrap();
        let mut graph = Graph::default();
        extractor.extract(&doc, &mut graph).unwrap();

        assert_eq!(graph.node("BIA").unwrap().description, "Occurs 3 times");
        assert!(graph.node("IHS").is_none());
        assert!(graph.node("EPA").is_none());
    }

    #[test]
    fn test_two_capture_groups_rejected_before_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write(
            &dir,
            "bad.toml",
            br#"
[[entity_patterns]]
name = "pair"
pattern = '(\w+) of (\w+)'
category = "pair"
"#,
        );

        let result = PatternConfig::load(&config_path);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("pair"));
        assert!(message.contains("exactly one capture group"));
    }

    #[test]
    fn test_auto_dispatch_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let text = write(&dir, "law.txt", b"TITLE 2 - COURTS\n");
        let pdf = write(
            &dir,
            "law_two.pdf",
            &make_test_pdf(&["TITLE 3 - ELECTIONS", "The Tribal Chairman is elected by the members every four years"]),
        );

        let mut graph = Graph::default();
        for path in [&text, &pdf] {
            let kind = StrategyKind::Auto.resolve(path);
            let strategy = Strategy::<MockProvider>::pattern(kind, None).unwrap();
            strategy.extract(path, &mut graph).unwrap();
        }

        assert!(graph.contains_edge("law", "Title 2 - Courts", "contains"));
        assert!(graph.contains_edge("law_two", "Title 3 - Elections", "contains"));
        assert!(graph.contains_edge("law_two", "Tribal Chairman", "references"));
    }

    #[test]
    fn test_declined_llm_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "memo.txt", b"Private memo about the council.");

        let provider = MockProvider::default();
        let extractor = LlmExtractor::new(provider.clone(), LlmExtractorConfig::default())
            .with_approval(|_: &ApprovalRequest| false);
        let strategy = Strategy::Llm(extractor);

        let mut graph = Graph::default();
        let error = strategy.extract(&path, &mut graph).unwrap_err();

        assert!(error.is_declined());
        assert_eq!(provider.call_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_llm_over_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "charter.pdf",
            &make_test_pdf(&["The Tribal Court hears all civil disputes arising within the reservation boundaries"]),
        );

        let provider = MockProvider::new(
            r#"{"entities": [{"id": "tribal_court", "name": "Tribal Court", "category": "government_body", "description": "Hears civil disputes"}], "relationships": []}"#,
        );
        let extractor = LlmExtractor::new(provider.clone(), LlmExtractorConfig::default())
            .with_approval(AutoApprove)
            .with_sleep(|_| {});

        let mut graph = Graph::default();
        let summary = extractor.extract(&path, &mut graph).unwrap();

        assert_eq!(summary.nodes_added, 1);
        assert_eq!(graph.node("tribal_court").unwrap().source_file, "charter.pdf");
        assert!(provider.requests()[0].content.contains("Tribal Court"));
    }

    #[test]
    fn test_llm_error_keeps_earlier_results() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(&dir, "a.txt", b"first");
        let second = write(&dir, "b.txt", b"second");

        let provider = MockProvider::new(
            r#"{"entities": [{"id": "a", "name": "A", "category": "x", "description": ""}], "relationships": []}"#,
        );
        let extractor = LlmExtractor::new(provider.clone(), LlmExtractorConfig::default())
            .with_approval(AutoApprove)
            .with_sleep(|_| {});

        let mut graph = Graph::default();
        extractor.extract(&first, &mut graph).unwrap();
        provider.push_error(LlmError::Api {
            status: 500,
            message: "overloaded".to_string(),
        });
        let result = extractor.extract(&second, &mut graph);

        assert!(matches!(result, Err(ExtractorError::Llm(LlmError::Api { status: 500, .. }))));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut graph = Graph::default();
        let result = LegalExtractor::new().extract(Path::new("/nonexistent/code.txt"), &mut graph);
        assert!(matches!(result, Err(ExtractorError::Io { .. })));
        assert!(graph.is_empty());
    }
}
