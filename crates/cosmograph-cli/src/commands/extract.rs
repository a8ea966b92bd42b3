//! Extract command implementation.

use crate::approval::PromptApproval;
use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use cosmograph_domain::{ExtractionStrategy, Graph};
use cosmograph_extractor::{AutoApprove, LlmExtractor, PatternConfig, Strategy, StrategyKind};
use cosmograph_llm::AnthropicProvider;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Execute the extract command.
pub fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}\n", formatter.heading("Cosmograph - Knowledge Graph Generator"));

    let files = collect_files(&args.input, &args.pattern)?;
    println!("{}", formatter.info(&format!("Found {} file(s) to process", files.len())));

    let kind: StrategyKind = args.extractor.as_deref().unwrap_or(&config.extractor).parse()?;
    // Only the generic extractor reads a pattern configuration
    let patterns = if kind == StrategyKind::Generic {
        load_patterns(&args, config, formatter)?
    } else {
        if args.patterns.is_some() || args.min_occurrences.is_some() {
            println!(
                "{}",
                formatter.warning(&format!("Pattern options are ignored by the {} extractor", kind))
            );
        }
        None
    };

    // Auto resolves per file; every other kind is built once
    let fixed: Option<Strategy> = match kind {
        StrategyKind::Auto => None,
        StrategyKind::Llm => Some(Strategy::Llm(build_llm(&args, config, formatter)?)),
        other => Some(Strategy::pattern(other, patterns.as_ref())?),
    };

    let mut graph = Graph::new(args.title.clone());
    for file in &files {
        let resolved;
        let strategy = match &fixed {
            Some(strategy) => strategy,
            None => {
                resolved = Strategy::pattern(kind.resolve(file), None)?;
                &resolved
            }
        };

        info!("Processing {} with {} extractor", file.display(), strategy.name());
        match strategy.extract(file, &mut graph) {
            Ok(summary) => debug!(
                "{}: {} nodes, {} edges added",
                summary.source_file, summary.nodes_added, summary.edges_added
            ),
            Err(e) if e.is_declined() => {
                println!("{}", formatter.warning("LLM extraction declined by operator"));
                return Ok(());
            }
            Err(e) => {
                eprintln!("{}", formatter.warning(&format!("Failed to process {}: {}", display_name(file), e)));
            }
        }
    }

    write_snapshot(&graph, &args.output)?;
    println!("{}", formatter.success(&format!("Generated {}", args.output.display())));

    let stats = graph.stats();
    println!("{}", formatter.stats_table(&stats));
    if !stats.category_counts.is_empty() {
        println!("{}", formatter.categories_table(&stats));
    }

    Ok(())
}

/// The input file itself, or the directory's files whose names match `pattern`.
pub fn collect_files(input: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(CliError::InvalidInput(format!(
            "Input path does not exist: {}",
            input.display()
        )));
    }
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let matcher = glob::Pattern::new(pattern)
        .map_err(|e| CliError::InvalidInput(format!("Invalid file pattern '{}': {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| matcher.matches(name));
        if path.is_file() && matches {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(CliError::NoInput {
            pattern: pattern.to_string(),
            dir: input.display().to_string(),
        });
    }

    files.sort();
    Ok(files)
}

fn load_patterns(args: &ExtractArgs, config: &Config, formatter: &Formatter) -> Result<Option<PatternConfig>> {
    let loaded = match &args.patterns {
        Some(path) => {
            let patterns = PatternConfig::load(path)?;
            println!(
                "{}",
                formatter.info(&format!(
                    "Loaded {} patterns from {}",
                    patterns.entity_patterns.len(),
                    display_name(path)
                ))
            );
            Some(patterns)
        }
        None => None,
    };

    match args.min_occurrences.or(config.min_occurrences) {
        Some(0) => Err(CliError::InvalidInput("--min-occurrences must be at least 1".to_string())),
        Some(threshold) => {
            let base = match loaded {
                Some(patterns) => patterns,
                None => PatternConfig::default_patterns()?,
            };
            Ok(Some(base.with_min_occurrences(threshold)))
        }
        None => Ok(loaded),
    }
}

fn build_llm(args: &ExtractArgs, config: &Config, formatter: &Formatter) -> Result<LlmExtractor<AnthropicProvider>> {
    let provider = match &args.api_key {
        Some(key) => AnthropicProvider::new(key.clone())?,
        None => AnthropicProvider::from_env()?,
    };

    let mut llm_config = config.llm.clone();
    if let Some(model) = &args.model {
        llm_config = llm_config.with_model(model.clone());
    }
    llm_config.validate().map_err(CliError::Config)?;

    let extractor = LlmExtractor::new(provider, llm_config);
    if args.no_confirm {
        println!("{}", formatter.warning("Cost confirmation disabled (--no-confirm)"));
        Ok(extractor.with_approval(AutoApprove))
    } else {
        Ok(extractor.with_approval(PromptApproval::new(formatter.color_enabled())))
    }
}

fn write_snapshot(graph: &Graph, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&graph.serialize())?;
    fs::write(output, json)?;
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmograph_domain::GraphSnapshot;
    use tempfile::TempDir;

    fn docs() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_code.txt"), "TITLE 2 - COURTS\n").unwrap();
        fs::write(dir.path().join("a_code.txt"), "TITLE 1 - GENERAL\n").unwrap();
        fs::write(dir.path().join("notes.md"), "# Heading Here\n").unwrap();
        dir
    }

    fn args(input: &Path, output: &Path) -> ExtractArgs {
        ExtractArgs {
            input: input.to_path_buf(),
            extractor: None,
            pattern: "*.txt".to_string(),
            patterns: None,
            min_occurrences: None,
            model: None,
            no_confirm: false,
            api_key: None,
            output: output.to_path_buf(),
            title: "Test Graph".to_string(),
        }
    }

    #[test]
    fn test_collect_files_filters_and_sorts() {
        let dir = docs();
        let files = collect_files(dir.path(), "*.txt").unwrap();
        let names: Vec<String> = files.iter().map(|f| display_name(f)).collect();
        assert_eq!(names, ["a_code.txt", "b_code.txt"]);
    }

    #[test]
    fn test_collect_single_file() {
        let dir = docs();
        let file = dir.path().join("notes.md");
        assert_eq!(collect_files(&file, "*.txt").unwrap(), vec![file]);
    }

    #[test]
    fn test_collect_no_matches() {
        let dir = docs();
        assert!(matches!(
            collect_files(dir.path(), "*.pdf"),
            Err(CliError::NoInput { .. })
        ));
        assert!(matches!(
            collect_files(&dir.path().join("missing"), "*.txt"),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_extract_writes_snapshot() {
        let dir = docs();
        let output = dir.path().join("out").join("graph.json");

        execute_extract(args(dir.path(), &output), &Config::default(), &Formatter::new(false)).unwrap();

        let snapshot: GraphSnapshot = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(snapshot.title, "Test Graph");
        assert!(snapshot.nodes.iter().any(|n| n.id == "Title 1 - General"));
        assert!(snapshot.nodes.iter().any(|n| n.id == "Title 2 - Courts"));
        assert_eq!(snapshot.stats.node_count, 4);
    }

    #[test]
    fn test_extract_continues_past_unsupported_files() {
        let dir = docs();
        let output = dir.path().join("graph.json");
        let mut args = args(dir.path(), &output);
        args.extractor = Some("pdf".to_string());

        execute_extract(args, &Config::default(), &Formatter::new(false)).unwrap();

        let snapshot: GraphSnapshot = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert!(snapshot.nodes.is_empty());
    }

    #[test]
    fn test_min_occurrences_applies_to_defaults() {
        let dir = docs();
        let mut args = args(dir.path(), &dir.path().join("graph.json"));
        args.min_occurrences = Some(5);

        let patterns = load_patterns(&args, &Config::default(), &Formatter::new(false))
            .unwrap()
            .unwrap();
        assert_eq!(patterns.min_occurrences, 5);
        assert_eq!(patterns.name, "default");

        args.min_occurrences = Some(0);
        assert!(load_patterns(&args, &Config::default(), &Formatter::new(false)).is_err());
    }

    #[test]
    fn test_pattern_options_ignored_outside_generic() {
        let dir = docs();
        let output = dir.path().join("graph.json");
        let mut args = args(dir.path(), &output);
        args.extractor = Some("legal".to_string());
        args.patterns = Some(dir.path().join("missing_patterns.toml"));
        args.min_occurrences = Some(0);

        execute_extract(args, &Config::default(), &Formatter::new(false)).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_generic_loads_pattern_file() {
        let dir = docs();
        let mut args = args(dir.path(), &dir.path().join("graph.json"));
        args.extractor = Some("generic".to_string());
        args.patterns = Some(dir.path().join("missing_patterns.toml"));

        let result = execute_extract(args, &Config::default(), &Formatter::new(false));
        assert!(matches!(result, Err(CliError::Pattern(_))));
    }

    #[test]
    fn test_unknown_extractor() {
        let dir = docs();
        let mut args = args(dir.path(), &dir.path().join("graph.json"));
        args.extractor = Some("ocr".to_string());

        let result = execute_extract(args, &Config::default(), &Formatter::new(false));
        assert!(matches!(result, Err(CliError::Extractor(_))));
    }
}
