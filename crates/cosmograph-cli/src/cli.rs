//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cosmograph - build knowledge graphs from documents.
#[derive(Debug, Parser)]
#[command(name = "cosmograph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.cosmograph/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract a graph from a file or directory
    Extract(ExtractArgs),

    /// Show statistics for a saved graph
    Stats(StatsArgs),

    /// Validate a pattern configuration
    Patterns(PatternsArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Input file or directory
    pub input: PathBuf,

    /// Extractor: auto, legal, text, generic, pdf, llm
    #[arg(short, long)]
    pub extractor: Option<String>,

    /// File name pattern when the input is a directory
    #[arg(short, long, default_value = "*.txt")]
    pub pattern: String,

    /// Pattern configuration file (generic extractor)
    #[arg(long)]
    pub patterns: Option<PathBuf>,

    /// Minimum occurrences for generic entities
    #[arg(long)]
    pub min_occurrences: Option<usize>,

    /// Language model identifier (llm extractor)
    #[arg(long)]
    pub model: Option<String>,

    /// Skip the cost confirmation prompt (llm extractor)
    #[arg(long)]
    pub no_confirm: bool,

    /// API key for the language-model provider
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output file for the graph snapshot
    #[arg(short, long, default_value = "graph.json")]
    pub output: PathBuf,

    /// Graph title
    #[arg(short, long, default_value = "Knowledge Graph")]
    pub title: String,
}

/// Arguments for the stats command.
#[derive(Debug, Parser)]
pub struct StatsArgs {
    /// Saved graph snapshot (JSON)
    pub graph: PathBuf,
}

/// Arguments for the patterns command.
#[derive(Debug, Parser)]
pub struct PatternsArgs {
    /// Pattern configuration file (TOML or JSON)
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_defaults() {
        let cli = Cli::try_parse_from(["cosmograph", "extract", "docs"]).unwrap();
        let Command::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.input, PathBuf::from("docs"));
        assert_eq!(args.pattern, "*.txt");
        assert_eq!(args.output, PathBuf::from("graph.json"));
        assert_eq!(args.title, "Knowledge Graph");
        assert!(args.extractor.is_none());
        assert!(!args.no_confirm);
    }

    #[test]
    fn test_extract_flags() {
        let cli = Cli::try_parse_from([
            "cosmograph",
            "-v",
            "extract",
            "docs",
            "-e",
            "llm",
            "-p",
            "*.md",
            "--model",
            "claude-haiku-4-5",
            "--no-confirm",
            "--min-occurrences",
            "3",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Command::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.extractor.as_deref(), Some("llm"));
        assert_eq!(args.pattern, "*.md");
        assert_eq!(args.model.as_deref(), Some("claude-haiku-4-5"));
        assert_eq!(args.min_occurrences, Some(3));
        assert!(args.no_confirm);
    }
}
