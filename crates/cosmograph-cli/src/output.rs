//! Output formatting for the CLI.

use colored::*;
use cosmograph_domain::GraphStats;
use cosmograph_extractor::PatternConfig;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Whether color output is on.
    pub fn color_enabled(&self) -> bool {
        self.color_enabled
    }

    /// Format graph totals as a table.
    pub fn stats_table(&self, stats: &GraphStats) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        builder.push_record(["Total Nodes".to_string(), stats.node_count.to_string()]);
        builder.push_record(["Total Edges".to_string(), stats.edge_count.to_string()]);
        self.finish(builder)
    }

    /// Format node counts per category, largest first.
    pub fn categories_table(&self, stats: &GraphStats) -> String {
        if stats.category_counts.is_empty() {
            return self.colorize("No categories.", "yellow");
        }

        let mut counts: Vec<(&String, &usize)> = stats.category_counts.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        let mut builder = Builder::default();
        builder.push_record(["Category", "Count"]);
        for (category, count) in counts {
            builder.push_record([category.clone(), count.to_string()]);
        }
        self.finish(builder)
    }

    /// Format the entity patterns of a configuration.
    pub fn patterns_table(&self, config: &PatternConfig) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Name", "Category", "Min Length", "Pattern"]);
        for pattern in &config.entity_patterns {
            builder.push_record([
                pattern.name.clone(),
                pattern.category.clone(),
                pattern.min_length.to_string(),
                pattern.pattern.clone(),
            ]);
        }
        self.finish(builder)
    }

    fn finish(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a heading.
    pub fn heading(&self, message: &str) -> String {
        if self.color_enabled {
            message.bold().cyan().to_string()
        } else {
            message.to_string()
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
