//! Patterns command implementation.

use crate::cli::PatternsArgs;
use crate::error::Result;
use crate::output::Formatter;
use cosmograph_extractor::PatternConfig;

/// Execute the patterns command.
///
/// Loading validates every regex; an invalid file is reported as an error.
pub fn execute_patterns(args: PatternsArgs, formatter: &Formatter) -> Result<()> {
    let config = PatternConfig::load(&args.file)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Valid configuration '{}' (version {}): {} entity pattern(s), {} relationship trigger(s)",
            config.name,
            config.version,
            config.entity_patterns.len(),
            config.relationship_triggers.len()
        ))
    );
    if !config.description.is_empty() {
        println!("{}", formatter.info(&config.description));
    }
    println!("{}", formatter.info(&format!("Minimum occurrences: {}", config.min_occurrences)));
    println!("{}", formatter.patterns_table(&config));
    Ok(())
}
