//! Stats command implementation.

use crate::cli::StatsArgs;
use crate::error::Result;
use crate::output::Formatter;
use cosmograph_domain::GraphSnapshot;
use std::fs;
use std::path::Path;

/// Execute the stats command.
pub fn execute_stats(args: StatsArgs, formatter: &Formatter) -> Result<()> {
    let snapshot = read_snapshot(&args.graph)?;

    println!("{}", formatter.heading(&snapshot.title));
    println!("{}", formatter.stats_table(&snapshot.stats));
    println!("{}", formatter.categories_table(&snapshot.stats));
    Ok(())
}

/// Load a snapshot written by the extract command.
pub fn read_snapshot(path: &Path) -> Result<GraphSnapshot> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
