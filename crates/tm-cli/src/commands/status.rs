//! Status command implementation

use anyhow::{Context, Result};
use tm_migrate::Status;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::print_table;
use crate::context::RuntimeContext;

/// Print every registered or recorded migration with its applied state.
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let status = ctx
        .migrator()
        .status()
        .map_err(|halted| halted.source)
        .context("Failed to read migration history")?;

    match args.output {
        OutputFormat::Table => print_status_table(&status),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
    }

    Ok(())
}

fn status_rows(status: &Status) -> Vec<Vec<String>> {
    status
        .entries
        .iter()
        .map(|entry| {
            let state = match (entry.applied, entry.registered) {
                (true, true) => "applied",
                (false, _) => "pending",
                (true, false) => "unknown",
            };
            vec![entry.version.to_string(), entry.name.clone(), state.to_string()]
        })
        .collect()
}

fn print_status_table(status: &Status) {
    print_table(&["VERSION", "NAME", "STATE"], &status_rows(status));
    println!();

    match status.current {
        Some(v) => println!("Current version: {v}"),
        None => println!("Current version: none (run `tm init`)"),
    }
    if let Some(last) = &status.last_applied {
        println!("Last applied: {last}");
    }

    let pending = status.pending().count();
    if pending > 0 {
        println!("{pending} pending migration(s)");
    }
    let unknown: Vec<String> = status.unknown().map(|e| e.version.to_string()).collect();
    if !unknown.is_empty() {
        eprintln!(
            "Warning: recorded versions with no migration file: {}",
            unknown.join(", ")
        );
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
