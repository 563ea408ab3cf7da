//! Controller commands: init, up, down, reset, version, set_version

use anyhow::Result;
use tm_migrate::{Command, Halted, Transition};

use crate::cli::GlobalArgs;
use crate::commands::common::ExitCode;
use crate::context::RuntimeContext;

/// Run one controller command and print the resulting transition.
///
/// A halted operation reports the cause and the version the store was left
/// at on stderr, then exits with code 1.
pub(crate) fn execute(command: Command, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    match ctx.migrator().run(command) {
        Ok(transition) => {
            println!("{}", render(command, &transition));
            Ok(())
        }
        Err(halted) => {
            report_halted(command, &halted);
            Err(ExitCode(1).into())
        }
    }
}

fn render(command: Command, transition: &Transition) -> String {
    match command {
        Command::Version => transition.new_version.to_string(),
        _ => format!("{}: {}", command.name(), transition),
    }
}

fn report_halted(command: Command, halted: &Halted) {
    eprintln!("Error: {}", halted.source);
    let reached = halted.transition;
    if reached.changed() {
        eprintln!(
            "{} stopped part-way: {} (completed steps were kept)",
            command.name(),
            reached
        );
    } else if reached.new_version != 0 {
        eprintln!("{} made no changes; still at version {}", command.name(), reached.new_version);
    }
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
