//! Tidemark CLI - versioned schema migrations for DuckDB

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::{Cli, Commands};
use commands::common::ExitCode;
use commands::{migrate, status};
use tm_migrate::Command;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(code) => std::process::ExitCode::from(code.0),
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let command = match &cli.command {
        Commands::Status(args) => return status::execute(args, &cli.global),
        Commands::Init => Command::Init,
        Commands::Up(args) => Command::Up(args.version),
        Commands::Down => Command::Down,
        Commands::Reset => Command::Reset,
        Commands::Version => Command::Version,
        Commands::SetVersion(args) => Command::SetVersion(args.version),
    };
    migrate::execute(command, &cli.global)
}
