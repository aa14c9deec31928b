//! papis configuration CLI
//!
//! Resolves settings through the same layered configuration papis commands use.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let Some(command) = cli.command.clone() else {
        println!("{} configuration", "papis".green().bold());
        println!();
        println!("Run {} for available commands.", "papis --help".cyan());
        return Ok(());
    };

    let mut ctx = commands::build_context(&cli)?;
    match command {
        Commands::Config {
            keys,
            section,
            json,
        } => commands::run_config(&mut ctx, &keys, section.as_deref(), json),
        Commands::Libs { json } => commands::run_libs(&mut ctx, json),
        Commands::Defaults { section, json } => {
            commands::run_defaults(&ctx, section.as_deref(), json)
        }
        Commands::Save => commands::run_save(&mut ctx),
    }
}
