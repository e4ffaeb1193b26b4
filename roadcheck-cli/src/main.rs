//! Roadcheck CLI entry point.
//!
//! Loads configuration, initializes logging, and dispatches to the
//! subcommand handlers. All user-facing failure paths funnel through
//! [`CliError::exit_code`].

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use tracing::error;

use roadcheck_core::config::RoadcheckConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let config = match RoadcheckConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("roadcheck: {e}");
            return 2;
        }
    };

    let mut general = config.general.clone();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("roadcheck: {e}");
        return 1;
    }

    let writer = OutputWriter::new(cli.output);
    let result = match &cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, &writer),
        Commands::Summary(args) => commands::summary::execute(args, &config, &writer),
        Commands::Violations(args) => commands::violations::execute(args, &config, &writer),
        Commands::Validate(args) => commands::validate::execute(args, &writer),
        Commands::Config(args) => commands::config::execute(&args.action, &cli.config, &writer),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{e}");
            eprintln!("roadcheck: {e}");
            e.exit_code()
        }
    }
}
