//! `roadcheck validate` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use roadcheck_analysis::{EventLogParser, Scenario};

use crate::cli::ValidateArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Validation result payload.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub scenario: String,
    pub speed_zones: usize,
    /// Number of parsed log events, when a log was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<usize>,
}

impl Render for ValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "{} scenario '{}' ({} speed zones)",
            "OK".green(),
            self.scenario,
            self.speed_zones
        )?;
        if let Some(events) = self.events {
            writeln!(w, "{} drive log ({events} events)", "OK".green())?;
        }
        Ok(())
    }
}

/// Execute the `validate` command: run the loaders, skip detection.
pub fn execute(args: &ValidateArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let scenario = Scenario::load(&args.scenario)?;

    let events = match &args.log {
        Some(path) => Some(EventLogParser::new().read_file(path)?.len()),
        None => None,
    };

    writer.render(&ValidationReport {
        scenario: scenario.name,
        speed_zones: scenario.speed_zones.len(),
        events,
    })
}
