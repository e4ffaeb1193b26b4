//! `roadcheck summary` command handler

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use roadcheck_core::config::RoadcheckConfig;
use roadcheck_store::{RunSummary, ViolationStore};

use crate::cli::SummaryArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Summary payload: one entry per recent run.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub runs: Vec<RunSummary>,
}

impl Render for SummaryReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if self.runs.is_empty() {
            writeln!(w, "No analyzed runs in the database.")?;
            return Ok(());
        }
        for run in &self.runs {
            writeln!(
                w,
                "#{} {} ({})",
                run.scenario_id,
                run.name.bold(),
                run.analyzed_at
            )?;
            if run.total == 0 {
                writeln!(w, "  {}", "clean".green())?;
                continue;
            }
            for (kind, count) in &run.counts {
                writeln!(w, "  {:<18} {}", kind.red(), count)?;
            }
        }
        Ok(())
    }
}

/// Execute the `summary` command against the configured database.
pub fn execute(
    args: &SummaryArgs,
    config: &RoadcheckConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let db = database_path(args.db.as_ref(), config);
    let store = ViolationStore::open(&db)?;
    let runs = store.run_summaries(args.runs)?;
    writer.render(&SummaryReport { runs })
}

/// Resolve the database path: explicit flag wins over config.
pub fn database_path(flag: Option<&PathBuf>, config: &RoadcheckConfig) -> PathBuf {
    flag.cloned()
        .unwrap_or_else(|| PathBuf::from(&config.storage.db_path))
}
