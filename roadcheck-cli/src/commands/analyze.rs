//! `roadcheck analyze` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use roadcheck_analysis::{EventLogParser, Scenario, ViolationDetector};
use roadcheck_core::types::Violation;
use roadcheck_store::ViolationStore;

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Report for one analyzed run.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    /// Scenario display name.
    pub scenario: String,
    /// Detected violations in chronological order.
    pub violations: Vec<Violation>,
    /// Convenience count, equal to `violations.len()`.
    pub total_violations: usize,
}

impl Render for AnalysisReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Scenario: {}", self.scenario.bold())?;
        if self.violations.is_empty() {
            writeln!(w, "{}", "No violations detected.".green())?;
            return Ok(());
        }
        writeln!(w, "Violations: {}", self.total_violations)?;
        for violation in &self.violations {
            writeln!(
                w,
                "  [{}] {:<18} {}",
                violation.timestamp,
                violation.kind.as_str().red(),
                violation.details
            )?;
        }
        Ok(())
    }
}

/// Execute the `analyze` command.
///
/// Loader errors (scenario or log) surface before any detection runs;
/// persistence and report writing only happen on a fully successful pass.
pub fn execute(args: &AnalyzeArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let scenario = Scenario::load(&args.scenario)?;
    let events = EventLogParser::new().read_file(&args.log)?;

    let violations = ViolationDetector::new(&scenario).detect(&events)?;
    info!(
        scenario = %scenario.name,
        events = events.len(),
        violations = violations.len(),
        "analysis complete"
    );

    let report = AnalysisReport {
        scenario: scenario.name.clone(),
        total_violations: violations.len(),
        violations,
    };

    if let Some(path) = &args.report {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!(path = %path.display(), "report written");
    }

    if let Some(db) = &args.db {
        let mut store = ViolationStore::open(db)?;
        let rule_id = store.upsert_ruleset(&scenario.road_rules)?;
        let scenario_id = store.register_scenario(
            &scenario.name,
            &scenario.description,
            &args.scenario.display().to_string(),
            rule_id,
            &scenario.speed_zones,
        )?;
        store.save_violations(scenario_id, &report.violations)?;
        info!(scenario_id, db = %db.display(), "run persisted");
    }

    writer.render(&report)
}
