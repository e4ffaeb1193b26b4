//! `roadcheck violations` command handler

use std::io::Write;

use serde::Serialize;

use roadcheck_core::config::RoadcheckConfig;
use roadcheck_core::types::ViolationKind;
use roadcheck_store::{StoredViolation, ViolationStore};

use crate::cli::ViolationsArgs;
use crate::commands::summary::database_path;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// By-type query payload.
#[derive(Debug, Serialize)]
pub struct ViolationList {
    pub scenario_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub violations: Vec<StoredViolation>,
}

impl Render for ViolationList {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "Scenario #{}: {} x {}",
            self.scenario_id,
            self.violations.len(),
            self.kind
        )?;
        for violation in &self.violations {
            writeln!(w, "  [{}] {}", violation.time, violation.details)?;
        }
        Ok(())
    }
}

/// Execute the `violations` command.
pub fn execute(
    args: &ViolationsArgs,
    config: &RoadcheckConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let kind = ViolationKind::from_str_loose(&args.kind).ok_or_else(|| {
        CliError::Command(format!(
            "unknown violation type '{}', expected one of: SPEEDING, TAILGATING, ROLLING_STOP, UNSAFE_LANE_CHANGE",
            args.kind
        ))
    })?;

    let db = database_path(args.db.as_ref(), config);
    let store = ViolationStore::open(&db)?;
    let violations = store.violations_by_type(args.scenario_id, kind)?;

    writer.render(&ViolationList {
        scenario_id: args.scenario_id,
        kind: kind.as_str().to_owned(),
        violations,
    })
}
