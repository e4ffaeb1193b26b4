//! SQLite-backed violation store.
//!
//! One [`ViolationStore`] owns one connection. The analysis pipeline does
//! not know this crate exists; it hands over a plain `Vec<Violation>` and
//! the store attaches scenario identity when persisting.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::{debug, info};

use roadcheck_core::types::{RoadRules, SpeedZone, Violation, ViolationKind};

use crate::error::StoreError;
use crate::schema::SCHEMA_V1;

/// Threshold-equality tolerance used when deduplicating rulesets.
const RULE_MATCH_TOLERANCE: f64 = 1e-9;

/// One persisted violation, as returned by queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredViolation {
    /// Timestamp in `MM:SS.s` form.
    pub time: String,
    /// Violation type as stored text.
    #[serde(rename = "type")]
    pub kind: String,
    /// Detail text.
    pub details: String,
}

/// A recent violation joined with its scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentViolation {
    pub scenario_id: i64,
    pub scenario_name: String,
    /// Timestamp in `MM:SS.s` form.
    pub time: String,
    /// Violation type as stored text.
    #[serde(rename = "type")]
    pub kind: String,
    pub details: String,
}

/// Per-type violation counts for one analyzed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub scenario_id: i64,
    pub name: String,
    /// When the run was registered (RFC 3339).
    pub analyzed_at: String,
    pub total: i64,
    /// Violation type -> count, only for types that occurred.
    pub counts: BTreeMap<String, i64>,
}

/// SQLite store for rulesets, scenarios, speed zones, and violations.
pub struct ViolationStore {
    conn: Connection,
}

impl ViolationStore {
    /// Open (or create) the database at `path` and apply the schema.
    ///
    /// Parent directories are created as needed; foreign keys are enabled
    /// for the lifetime of the connection.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Open {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
        }
        let conn = Connection::open(path).map_err(|e| StoreError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let store = Self::init(conn)?;
        debug!(path = %path.display(), "violation store opened");
        Ok(store)
    }

    /// Open an in-memory store. Used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA_V1)?;
        Ok(Self { conn })
    }

    /// Return the id of a ruleset with these thresholds, inserting a new
    /// row only if no existing one matches within [`RULE_MATCH_TOLERANCE`].
    pub fn upsert_ruleset(&self, rules: &RoadRules) -> Result<i64, StoreError> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT rule_id FROM ruleset
                 WHERE abs(max_speed - ?1) < ?4
                   AND abs(min_follow_distance - ?2) < ?4
                   AND abs(stop_sign_wait - ?3) < ?4",
                params![
                    rules.max_speed,
                    rules.min_follow_distance,
                    rules.stop_sign_wait,
                    RULE_MATCH_TOLERANCE
                ],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(rule_id) = existing {
            return Ok(rule_id);
        }

        self.conn.execute(
            "INSERT INTO ruleset (max_speed, min_follow_distance, stop_sign_wait)
             VALUES (?1, ?2, ?3)",
            params![
                rules.max_speed,
                rules.min_follow_distance,
                rules.stop_sign_wait
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a scenario and its speed zones in one transaction, returning
    /// the new scenario id.
    pub fn register_scenario(
        &mut self,
        name: &str,
        description: &str,
        source_file: &str,
        rule_id: i64,
        zones: &[SpeedZone],
    ) -> Result<i64, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO scenario (name, description, source_file, rule_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, description, source_file, rule_id, Utc::now().to_rfc3339()],
        )?;
        let scenario_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO speed_zone (scenario_id, start_mile, end_mile, speed_limit)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for zone in zones {
                stmt.execute(params![
                    scenario_id,
                    zone.start_mile,
                    zone.end_mile,
                    zone.speed_limit
                ])?;
            }
        }

        tx.commit()?;
        info!(scenario_id, name, "scenario registered");
        Ok(scenario_id)
    }

    /// Persist a batch of violations for an existing scenario.
    ///
    /// An empty batch is a no-op. All rows are inserted in one
    /// transaction; a failure inserts nothing.
    pub fn save_violations(
        &mut self,
        scenario_id: i64,
        violations: &[Violation],
    ) -> Result<(), StoreError> {
        if violations.is_empty() {
            return Ok(());
        }
        self.require_scenario(scenario_id)?;

        let created_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO violation (scenario_id, tstamp, type, details, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for violation in violations {
                stmt.execute(params![
                    scenario_id,
                    violation.timestamp.to_string(),
                    violation.kind.as_str(),
                    violation.details,
                    created_at
                ])?;
            }
        }
        tx.commit()?;
        debug!(scenario_id, count = violations.len(), "violations saved");
        Ok(())
    }

    /// Violation counts by type for one scenario, most frequent first in
    /// iteration order of the underlying query.
    pub fn violation_counts(
        &self,
        scenario_id: i64,
    ) -> Result<BTreeMap<String, i64>, StoreError> {
        self.require_scenario(scenario_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT type, COUNT(*) FROM violation
             WHERE scenario_id = ?1
             GROUP BY type",
        )?;
        let rows = stmt.query_map(params![scenario_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (kind, count) = row?;
            counts.insert(kind, count);
        }
        Ok(counts)
    }

    /// All violations of one type for a scenario, in timestamp order.
    pub fn violations_by_type(
        &self,
        scenario_id: i64,
        kind: ViolationKind,
    ) -> Result<Vec<StoredViolation>, StoreError> {
        self.require_scenario(scenario_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT tstamp, details FROM violation
             WHERE scenario_id = ?1 AND type = ?2
             ORDER BY tstamp",
        )?;
        let rows = stmt.query_map(params![scenario_id, kind.as_str()], |row| {
            Ok(StoredViolation {
                time: row.get(0)?,
                kind: kind.as_str().to_owned(),
                details: row.get(1)?,
            })
        })?;
        rows.collect::<Result<_, _>>().map_err(Into::into)
    }

    /// The most recent violations across all scenarios, newest first.
    pub fn recent_violations(&self, limit: usize) -> Result<Vec<RecentViolation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT v.scenario_id, s.name, v.tstamp, v.type, v.details
             FROM violation v
             JOIN scenario s ON v.scenario_id = s.scenario_id
             ORDER BY v.created_at DESC, v.violation_id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(RecentViolation {
                scenario_id: row.get(0)?,
                scenario_name: row.get(1)?,
                time: row.get(2)?,
                kind: row.get(3)?,
                details: row.get(4)?,
            })
        })?;
        rows.collect::<Result<_, _>>().map_err(Into::into)
    }

    /// Per-type violation counts for the most recently analyzed runs.
    pub fn run_summaries(&self, limit: usize) -> Result<Vec<RunSummary>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT scenario_id, name, created_at FROM scenario
             ORDER BY created_at DESC, scenario_id DESC
             LIMIT ?1",
        )?;
        let scenarios: Vec<(i64, String, String)> = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<_, _>>()?;

        let mut summaries = Vec::with_capacity(scenarios.len());
        for (scenario_id, name, analyzed_at) in scenarios {
            let counts = self.violation_counts(scenario_id)?;
            summaries.push(RunSummary {
                scenario_id,
                name,
                analyzed_at,
                total: counts.values().sum(),
                counts,
            });
        }
        Ok(summaries)
    }

    fn require_scenario(&self, scenario_id: i64) -> Result<(), StoreError> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM scenario WHERE scenario_id = ?1",
                params![scenario_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::MissingScenario { id: scenario_id });
        }
        Ok(())
    }
}
