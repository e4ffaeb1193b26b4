//! Embedded database schema.
//!
//! Applied idempotently on every [`crate::ViolationStore::open`]; all DDL
//! uses `IF NOT EXISTS` so re-opening an existing database is safe.

/// Violation store schema, version 1.
pub const SCHEMA_V1: &str = r"
CREATE TABLE IF NOT EXISTS ruleset (
  rule_id INTEGER PRIMARY KEY AUTOINCREMENT,
  max_speed REAL NOT NULL CHECK (max_speed > 0),
  min_follow_distance REAL NOT NULL CHECK (min_follow_distance > 0),
  stop_sign_wait REAL NOT NULL CHECK (stop_sign_wait > 0)
);

CREATE TABLE IF NOT EXISTS scenario (
  scenario_id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  description TEXT NOT NULL DEFAULT '',
  source_file TEXT NOT NULL,
  rule_id INTEGER NOT NULL,
  created_at TEXT NOT NULL,
  FOREIGN KEY (rule_id) REFERENCES ruleset(rule_id)
);

CREATE TABLE IF NOT EXISTS speed_zone (
  zone_id INTEGER PRIMARY KEY AUTOINCREMENT,
  scenario_id INTEGER NOT NULL,
  start_mile REAL NOT NULL CHECK (start_mile >= 0),
  end_mile REAL NOT NULL CHECK (end_mile > start_mile),
  speed_limit REAL NOT NULL CHECK (speed_limit > 0),
  FOREIGN KEY (scenario_id) REFERENCES scenario(scenario_id)
);

CREATE TABLE IF NOT EXISTS violation (
  violation_id INTEGER PRIMARY KEY AUTOINCREMENT,
  scenario_id INTEGER NOT NULL,
  tstamp TEXT NOT NULL,
  type TEXT NOT NULL CHECK (
    type IN ('SPEEDING', 'TAILGATING', 'ROLLING_STOP', 'UNSAFE_LANE_CHANGE')
  ),
  details TEXT NOT NULL,
  created_at TEXT NOT NULL,
  FOREIGN KEY (scenario_id) REFERENCES scenario(scenario_id)
);

CREATE INDEX IF NOT EXISTS idx_violation_scenario_type
  ON violation(scenario_id, type);
CREATE INDEX IF NOT EXISTS idx_violation_created
  ON violation(created_at DESC, violation_id DESC);
CREATE INDEX IF NOT EXISTS idx_scenario_created
  ON scenario(created_at DESC, scenario_id DESC);
";
