//! Integration tests for the `analyze` command's pipeline wiring.
//!
//! Exercises the same load -> detect -> persist sequence the command
//! handler performs, with real files and a real SQLite database.

use std::fs;

use tempfile::TempDir;

use roadcheck_analysis::{EventLogParser, Scenario, ViolationDetector};
use roadcheck_store::ViolationStore;

const SCENARIO: &str = r#"{
    "name": "Suburban loop",
    "road_rules": {
        "max_speed": 35.0,
        "min_follow_distance": 2.0,
        "stop_sign_wait": 3.0
    },
    "speed_zones": [
        { "start_mile": 0.0, "end_mile": 1.5, "speed_limit": 30.0 }
    ]
}"#;

const LOG: &str = "\
0:01.0 FOLLOW_DISTANCE 1.8
0:02.5 LANE_CHANGE LEFT
0:11.0 SPEED 40.0
";

#[test]
fn analyze_and_persist_round_trip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let scenario_path = temp_dir.path().join("suburban.json");
    let log_path = temp_dir.path().join("suburban.log");
    let db_path = temp_dir.path().join("runs.db");
    fs::write(&scenario_path, SCENARIO).expect("should write scenario");
    fs::write(&log_path, LOG).expect("should write log");

    // The same sequence `roadcheck analyze --db` performs.
    let scenario = Scenario::load(&scenario_path).expect("scenario should load");
    let events = EventLogParser::new()
        .read_file(&log_path)
        .expect("log should parse");
    let violations = ViolationDetector::new(&scenario)
        .detect(&events)
        .expect("detection should succeed");
    assert_eq!(violations.len(), 3);

    let mut store = ViolationStore::open(&db_path).expect("store should open");
    let rule_id = store
        .upsert_ruleset(&scenario.road_rules)
        .expect("ruleset should upsert");
    let scenario_id = store
        .register_scenario(
            &scenario.name,
            &scenario.description,
            &scenario_path.display().to_string(),
            rule_id,
            &scenario.speed_zones,
        )
        .expect("scenario should register");
    store
        .save_violations(scenario_id, &violations)
        .expect("violations should save");

    // Query modes see the persisted run.
    let summaries = store.run_summaries(5).expect("summaries");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "Suburban loop");
    assert_eq!(summaries[0].total, 3);
    assert_eq!(summaries[0].counts.get("SPEEDING"), Some(&1));
    assert_eq!(summaries[0].counts.get("TAILGATING"), Some(&1));
    assert_eq!(summaries[0].counts.get("UNSAFE_LANE_CHANGE"), Some(&1));
}

#[test]
fn analyzing_the_same_scenario_twice_reuses_the_ruleset() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let db_path = temp_dir.path().join("runs.db");

    let scenario = Scenario::parse(SCENARIO, "<memory>").expect("scenario");
    let mut store = ViolationStore::open(&db_path).expect("store should open");

    let first = store.upsert_ruleset(&scenario.road_rules).expect("first");
    let second = store.upsert_ruleset(&scenario.road_rules).expect("second");
    assert_eq!(first, second);

    let a = store
        .register_scenario(&scenario.name, "", "a.json", first, &scenario.speed_zones)
        .expect("register a");
    let b = store
        .register_scenario(&scenario.name, "", "b.json", second, &scenario.speed_zones)
        .expect("register b");
    assert_ne!(a, b, "each run gets its own scenario row");
}
