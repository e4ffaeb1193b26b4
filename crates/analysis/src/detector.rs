//! Violation detection rule engine.
//!
//! [`ViolationDetector`] walks an ordered event stream once and applies
//! the road rules of one scenario, producing the list of breaches. All
//! cross-event logic lives here: a lane change is only unsafe if the most
//! recent follow-distance reading was already too close, and a rolling
//! stop depends on the wait accumulated between `STOP_SIGN_DETECTED` and
//! `STOP_SIGN_CLEAR`.
//!
//! The pass is a pure function of its inputs: no I/O, no shared state, no
//! retained output. Running the same events against the same scenario
//! twice yields identical results.

use roadcheck_core::types::{Event, EventKind, Timestamp, Violation, ViolationKind};
use tracing::trace;

use crate::EPSILON;
use crate::error::AnalysisError;
use crate::scenario::{RoadRules, Scenario, SpeedZone};

/// Rolling state threaded through one detection pass.
///
/// Never outlives a single [`ViolationDetector::detect`] call.
#[derive(Debug, Default)]
struct RollingState {
    /// Most recent `FOLLOW_DISTANCE` reading, if any.
    last_follow_distance: Option<f64>,
    /// Timestamp of the last `STOP_SIGN_DETECTED` with no clearing event
    /// seen yet.
    stop_wait_start: Option<Timestamp>,
    /// Most recent `ODOMETER` position. While unset, zone limits never
    /// apply and the global maximum is the sole speed limit.
    current_mile: Option<f64>,
}

/// Rule engine for one scenario.
///
/// Construction copies the scenario's rules and zones; `detect` may then
/// be called any number of times, including from different threads, since
/// the detector itself is immutable.
#[derive(Debug, Clone)]
pub struct ViolationDetector {
    rules: RoadRules,
    /// Sorted by `start_mile`; non-overlap is guaranteed by scenario
    /// validation.
    zones: Vec<SpeedZone>,
}

impl ViolationDetector {
    /// Build a detector from a loaded scenario.
    pub fn new(scenario: &Scenario) -> Self {
        Self::from_parts(scenario.road_rules.clone(), scenario.speed_zones.clone())
    }

    /// Build a detector from rules and zones directly.
    ///
    /// Zones are re-sorted defensively; they must already be
    /// non-overlapping (the scenario loader enforces this).
    pub fn from_parts(rules: RoadRules, mut zones: Vec<SpeedZone>) -> Self {
        zones.sort_by(|a, b| a.start_mile.total_cmp(&b.start_mile));
        Self { rules, zones }
    }

    /// Run the rule engine over an ordered event stream.
    ///
    /// Single forward pass, O(n) in event count. The output preserves the
    /// chronological order of the triggering events; when one event drives
    /// more than one check, speed-related checks run before
    /// follow-distance checks, so output order is reproducible.
    ///
    /// # Errors
    ///
    /// Fails with [`AnalysisError::OutOfOrder`] if a timestamp decreases,
    /// rather than silently producing order-dependent garbage. No partial
    /// output escapes a failed pass.
    pub fn detect(&self, events: &[Event]) -> Result<Vec<Violation>, AnalysisError> {
        let mut violations = Vec::new();
        let mut state = RollingState::default();
        let mut prev_stamp: Option<Timestamp> = None;

        for event in events {
            if let Some(prev) = prev_stamp {
                if event.timestamp < prev {
                    return Err(AnalysisError::OutOfOrder {
                        prev: prev.to_string(),
                        next: event.timestamp.to_string(),
                    });
                }
            }
            prev_stamp = Some(event.timestamp);

            match event.kind {
                EventKind::Speed(speed) => {
                    let limit = self.effective_speed_limit(state.current_mile);
                    if speed > limit + EPSILON {
                        violations.push(Violation::new(
                            ViolationKind::Speeding,
                            event.timestamp,
                            format!("{speed:.1} mph in {limit:.0} mph zone"),
                        ));
                    }
                }

                EventKind::FollowDistance(distance) => {
                    state.last_follow_distance = Some(distance);
                    if distance + EPSILON < self.rules.min_follow_distance {
                        violations.push(Violation::new(
                            ViolationKind::Tailgating,
                            event.timestamp,
                            format!(
                                "{distance:.1} m < {:.1} m",
                                self.rules.min_follow_distance
                            ),
                        ));
                    }
                }

                EventKind::LaneChange(direction) => {
                    // Judged against the most recent follow-distance
                    // reading, independent of any TAILGATING already
                    // emitted for that reading.
                    if let Some(distance) = state.last_follow_distance {
                        if distance + EPSILON < self.rules.min_follow_distance {
                            violations.push(Violation::new(
                                ViolationKind::UnsafeLaneChange,
                                event.timestamp,
                                format!(
                                    "{direction} change with follow {distance:.1} m < {:.1} m",
                                    self.rules.min_follow_distance
                                ),
                            ));
                        }
                    }
                }

                EventKind::StopSignDetected => {
                    // Overwrites any stale start; detections do not stack.
                    state.stop_wait_start = Some(event.timestamp);
                }

                EventKind::StopSignClear => {
                    // One check per detected stop. A clear with no pending
                    // detection is a no-op, not an error.
                    if let Some(start) = state.stop_wait_start.take() {
                        let waited = event.timestamp.seconds_since(start);
                        if waited + EPSILON < self.rules.stop_sign_wait {
                            violations.push(Violation::new(
                                ViolationKind::RollingStop,
                                event.timestamp,
                                format!(
                                    "Stopped {waited:.1}s; required {:.1}s",
                                    self.rules.stop_sign_wait
                                ),
                            ));
                        }
                    }
                }

                EventKind::Odometer(mile) => {
                    state.current_mile = Some(mile);
                }
            }
        }

        trace!(
            events = events.len(),
            violations = violations.len(),
            "detection pass complete"
        );
        Ok(violations)
    }

    /// Resolve the speed limit in effect at the given position.
    ///
    /// Zone limits apply only while a position is tracked; otherwise the
    /// global maximum governs.
    fn effective_speed_limit(&self, mile: Option<f64>) -> f64 {
        mile.and_then(|m| self.zone_at(m))
            .map_or(self.rules.max_speed, |zone| zone.speed_limit)
    }

    /// Binary search for the zone containing `mile`, if any.
    fn zone_at(&self, mile: f64) -> Option<&SpeedZone> {
        let idx = self.zones.partition_point(|zone| zone.start_mile <= mile);
        let candidate = self.zones[..idx].last()?;
        candidate.contains(mile).then_some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use roadcheck_core::types::LaneDirection;

    use super::*;

    fn rules() -> RoadRules {
        RoadRules {
            max_speed: 35.0,
            min_follow_distance: 2.0,
            stop_sign_wait: 3.0,
        }
    }

    fn zones() -> Vec<SpeedZone> {
        vec![
            SpeedZone {
                start_mile: 0.0,
                end_mile: 1.5,
                speed_limit: 30.0,
            },
            SpeedZone {
                start_mile: 1.5,
                end_mile: 3.0,
                speed_limit: 25.0,
            },
        ]
    }

    fn detector() -> ViolationDetector {
        ViolationDetector::from_parts(rules(), zones())
    }

    fn at(secs: f64, kind: EventKind) -> Event {
        Event::new(Timestamp::from_secs(secs), kind)
    }

    #[test]
    fn speed_at_exact_limit_is_not_a_violation() {
        let violations = detector()
            .detect(&[at(1.0, EventKind::Speed(35.0))])
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn speed_above_limit_is_reported_with_both_values() {
        let violations = detector()
            .detect(&[at(1.0, EventKind::Speed(40.0))])
            .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Speeding);
        assert_eq!(violations[0].details, "40.0 mph in 35 mph zone");
        assert_eq!(violations[0].timestamp.to_string(), "00:01.0");
    }

    #[test]
    fn follow_distance_at_exact_minimum_is_not_a_violation() {
        let violations = detector()
            .detect(&[at(1.0, EventKind::FollowDistance(2.0))])
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn tailgating_reports_distance_and_threshold() {
        let violations = detector()
            .detect(&[at(1.0, EventKind::FollowDistance(1.8))])
            .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Tailgating);
        assert_eq!(violations[0].details, "1.8 m < 2.0 m");
    }

    #[test]
    fn zone_limits_apply_only_while_position_is_tracked() {
        // Without an odometer reading, 32 mph is under the global 35.
        let violations = detector()
            .detect(&[at(1.0, EventKind::Speed(32.0))])
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn zone_precedence_over_global_limit() {
        let d = detector();

        // Mile 0.5 -> 30 mph zone, 32 violates.
        let inside_first = d
            .detect(&[
                at(1.0, EventKind::Odometer(0.5)),
                at(2.0, EventKind::Speed(32.0)),
            ])
            .unwrap();
        assert_eq!(inside_first.len(), 1);
        assert_eq!(inside_first[0].details, "32.0 mph in 30 mph zone");

        // Mile 2.0 -> 25 mph zone, 32 violates.
        let inside_second = d
            .detect(&[
                at(1.0, EventKind::Odometer(2.0)),
                at(2.0, EventKind::Speed(32.0)),
            ])
            .unwrap();
        assert_eq!(inside_second.len(), 1);
        assert_eq!(inside_second[0].details, "32.0 mph in 25 mph zone");

        // Mile 4.0 -> outside all zones, global 35 governs.
        let outside = d
            .detect(&[
                at(1.0, EventKind::Odometer(4.0)),
                at(2.0, EventKind::Speed(32.0)),
            ])
            .unwrap();
        assert!(outside.is_empty());
    }

    #[test]
    fn zone_boundaries_are_half_open() {
        let d = detector();
        // Mile 1.5 belongs to the second zone (25 mph), not the first.
        let violations = d
            .detect(&[
                at(1.0, EventKind::Odometer(1.5)),
                at(2.0, EventKind::Speed(28.0)),
            ])
            .unwrap();
        assert_eq!(violations[0].details, "28.0 mph in 25 mph zone");

        // Mile 3.0 is outside the second zone.
        let violations = d
            .detect(&[
                at(1.0, EventKind::Odometer(3.0)),
                at(2.0, EventKind::Speed(28.0)),
            ])
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn rolling_stop_when_wait_is_cut_short() {
        let violations = detector()
            .detect(&[
                at(3.0, EventKind::StopSignDetected),
                at(5.5, EventKind::StopSignClear),
            ])
            .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::RollingStop);
        assert_eq!(violations[0].timestamp.to_string(), "00:05.5");
        assert_eq!(violations[0].details, "Stopped 2.5s; required 3.0s");
    }

    #[test]
    fn full_stop_wait_is_compliant() {
        let violations = detector()
            .detect(&[
                at(3.0, EventKind::StopSignDetected),
                at(6.0, EventKind::StopSignClear),
            ])
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn immediate_clear_at_same_timestamp_is_a_rolling_stop() {
        let violations = detector()
            .detect(&[
                at(3.0, EventKind::StopSignDetected),
                at(3.0, EventKind::StopSignClear),
            ])
            .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].details, "Stopped 0.0s; required 3.0s");
    }

    #[test]
    fn clear_without_detection_is_a_no_op() {
        let violations = detector()
            .detect(&[at(5.5, EventKind::StopSignClear)])
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn each_clear_consumes_the_pending_detection() {
        // Second clear has nothing to check against.
        let violations = detector()
            .detect(&[
                at(3.0, EventKind::StopSignDetected),
                at(4.0, EventKind::StopSignClear),
                at(5.0, EventKind::StopSignClear),
            ])
            .unwrap();
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn repeated_detection_overwrites_rather_than_stacks() {
        // The second marker restarts the wait; clear comes 3.0s after it.
        let violations = detector()
            .detect(&[
                at(1.0, EventKind::StopSignDetected),
                at(4.0, EventKind::StopSignDetected),
                at(7.0, EventKind::StopSignClear),
            ])
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn unsafe_lane_change_and_tailgating_are_distinct_violations() {
        let violations = detector()
            .detect(&[
                at(1.0, EventKind::FollowDistance(1.8)),
                at(2.5, EventKind::LaneChange(LaneDirection::Left)),
            ])
            .unwrap();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].kind, ViolationKind::Tailgating);
        assert_eq!(violations[0].timestamp.to_string(), "00:01.0");
        assert_eq!(violations[1].kind, ViolationKind::UnsafeLaneChange);
        assert_eq!(violations[1].timestamp.to_string(), "00:02.5");
        assert_eq!(violations[1].details, "LEFT change with follow 1.8 m < 2.0 m");
    }

    #[test]
    fn lane_change_with_no_prior_reading_is_clean() {
        let violations = detector()
            .detect(&[at(1.0, EventKind::LaneChange(LaneDirection::Right))])
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn lane_change_after_recovered_distance_is_clean() {
        let violations = detector()
            .detect(&[
                at(1.0, EventKind::FollowDistance(1.8)),
                at(2.0, EventKind::FollowDistance(2.5)),
                at(3.0, EventKind::LaneChange(LaneDirection::Left)),
            ])
            .unwrap();
        // Only the tailgating reading itself.
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Tailgating);
    }

    #[test]
    fn output_preserves_event_order() {
        let violations = detector()
            .detect(&[
                at(1.0, EventKind::Speed(50.0)),
                at(2.0, EventKind::FollowDistance(1.0)),
                at(3.0, EventKind::LaneChange(LaneDirection::Right)),
                at(4.0, EventKind::Speed(40.0)),
            ])
            .unwrap();
        let stamps: Vec<f64> = violations.iter().map(|v| v.timestamp.as_secs()).collect();
        let mut sorted = stamps.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(stamps, sorted);
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn detect_is_idempotent() {
        let events = [
            at(1.0, EventKind::FollowDistance(1.8)),
            at(2.0, EventKind::Speed(40.0)),
            at(2.5, EventKind::LaneChange(LaneDirection::Left)),
        ];
        let d = detector();
        let first = d.detect(&events).unwrap();
        let second = d.detect(&events).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_stream_yields_empty_result() {
        assert!(detector().detect(&[]).unwrap().is_empty());
    }

    #[test]
    fn decreasing_timestamp_fails_fast() {
        let err = detector()
            .detect(&[
                at(2.0, EventKind::Speed(10.0)),
                at(1.0, EventKind::Speed(10.0)),
            ])
            .expect_err("must reject backwards time");
        assert!(matches!(err, AnalysisError::OutOfOrder { .. }));
        assert!(err.to_string().contains("00:01.0"));
    }

    #[test]
    fn equal_timestamps_are_accepted() {
        let violations = detector()
            .detect(&[
                at(1.0, EventKind::Speed(10.0)),
                at(1.0, EventKind::Speed(10.0)),
            ])
            .unwrap();
        assert!(violations.is_empty());
    }
}
