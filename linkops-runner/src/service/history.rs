//! Operation history
//!
//! In-memory log of finished runs shown next to the transcript. Entries are
//! kept newest first and are never persisted.

use chrono::{DateTime, Duration, Utc};
use linkops_core::domain::operation::{OperationRecord, OperationStatus};
use linkops_core::domain::run::{ExecutionRun, RunReport};
use std::sync::Mutex;

/// Number used for the first record of an unseeded history
const FIRST_OPERATION_NUMBER: u64 = 10001;

#[derive(Debug)]
struct HistoryLog {
    records: Vec<OperationRecord>,
    next_number: u64,
}

/// Thread-safe, newest-first list of operation records
#[derive(Debug)]
pub struct OperationHistory {
    log: Mutex<HistoryLog>,
}

impl OperationHistory {
    /// Creates an empty history
    pub fn new() -> Self {
        Self {
            log: Mutex::new(HistoryLog {
                records: Vec::new(),
                next_number: FIRST_OPERATION_NUMBER,
            }),
        }
    }

    /// Creates a history holding the demo entries, timed relative to `now`
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let seed = |number: u64, name: &str, targets: usize, status, hours_ago, duration_ms| {
            OperationRecord {
                id: operation_id(number),
                scripts: vec![name.to_string()],
                targets,
                status,
                started_at: now - Duration::hours(hours_ago),
                duration_ms,
            }
        };

        let records = vec![
            seed(10291, "Baseline Check", 3, OperationStatus::Success, 2, 68_000),
            seed(10290, "Security Audit", 2, OperationStatus::Failed, 3, 102_000),
            seed(10289, "Install CrowdSec", 1, OperationStatus::Success, 4, 245_000),
        ];

        Self {
            log: Mutex::new(HistoryLog {
                records,
                next_number: 10292,
            }),
        }
    }

    /// Records a finished run and returns the new entry
    pub fn record(&self, run: &ExecutionRun, report: &RunReport) -> OperationRecord {
        let mut log = self.log.lock().unwrap();

        let record = OperationRecord {
            id: operation_id(log.next_number),
            scripts: run
                .scripts
                .iter()
                .map(|invocation| invocation.script.name.clone())
                .collect(),
            targets: report.target_count,
            status: OperationStatus::from_report(report),
            started_at: report.started_at,
            duration_ms: report.duration().num_milliseconds().max(0) as u64,
        };

        log.next_number += 1;
        log.records.insert(0, record.clone());
        record
    }

    /// All records, newest first
    pub fn records(&self) -> Vec<OperationRecord> {
        self.log.lock().unwrap().records.clone()
    }

    pub fn len(&self) -> usize {
        self.log.lock().unwrap().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for OperationHistory {
    fn default() -> Self {
        Self::new()
    }
}

fn operation_id(number: u64) -> String {
    format!("OP-{}", number)
}

/// Formats a duration as `1h 2m`, `4m 5s` or `8s`
pub fn format_duration(duration_ms: u64) -> String {
    let seconds = duration_ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

/// Formats how long ago `then` was, relative to `now`
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if elapsed.num_seconds() < 60 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} minute{} ago", minutes, plural(minutes))
    } else if hours < 24 {
        format!("{} hour{} ago", hours, plural(hours))
    } else {
        format!("{} day{} ago", days, plural(days))
    }
}

fn plural(count: i64) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkops_core::domain::outcome::{OutcomeStatus, TargetOutcome};
    use linkops_core::domain::run::{RunStatus, ScriptInvocation, ScriptReport};
    use linkops_core::domain::script::Script;
    use linkops_core::domain::target::Target;

    fn finished(status: RunStatus, outcomes: &[OutcomeStatus]) -> (ExecutionRun, RunReport) {
        let targets: Vec<Target> = (0..outcomes.len())
            .map(|i| Target::new(format!("t{}", i), format!("t{}", i)))
            .collect();
        let run = ExecutionRun::new(
            vec![
                ScriptInvocation::new(Script::new("baseline", "Baseline Check", ["--verbose"])),
                ScriptInvocation::new(Script::new("security_audit", "Security Audit", ["--full"])),
            ],
            targets.clone(),
        );

        let started_at = Utc::now();
        let report = RunReport {
            run_id: run.id,
            status,
            target_count: targets.len(),
            scripts: vec![ScriptReport {
                script_id: "baseline".to_string(),
                script_name: "Baseline Check".to_string(),
                outcomes: targets
                    .into_iter()
                    .zip(outcomes)
                    .map(|(target, status)| TargetOutcome {
                        target,
                        status: *status,
                    })
                    .collect(),
            }],
            started_at,
            finished_at: started_at + Duration::milliseconds(1500),
        };
        (run, report)
    }

    #[test]
    fn test_seeded_history() {
        let now = Utc::now();
        let history = OperationHistory::seeded(now);
        let records = history.records();

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["OP-10291", "OP-10290", "OP-10289"]);
        assert_eq!(records[1].status, OperationStatus::Failed);
        assert_eq!(format_relative_time(records[0].started_at, now), "2 hours ago");
    }

    #[test]
    fn test_record_continues_numbering_newest_first() {
        let history = OperationHistory::seeded(Utc::now());
        let (run, report) = finished(
            RunStatus::Completed,
            &[OutcomeStatus::Succeeded, OutcomeStatus::Failed],
        );

        let record = history.record(&run, &report);
        assert_eq!(record.id, "OP-10292");
        assert_eq!(record.status, OperationStatus::Partial);
        assert_eq!(record.targets, 2);
        assert_eq!(record.duration_ms, 1500);
        assert_eq!(record.title(), "Baseline Check (+1 more)");

        assert_eq!(history.len(), 4);
        assert_eq!(history.records()[0].id, "OP-10292");
    }

    #[test]
    fn test_cancelled_run_is_recorded_as_cancelled() {
        let history = OperationHistory::new();
        let (run, report) = finished(RunStatus::Cancelled, &[OutcomeStatus::Succeeded]);

        let record = history.record(&run, &report);
        assert_eq!(record.id, "OP-10001");
        assert_eq!(record.status, OperationStatus::Cancelled);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(8_000), "8s");
        assert_eq!(format_duration(68_000), "1m 8s");
        assert_eq!(format_duration(245_000), "4m 5s");
        assert_eq!(format_duration(3_720_000), "1h 2m");
        assert_eq!(format_duration(999), "0s");
    }

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now - Duration::seconds(30), now), "Just now");
        assert_eq!(format_relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_relative_time(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(format_relative_time(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(format_relative_time(now - Duration::days(3), now), "3 days ago");
    }
}
