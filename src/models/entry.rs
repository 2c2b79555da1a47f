// src/models/entry.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'exam_entries' table: one row per attempt start,
/// carrying client-reported anti-cheat telemetry. Append-only; rows are
/// never updated or deleted, and a user may have several per exam.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamEntry {
    pub id: i64,
    pub exam_id: i64,
    pub user_id: String,

    /// Device battery percentage reported at admission, if any.
    pub battery_level: Option<i64>,

    /// Anti-cheat signal such as "tab_switch" or "app_background".
    pub violation_reason: Option<String>,

    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for recording an attempt start.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordEntryRequest {
    pub exam_id: i64,

    #[validate(length(min = 1, message = "user_id must not be empty."))]
    pub user_id: String,

    #[validate(range(min = 0, max = 100, message = "Battery level is a percentage."))]
    pub battery_level: Option<i64>,

    pub violation_reason: Option<String>,
}

/// Reviewer-facing view over a user's admission telemetry for one exam.
/// Derived on every query, never persisted.
#[derive(Debug, Serialize, PartialEq)]
pub struct ViolationReport {
    pub has_violation: bool,
    pub violation_reason: Option<String>,
    pub battery_level: Option<i64>,
}

impl ViolationReport {
    /// Any entry with a non-null reason marks the attempt as violating.
    /// Battery level comes from the violating entry when it has one,
    /// falling back to the first entry.
    pub fn from_entries(entries: &[ExamEntry]) -> Self {
        let violating = entries.iter().find(|e| e.violation_reason.is_some());
        let battery_level = violating
            .and_then(|e| e.battery_level)
            .or_else(|| entries.first().and_then(|e| e.battery_level));

        Self {
            has_violation: violating.is_some(),
            violation_reason: violating.and_then(|e| e.violation_reason.clone()),
            battery_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, battery_level: Option<i64>, violation_reason: Option<&str>) -> ExamEntry {
        ExamEntry {
            id,
            exam_id: 1,
            user_id: "u-1".to_string(),
            battery_level,
            violation_reason: violation_reason.map(str::to_string),
            started_at: None,
        }
    }

    #[test]
    fn clean_entries_report_no_violation() {
        let report = ViolationReport::from_entries(&[entry(1, Some(80), None)]);
        assert_eq!(
            report,
            ViolationReport {
                has_violation: false,
                violation_reason: None,
                battery_level: Some(80),
            }
        );
    }

    #[test]
    fn violating_entry_wins_over_clean_first_entry() {
        let entries = [
            entry(1, None, None),
            entry(2, Some(42), Some("tab_switch")),
        ];
        let report = ViolationReport::from_entries(&entries);
        assert_eq!(
            report,
            ViolationReport {
                has_violation: true,
                violation_reason: Some("tab_switch".to_string()),
                battery_level: Some(42),
            }
        );
    }

    #[test]
    fn battery_falls_back_to_first_entry() {
        let entries = [
            entry(1, Some(91), None),
            entry(2, None, Some("app_background")),
        ];
        let report = ViolationReport::from_entries(&entries);
        assert!(report.has_violation);
        assert_eq!(report.violation_reason.as_deref(), Some("app_background"));
        assert_eq!(report.battery_level, Some(91));
    }

    #[test]
    fn no_entries_yield_an_empty_report() {
        let report = ViolationReport::from_entries(&[]);
        assert_eq!(
            report,
            ViolationReport {
                has_violation: false,
                violation_reason: None,
                battery_level: None,
            }
        );
    }

    #[test]
    fn violation_is_detected_regardless_of_entry_order() {
        let mut entries = vec![
            entry(1, None, Some("tab_switch")),
            entry(2, Some(10), None),
        ];
        assert!(ViolationReport::from_entries(&entries).has_violation);
        entries.reverse();
        assert!(ViolationReport::from_entries(&entries).has_violation);
    }
}
