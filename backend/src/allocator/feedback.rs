//! User-facing interpretation of a schedule report.

use serde::{Deserialize, Serialize};

use super::{ScheduleReport, SURPLUS_TOLERANCE};

/// What the form should tell the teacher about the current schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    /// Course hours not loaded yet; nothing to check.
    Pending,
    /// Available slots match the required sessions exactly.
    Exact,
    /// A few spare slots; the teacher should mark which sessions are skipped.
    WithinTolerance { surplus: u32 },
    /// Not enough slots to cover the syllabus.
    Shortfall { missing: u32 },
    /// Too many spare slots for the workload.
    Surplus { excess: u32 },
}

impl Feedback {
    pub fn from_report(report: &ScheduleReport) -> Self {
        if !report.hours_known {
            return Feedback::Pending;
        }
        match report.diff {
            0 => Feedback::Exact,
            d if d < 0 => Feedback::Shortfall {
                missing: d.unsigned_abs() as u32,
            },
            d if d <= SURPLUS_TOLERANCE => Feedback::WithinTolerance { surplus: d as u32 },
            d => Feedback::Surplus { excess: d as u32 },
        }
    }

    /// Whether generation may proceed.
    pub fn allows_generation(&self) -> bool {
        !matches!(self, Feedback::Shortfall { .. } | Feedback::Surplus { .. })
    }

    /// Human-readable explanation quoting the report's numbers.
    pub fn message(&self, report: &ScheduleReport) -> String {
        match self {
            Feedback::Pending => "Course hours are not loaded yet.".to_string(),
            Feedback::Exact => format!(
                "{} sessions fit exactly into {} available slots.",
                report.actual_classes, report.available_slots
            ),
            Feedback::WithinTolerance { surplus } => format!(
                "The course needs {} sessions, {} fewer than the {} available slots. \
                 Mark which sessions are skipped.",
                report.actual_classes, surplus, report.available_slots
            ),
            Feedback::Shortfall { missing } => format!(
                "The course needs {} sessions but only {} slots are available ({} missing). \
                 Increase the number of weeks or sessions per week.",
                report.actual_classes, report.available_slots, missing
            ),
            Feedback::Surplus { excess } => format!(
                "The course needs {} sessions but {} slots are available ({} spare, at most {} allowed). \
                 Mark skipped sessions or reduce the number of weeks.",
                report.actual_classes, report.available_slots, excess, SURPLUS_TOLERANCE
            ),
        }
    }
}
