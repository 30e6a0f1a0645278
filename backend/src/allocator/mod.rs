//! Course-scheduling slot allocator.
//!
//! Given a course's total instructional hours and the teacher's weekly
//! calendar, [`compute_schedule`] works out how many sessions the syllabus
//! needs, how many calendar slots are available, and whether the two are
//! reconcilable.
//!
//! The computation is pure and cheap. Callers recompute the report on every
//! edit instead of caching it; nothing here holds state between calls.
//!
//! # Feasibility
//!
//! With course hours known, a schedule is valid iff
//! `0 <= available_slots - actual_classes <= SURPLUS_TOLERANCE`. Without
//! course hours nothing can be contradicted yet, so the schedule is valid.
//!
//! # Example
//!
//! ```
//! use coursegen::allocator::compute_schedule;
//! use coursegen::models::{CourseHours, HourPerClass, ScheduleConfig};
//!
//! let config = ScheduleConfig {
//!     total_weeks: 18,
//!     classes_per_week: 1,
//!     first_week_classes: Some(1),
//!     hour_per_class: HourPerClass::Four,
//!     final_review: true,
//!     skip_slots: Default::default(),
//! };
//! let report = compute_schedule(&config, Some(CourseHours::new(64)));
//! assert_eq!(report.actual_classes, 16);
//! assert_eq!(report.diff, 2);
//! assert!(report.is_valid);
//! ```

mod calendar;
mod feedback;
mod form;


pub use calendar::{clamp_classes_per_week, clamp_first_week_classes, clamp_total_weeks, Calendar};
pub use feedback::Feedback;
pub use form::{Correction, Field, ScheduleForm};

use serde::{Deserialize, Serialize};

use crate::models::schedule::{CourseHours, ScheduleConfig};

/// Maximum number of surplus slots tolerated over the required sessions.
pub const SURPLUS_TOLERANCE: i64 = 6;

/// Derived schedule figures. Recomputed on every input change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReport {
    /// Normalized inputs the figures were computed from.
    pub total_weeks: u32,
    pub classes_per_week: u32,
    pub first_week_classes: u32,
    pub hour_per_class: u32,

    /// `total_weeks * classes_per_week`
    pub max_classes: u32,
    /// `max_classes * hour_per_class`
    pub max_hours: u32,

    /// Course hour budget (0 when unknown).
    pub course_hours: u32,
    pub hours_known: bool,
    /// `floor(course_hours / hour_per_class)`, or `max_classes` while hours are unknown.
    pub actual_classes: u32,
    /// Sessions the generator writes content for; one less when the last is a review.
    pub actual_classes_with_review: i64,

    /// Calendar slots before skips.
    pub base_available_slots: u32,
    /// Skip entries that named an existing slot.
    pub skipped_slots: u32,
    /// Calendar slots after skips.
    pub available_slots: u32,

    /// `available_slots - actual_classes`
    pub diff: i64,
    pub is_valid: bool,
}

impl ScheduleReport {
    /// User-facing interpretation of the figures.
    pub fn feedback(&self) -> Feedback {
        Feedback::from_report(self)
    }
}

/// Compute the schedule report for `config` against the course hour budget.
///
/// Never fails: out-of-range inputs are clamped, and infeasible combinations
/// surface as `is_valid == false`.
pub fn compute_schedule(config: &ScheduleConfig, hours: Option<CourseHours>) -> ScheduleReport {
    let calendar = Calendar::from_config(config);
    let hour_per_class = config.hour_per_class.hours();

    let max_classes = calendar.total_weeks() * calendar.classes_per_week();
    let max_hours = max_classes * hour_per_class;

    let (course_hours, hours_known, actual_classes) = match hours {
        Some(h) => (h.total_hours, true, h.total_hours / hour_per_class),
        None => (0, false, max_classes),
    };
    let actual_classes_with_review = if config.final_review {
        i64::from(actual_classes) - 1
    } else {
        i64::from(actual_classes)
    };

    let base_available_slots = calendar.base_slots();
    let skipped_slots = calendar.count_skipped(&config.skip_slots);
    let available_slots = base_available_slots - skipped_slots;

    let diff = i64::from(available_slots) - i64::from(actual_classes);
    let is_valid = !hours_known || (0..=SURPLUS_TOLERANCE).contains(&diff);

    log::debug!(
        "schedule: weeks={} per_week={} first_week={} slots={}/{} actual={} diff={} valid={}",
        calendar.total_weeks(),
        calendar.classes_per_week(),
        calendar.first_week_classes(),
        available_slots,
        base_available_slots,
        actual_classes,
        diff,
        is_valid
    );

    ScheduleReport {
        total_weeks: calendar.total_weeks(),
        classes_per_week: calendar.classes_per_week(),
        first_week_classes: calendar.first_week_classes(),
        hour_per_class,
        max_classes,
        max_hours,
        course_hours,
        hours_known,
        actual_classes,
        actual_classes_with_review,
        base_available_slots,
        skipped_slots,
        available_slots,
        diff,
        is_valid,
    }
}
