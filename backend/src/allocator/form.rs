//! Editable schedule form state.
//!
//! The form owns a [`ScheduleConfig`] and keeps it normalized: every edit is
//! clamped, `first_week_classes` follows `classes_per_week` down, and skip
//! entries that fall outside the calendar are pruned right away. Each edit
//! returns the corrections it applied so the surface can show them.

use serde::{Deserialize, Serialize};

use super::calendar::{
    clamp_classes_per_week, clamp_first_week_classes, clamp_total_weeks, Calendar,
};
use super::{compute_schedule, ScheduleReport};
use crate::models::schedule::{CourseHours, HourPerClass, ScheduleConfig, Slot};

/// Integer fields subject to clamping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TotalWeeks,
    ClassesPerWeek,
    FirstWeekClasses,
}

/// A visible correction applied while normalizing the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Correction {
    Clamped {
        field: Field,
        requested: i32,
        applied: u32,
    },
    SkipSlotsPruned {
        removed: Vec<Slot>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleForm {
    config: ScheduleConfig,
}

impl ScheduleForm {
    /// Wrap `config`, normalizing it silently.
    pub fn new(config: ScheduleConfig) -> Self {
        let mut form = Self { config };
        form.normalize();
        form
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn into_config(self) -> ScheduleConfig {
        self.config
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::from_config(&self.config)
    }

    pub fn report(&self, hours: Option<CourseHours>) -> ScheduleReport {
        compute_schedule(&self.config, hours)
    }

    pub fn set_total_weeks(&mut self, raw: i32) -> Vec<Correction> {
        self.config.total_weeks = raw;
        self.normalize()
    }

    pub fn set_classes_per_week(&mut self, raw: i32) -> Vec<Correction> {
        self.config.classes_per_week = raw;
        self.normalize()
    }

    pub fn set_first_week_classes(&mut self, raw: i32) -> Vec<Correction> {
        self.config.first_week_classes = Some(raw);
        self.normalize()
    }

    pub fn set_hour_per_class(&mut self, hour_per_class: HourPerClass) {
        self.config.hour_per_class = hour_per_class;
    }

    pub fn set_final_review(&mut self, final_review: bool) {
        self.config.final_review = final_review;
    }

    /// Flip the skip mark on `slot`. Returns whether the slot is now skipped.
    ///
    /// Slots outside the current calendar are never recorded.
    pub fn toggle_skip(&mut self, slot: Slot) -> bool {
        if !self.calendar().contains(slot) {
            return false;
        }
        if self.config.skip_slots.remove(&slot) {
            false
        } else {
            self.config.skip_slots.insert(slot);
            true
        }
    }

    fn normalize(&mut self) -> Vec<Correction> {
        let mut corrections = Vec::new();

        let total_weeks = clamp_total_weeks(self.config.total_weeks);
        if total_weeks as i32 != self.config.total_weeks {
            corrections.push(Correction::Clamped {
                field: Field::TotalWeeks,
                requested: self.config.total_weeks,
                applied: total_weeks,
            });
            self.config.total_weeks = total_weeks as i32;
        }

        let classes_per_week = clamp_classes_per_week(self.config.classes_per_week);
        if classes_per_week as i32 != self.config.classes_per_week {
            corrections.push(Correction::Clamped {
                field: Field::ClassesPerWeek,
                requested: self.config.classes_per_week,
                applied: classes_per_week,
            });
            self.config.classes_per_week = classes_per_week as i32;
        }

        if let Some(requested) = self.config.first_week_classes {
            let first_week_classes = clamp_first_week_classes(requested, classes_per_week);
            if first_week_classes as i32 != requested {
                corrections.push(Correction::Clamped {
                    field: Field::FirstWeekClasses,
                    requested,
                    applied: first_week_classes,
                });
                self.config.first_week_classes = Some(first_week_classes as i32);
            }
        }

        let removed = self.calendar().stale_skips(&self.config.skip_slots);
        if !removed.is_empty() {
            for slot in &removed {
                self.config.skip_slots.remove(slot);
            }
            log::debug!("pruned {} stale skip slots", removed.len());
            corrections.push(Correction::SkipSlotsPruned { removed });
        }

        corrections
    }
}
