//! Normalized teaching calendar and slot enumeration.

use std::collections::BTreeSet;

use crate::models::schedule::{
    ScheduleConfig, Slot, MAX_CLASSES_PER_WEEK, MAX_WEEKS, MIN_CLASSES_PER_WEEK, MIN_WEEKS,
};

/// Clamp a raw `total_weeks` value into its semantic range.
pub fn clamp_total_weeks(raw: i32) -> u32 {
    raw.clamp(MIN_WEEKS, MAX_WEEKS) as u32
}

/// Clamp a raw `classes_per_week` value into its semantic range.
pub fn clamp_classes_per_week(raw: i32) -> u32 {
    raw.clamp(MIN_CLASSES_PER_WEEK, MAX_CLASSES_PER_WEEK) as u32
}

/// Clamp a raw `first_week_classes` value into `[1, classes_per_week]`.
///
/// `classes_per_week` must already be clamped.
pub fn clamp_first_week_classes(raw: i32, classes_per_week: u32) -> u32 {
    raw.clamp(1, classes_per_week as i32) as u32
}

/// Week capacities after normalization.
///
/// Week 1 holds `first_week_classes` sessions, every later week holds
/// `classes_per_week`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Calendar {
    total_weeks: u32,
    classes_per_week: u32,
    first_week_classes: u32,
}

impl Calendar {
    /// Normalize the raw config values into a calendar.
    pub fn from_config(config: &ScheduleConfig) -> Self {
        let classes_per_week = clamp_classes_per_week(config.classes_per_week);
        let first_week_classes = match config.first_week_classes {
            Some(raw) => clamp_first_week_classes(raw, classes_per_week),
            None => classes_per_week,
        };
        Self {
            total_weeks: clamp_total_weeks(config.total_weeks),
            classes_per_week,
            first_week_classes,
        }
    }

    pub fn total_weeks(&self) -> u32 {
        self.total_weeks
    }

    pub fn classes_per_week(&self) -> u32 {
        self.classes_per_week
    }

    pub fn first_week_classes(&self) -> u32 {
        self.first_week_classes
    }

    /// Number of sessions in `week`; 0 for weeks outside the calendar.
    pub fn capacity(&self, week: u32) -> u32 {
        match week {
            0 => 0,
            1 => self.first_week_classes,
            w if w <= self.total_weeks => self.classes_per_week,
            _ => 0,
        }
    }

    /// Whether `slot` names a session that exists under the current capacities.
    pub fn contains(&self, slot: Slot) -> bool {
        slot.class_index >= 1 && slot.class_index <= self.capacity(slot.week)
    }

    /// Every calendar slot, week by week.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        (1..=self.total_weeks).flat_map(move |week| {
            (1..=self.capacity(week)).map(move |class_index| Slot::new(week, class_index))
        })
    }

    /// Slots before skips: `first_week_classes + (total_weeks - 1) * classes_per_week`.
    pub fn base_slots(&self) -> u32 {
        self.first_week_classes + (self.total_weeks - 1) * self.classes_per_week
    }

    /// Number of skip entries that name an existing slot.
    pub fn count_skipped(&self, skips: &BTreeSet<Slot>) -> u32 {
        skips.iter().filter(|slot| self.contains(**slot)).count() as u32
    }

    /// Skip entries that no longer name an existing slot.
    pub fn stale_skips(&self, skips: &BTreeSet<Slot>) -> Vec<Slot> {
        skips
            .iter()
            .copied()
            .filter(|slot| !self.contains(*slot))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar(weeks: i32, per_week: i32, first: Option<i32>) -> Calendar {
        Calendar::from_config(&ScheduleConfig {
            total_weeks: weeks,
            classes_per_week: per_week,
            first_week_classes: first,
            ..Default::default()
        })
    }

    #[test]
    fn test_clamping() {
        assert_eq!(clamp_classes_per_week(0), 1);
        assert_eq!(clamp_classes_per_week(9), 7);
        assert_eq!(clamp_total_weeks(-3), 1);
        assert_eq!(clamp_total_weeks(31), 30);
        assert_eq!(clamp_first_week_classes(5, 3), 3);
        assert_eq!(clamp_first_week_classes(0, 3), 1);
    }

    #[test]
    fn test_first_week_defaults_to_full_week() {
        let cal = calendar(4, 3, None);
        assert_eq!(cal.first_week_classes(), 3);
        assert_eq!(cal.base_slots(), 12);
    }

    #[test]
    fn test_enumeration_matches_base_slots() {
        let cal = calendar(5, 3, Some(1));
        let slots: Vec<Slot> = cal.slots().collect();
        assert_eq!(slots.len() as u32, cal.base_slots());
        assert_eq!(slots[0], Slot::new(1, 1));
        assert_eq!(slots[1], Slot::new(2, 1));
        assert_eq!(*slots.last().unwrap(), Slot::new(5, 3));
    }

    #[test]
    fn test_contains_respects_first_week_capacity() {
        let cal = calendar(3, 2, Some(1));
        assert!(cal.contains(Slot::new(1, 1)));
        assert!(!cal.contains(Slot::new(1, 2)));
        assert!(cal.contains(Slot::new(2, 2)));
        assert!(!cal.contains(Slot::new(4, 1)));
        assert!(!cal.contains(Slot::new(0, 1)));
        assert!(!cal.contains(Slot::new(2, 0)));
    }

    #[test]
    fn test_stale_skips() {
        let cal = calendar(3, 2, None);
        let skips: BTreeSet<Slot> = [Slot::new(2, 2), Slot::new(2, 3), Slot::new(5, 1)]
            .into_iter()
            .collect();
        assert_eq!(cal.count_skipped(&skips), 1);
        assert_eq!(cal.stale_skips(&skips), vec![Slot::new(2, 3), Slot::new(5, 1)]);
    }
}
