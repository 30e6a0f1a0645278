//! Schedule configuration as edited by the teacher.
//!
//! A [`ScheduleConfig`] holds the raw, user-editable calendar parameters. The
//! values are kept exactly as entered (including out-of-range integers); the
//! allocator normalizes them before computing anything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Semantic range of `total_weeks`.
pub const MIN_WEEKS: i32 = 1;
pub const MAX_WEEKS: i32 = 30;

/// Semantic range of `classes_per_week`.
pub const MIN_CLASSES_PER_WEEK: i32 = 1;
pub const MAX_CLASSES_PER_WEEK: i32 = 7;

/// Instructional hours consumed by one session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum HourPerClass {
    Two,
    #[default]
    Four,
    Six,
}

impl HourPerClass {
    pub const ALL: [HourPerClass; 3] = [HourPerClass::Two, HourPerClass::Four, HourPerClass::Six];

    pub fn hours(self) -> u32 {
        match self {
            HourPerClass::Two => 2,
            HourPerClass::Four => 4,
            HourPerClass::Six => 6,
        }
    }
}

impl TryFrom<u32> for HourPerClass {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(HourPerClass::Two),
            4 => Ok(HourPerClass::Four),
            6 => Ok(HourPerClass::Six),
            other => Err(format!(
                "hour_per_class must be one of 2, 4 or 6 (got {})",
                other
            )),
        }
    }
}

impl From<HourPerClass> for u32 {
    fn from(value: HourPerClass) -> Self {
        value.hours()
    }
}

impl fmt::Display for HourPerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hours())
    }
}

/// One `(week, class_index)` calendar position. Both components are 1-based.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Slot {
    pub week: u32,
    pub class_index: u32,
}

impl Slot {
    pub fn new(week: u32, class_index: u32) -> Self {
        Self { week, class_index }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {} session {}", self.week, self.class_index)
    }
}

/// Parses the compact `week:session` form used in query strings.
impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (week, class_index) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("invalid slot '{}': expected week:session", s))?;
        let week = week
            .trim()
            .parse()
            .map_err(|_| format!("invalid week in slot '{}'", s))?;
        let class_index = class_index
            .trim()
            .parse()
            .map_err(|_| format!("invalid session in slot '{}'", s))?;
        Ok(Slot::new(week, class_index))
    }
}

/// Parse a comma separated list of `week:session` pairs. Duplicates collapse.
pub fn parse_slot_list(raw: &str) -> Result<BTreeSet<Slot>, String> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(Slot::from_str)
        .collect()
}

fn default_total_weeks() -> i32 {
    18
}

fn default_classes_per_week() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

/// User-editable calendar parameters for one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_total_weeks")]
    pub total_weeks: i32,
    /// Sessions per week from week 2 onward.
    #[serde(default = "default_classes_per_week")]
    pub classes_per_week: i32,
    /// Sessions in week 1. `None` means the first week is a full week.
    #[serde(default)]
    pub first_week_classes: Option<i32>,
    #[serde(default)]
    pub hour_per_class: HourPerClass,
    /// Last session is reserved for review and assessment.
    #[serde(default = "default_true")]
    pub final_review: bool,
    /// Sessions marked as non-teaching (holidays, breaks).
    #[serde(default)]
    pub skip_slots: BTreeSet<Slot>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            total_weeks: default_total_weeks(),
            classes_per_week: default_classes_per_week(),
            first_week_classes: None,
            hour_per_class: HourPerClass::default(),
            final_review: true,
            skip_slots: BTreeSet::new(),
        }
    }
}

impl ScheduleConfig {
    /// Human-readable list of skipped sessions, e.g. `"week 3 session 2, week 8 session 1"`.
    ///
    /// Empty when nothing is skipped.
    pub fn skip_summary(&self) -> String {
        self.skip_slots
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Total instructional hour budget of a course, taken from the course record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseHours {
    pub total_hours: u32,
}

impl CourseHours {
    pub fn new(total_hours: u32) -> Self {
        Self { total_hours }
    }
}

impl From<u32> for CourseHours {
    fn from(total_hours: u32) -> Self {
        CourseHours::new(total_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_per_class_accepts_only_enumerated_values() {
        assert_eq!(HourPerClass::try_from(2).unwrap(), HourPerClass::Two);
        assert_eq!(HourPerClass::try_from(6).unwrap().hours(), 6);
        assert!(HourPerClass::try_from(3).is_err());
        assert!(HourPerClass::try_from(0).is_err());
    }

    #[test]
    fn test_hour_per_class_wire_format_is_integer() {
        assert_eq!(serde_json::to_string(&HourPerClass::Four).unwrap(), "4");
        let parsed: Result<HourPerClass, _> = serde_json::from_str("5");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_config_defaults_match_form_defaults() {
        let config: ScheduleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ScheduleConfig::default());
        assert_eq!(config.total_weeks, 18);
        assert_eq!(config.classes_per_week, 1);
        assert_eq!(config.hour_per_class, HourPerClass::Four);
        assert!(config.final_review);
        assert!(config.first_week_classes.is_none());
    }

    #[test]
    fn test_duplicate_skip_slots_collapse() {
        let config: ScheduleConfig = serde_json::from_str(
            r#"{"skip_slots": [{"week": 3, "class_index": 1}, {"week": 3, "class_index": 1}]}"#,
        )
        .unwrap();
        assert_eq!(config.skip_slots.len(), 1);
    }

    #[test]
    fn test_parse_slot_list() {
        let slots = parse_slot_list("3:2, 8:1,3:2,").unwrap();
        assert_eq!(slots.len(), 2);
        assert!(slots.contains(&Slot::new(8, 1)));
        assert!(parse_slot_list("3-2").is_err());
        assert!(parse_slot_list("x:1").is_err());
        assert!(parse_slot_list("").unwrap().is_empty());
    }

    #[test]
    fn test_skip_summary_is_ordered() {
        let mut config = ScheduleConfig::default();
        config.skip_slots.insert(Slot::new(8, 1));
        config.skip_slots.insert(Slot::new(3, 2));
        assert_eq!(config.skip_summary(), "week 3 session 2, week 8 session 1");
        assert_eq!(ScheduleConfig::default().skip_summary(), "");
    }
}
