//! Generation requests and the stream URLs they map to.

use serde::{Deserialize, Serialize};

use crate::allocator::{Calendar, ScheduleForm};
use crate::api::CourseId;
use crate::models::course::{DocType, DocumentSlot};
use crate::models::schedule::ScheduleConfig;

/// One request to the external generation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    /// Teaching plan for the whole course, laid out on the given calendar.
    TeachingPlan {
        course_id: CourseId,
        teacher_name: String,
        #[serde(default)]
        config: ScheduleConfig,
        /// Free-text adjustment note typed by the teacher.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    /// Lesson plan for one session.
    LessonPlan {
        course_id: CourseId,
        /// 1-based session number.
        sequence: u32,
        /// Reference material the generator should draw on.
        #[serde(default)]
        documents: String,
    },
}

impl GenerationRequest {
    pub fn course_id(&self) -> CourseId {
        match self {
            GenerationRequest::TeachingPlan { course_id, .. }
            | GenerationRequest::LessonPlan { course_id, .. } => *course_id,
        }
    }

    /// Where the generated document lands.
    pub fn slot(&self) -> DocumentSlot {
        match self {
            GenerationRequest::TeachingPlan { course_id, .. } => DocumentSlot {
                course_id: *course_id,
                doc_type: DocType::Plan,
                lesson_number: None,
            },
            GenerationRequest::LessonPlan {
                course_id, sequence, ..
            } => DocumentSlot {
                course_id: *course_id,
                doc_type: DocType::Lesson,
                lesson_number: Some(*sequence),
            },
        }
    }

    /// Path of the stream endpoint, relative to the backend base URL.
    pub fn stream_path(&self) -> String {
        match self {
            GenerationRequest::TeachingPlan { course_id, .. } => {
                format!("/api/courses/{}/generate-teaching-plan/stream", course_id)
            }
            GenerationRequest::LessonPlan { course_id, .. } => {
                format!("/api/courses/{}/generate-lesson-plan/stream", course_id)
            }
        }
    }

    /// Query parameters of the stream endpoint.
    ///
    /// Schedule values are sent normalized. The token goes in the query string
    /// because EventSource-style endpoints accept no custom headers.
    pub fn query_params(&self, token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = match self {
            GenerationRequest::TeachingPlan {
                teacher_name,
                config,
                note,
                ..
            } => {
                let calendar = Calendar::from_config(config);
                let mut params = vec![
                    ("teacher_name", teacher_name.clone()),
                    ("total_weeks", calendar.total_weeks().to_string()),
                    ("hour_per_class", config.hour_per_class.hours().to_string()),
                    ("classes_per_week", calendar.classes_per_week().to_string()),
                    ("first_week_classes", calendar.first_week_classes().to_string()),
                    ("final_review", config.final_review.to_string()),
                ];
                if let Some(skip_weeks) = skip_weeks_text(config, note.as_deref()) {
                    params.push(("skip_weeks", skip_weeks));
                }
                params
            }
            GenerationRequest::LessonPlan {
                sequence, documents, ..
            } => vec![
                ("sequence", sequence.to_string()),
                ("documents", documents.clone()),
            ],
        };
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            params.push(("token", token.to_string()));
        }
        params
    }
}

/// Skip slots that exist in the calendar plus the teacher's note, or `None` if both are empty.
fn skip_weeks_text(config: &ScheduleConfig, note: Option<&str>) -> Option<String> {
    let skipped = ScheduleForm::new(config.clone()).config().skip_summary();

    let mut parts = Vec::new();
    if !skipped.is_empty() {
        parts.push(format!("no class in {}", skipped));
    }
    if let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) {
        parts.push(note.to_string());
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::{HourPerClass, Slot};

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_teaching_plan_params_are_normalized() {
        let request = GenerationRequest::TeachingPlan {
            course_id: CourseId::new(4),
            teacher_name: "Li Wei".into(),
            config: ScheduleConfig {
                total_weeks: 40,
                classes_per_week: 2,
                first_week_classes: Some(5),
                hour_per_class: HourPerClass::Two,
                ..ScheduleConfig::default()
            },
            note: None,
        };
        assert_eq!(request.stream_path(), "/api/courses/4/generate-teaching-plan/stream");

        let params = request.query_params(Some("tok"));
        assert_eq!(param(&params, "teacher_name"), Some("Li Wei"));
        assert_eq!(param(&params, "total_weeks"), Some("30"));
        assert_eq!(param(&params, "classes_per_week"), Some("2"));
        assert_eq!(param(&params, "first_week_classes"), Some("2"));
        assert_eq!(param(&params, "hour_per_class"), Some("2"));
        assert_eq!(param(&params, "final_review"), Some("true"));
        assert_eq!(param(&params, "skip_weeks"), None);
        assert_eq!(param(&params, "token"), Some("tok"));
    }

    #[test]
    fn test_skip_weeks_combines_slots_and_note() {
        let mut config = ScheduleConfig::default();
        config.skip_slots.insert(Slot::new(3, 1));
        config.skip_slots.insert(Slot::new(25, 1));
        let request = GenerationRequest::TeachingPlan {
            course_id: CourseId::new(1),
            teacher_name: "T".into(),
            config,
            note: Some(" national holiday ".into()),
        };
        let params = request.query_params(None);
        assert_eq!(
            param(&params, "skip_weeks"),
            Some("no class in week 3 session 1; national holiday")
        );
        assert_eq!(param(&params, "token"), None);
    }

    #[test]
    fn test_skip_weeks_omitted_when_only_stale_slots() {
        let mut config = ScheduleConfig::default();
        config.skip_slots.insert(Slot::new(2, 2));
        config.skip_slots.insert(Slot::new(19, 1));
        assert_eq!(skip_weeks_text(&config, Some("  ")), None);

        config.skip_slots.insert(Slot::new(4, 1));
        assert_eq!(
            skip_weeks_text(&config, None).as_deref(),
            Some("no class in week 4 session 1")
        );
    }

    #[test]
    fn test_lesson_plan_slot_and_params() {
        let request = GenerationRequest::LessonPlan {
            course_id: CourseId::new(9),
            sequence: 3,
            documents: "chapter 2".into(),
        };
        let slot = request.slot();
        assert_eq!(slot.doc_type, DocType::Lesson);
        assert_eq!(slot.lesson_number, Some(3));
        assert_eq!(request.stream_path(), "/api/courses/9/generate-lesson-plan/stream");

        let params = request.query_params(Some(""));
        assert_eq!(
            params,
            vec![("sequence", "3".to_string()), ("documents", "chapter 2".to_string())]
        );
    }

    #[test]
    fn test_request_decodes_from_tagged_json() {
        let request: GenerationRequest = serde_json::from_str(
            r#"{"kind":"teaching_plan","course_id":2,"teacher_name":"T","config":{"total_weeks":16,"hour_per_class":6}}"#,
        )
        .unwrap();
        match request {
            GenerationRequest::TeachingPlan { config, .. } => {
                assert_eq!(config.total_weeks, 16);
                assert_eq!(config.hour_per_class, HourPerClass::Six);
                assert_eq!(config.classes_per_week, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
