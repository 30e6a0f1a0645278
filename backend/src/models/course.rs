//! Course and course-document records as served by the course backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::api::{CourseId, DocumentId};

/// Kind of document attached to a course.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Course standard
    Standard,
    /// Teaching plan (one per course)
    Plan,
    /// Course information sheet
    Info,
    /// Lesson plan (one per session). Generated lesson plans are stored as
    /// `lesson_plan`.
    #[serde(alias = "lesson_plan")]
    Lesson,
    /// Slides
    Courseware,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Standard => "standard",
            DocType::Plan => "plan",
            DocType::Info => "info",
            DocType::Lesson => "lesson",
            DocType::Courseware => "courseware",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(DocType::Standard),
            "plan" => Ok(DocType::Plan),
            "info" => Ok(DocType::Info),
            "lesson" | "lesson_plan" => Ok(DocType::Lesson),
            "courseware" => Ok(DocType::Courseware),
            other => Err(format!("Unknown document type: {}", other)),
        }
    }
}

/// Course record. Only the fields this crate reads are modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub class_name: String,
    pub total_hours: u32,
    #[serde(default)]
    pub practice_hours: u32,
    /// A/B/C classification
    #[serde(default)]
    pub course_type: String,
    #[serde(default)]
    pub course_catalog: Option<String>,
}

impl Course {
    pub fn theory_hours(&self) -> u32 {
        self.total_hours.saturating_sub(self.practice_hours)
    }

    /// Teaching plans are generated from the catalog, so it must be non-blank.
    pub fn has_catalog(&self) -> bool {
        self.course_catalog
            .as_deref()
            .is_some_and(|catalog| !catalog.trim().is_empty())
    }
}

/// A document attached to a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDocument {
    pub id: DocumentId,
    pub course_id: CourseId,
    pub doc_type: DocType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub file_url: Option<String>,
    /// Session number for lesson plans.
    #[serde(default)]
    pub lesson_number: Option<u32>,
    /// `Some(false)` when the record exists but its file is gone.
    #[serde(default)]
    pub file_exists: Option<bool>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Response of the course detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseWithDocuments {
    pub course: Course,
    #[serde(default)]
    pub documents: Vec<CourseDocument>,
}

impl CourseWithDocuments {
    /// First document of the given type, if any.
    pub fn document_of(&self, doc_type: DocType) -> Option<&CourseDocument> {
        self.documents.iter().find(|doc| doc.doc_type == doc_type)
    }
}

/// The logical place a generated document lands in.
///
/// At most one generation runs per slot at a time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentSlot {
    pub course_id: CourseId,
    pub doc_type: DocType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<u32>,
}

impl fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lesson_number {
            Some(n) => write!(f, "course {} {} #{}", self.course_id, self.doc_type, n),
            None => write!(f, "course {} {}", self.course_id, self.doc_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_detail_parses_backend_payload() {
        let json = r#"{
            "course": {
                "id": 5, "user_id": 1, "name": "Networks", "semester": "2024-2025-1",
                "class_name": "CS-21", "total_hours": 64, "practice_hours": 16,
                "course_type": "B", "textbook_isbn": "x", "is_template": false,
                "course_catalog": "1. Intro\n2. Layers"
            },
            "documents": [
                {"id": 9, "course_id": 5, "doc_type": "plan", "title": "Plan",
                 "file_url": "/uploads/5/plan.docx", "created_at": "2024-09-01T10:00:00"},
                {"id": 10, "course_id": 5, "doc_type": "lesson", "title": "Lesson 1",
                 "lesson_number": 1, "file_exists": false}
            ]
        }"#;
        let detail: CourseWithDocuments = serde_json::from_str(json).unwrap();
        assert_eq!(detail.course.total_hours, 64);
        assert_eq!(detail.course.theory_hours(), 48);
        assert!(detail.course.has_catalog());
        assert_eq!(detail.document_of(DocType::Plan).unwrap().id.value(), 9);
        let lesson = detail.document_of(DocType::Lesson).unwrap();
        assert_eq!(lesson.lesson_number, Some(1));
        assert_eq!(lesson.file_exists, Some(false));
    }

    #[test]
    fn test_generated_lesson_plans_decode_as_lessons() {
        let docs: Vec<CourseDocument> = serde_json::from_str(
            r#"[
                {"id": 20, "course_id": 5, "doc_type": "lesson", "title": "L1", "lesson_number": 1},
                {"id": 21, "course_id": 5, "doc_type": "lesson_plan", "title": "L2", "lesson_number": 2}
            ]"#,
        )
        .unwrap();
        assert!(docs.iter().all(|doc| doc.doc_type == DocType::Lesson));

        let detail: CourseWithDocuments = serde_json::from_str(
            r#"{
                "course": {"id": 5, "name": "Networks", "total_hours": 64},
                "documents": [{"id": 21, "course_id": 5, "doc_type": "lesson_plan", "lesson_number": 2}]
            }"#,
        )
        .unwrap();
        assert_eq!(detail.course.total_hours, 64);
        assert_eq!(detail.document_of(DocType::Lesson).unwrap().lesson_number, Some(2));
        assert_eq!(
            serde_json::to_string(&DocType::Lesson).unwrap(),
            "\"lesson\""
        );
    }

    #[test]
    fn test_blank_catalog_is_missing() {
        let course = Course {
            id: CourseId::new(1),
            name: "n".into(),
            semester: None,
            class_name: String::new(),
            total_hours: 32,
            practice_hours: 40,
            course_type: "A".into(),
            course_catalog: Some("   ".into()),
        };
        assert!(!course.has_catalog());
        assert_eq!(course.theory_hours(), 0);
    }

    #[test]
    fn test_doc_type_from_str() {
        assert_eq!(DocType::from_str("LESSON").unwrap(), DocType::Lesson);
        assert_eq!(DocType::from_str("lesson_plan").unwrap(), DocType::Lesson);
        assert!(DocType::from_str("video").is_err());
        assert_eq!(DocType::Plan.to_string(), "plan");
    }

    #[test]
    fn test_document_slot_display() {
        let slot = DocumentSlot {
            course_id: CourseId::new(4),
            doc_type: DocType::Lesson,
            lesson_number: Some(3),
        };
        assert_eq!(slot.to_string(), "course 4 lesson #3");
    }
}
