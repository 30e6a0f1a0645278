//! Overwrite confirmation before a lesson plan is generated.

use serde::{Deserialize, Serialize};

use crate::allocator::ScheduleReport;
use crate::api::DocumentId;
use crate::models::course::{CourseDocument, DocType};

/// What to do before generating the lesson plan for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OverwriteCheck {
    /// Nothing occupies the session yet.
    Proceed,
    /// A lesson plan already exists for the session and would be replaced.
    /// `file_missing` is set when the record exists but its file is gone.
    ConfirmOverwrite {
        document_id: DocumentId,
        file_missing: bool,
    },
    /// The session number lies outside `1..=max`.
    OutOfRange { max: u32 },
}

impl OverwriteCheck {
    /// Decide for session `sequence`.
    ///
    /// With a `report`, the session must lie within its `actual_classes`.
    /// `existing` may contain documents of any type; only lesson plans count.
    pub fn evaluate(
        sequence: u32,
        report: Option<&ScheduleReport>,
        existing: &[CourseDocument],
    ) -> Self {
        if let Some(report) = report {
            if !(1..=report.actual_classes).contains(&sequence) {
                return OverwriteCheck::OutOfRange {
                    max: report.actual_classes,
                };
            }
        }

        existing
            .iter()
            .find(|doc| doc.doc_type == DocType::Lesson && doc.lesson_number == Some(sequence))
            .map(|doc| OverwriteCheck::ConfirmOverwrite {
                document_id: doc.id,
                file_missing: doc.file_exists == Some(false),
            })
            .unwrap_or(OverwriteCheck::Proceed)
    }

    /// Whether generation may start, given the caller's explicit confirmation.
    pub fn allows(&self, confirmed: bool) -> bool {
        match self {
            OverwriteCheck::Proceed => true,
            OverwriteCheck::ConfirmOverwrite { .. } => confirmed,
            OverwriteCheck::OutOfRange { .. } => false,
        }
    }

    pub fn message(&self, sequence: u32) -> String {
        match self {
            OverwriteCheck::Proceed => format!("No lesson plan exists for session {} yet", sequence),
            OverwriteCheck::ConfirmOverwrite {
                file_missing: true, ..
            } => format!(
                "The lesson plan for session {} is recorded but its file is missing; it will be regenerated and the record overwritten",
                sequence
            ),
            OverwriteCheck::ConfirmOverwrite { .. } => {
                format!("A lesson plan for session {} already exists; overwrite it?", sequence)
            }
            OverwriteCheck::OutOfRange { max } => {
                format!("Session {} is out of range (1..={})", sequence, max)
            }
        }
    }
}
