//! Public API surface for the course backend client.
//!
//! This file consolidates the identifier newtypes and re-exports the DTO types
//! used across the allocator, the generation stream and the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::allocator::{compute_schedule, Feedback, ScheduleReport};
pub use crate::models::course::{
    Course, CourseDocument, CourseWithDocuments, DocType, DocumentSlot,
};
pub use crate::models::progress::{GenerationOutcome, ProgressEvent, Stage};
pub use crate::models::schedule::{CourseHours, HourPerClass, ScheduleConfig, Slot};

crate::define_id_type!(i64, CourseId);
crate::define_id_type!(i64, DocumentId);

/// Identifier of one tracked generation job (UUID v4 text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn generate() -> Self {
        JobId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        JobId(value)
    }
}
