//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Domain types that already derive Serialize/Deserialize are re-exported.

use serde::{Deserialize, Serialize};

pub use crate::allocator::{Feedback, ScheduleReport};
pub use crate::api::{CourseId, DocumentId, JobId};
pub use crate::models::course::DocumentSlot;
pub use crate::models::progress::{GenerationOutcome, ProgressEvent, Stage};
pub use crate::models::schedule::{HourPerClass, ScheduleConfig};
pub use crate::services::JobStatus;

use crate::client::GenerationRequest;
use crate::models::schedule::parse_slot_list;
use crate::services::GenerationJob;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Request body for `POST /v1/schedule/report`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleReportRequest {
    #[serde(default)]
    pub config: ScheduleConfig,
    /// Course hour budget; omitted while the course record is not loaded.
    #[serde(default)]
    pub total_hours: Option<u32>,
}

/// Schedule report with its user-facing interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReportResponse {
    #[serde(flatten)]
    pub report: ScheduleReport,
    pub feedback: Feedback,
    pub feedback_message: String,
    /// Whether the generate action is enabled for this schedule.
    pub can_generate: bool,
}

impl From<ScheduleReport> for ScheduleReportResponse {
    fn from(report: ScheduleReport) -> Self {
        let feedback = report.feedback();
        Self {
            feedback_message: feedback.message(&report),
            can_generate: feedback.allows_generation(),
            feedback,
            report,
        }
    }
}

/// Schedule parameters passed in a query string.
///
/// `skip` lists skipped sessions as `week:session` pairs, e.g. `skip=3:1,8:2`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleQuery {
    #[serde(default)]
    pub total_weeks: Option<i32>,
    #[serde(default)]
    pub classes_per_week: Option<i32>,
    #[serde(default)]
    pub first_week_classes: Option<i32>,
    #[serde(default)]
    pub hour_per_class: Option<u32>,
    #[serde(default)]
    pub final_review: Option<bool>,
    #[serde(default)]
    pub skip: Option<String>,
}

impl ScheduleQuery {
    /// Build a config, using defaults for absent parameters.
    pub fn into_config(self) -> Result<ScheduleConfig, String> {
        let defaults = ScheduleConfig::default();
        let hour_per_class = match self.hour_per_class {
            Some(raw) => HourPerClass::try_from(raw)?,
            None => defaults.hour_per_class,
        };
        let skip_slots = match self.skip.as_deref() {
            Some(raw) => parse_slot_list(raw)?,
            None => Default::default(),
        };
        Ok(ScheduleConfig {
            total_weeks: self.total_weeks.unwrap_or(defaults.total_weeks),
            classes_per_week: self.classes_per_week.unwrap_or(defaults.classes_per_week),
            first_week_classes: self.first_week_classes,
            hour_per_class,
            final_review: self.final_review.unwrap_or(defaults.final_review),
            skip_slots,
        })
    }
}

/// Request body for `POST /v1/courses/{course_id}/generations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreateGenerationRequest {
    TeachingPlan {
        teacher_name: String,
        #[serde(default)]
        config: ScheduleConfig,
        #[serde(default)]
        note: Option<String>,
    },
    LessonPlan {
        sequence: u32,
        #[serde(default)]
        documents: String,
        /// Set once the user agreed to replace an existing lesson plan.
        #[serde(default)]
        confirm_overwrite: bool,
        /// Current schedule, to range-check `sequence`.
        #[serde(default)]
        schedule: Option<ScheduleConfig>,
    },
}

impl CreateGenerationRequest {
    pub fn into_request(self, course_id: CourseId) -> GenerationRequest {
        match self {
            CreateGenerationRequest::TeachingPlan {
                teacher_name,
                config,
                note,
            } => GenerationRequest::TeachingPlan {
                course_id,
                teacher_name,
                config,
                note,
            },
            CreateGenerationRequest::LessonPlan {
                sequence, documents, ..
            } => GenerationRequest::LessonPlan {
                course_id,
                sequence,
                documents,
            },
        }
    }
}

/// Response for generation creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGenerationResponse {
    /// Job ID for tracking the generation
    pub job_id: JobId,
    pub slot: DocumentSlot,
    pub message: String,
}

/// Snapshot of one generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationStatusResponse {
    pub job_id: JobId,
    pub slot: DocumentSlot,
    pub status: JobStatus,
    /// Latest stage, if any event arrived yet
    pub stage: Option<Stage>,
    pub progress: f64,
    pub events: Vec<ProgressEvent>,
    pub outcome: Option<GenerationOutcome>,
    pub error: Option<String>,
}

impl From<GenerationJob> for GenerationStatusResponse {
    fn from(job: GenerationJob) -> Self {
        let latest = job.events.last();
        Self {
            stage: latest.map(|e| e.stage),
            progress: latest.map(|e| e.progress).unwrap_or(0.0),
            job_id: job.job_id,
            slot: job.slot,
            status: job.status,
            events: job.events,
            outcome: job.outcome,
            error: job.error,
        }
    }
}

/// Query parameters for the notification stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationQuery {
    /// Only forward notifications for this course
    #[serde(default)]
    pub course_id: Option<CourseId>,
}
