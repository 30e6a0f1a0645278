//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! allocator and the service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;

use super::dto::{
    CreateGenerationRequest, CreateGenerationResponse, GenerationStatusResponse, HealthResponse,
    NotificationQuery, ScheduleQuery, ScheduleReportRequest, ScheduleReportResponse,
};
use super::error::{ApiError, AppError};
use super::state::AppState;
use crate::allocator::{compute_schedule, ScheduleReport};
use crate::api::{CourseId, JobId};
use crate::models::course::DocType;
use crate::models::schedule::{CourseHours, ScheduleConfig};
use crate::services::{JobStatus, OverwriteCheck};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

const RELAY_POLL_INTERVAL: Duration = Duration::from_millis(200);

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

// =============================================================================
// Schedule Reports
// =============================================================================

/// POST /v1/schedule/report
///
/// Compute the schedule report for a config and an optional hour budget.
pub async fn schedule_report(
    Json(request): Json<ScheduleReportRequest>,
) -> HandlerResult<ScheduleReportResponse> {
    let hours = request.total_hours.map(CourseHours::new);
    Ok(Json(compute_schedule(&request.config, hours).into()))
}

/// GET /v1/courses/{course_id}/schedule/report
///
/// Compute the schedule report against the course's recorded hours.
pub async fn course_schedule_report(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Query(query): Query<ScheduleQuery>,
) -> HandlerResult<ScheduleReportResponse> {
    let config = query.into_config().map_err(AppError::BadRequest)?;
    let report = course_report(&state, CourseId::new(course_id), &config).await;
    Ok(Json(report.into()))
}

/// Report for `config` using the course's hours, or unknown hours if they cannot be fetched.
async fn course_report(state: &AppState, course_id: CourseId, config: &ScheduleConfig) -> ScheduleReport {
    let hours = match state.courses.course_hours(course_id).await {
        Ok(hours) => Some(hours),
        Err(e) => {
            log::warn!("Course {}: hours unavailable, reporting without them: {}", course_id, e);
            None
        }
    };
    compute_schedule(config, hours)
}

// =============================================================================
// Generation Jobs
// =============================================================================

/// POST /v1/courses/{course_id}/generations
///
/// Start a teaching-plan or lesson-plan generation. Returns a job ID for
/// tracking progress.
pub async fn create_generation(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Json(body): Json<CreateGenerationRequest>,
) -> Result<(StatusCode, Json<CreateGenerationResponse>), AppError> {
    let course_id = CourseId::new(course_id);

    match &body {
        CreateGenerationRequest::TeachingPlan {
            teacher_name,
            config,
            ..
        } => {
            if teacher_name.trim().is_empty() {
                return Err(AppError::BadRequest("teacher_name must not be empty".to_string()));
            }
            let report = course_report(&state, course_id, config).await;
            let feedback = report.feedback();
            if !feedback.allows_generation() {
                return Err(AppError::BadRequest(feedback.message(&report)));
            }
        }
        CreateGenerationRequest::LessonPlan {
            sequence,
            confirm_overwrite,
            schedule,
            ..
        } => {
            if *sequence == 0 {
                return Err(AppError::BadRequest("sequence must be at least 1".to_string()));
            }
            let report = match schedule {
                Some(config) => Some(course_report(&state, course_id, config).await),
                None => None,
            };
            let existing = state
                .documents
                .documents_by_type(course_id, DocType::Lesson)
                .await?;

            let check = OverwriteCheck::evaluate(*sequence, report.as_ref(), &existing);
            match check {
                OverwriteCheck::OutOfRange { .. } => {
                    return Err(AppError::BadRequest(check.message(*sequence)));
                }
                OverwriteCheck::ConfirmOverwrite { .. } if !*confirm_overwrite => {
                    return Err(AppError::Conflict(
                        ApiError::new("CONFIRM_OVERWRITE", check.message(*sequence))
                            .with_details(serde_json::to_value(check).unwrap_or_default()),
                    ));
                }
                _ => {}
            }
        }
    }

    let request = body.into_request(course_id);
    let slot = request.slot();
    let job_id = state.generation.spawn(request)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateGenerationResponse {
            message: format!(
                "Generation started for {}. Track progress at /v1/generations/{}/events",
                slot, job_id
            ),
            job_id,
            slot,
        }),
    ))
}

/// GET /v1/generations/{job_id}
///
/// Get the status, events and outcome of a generation job.
pub async fn get_generation(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<GenerationStatusResponse> {
    let job_id = JobId::from(job_id);
    let job = state
        .generation
        .tracker()
        .get(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Generation job {} not found", job_id)))?;

    Ok(Json(job.into()))
}

/// GET /v1/generations/{job_id}/events
///
/// Relay a job's progress events via Server-Sent Events (SSE), one JSON
/// progress event per message, followed by a `complete` event with the job
/// status once the job is finished.
pub async fn stream_generation_events(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let job_id = JobId::from(job_id);
    let tracker = state.generation.tracker().clone();
    if tracker.get(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Generation job {} not found", job_id)));
    }

    let stream = async_stream::stream! {
        let mut sent = 0;
        loop {
            let Some(job) = tracker.get(&job_id) else {
                break;
            };

            for event in job.events.iter().skip(sent) {
                let data = serde_json::to_string(event).unwrap_or_default();
                yield Ok(Event::default().data(data));
            }
            sent = job.events.len();

            if job.status != JobStatus::Running {
                let final_event = serde_json::json!({
                    "status": job.status,
                    "outcome": job.outcome,
                    "error": job.error,
                });
                yield Ok(Event::default()
                    .event("complete")
                    .data(serde_json::to_string(&final_event).unwrap_or_default()));
                break;
            }

            tokio::time::sleep(RELAY_POLL_INTERVAL).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}

// =============================================================================
// Notifications
// =============================================================================

/// GET /v1/notifications
///
/// Stream document refresh notifications via SSE, optionally for one course.
pub async fn stream_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.generation.notifier().subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(notification) => {
                    if query.course_id.is_some_and(|id| id != notification.course_id()) {
                        continue;
                    }
                    let data = serde_json::to_string(&notification).unwrap_or_default();
                    yield Ok(Event::default().data(data));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Notification subscriber lagged, {} notifications dropped", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
