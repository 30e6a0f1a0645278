//! Job tracking for background document generation.
//!
//! In-memory tracker storing the progress events of every generation so HTTP
//! clients can poll a job or follow it over SSE. At most one job per
//! [`DocumentSlot`] may be running at a time.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::api::JobId;
use crate::models::course::DocumentSlot;
use crate::models::progress::{GenerationOutcome, ProgressEvent};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("A generation for {slot} is already running (job {job_id})")]
    AlreadyRunning { job_id: JobId, slot: DocumentSlot },

    #[error("Generation job {0} not found")]
    NotFound(JobId),
}

/// Job status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

/// One tracked generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    pub job_id: JobId,
    pub slot: DocumentSlot,
    pub status: JobStatus,
    /// Events in the order they were received, terminal event included.
    pub events: Vec<ProgressEvent>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub outcome: Option<GenerationOutcome>,
    /// Failure reason shown to the user.
    pub error: Option<String>,
}

impl GenerationJob {
    pub fn is_running(&self) -> bool {
        self.status == JobStatus::Running
    }
}

/// How long a finished job stays queryable.
pub const FINISHED_JOB_RETENTION_MINUTES: i64 = 30;

/// In-memory generation tracker.
///
/// Finished jobs are dropped once they are older than the retention window;
/// running jobs are always kept.
#[derive(Clone)]
pub struct GenerationTracker {
    jobs: Arc<RwLock<HashMap<JobId, GenerationJob>>>,
    retention: chrono::Duration,
}

impl Default for GenerationTracker {
    fn default() -> Self {
        Self::with_retention(chrono::Duration::minutes(FINISHED_JOB_RETENTION_MINUTES))
    }
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: chrono::Duration) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    /// Drop finished jobs older than the retention window. Returns how many were removed.
    pub fn prune_finished(&self) -> usize {
        let mut jobs = self.jobs.write();
        Self::prune_locked(&mut jobs, self.retention)
    }

    fn prune_locked(jobs: &mut HashMap<JobId, GenerationJob>, retention: chrono::Duration) -> usize {
        let cutoff = chrono::Utc::now() - retention;
        let before = jobs.len();
        jobs.retain(|_, job| job.completed_at.map_or(true, |done| done > cutoff));
        let removed = before - jobs.len();
        if removed > 0 {
            log::debug!("Pruned {} finished generation jobs", removed);
        }
        removed
    }

    /// Register a running job for `slot`.
    ///
    /// Fails if another job for the same slot is still running.
    pub fn start(&self, slot: DocumentSlot) -> Result<JobId, TrackerError> {
        let mut jobs = self.jobs.write();
        Self::prune_locked(&mut jobs, self.retention);
        if let Some(running) = jobs.values().find(|job| job.slot == slot && job.is_running()) {
            return Err(TrackerError::AlreadyRunning {
                job_id: running.job_id.clone(),
                slot,
            });
        }

        let job_id = JobId::generate();
        jobs.insert(
            job_id.clone(),
            GenerationJob {
                job_id: job_id.clone(),
                slot,
                status: JobStatus::Running,
                events: vec![],
                created_at: chrono::Utc::now(),
                completed_at: None,
                outcome: None,
                error: None,
            },
        );
        log::info!("Started generation job {} for {}", job_id, slot);
        Ok(job_id)
    }

    /// Append a progress event to a running job. Finished jobs ignore it.
    pub fn record(&self, job_id: &JobId, event: &ProgressEvent) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            if job.is_running() {
                job.events.push(event.clone());
            }
        }
    }

    /// Mark a job as completed with its outcome.
    pub fn complete(&self, job_id: &JobId, outcome: GenerationOutcome) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            if !job.is_running() {
                return;
            }
            if !job.events.last().is_some_and(|e| e.stage.is_terminal()) {
                job.events
                    .push(ProgressEvent::completed(outcome.document_id, outcome.file_url.clone()));
            }
            job.status = JobStatus::Completed;
            job.completed_at = Some(chrono::Utc::now());
            job.outcome = Some(outcome);
        }
    }

    /// Mark a job as failed.
    ///
    /// Transport failures end without a terminal event; one is synthesized so
    /// every finished job ends in exactly one terminal event.
    pub fn fail(&self, job_id: &JobId, reason: impl Into<String>) {
        let reason = reason.into();
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            if !job.is_running() {
                return;
            }
            if !job.events.last().is_some_and(|e| e.stage.is_terminal()) {
                job.events.push(ProgressEvent::error(reason.clone()));
            }
            job.status = JobStatus::Failed;
            job.completed_at = Some(chrono::Utc::now());
            job.error = Some(reason);
        }
    }

    pub fn get(&self, job_id: &JobId) -> Option<GenerationJob> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Events recorded so far.
    pub fn events(&self, job_id: &JobId) -> Result<Vec<ProgressEvent>, TrackerError> {
        self.jobs
            .read()
            .get(job_id)
            .map(|job| job.events.clone())
            .ok_or_else(|| TrackerError::NotFound(job_id.clone()))
    }

    /// The running job for `slot`, if any.
    pub fn running_for(&self, slot: &DocumentSlot) -> Option<JobId> {
        self.jobs
            .read()
            .values()
            .find(|job| job.slot == *slot && job.is_running())
            .map(|job| job.job_id.clone())
    }
}
