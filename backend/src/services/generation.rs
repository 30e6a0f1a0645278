//! Background document generation service.
//!
//! Runs generation streams as background tasks, recording every progress
//! event in the [`GenerationTracker`] so users can follow them via SSE, and
//! announces each newly generated document through the [`DocumentNotifier`].

use std::sync::Arc;

use crate::api::JobId;
use crate::client::{GenerationRequest, GenerationRunner};
use crate::models::progress::GenerationOutcome;
use crate::services::generation_tracker::{GenerationTracker, TrackerError};
use crate::services::notifications::{DocumentNotification, DocumentNotifier};
use crate::stream::{self, GenerationError};

#[derive(Clone)]
pub struct GenerationService {
    runner: Arc<dyn GenerationRunner>,
    tracker: GenerationTracker,
    notifier: DocumentNotifier,
}

impl GenerationService {
    pub fn new(
        runner: Arc<dyn GenerationRunner>,
        tracker: GenerationTracker,
        notifier: DocumentNotifier,
    ) -> Self {
        Self {
            runner,
            tracker,
            notifier,
        }
    }

    pub fn tracker(&self) -> &GenerationTracker {
        &self.tracker
    }

    pub fn notifier(&self) -> &DocumentNotifier {
        &self.notifier
    }

    /// Register a job for `request` and run it in the background.
    ///
    /// Refused while another generation for the same document slot is running.
    pub fn spawn(&self, request: GenerationRequest) -> Result<JobId, TrackerError> {
        let job_id = self.tracker.start(request.slot())?;
        tokio::spawn(run_job(
            job_id.clone(),
            request,
            Arc::clone(&self.runner),
            self.tracker.clone(),
            self.notifier.clone(),
        ));
        Ok(job_id)
    }
}

/// Drive one generation job to its resolution.
///
/// This function is designed to be spawned as a background task. The job is
/// always finished in the tracker before it returns.
pub async fn run_job(
    job_id: JobId,
    request: GenerationRequest,
    runner: Arc<dyn GenerationRunner>,
    tracker: GenerationTracker,
    notifier: DocumentNotifier,
) -> Result<GenerationOutcome, GenerationError> {
    let slot = request.slot();

    let mut source = match runner.open_generation(&request).await {
        Ok(source) => source,
        Err(e) => {
            log::warn!("Job {}: could not open generation stream: {}", job_id, e);
            let err = GenerationError::from(e);
            tracker.fail(&job_id, err.reason());
            return Err(err);
        }
    };

    let result = stream::consume(source.as_mut(), |event| tracker.record(&job_id, event)).await;

    match &result {
        Ok(outcome) => {
            log::info!("Job {}: generated document {} for {}", job_id, outcome.document_id, slot);
            tracker.complete(&job_id, outcome.clone());
            notifier.publish(DocumentNotification::refreshed(slot, outcome.document_id));
        }
        Err(err) => {
            log::warn!("Job {}: generation for {} failed: {}", job_id, slot, err);
            tracker.fail(&job_id, err.reason());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CourseId, DocumentId};
    use crate::models::progress::Stage;
    use crate::services::generation_tracker::JobStatus;
    use crate::stream::{ProgressSource, SseProgressSource, TransportError, GENERIC_FAILURE_REASON};
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::time::Duration;

    /// Serves one fixed SSE body for every request.
    struct FixedRunner {
        body: Option<&'static str>,
    }

    #[async_trait]
    impl GenerationRunner for FixedRunner {
        async fn open_generation(
            &self,
            _request: &GenerationRequest,
        ) -> Result<Box<dyn ProgressSource>, TransportError> {
            let body = self.body.ok_or(TransportError::Status {
                status: 401,
                message: "Not authenticated".into(),
            })?;
            let chunks = vec![Ok(body.as_bytes().to_vec())];
            Ok(Box::new(SseProgressSource::new(futures::stream::iter(chunks).boxed())))
        }
    }

    fn service(body: Option<&'static str>) -> GenerationService {
        GenerationService::new(
            Arc::new(FixedRunner { body }),
            GenerationTracker::new(),
            DocumentNotifier::new(),
        )
    }

    fn lesson_request(sequence: u32) -> GenerationRequest {
        GenerationRequest::LessonPlan {
            course_id: CourseId::new(2),
            sequence,
            documents: String::new(),
        }
    }

    const COMPLETED_BODY: &str = concat!(
        "data: {\"stage\":\"preparing\",\"progress\":0,\"message\":\"p\"}\n\n",
        "data: {\"stage\":\"generating\",\"progress\":60,\"message\":\"g\"}\n\n",
        "data: {\"stage\":\"completed\",\"progress\":100,\"message\":\"done\",\"document_id\":7}\n\n",
    );

    #[tokio::test]
    async fn test_run_job_records_events_and_notifies() {
        let service = service(Some(COMPLETED_BODY));
        let mut notifications = service.notifier().subscribe();
        let job_id = service.tracker().start(lesson_request(1).slot()).unwrap();

        let outcome = run_job(
            job_id.clone(),
            lesson_request(1),
            Arc::clone(&service.runner),
            service.tracker().clone(),
            service.notifier().clone(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.document_id, DocumentId::new(7));
        let job = service.tracker().get(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        let stages: Vec<Stage> = job.events.iter().map(|e| e.stage).collect();
        assert_eq!(stages, vec![Stage::Preparing, Stage::Generating, Stage::Completed]);

        let note = notifications.try_recv().unwrap();
        assert_eq!(
            note,
            DocumentNotification::DocumentsRefreshed {
                course_id: CourseId::new(2),
                doc_type: crate::models::course::DocType::Lesson,
                document_id: DocumentId::new(7),
                lesson_number: Some(1),
            }
        );
    }

    #[tokio::test]
    async fn test_truncated_stream_fails_job_with_generic_reason() {
        let service = service(Some("data: {\"stage\":\"analyzing\",\"progress\":5,\"message\":\"a\"}\n\n"));
        let job_id = service.tracker().start(lesson_request(1).slot()).unwrap();
        let err = run_job(
            job_id.clone(),
            lesson_request(1),
            Arc::clone(&service.runner),
            service.tracker().clone(),
            service.notifier().clone(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.reason(), GENERIC_FAILURE_REASON);
        let job = service.tracker().get(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.events.last().unwrap().stage, Stage::Error);
        assert_eq!(job.error.as_deref(), Some(GENERIC_FAILURE_REASON));
    }

    #[tokio::test]
    async fn test_open_failure_fails_job() {
        let service = service(None);
        let job_id = service.tracker().start(lesson_request(1).slot()).unwrap();
        let result = run_job(
            job_id.clone(),
            lesson_request(1),
            Arc::clone(&service.runner),
            service.tracker().clone(),
            service.notifier().clone(),
        )
        .await;

        assert!(matches!(result, Err(GenerationError::Transport { .. })));
        assert_eq!(service.tracker().get(&job_id).unwrap().status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_spawn_runs_in_background_and_frees_slot() {
        let service = service(Some(COMPLETED_BODY));
        let mut notifications = service.notifier().subscribe();

        let job_id = service.spawn(lesson_request(5)).unwrap();
        tokio::time::timeout(Duration::from_secs(5), notifications.recv())
            .await
            .expect("notification within timeout")
            .unwrap();

        let job = service.tracker().get(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(service.spawn(lesson_request(5)).is_ok());
    }
}
