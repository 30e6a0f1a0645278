//! HTTP client for the course backend.
//!
//! Covers the two collaborator contracts the scheduler consumes (course
//! hours and existing documents) and opens generation progress streams.
//! REST calls carry a bearer token and a request timeout; generation
//! streams carry the token in the query string and are never timed out.

pub mod error;
pub mod request;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::api::CourseId;
use crate::config::BackendSettings;
use crate::models::course::{CourseDocument, CourseWithDocuments, DocType};
use crate::models::progress::{GenerationOutcome, ProgressEvent};
use crate::models::schedule::CourseHours;
use crate::stream::{self, GenerationError, ProgressSource, SseProgressSource, TransportError};

pub use error::ClientError;
pub use request::GenerationRequest;

/// Supplies the course hour budget.
#[async_trait]
pub trait CourseProvider: Send + Sync {
    async fn course_hours(&self, course_id: CourseId) -> Result<CourseHours, ClientError>;
}

/// Lists the documents already attached to a course.
#[async_trait]
pub trait DocumentLookup: Send + Sync {
    async fn documents_by_type(
        &self,
        course_id: CourseId,
        doc_type: DocType,
    ) -> Result<Vec<CourseDocument>, ClientError>;
}

/// Opens progress streams for generation requests.
#[async_trait]
pub trait GenerationRunner: Send + Sync {
    async fn open_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<Box<dyn ProgressSource>, TransportError>;
}

/// reqwest-backed client for the course backend REST API.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    request_timeout: Duration,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, ClientError> {
        let base_url = settings.base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token: settings.token.clone().filter(|t| !t.is_empty()),
            request_timeout: settings.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/courses/{id}`
    pub async fn course_detail(&self, course_id: CourseId) -> Result<CourseWithDocuments, ClientError> {
        let url = self.url(&format!("/api/courses/{}", course_id))?;
        self.get_json(url).await
    }

    /// `GET /api/courses/{id}/documents/type/{doc_type}`
    pub async fn documents_by_type(
        &self,
        course_id: CourseId,
        doc_type: DocType,
    ) -> Result<Vec<CourseDocument>, ClientError> {
        let url = self.url(&format!("/api/courses/{}/documents/type/{}", course_id, doc_type))?;
        self.get_json(url).await
    }

    /// Full stream URL for `request`, including its query string.
    pub fn generation_url(&self, request: &GenerationRequest) -> Result<Url, ClientError> {
        let mut url = self.url(&request.stream_path())?;
        url.query_pairs_mut()
            .extend_pairs(request.query_params(self.token.as_deref()));
        Ok(url)
    }

    /// Connect to the generation stream for `request`.
    pub async fn open_stream(&self, request: &GenerationRequest) -> Result<SseProgressSource, TransportError> {
        let url = self.generation_url(request)?;
        log::info!("Opening generation stream for {}", request.slot());

        let response = self
            .authorized(self.http.get(url))
            .header(header::ACCEPT, "text/event-stream")
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        let response = check_status(response).await?;

        let bytes = response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|b| b.to_vec())
                    .map_err(|e| TransportError::Connection(e.to_string()))
            })
            .boxed();
        Ok(SseProgressSource::new(bytes))
    }

    /// Run one generation to its resolution, forwarding every progress event.
    pub async fn run_generation<F>(
        &self,
        request: &GenerationRequest,
        on_progress: F,
    ) -> Result<GenerationOutcome, GenerationError>
    where
        F: FnMut(&ProgressEvent) + Send,
    {
        let mut source = self.open_stream(request).await?;
        stream::consume(&mut source, on_progress).await
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        log::debug!("GET {}", url);
        let response = self
            .authorized(self.http.get(url))
            .timeout(self.request_timeout)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Pass a success response through; turn anything else into [`ClientError::Status`].
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_detail(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    log::warn!("Course backend returned {}: {}", status.as_u16(), message);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Extract the human-readable error from a backend error body.
///
/// The backend reports `{"detail": "..."}`; some endpoints use `message`.
/// Validation errors carry a list under `detail`, rendered as its `msg` fields.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail").or_else(|| value.get("message"))?;
    match detail {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

#[async_trait]
impl CourseProvider for BackendClient {
    async fn course_hours(&self, course_id: CourseId) -> Result<CourseHours, ClientError> {
        let detail = self.course_detail(course_id).await?;
        Ok(CourseHours::new(detail.course.total_hours))
    }
}

#[async_trait]
impl DocumentLookup for BackendClient {
    async fn documents_by_type(
        &self,
        course_id: CourseId,
        doc_type: DocType,
    ) -> Result<Vec<CourseDocument>, ClientError> {
        BackendClient::documents_by_type(self, course_id, doc_type).await
    }
}

#[async_trait]
impl GenerationRunner for BackendClient {
    async fn open_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<Box<dyn ProgressSource>, TransportError> {
        let source = self.open_stream(request).await?;
        Ok(Box::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::ScheduleConfig;

    fn client(token: Option<&str>) -> BackendClient {
        let mut settings = BackendSettings::new("http://backend.local:8000/");
        settings.token = token.map(str::to_string);
        BackendClient::new(&settings).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        assert_eq!(client(None).base_url(), "http://backend.local:8000");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let settings = BackendSettings::new("not a url");
        assert!(matches!(
            BackendClient::new(&settings),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_generation_url_encodes_query_and_token() {
        let request = GenerationRequest::TeachingPlan {
            course_id: CourseId::new(3),
            teacher_name: "Zhang San".into(),
            config: ScheduleConfig::default(),
            note: None,
        };
        let url = client(Some("s3cr3t")).generation_url(&request).unwrap();
        assert_eq!(url.path(), "/api/courses/3/generate-teaching-plan/stream");
        let query = url.query().unwrap();
        assert!(query.contains("teacher_name=Zhang+San"));
        assert!(query.contains("total_weeks=18"));
        assert!(query.ends_with("token=s3cr3t"));
    }

    #[test]
    fn test_lesson_url_escapes_documents() {
        let request = GenerationRequest::LessonPlan {
            course_id: CourseId::new(3),
            sequence: 2,
            documents: "a&b=c".into(),
        };
        let url = client(None).generation_url(&request).unwrap();
        assert_eq!(url.query(), Some("sequence=2&documents=a%26b%3Dc"));
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(error_detail(r#"{"detail":"课程不存在"}"#).as_deref(), Some("课程不存在"));
        assert_eq!(error_detail(r#"{"message":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(
            error_detail(r#"{"detail":[{"msg":"field required"},{"msg":"bad int"}]}"#).as_deref(),
            Some("field required; bad int")
        );
        assert_eq!(error_detail("<html>"), None);
        assert_eq!(error_detail(r#"{"detail":""}"#), None);
    }
}
