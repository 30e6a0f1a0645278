//! Progress events pushed by the document generation pipeline.
//!
//! One JSON object per server-sent event:
//!
//! ```text
//! { "stage": "generating", "progress": 70, "message": "...",
//!   "document_id": 7, "file_url": "/uploads/..." }
//! ```
//!
//! `document_id` and `file_url` only appear on the `completed` stage.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::DocumentId;

/// Generation stage, in the order a well-formed stream produces them.
///
/// Any stage may be followed directly by [`Stage::Error`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Preparing,
    /// Emitted by the teaching-plan generator before analysis.
    Validating,
    Analyzing,
    Retrieving,
    Generating,
    Rendering,
    /// Emitted by the teaching-plan generator after rendering.
    Saving,
    Completed,
    Error,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed | Stage::Error)
    }

    /// Index of the display step this stage belongs to.
    ///
    /// Steps are: analyze (0), retrieve (1), generate (2), render (3), finish (4).
    pub fn step_index(&self) -> usize {
        match self {
            Stage::Preparing | Stage::Validating | Stage::Analyzing => 0,
            Stage::Retrieving => 1,
            Stage::Generating => 2,
            Stage::Rendering | Stage::Saving => 3,
            Stage::Completed | Stage::Error => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Preparing => "preparing",
            Stage::Validating => "validating",
            Stage::Analyzing => "analyzing",
            Stage::Retrieving => "retrieving",
            Stage::Generating => "generating",
            Stage::Rendering => "rendering",
            Stage::Saving => "saving",
            Stage::Completed => "completed",
            Stage::Error => "error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded progress event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub stage: Stage,
    /// 0-100. Not guaranteed monotonic; passed through as received.
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<DocumentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// Opaque payload some generators attach to `completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ProgressEvent {
    pub fn new(stage: Stage, progress: f64, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress,
            message: message.into(),
            document_id: None,
            file_url: None,
            data: None,
        }
    }

    /// A `completed` event for the given document.
    pub fn completed(document_id: DocumentId, file_url: Option<String>) -> Self {
        Self {
            document_id: Some(document_id),
            file_url,
            ..Self::new(Stage::Completed, 100.0, "completed")
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Stage::Error, 0.0, message)
    }

    /// The successful result carried by a `completed` event.
    ///
    /// `None` for any other stage, and for a `completed` event lacking `document_id`.
    pub fn outcome(&self) -> Option<GenerationOutcome> {
        if self.stage != Stage::Completed {
            return None;
        }
        self.document_id.map(|document_id| GenerationOutcome {
            document_id,
            file_url: self.file_url.clone(),
        })
    }
}

/// Successful resolution of one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub document_id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}
