//! Backend wire payloads.
//!
//! Request and response bodies for the upload, start-processing,
//! task-status and task-result endpoints, plus the lead webhook body.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ClipResult;

/// Opaque backend task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status reported by the upload and start-processing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    /// File stored, waiting for lead capture
    Uploaded,
    /// A processing task was started
    Processing,
    /// Anything else the backend sends
    #[default]
    #[serde(other)]
    Unknown,
}

/// Response of `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn uploaded() -> Self {
        Self {
            status: UploadStatus::Uploaded,
            task_id: None,
            error: None,
        }
    }

    pub fn processing(task_id: impl Into<TaskId>) -> Self {
        Self {
            status: UploadStatus::Processing,
            task_id: Some(task_id.into()),
            error: None,
        }
    }
}

/// Body of `POST /api/start-processing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartProcessingRequest {
    pub phone_number: String,
}

/// Response of `POST /api/start-processing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartProcessingResponse {
    #[serde(default)]
    pub status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StartProcessingResponse {
    pub fn processing(task_id: impl Into<TaskId>) -> Self {
        Self {
            status: UploadStatus::Processing,
            task_id: Some(task_id.into()),
            error: None,
        }
    }

    /// Task id when the backend confirmed that processing started.
    pub fn started_task(&self) -> Option<&TaskId> {
        match self.status {
            UploadStatus::Processing => self.task_id.as_ref(),
            _ => None,
        }
    }
}

/// Backend job status as reported by `GET /api/task/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Processing,
    Success,
    Failure,
    /// Queue states we do not model (e.g. PENDING); treated as still running
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Processing => "PROCESSING",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failure => "FAILURE",
            TaskStatus::Unknown => "UNKNOWN",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failure)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response of `GET /api/task/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskStatusResponse {
    pub fn new(status: TaskStatus) -> Self {
        Self { status, error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failure,
            error: Some(error.into()),
        }
    }
}

/// Response of `GET /api/task/{id}/result`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskResultResponse {
    #[serde(default)]
    pub short_clips: Option<Vec<ClipResult>>,
}

impl TaskResultResponse {
    pub fn with_clips(clips: Vec<ClipResult>) -> Self {
        Self {
            short_clips: Some(clips),
        }
    }

    /// Generated clips; a missing list counts as empty.
    pub fn into_clips(self) -> Vec<ClipResult> {
        self.short_clips.unwrap_or_default()
    }
}

/// Body posted to the lead webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadWebhookPayload {
    pub phone: String,
}

/// Error body shape used by the backend on failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// Human-facing message, preferring `error` over `detail`.
    pub fn message(self) -> Option<String> {
        self.error
            .or(self.detail)
            .filter(|m| !m.trim().is_empty())
    }
}
