//! Upload, lead capture and polling state.
//!
//! These are the state containers the uploader renders from. Transitions
//! are methods so the phase invariants live next to the data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::phone::sanitize_phone_input;
use crate::{ClipResult, TaskId, TaskStatus, VideoFile};

/// Upload lifecycle. Exactly one phase is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
    Uploaded,
    Error,
}

/// Backend processing lifecycle, known once a task exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingPhase {
    Processing,
    Success,
    Failure,
}

impl ProcessingPhase {
    pub fn from_task_status(status: TaskStatus) -> Option<Self> {
        match status {
            TaskStatus::Processing => Some(ProcessingPhase::Processing),
            TaskStatus::Success => Some(ProcessingPhase::Success),
            TaskStatus::Failure => Some(ProcessingPhase::Failure),
            TaskStatus::Unknown => None,
        }
    }
}

/// Error taxonomy shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Wrong media type
    ValidationError,
    /// File too large
    SizeError,
    /// Request failed before a response arrived
    NetworkError,
    /// Non-success HTTP status or unusable body
    ServerError,
    /// Backend reported that the job failed
    ProcessingFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::SizeError => "size_error",
            ErrorKind::NetworkError => "network_error",
            ErrorKind::ServerError => "server_error",
            ErrorKind::ProcessingFailure => "processing_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-visible error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadError {
    pub kind: ErrorKind,
    pub message: String,
}

impl UploadError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// State of the current upload cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UploadState {
    pub phase: UploadPhase,
    pub file_name: Option<String>,
    pub file_size_bytes: Option<u64>,
    /// Upload indicator: 0 while uploading, 100 once stored
    pub upload_progress: u8,
    pub error: Option<UploadError>,
    pub task_id: Option<TaskId>,
    pub processing_phase: Option<ProcessingPhase>,
    /// Simulated processing progress (0-100)
    pub processing_progress_percent: Option<f64>,
    /// Only set once `processing_phase` is `Success`
    pub result_clips: Option<Vec<ClipResult>>,
    pub selected_at: Option<DateTime<Utc>>,
    pub processing_started_at: Option<DateTime<Utc>>,
}

impl UploadState {
    /// Fresh idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A picked file was refused before upload.
    pub fn reject(file: &VideoFile, error: UploadError) -> Self {
        Self {
            phase: UploadPhase::Error,
            file_name: Some(file.name.clone()),
            file_size_bytes: Some(file.size_bytes),
            error: Some(error),
            selected_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// A picked file was accepted and is being uploaded.
    pub fn uploading(file: &VideoFile) -> Self {
        Self {
            phase: UploadPhase::Uploading,
            file_name: Some(file.name.clone()),
            file_size_bytes: Some(file.size_bytes),
            selected_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Upload finished; the file waits for lead capture.
    pub fn mark_uploaded(&mut self) {
        self.phase = UploadPhase::Uploaded;
        self.upload_progress = 100;
        self.error = None;
    }

    /// Upload finished and the backend already started a task.
    pub fn mark_uploaded_with_task(&mut self, task_id: TaskId) {
        self.mark_uploaded();
        self.task_id = Some(task_id);
    }

    /// Enter the error phase with a user-visible message.
    pub fn fail(&mut self, error: UploadError) {
        self.phase = UploadPhase::Error;
        self.upload_progress = 0;
        self.error = Some(error);
    }

    /// Backend accepted the lead and started a task.
    pub fn start_processing(&mut self, task_id: TaskId) {
        self.task_id = Some(task_id);
        self.processing_phase = Some(ProcessingPhase::Processing);
        self.processing_progress_percent = Some(0.0);
        self.processing_started_at = Some(Utc::now());
    }

    /// Apply a status observed by the poller.
    ///
    /// Statuses we do not model leave the phase untouched.
    pub fn observe_status(&mut self, status: TaskStatus) {
        if let Some(phase) = ProcessingPhase::from_task_status(status) {
            if phase == ProcessingPhase::Processing && self.processing_started_at.is_none() {
                self.processing_started_at = Some(Utc::now());
            }
            self.processing_phase = Some(phase);
        }
    }

    /// Update simulated processing progress, clamped to 0-100.
    pub fn set_processing_progress(&mut self, percent: f64) {
        self.processing_progress_percent = Some(percent.clamp(0.0, 100.0));
    }

    /// Store generated clips. Refused unless processing succeeded.
    pub fn complete_with_clips(&mut self, clips: Vec<ClipResult>) -> bool {
        if self.processing_phase != Some(ProcessingPhase::Success) {
            return false;
        }
        self.result_clips = Some(clips);
        true
    }

    /// Backend reported the job as failed.
    pub fn processing_failed(&mut self, message: impl Into<String>) {
        self.processing_phase = Some(ProcessingPhase::Failure);
        self.fail(UploadError::new(ErrorKind::ProcessingFailure, message));
    }

    pub fn is_processing(&self) -> bool {
        self.processing_phase == Some(ProcessingPhase::Processing)
    }

    /// No further progress is expected without user action.
    pub fn is_terminal(&self) -> bool {
        self.phase == UploadPhase::Error
            || self.processing_phase == Some(ProcessingPhase::Failure)
            || (self.processing_phase == Some(ProcessingPhase::Success)
                && self.result_clips.is_some())
    }
}

/// Lead capture form state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeadCaptureState {
    /// Shown only between a plain upload and the start of processing
    pub visible: bool,
    pub phone_number: String,
    pub submitting: bool,
    pub submitted: bool,
    pub error_message: Option<String>,
}

impl LeadCaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal an empty form for a new upload.
    pub fn show(&mut self) {
        *self = Self {
            visible: true,
            ..Self::default()
        };
    }

    /// Replace the input with its sanitized form.
    pub fn set_input(&mut self, raw: &str) {
        self.phone_number = sanitize_phone_input(raw);
    }

    /// Validation failed; stay editable.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error_message = Some(message.into());
    }

    pub fn begin_submit(&mut self) {
        self.submitting = true;
        self.error_message = None;
    }

    /// Processing started; the form goes away.
    pub fn complete(&mut self) {
        self.submitting = false;
        self.submitted = true;
        self.visible = false;
        self.error_message = None;
    }

    pub fn can_submit(&self) -> bool {
        self.visible && !self.submitting
    }
}

/// Status poller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    #[default]
    Idle,
    Polling,
    Succeeded,
    Failed,
    TimedOut,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Succeeded | PollState::Failed | PollState::TimedOut)
    }
}
