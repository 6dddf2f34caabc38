//! Shared data models for the ViralClip landing page uploader.
//!
//! This crate provides Serde-serializable types for:
//! - Backend wire payloads (upload, start processing, task status/result)
//! - Upload, lead capture and polling state
//! - Accepted video types and the upload size limit
//! - Phone number sanitization and validation

pub mod clip;
pub mod media;
pub mod phone;
pub mod state;
pub mod task;

// Re-export common types
pub use clip::ClipResult;
pub use media::{
    media_type_for_extension, validate_video, FileRejection, VideoFile, ACCEPTED_VIDEO_TYPES,
    MAX_UPLOAD_BYTES,
};
pub use phone::{sanitize_phone_input, validate_phone, PhoneError, MAX_PHONE_LEN, MIN_PHONE_DIGITS};
pub use state::{
    ErrorKind, LeadCaptureState, PollState, ProcessingPhase, UploadError, UploadPhase, UploadState,
};
pub use task::{
    ErrorBody, LeadWebhookPayload, StartProcessingRequest, StartProcessingResponse, TaskId,
    TaskResultResponse, TaskStatus, TaskStatusResponse, UploadResponse, UploadStatus,
};
