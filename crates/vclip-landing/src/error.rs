//! Uploader error types.

use thiserror::Error;

use vclip_landing_client::ClientError;
use vclip_landing_models::{ErrorKind, FileRejection, PhoneError, UploadError};

pub type LandingResult<T> = Result<T, LandingError>;

/// User-facing messages.
pub mod messages {
    pub const UNSUPPORTED_TYPE: &str = "Please upload a video file (MP4, MOV, AVI, MKV, etc.)";
    pub const TOO_LARGE: &str = "File too large. Maximum size: 500MB";
    pub const NETWORK: &str = "Network error. Please check your connection and try again.";
    pub const FILE_UNREADABLE: &str = "Could not read the selected file. Please try again.";
    pub const UPLOAD_FAILED: &str = "Upload failed. Please try again.";
    pub const START_FAILED: &str = "Something went wrong. Please try again.";
    pub const STATUS_CHECK_FAILED: &str = "Error checking processing status";
    pub const PROCESSING_FAILED: &str = "Processing failed";
}

#[derive(Debug, Error)]
pub enum LandingError {
    #[error("File rejected: {0}")]
    Rejected(#[from] FileRejection),

    #[error("Upload failed: {0}")]
    Upload(#[source] ClientError),

    #[error("Upload not accepted: {}", .message.as_deref().unwrap_or("unexpected status"))]
    UploadRefused { message: Option<String> },

    #[error("Phone rejected: {0}")]
    Phone(#[from] PhoneError),

    #[error("Processing could not start: {0}")]
    StartProcessing(String),

    #[error("Invalid state: {0}")]
    InvalidState(&'static str),
}

impl LandingError {
    pub fn upload_refused(message: Option<String>) -> Self {
        Self::UploadRefused { message }
    }

    /// Taxonomy bucket for errors that land in the upload state.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            LandingError::Rejected(FileRejection::UnsupportedType(_)) => {
                Some(ErrorKind::ValidationError)
            }
            LandingError::Rejected(FileRejection::TooLarge { .. }) => Some(ErrorKind::SizeError),
            LandingError::Upload(ClientError::Network(_) | ClientError::Io(_)) => {
                Some(ErrorKind::NetworkError)
            }
            LandingError::Upload(_) | LandingError::UploadRefused { .. } => {
                Some(ErrorKind::ServerError)
            }
            LandingError::Phone(_)
            | LandingError::StartProcessing(_)
            | LandingError::InvalidState(_) => None,
        }
    }

    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            LandingError::Rejected(FileRejection::UnsupportedType(_)) => {
                messages::UNSUPPORTED_TYPE.to_string()
            }
            LandingError::Rejected(FileRejection::TooLarge { .. }) => messages::TOO_LARGE.to_string(),
            LandingError::Upload(ClientError::Network(_)) => messages::NETWORK.to_string(),
            LandingError::Upload(ClientError::Io(_)) => messages::FILE_UNREADABLE.to_string(),
            LandingError::Upload(err) => err
                .server_message()
                .unwrap_or(messages::UPLOAD_FAILED)
                .to_string(),
            LandingError::UploadRefused { message } => message
                .clone()
                .unwrap_or_else(|| messages::UPLOAD_FAILED.to_string()),
            LandingError::Phone(err) => err.to_string(),
            LandingError::StartProcessing(_) => messages::START_FAILED.to_string(),
            LandingError::InvalidState(what) => what.to_string(),
        }
    }

    /// Upload-state error for this failure, if it belongs there.
    pub fn to_upload_error(&self) -> Option<UploadError> {
        self.kind()
            .map(|kind| UploadError::new(kind, self.user_message()))
    }
}
