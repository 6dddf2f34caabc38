//! Accepted upload media and file checks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared media types the uploader accepts.
pub const ACCEPTED_VIDEO_TYPES: &[&str] = &[
    "video/mp4",
    "video/avi",
    "video/mov",
    "video/quicktime",
    "video/wmv",
    "video/flv",
    "video/webm",
    "video/mkv",
];

/// Largest accepted upload (500 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Fallback media type for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Description of a file the user picked, as declared by the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFile {
    /// Original file name (kept for display even when rejected)
    pub name: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// Declared media type
    pub media_type: String,
}

impl VideoFile {
    pub fn new(name: impl Into<String>, size_bytes: u64, media_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            media_type: media_type.into(),
        }
    }

    /// Whether the declared media type is one we accept.
    pub fn has_accepted_type(&self) -> bool {
        ACCEPTED_VIDEO_TYPES.contains(&self.media_type.as_str())
    }
}

/// Why a file was refused before any upload was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("file too large: {size_bytes} bytes (max {max_bytes})")]
    TooLarge { size_bytes: u64, max_bytes: u64 },
}

/// Check a picked file against the accepted types and the size limit.
///
/// The type check runs first, so an oversized file of the wrong type is
/// reported as a type problem.
pub fn validate_video(file: &VideoFile) -> Result<(), FileRejection> {
    if !file.has_accepted_type() {
        return Err(FileRejection::UnsupportedType(file.media_type.clone()));
    }
    if file.size_bytes > MAX_UPLOAD_BYTES {
        return Err(FileRejection::TooLarge {
            size_bytes: file.size_bytes,
            max_bytes: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// Declared media type for a file extension (case-insensitive).
pub fn media_type_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "mp4" | "m4v" => "video/mp4",
        "avi" => "video/avi",
        "mov" | "qt" => "video/quicktime",
        "wmv" => "video/wmv",
        "flv" => "video/flv",
        "webm" => "video/webm",
        "mkv" => "video/mkv",
        _ => OCTET_STREAM,
    }
}
