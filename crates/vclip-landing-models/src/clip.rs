//! Generated clip results.

use serde::{Deserialize, Serialize};

/// One short clip produced by a finished job.
///
/// Produced by the backend and never mutated on our side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipResult {
    /// Clip file name
    pub filename: String,
    /// Download path, usually relative to the API base URL
    pub url: String,
    /// File size in megabytes, as reported by the backend
    #[serde(rename = "size", default)]
    pub size_mb: f64,
}

impl ClipResult {
    pub fn new(filename: impl Into<String>, url: impl Into<String>, size_mb: f64) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
            size_mb,
        }
    }

    /// Absolute download link for this clip.
    ///
    /// Relative paths are joined onto `base_url`; absolute links pass through.
    pub fn download_url(&self, base_url: &str) -> String {
        if self.url.starts_with("http://") || self.url.starts_with("https://") {
            return self.url.clone();
        }

        let base = base_url.trim_end_matches('/');
        if self.url.starts_with('/') {
            format!("{}{}", base, self.url)
        } else {
            format!("{}/{}", base, self.url)
        }
    }

    /// Human-readable size, e.g. "12.5 MB".
    pub fn display_size(&self) -> String {
        format!("{:.1} MB", self.size_mb)
    }
}
