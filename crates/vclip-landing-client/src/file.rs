//! Local file references handed to the uploader.

use std::path::{Path, PathBuf};

use vclip_landing_models::media::OCTET_STREAM;
use vclip_landing_models::{media_type_for_extension, VideoFile};

use crate::error::ClientResult;

/// A file picked for upload: where it lives plus what the picker declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    pub info: VideoFile,
}

impl UploadFile {
    pub fn new(path: impl Into<PathBuf>, info: VideoFile) -> Self {
        Self {
            path: path.into(),
            info,
        }
    }

    /// Resolve a file on disk, declaring its media type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            )
            .into());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = path
            .extension()
            .and_then(|e| e.to_str())
            .map(media_type_for_extension)
            .unwrap_or(OCTET_STREAM);

        Ok(Self::new(path, VideoFile::new(name, metadata.len(), media_type)))
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.info.size_bytes
    }

    pub fn media_type(&self) -> &str {
        &self.info.media_type
    }
}
