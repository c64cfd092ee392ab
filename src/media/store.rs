use std::path::{Path, PathBuf};

use crate::app_config::MediaConfig;
use crate::file_utils::FileManager;

/// The local media directory: existence checks and client-facing references
#[derive(Debug, Clone)]
pub struct MediaStore {
    /// Directory holding the clips
    media_dir: PathBuf,
    /// Prefix of returned references, e.g. `/media`
    url_prefix: String,
}

impl MediaStore {
    pub fn new(media_dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            media_dir: media_dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(config.media_dir.clone(), config.url_prefix.clone())
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Path of `filename` inside the media directory
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.media_dir.join(filename)
    }

    /// Whether a clip named `filename` is cached locally
    pub fn contains(&self, filename: &str) -> bool {
        !filename.is_empty() && FileManager::file_exists(self.path_for(filename))
    }

    /// Client-facing reference for `filename`, e.g. `/media/CAT.mp4`
    pub fn reference(&self, filename: &str) -> String {
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), filename)
    }
}
