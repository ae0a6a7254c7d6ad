use serde::Serialize;
use std::path::{Path, PathBuf};

/// Extension written next to the video
pub const SUBTITLE_EXTENSION: &str = "srt";

/// A file on disk whose extension resolves to a video media type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VideoFile {
    path: PathBuf,
}

impl VideoFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base file name, used as the provider search term
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Same path with the extension replaced by `.srt`
    pub fn subtitle_path(&self) -> PathBuf {
        self.path.with_extension(SUBTITLE_EXTENSION)
    }
}

/// One subtitle entry scraped from a provider's result page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub version: String,
    pub downloads: u64,
    pub sequences: u64,
    pub completed: bool,
    pub matches: bool,
    pub link: String,
}

impl Candidate {
    pub fn has_link(&self) -> bool {
        !self.link.is_empty()
    }
}

/// A single failed (provider, language) attempt
#[derive(Debug, Clone, Serialize)]
pub struct AttemptFailure {
    pub provider: String,
    pub language: String,
    pub kind: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Downloaded {
        subtitle: PathBuf,
        provider: String,
        language: String,
    },
    AllFailed {
        attempts: Vec<AttemptFailure>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoReport {
    pub video: VideoFile,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl VideoReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Downloaded { .. })
    }
}
