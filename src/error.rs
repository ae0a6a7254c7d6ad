use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering videos and fetching their subtitles
#[derive(Error, Debug)]
pub enum SubtitleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot read {}: {message}", display_path(.path))]
    Walk {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No subtitle found")]
    NotFound,

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SubtitleError>;

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}

impl From<walkdir::Error> for SubtitleError {
    fn from(e: walkdir::Error) -> Self {
        Self::Walk {
            path: e.path().map(|p| p.to_path_buf()),
            message: e
                .io_error()
                .map(|io| io.to_string())
                .unwrap_or_else(|| e.to_string()),
        }
    }
}

impl From<reqwest::Error> for SubtitleError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl SubtitleError {
    /// Short label used in reports and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Walk { .. } => "walk",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::NotFound => "not-found",
            Self::Unsupported(_) => "unsupported",
            Self::Io(_) => "io",
        }
    }
}
