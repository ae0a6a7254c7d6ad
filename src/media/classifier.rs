use mime_guess::mime;
use std::path::Path;
use walkdir::WalkDir;

use crate::domain::models::VideoFile;
use crate::error::{Result, SubtitleError};

// Checked before the system table so the common containers never depend on it
const VIDEO_EXTENSIONS: &[(&str, &str)] = &[
    ("mkv", "video/x-matroska"),
    ("mp4", "video/mp4"),
    ("avi", "video/avi"),
];

/// Resolves a file extension (without the dot, any case) to a media type
pub fn media_type(extension: &str) -> Option<mime::Mime> {
    let extension = extension.to_lowercase();
    VIDEO_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .and_then(|(_, media)| media.parse().ok())
        .or_else(|| mime_guess::from_ext(&extension).first())
}

pub fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(media_type)
        .map(|media| media.type_() == mime::VIDEO)
        .unwrap_or(false)
}

/// Lazily walks `root` (a file or a directory tree) and yields every video in it.
///
/// Entries that cannot be read come out as errors; the walk carries on past them.
/// Non-video files are skipped.
pub fn walk(root: &Path) -> impl Iterator<Item = Result<VideoFile>> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Err(e) => Some(Err(SubtitleError::from(e))),
            Ok(entry) if entry.file_type().is_dir() => None,
            Ok(entry) if is_video(entry.path()) => {
                Some(Ok(VideoFile::new(entry.into_path())))
            }
            Ok(entry) => {
                tracing::debug!(
                    "Ignoring {} (not a video file)",
                    entry.file_name().to_string_lossy()
                );
                None
            }
        })
}

/// Collects the videos under `root`, logging unreadable entries
pub fn collect_videos(root: &Path) -> Vec<VideoFile> {
    walk(root)
        .filter_map(|item| match item {
            Ok(video) => Some(video),
            Err(e) => {
                tracing::warn!("Skipping entry: {e}");
                None
            }
        })
        .collect()
}
