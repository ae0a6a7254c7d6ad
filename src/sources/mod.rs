use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::language::Language;
use crate::domain::models::VideoFile;
use crate::error::{Result, SubtitleError};

pub mod addic7ed;
pub mod http;
pub mod ranking;
pub mod release;

/// A subtitle provider backend
pub trait SubtitleSource: Send + Sync {
    /// Name shown to the user and matched against configuration
    fn name(&self) -> &str;

    /// Extra tokens that select this source
    fn aliases(&self) -> &[String];

    /// Searches for a subtitle in `language`, writes the best one next to the
    /// video and returns where it was written
    fn download(&self, video: &VideoFile, language: &Language) -> Result<PathBuf>;

    /// Contributes a subtitle back to the provider
    fn upload(&self, _subtitle: &Path, _language: &Language, _video: &VideoFile) -> Result<()> {
        Err(SubtitleError::Unsupported(format!(
            "uploading to {}",
            self.name()
        )))
    }
}

/// Settings shared by every HTTP-backed source
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Replaces `path` with `content` through a temporary sibling file, so a
/// failed write never leaves a truncated subtitle behind
pub(crate) fn write_subtitle(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut partial = tempfile::Builder::new()
        .prefix(".subgrab-")
        .suffix(".part")
        .tempfile_in(dir)?;
    partial.write_all(content)?;
    partial.as_file().sync_all()?;
    partial.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Sources keyed by lowercase name and alias
#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn SubtitleSource>>,
    by_key: HashMap<String, usize>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every provider this build knows about
    pub fn builtin(http: &HttpSettings) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(addic7ed::Addic7ed::new(http)?))?;
        Ok(registry)
    }

    pub fn register(&mut self, source: Arc<dyn SubtitleSource>) -> Result<()> {
        let keys: Vec<String> = std::iter::once(source.name())
            .chain(source.aliases().iter().map(String::as_str))
            .map(str::to_lowercase)
            .collect();

        if let Some((key, &existing)) = keys
            .iter()
            .find_map(|key| self.by_key.get(key).map(|idx| (key, idx)))
        {
            return Err(SubtitleError::Config(format!(
                "'{}' already names provider {}",
                key,
                self.sources[existing].name()
            )));
        }

        let idx = self.sources.len();
        for key in keys {
            self.by_key.insert(key, idx);
        }
        self.sources.push(source);
        Ok(())
    }

    pub fn find(&self, token: &str) -> Option<&Arc<dyn SubtitleSource>> {
        self.by_key
            .get(&token.trim().to_lowercase())
            .map(|&idx| &self.sources[idx])
    }

    /// Resolves a priority list of provider names, warning about unknown ones.
    ///
    /// Fails only when nothing in the list resolves.
    pub fn select(&self, tokens: &[String]) -> Result<Vec<Arc<dyn SubtitleSource>>> {
        let mut selected: Vec<Arc<dyn SubtitleSource>> = Vec::new();
        for token in tokens {
            match self.find(token) {
                Some(source) if selected.iter().any(|s| Arc::ptr_eq(s, source)) => {
                    tracing::debug!("Provider '{}' listed twice, keeping first", token);
                }
                Some(source) => selected.push(Arc::clone(source)),
                None => {
                    tracing::warn!(
                        "{}",
                        SubtitleError::Config(format!("unknown provider '{token}', skipping"))
                    );
                }
            }
        }

        if selected.is_empty() {
            return Err(SubtitleError::Config(format!(
                "none of the requested providers are known: {}",
                tokens.join(",")
            )));
        }
        Ok(selected)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn SubtitleSource>> {
        self.sources.iter()
    }
}
