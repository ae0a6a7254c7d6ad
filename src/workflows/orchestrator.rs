use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::domain::language::Language;
use crate::domain::models::{AttemptFailure, Outcome, VideoFile, VideoReport};
use crate::sources::SubtitleSource;

/// Tries every (provider, language) pair for each video until one succeeds
pub struct Orchestrator {
    sources: Vec<Arc<dyn SubtitleSource>>,
    languages: Vec<Language>,
}

impl Orchestrator {
    /// `sources` and `languages` are in priority order
    pub fn new(sources: Vec<Arc<dyn SubtitleSource>>, languages: Vec<Language>) -> Self {
        Self { sources, languages }
    }

    /// Providers outer, languages inner; the first success ends the search
    pub fn process(&self, video: &VideoFile) -> VideoReport {
        let mut attempts = Vec::new();

        for source in &self.sources {
            for language in &self.languages {
                tracing::debug!(
                    video = %video.path().display(),
                    provider = source.name(),
                    language = %language.code,
                    "Trying"
                );

                match source.download(video, language) {
                    Ok(subtitle) => {
                        tracing::info!(
                            video = %video.path().display(),
                            provider = source.name(),
                            language = %language.code,
                            "Subtitle written to {}",
                            subtitle.display()
                        );
                        return VideoReport {
                            video: video.clone(),
                            outcome: Outcome::Downloaded {
                                subtitle,
                                provider: source.name().to_string(),
                                language: language.code.clone(),
                            },
                        };
                    }
                    Err(e) => {
                        tracing::warn!(
                            video = %video.path().display(),
                            provider = source.name(),
                            language = %language.code,
                            "Attempt failed: {e}"
                        );
                        attempts.push(AttemptFailure {
                            provider: source.name().to_string(),
                            language: language.code.clone(),
                            kind: e.kind(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::warn!(
            video = %video.path().display(),
            "No subtitle found after {} attempt(s)",
            attempts.len()
        );
        VideoReport {
            video: video.clone(),
            outcome: Outcome::AllFailed { attempts },
        }
    }

    /// Processes every video, at most `jobs` at a time. Reports keep the input order.
    pub fn run(&self, videos: &[VideoFile], jobs: usize) -> Vec<VideoReport> {
        let jobs = jobs.clamp(1, videos.len().max(1));
        if jobs == 1 {
            return videos.iter().map(|video| self.process(video)).collect();
        }

        let next = AtomicUsize::new(0);
        let reports: Mutex<Vec<Option<VideoReport>>> = Mutex::new(vec![None; videos.len()]);

        thread::scope(|scope| {
            for _ in 0..jobs {
                scope.spawn(|| loop {
                    let idx = next.fetch_add(1, Ordering::Relaxed);
                    let Some(video) = videos.get(idx) else {
                        break;
                    };
                    let report = self.process(video);
                    reports.lock()[idx] = Some(report);
                });
            }
        });

        reports.into_inner().into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::language::LanguageRegistry;
    use crate::domain::models::Candidate;
    use crate::error::{Result, SubtitleError};
    use crate::media::classifier;
    use crate::sources::ranking;
    use std::collections::HashMap;
    use std::fs::{self, File};
    use std::path::PathBuf;
    use tempfile::TempDir;

    type Calls = Arc<Mutex<Vec<(String, String, String)>>>;

    /// Serves canned candidates per language and records every call
    struct ScriptedSource {
        name: String,
        aliases: Vec<String>,
        candidates: HashMap<String, Vec<Candidate>>,
        content: Vec<u8>,
        excluded: Vec<String>,
        calls: Calls,
    }

    impl ScriptedSource {
        fn new(name: &str, calls: &Calls) -> Self {
            Self {
                name: name.to_string(),
                aliases: vec![],
                candidates: HashMap::new(),
                content: b"1\n00:00:01,000 --> 00:00:02,000\nHello\n".to_vec(),
                excluded: vec![],
                calls: Arc::clone(calls),
            }
        }

        fn offering(mut self, language: &str, candidates: Vec<Candidate>) -> Self {
            self.candidates.insert(language.to_string(), candidates);
            self
        }

        /// Video that never gets any candidate
        fn except_for(mut self, video_name: &str) -> Self {
            self.excluded.push(video_name.to_string());
            self
        }
    }

    impl SubtitleSource for ScriptedSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn aliases(&self) -> &[String] {
            &self.aliases
        }

        fn download(&self, video: &VideoFile, language: &Language) -> Result<PathBuf> {
            self.calls.lock().push((
                video.file_name(),
                self.name.clone(),
                language.code.clone(),
            ));
            if self.excluded.contains(&video.file_name()) {
                return Err(SubtitleError::NotFound);
            }
            let candidates = self
                .candidates
                .get(&language.code)
                .cloned()
                .unwrap_or_default();
            ranking::best(&candidates).ok_or(SubtitleError::NotFound)?;
            let path = video.subtitle_path();
            fs::write(&path, &self.content)?;
            Ok(path)
        }
    }

    /// Always fails with a transport error
    struct BrokenSource {
        aliases: Vec<String>,
        calls: Calls,
    }

    impl SubtitleSource for BrokenSource {
        fn name(&self) -> &str {
            "Broken"
        }

        fn aliases(&self) -> &[String] {
            &self.aliases
        }

        fn download(&self, video: &VideoFile, language: &Language) -> Result<PathBuf> {
            self.calls.lock().push((
                video.file_name(),
                "Broken".to_string(),
                language.code.clone(),
            ));
            Err(SubtitleError::Network("connection refused".to_string()))
        }
    }

    fn languages(codes: &[&str]) -> Vec<Language> {
        let registry = LanguageRegistry::builtin().unwrap();
        codes
            .iter()
            .map(|code| registry.get(code).unwrap().clone())
            .collect()
    }

    fn usable() -> Candidate {
        Candidate {
            version: "Version STRIFE, 0.00 MBs".to_string(),
            downloads: 5,
            sequences: 1,
            completed: true,
            matches: true,
            link: "http://x/1".to_string(),
        }
    }

    fn linkless() -> Candidate {
        Candidate {
            link: String::new(),
            ..usable()
        }
    }

    fn video_in(dir: &TempDir, name: &str) -> VideoFile {
        let path = dir.path().join(name);
        File::create(&path).unwrap();
        VideoFile::new(path)
    }

    fn call_pairs(calls: &Calls) -> Vec<(String, String)> {
        calls
            .lock()
            .iter()
            .map(|(_, provider, language)| (provider.clone(), language.clone()))
            .collect()
    }

    #[test]
    fn test_first_success_short_circuits() {
        let temp_dir = TempDir::new().unwrap();
        let video = video_in(&temp_dir, "show.s01e01.mkv");
        let calls = Calls::default();
        let p1 = ScriptedSource::new("P1", &calls).offering("eng", vec![usable()]);
        let p2 = ScriptedSource::new("P2", &calls)
            .offering("eng", vec![usable()])
            .offering("fre", vec![usable()]);

        let orchestrator =
            Orchestrator::new(vec![Arc::new(p1), Arc::new(p2)], languages(&["eng", "fre"]));
        let report = orchestrator.process(&video);

        assert!(report.is_success());
        assert_eq!(call_pairs(&calls), vec![("P1".to_string(), "eng".to_string())]);
    }

    #[test]
    fn test_languages_inner_providers_outer() {
        let temp_dir = TempDir::new().unwrap();
        let video = video_in(&temp_dir, "show.s01e01.mkv");
        let calls = Calls::default();
        let p1 = ScriptedSource::new("P1", &calls);
        let p2 = ScriptedSource::new("P2", &calls).offering("fre", vec![usable()]);

        let orchestrator =
            Orchestrator::new(vec![Arc::new(p1), Arc::new(p2)], languages(&["eng", "fre"]));
        let report = orchestrator.process(&video);

        let expected: Vec<(String, String)> = [
            ("P1", "eng"),
            ("P1", "fre"),
            ("P2", "eng"),
            ("P2", "fre"),
        ]
        .iter()
        .map(|(p, l)| (p.to_string(), l.to_string()))
        .collect();
        assert_eq!(call_pairs(&calls), expected);
        match report.outcome {
            Outcome::Downloaded {
                provider, language, ..
            } => {
                assert_eq!(provider, "P2");
                assert_eq!(language, "fre");
            }
            other => panic!("expected a download, got {other:?}"),
        }
    }

    #[test]
    fn test_network_failure_moves_to_next_provider() {
        let temp_dir = TempDir::new().unwrap();
        let video = video_in(&temp_dir, "movie.mp4");
        let calls = Calls::default();
        let broken = BrokenSource {
            aliases: vec![],
            calls: Arc::clone(&calls),
        };
        let working = ScriptedSource::new("Working", &calls).offering("eng", vec![usable()]);

        let orchestrator =
            Orchestrator::new(vec![Arc::new(broken), Arc::new(working)], languages(&["eng"]));
        let report = orchestrator.process(&video);

        assert!(report.is_success());
        assert_eq!(calls.lock().len(), 2);
        assert!(temp_dir.path().join("movie.srt").exists());
    }

    #[test]
    fn test_end_to_end_directory() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("show.s01e01.mkv")).unwrap();
        File::create(temp_dir.path().join("notes.txt")).unwrap();

        let calls = Calls::default();
        let p1 = ScriptedSource::new("P1", &calls).offering("eng", vec![usable()]);
        let orchestrator = Orchestrator::new(vec![Arc::new(p1)], languages(&["eng"]));

        let videos = classifier::collect_videos(temp_dir.path());
        let reports = orchestrator.run(&videos, 1);

        assert_eq!(reports.len(), 1);
        assert!(reports[0].is_success());
        let written = temp_dir.path().join("show.s01e01.srt");
        assert_eq!(
            fs::read(written).unwrap(),
            b"1\n00:00:01,000 --> 00:00:02,000\nHello\n"
        );
        assert!(calls.lock().iter().all(|(video, _, _)| video != "notes.txt"));
    }

    #[test]
    fn test_all_failed_continues_with_next_video() {
        let temp_dir = TempDir::new().unwrap();
        let unlucky = video_in(&temp_dir, "a.mkv");
        let lucky = video_in(&temp_dir, "b.mkv");

        let calls = Calls::default();
        let p1 = ScriptedSource::new("P1", &calls)
            .offering("eng", vec![usable()])
            .except_for("a.mkv");

        let orchestrator = Orchestrator::new(vec![Arc::new(p1)], languages(&["eng", "fre"]));
        let reports = orchestrator.run(&[unlucky.clone(), lucky.clone()], 1);

        assert_eq!(reports.len(), 2);
        match &reports[0].outcome {
            Outcome::AllFailed { attempts } => {
                assert_eq!(attempts.len(), 2);
                assert!(attempts.iter().all(|a| a.kind == "not-found"));
            }
            other => panic!("expected all-failed, got {other:?}"),
        }
        assert!(!unlucky.subtitle_path().exists());
        assert!(reports[1].is_success());
        assert!(lucky.subtitle_path().exists());
    }

    #[test]
    fn test_no_usable_candidate_anywhere() {
        let temp_dir = TempDir::new().unwrap();
        let video = video_in(&temp_dir, "show.s01e01.mkv");
        let calls = Calls::default();
        let p1 = ScriptedSource::new("P1", &calls)
            .offering("eng", vec![linkless(), linkless()])
            .offering("fre", vec![]);

        let orchestrator = Orchestrator::new(vec![Arc::new(p1)], languages(&["eng", "fre"]));
        let reports = orchestrator.run(&[video.clone()], 1);

        assert!(!reports[0].is_success());
        assert!(!video.subtitle_path().exists());
        assert_eq!(calls.lock().len(), 2);
    }

    #[test]
    fn test_parallel_run_keeps_order_and_one_attempt_chain_per_video() {
        let temp_dir = TempDir::new().unwrap();
        let videos: Vec<VideoFile> = (0..12)
            .map(|i| video_in(&temp_dir, &format!("show.s01e{i:02}.mkv")))
            .collect();

        let calls = Calls::default();
        let p1 = ScriptedSource::new("P1", &calls).offering("fre", vec![usable()]);
        let orchestrator = Orchestrator::new(vec![Arc::new(p1)], languages(&["eng", "fre"]));
        let reports = orchestrator.run(&videos, 4);

        assert_eq!(reports.len(), videos.len());
        for (video, report) in videos.iter().zip(&reports) {
            assert_eq!(&report.video, video);
            assert!(report.is_success());
        }

        let calls = calls.lock();
        assert_eq!(calls.len(), videos.len() * 2);
        for video in &videos {
            let per_video: Vec<_> = calls
                .iter()
                .filter(|(name, _, _)| *name == video.file_name())
                .map(|(_, _, language)| language.as_str())
                .collect();
            assert_eq!(per_video, vec!["eng", "fre"]);
        }
    }

    #[test]
    fn test_run_with_no_videos() {
        let calls = Calls::default();
        let p1 = ScriptedSource::new("P1", &calls);
        let orchestrator = Orchestrator::new(vec![Arc::new(p1)], languages(&["eng"]));
        assert!(orchestrator.run(&[], 8).is_empty());
        assert!(calls.lock().is_empty());
    }
}
