use crate::domain::language::LanguageRegistry;
use crate::domain::models::{Outcome, VideoReport};
use crate::sources::SourceRegistry;

pub fn format_report(report: &VideoReport) -> String {
    let video = report.video.path().display();
    match &report.outcome {
        Outcome::Downloaded {
            subtitle,
            provider,
            language,
        } => format!(
            "OK    {video} -> {} ({provider}, {language})",
            subtitle.display()
        ),
        Outcome::AllFailed { attempts } if attempts.is_empty() => {
            format!("FAIL  {video}: no provider/language to try")
        }
        Outcome::AllFailed { attempts } => {
            let reasons = attempts
                .iter()
                .map(|a| format!("{}/{}: {}", a.provider, a.language, a.error))
                .collect::<Vec<_>>()
                .join("; ");
            format!("FAIL  {video}: {reasons}")
        }
    }
}

pub fn format_summary(reports: &[VideoReport]) -> String {
    let downloaded = reports.iter().filter(|r| r.is_success()).count();
    format!(
        "{} downloaded, {} failed",
        downloaded,
        reports.len() - downloaded
    )
}

pub fn to_json(reports: &[VideoReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}

pub fn format_languages(registry: &LanguageRegistry) -> Vec<String> {
    registry
        .iter()
        .map(|l| format!("{:<5}{:<26}({})", l.code, l.description, l.aliases.join(", ")))
        .collect()
}

/// One line per provider; configured ones carry their priority
pub fn format_providers(registry: &SourceRegistry, configured: &[String]) -> Vec<String> {
    registry
        .iter()
        .map(|source| {
            let priority = configured
                .iter()
                .position(|token| {
                    registry
                        .find(token)
                        .map(|found| std::sync::Arc::ptr_eq(found, source))
                        .unwrap_or(false)
                })
                .map(|idx| format!("[{}] ", idx + 1))
                .unwrap_or_else(|| "    ".to_string());
            format!(
                "{priority}{} ({})",
                source.name(),
                source.aliases().join(", ")
            )
        })
        .collect()
}
