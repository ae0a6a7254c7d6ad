use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;

use super::http::{HttpFetcher, PageFetcher};
use super::release::release_matches;
use super::{ranking, write_subtitle, HttpSettings, SubtitleSource};
use crate::domain::language::Language;
use crate::domain::models::{Candidate, VideoFile};
use crate::error::{Result, SubtitleError};

const USER_AGENT: &str = "Mozilla/5.0 (Windows; U; Windows NT 5.1; en-US) AppleWebKit/525.13 (KHTML, like Gecko) Chrome/0.A.B.C Safari/525.13";
const HOMEPAGE: &str = "http://www.addic7ed.com";

/// Row labels the site uses besides the plain language name
const SITE_LABELS: &[(&str, &[&str])] = &[
    ("spa", &["Spanish (Spain)"]),
    ("spl", &["Spanish (Latin America)"]),
];

lazy_static! {
    static ref RELEASE_PATTERN: Regex = Regex::new(r"Version (.+), ([0-9]+).([0-9])+ MBs").unwrap();
    static ref STATS_PATTERN: Regex =
        Regex::new(r"([0-9]+) times edited \x{00b7} ([0-9]+) Downloads \x{00b7} ([0-9]+) sequences")
            .unwrap();
    static ref LANGUAGE_CELL: Selector = Selector::parse("td.language").unwrap();
    static ref RESULT_BLOCK: Selector = Selector::parse("table.tabel95").unwrap();
    static ref NEWS_TITLE: Selector = Selector::parse("td.NewsTitle").unwrap();
    static ref NEWS_DATE: Selector = Selector::parse("td.newsDate").unwrap();
    static ref DOWNLOAD_BUTTON: Selector = Selector::parse("a.buttonDownload").unwrap();
    static ref BOLD: Selector = Selector::parse("b").unwrap();
}

/// Scrapes the addic7ed.com search page
pub struct Addic7ed<F = HttpFetcher> {
    aliases: Vec<String>,
    fetcher: F,
}

impl Addic7ed<HttpFetcher> {
    pub fn new(http: &HttpSettings) -> Result<Self> {
        let fetcher = HttpFetcher::new(USER_AGENT, HOMEPAGE, http.timeout)?;
        Ok(Self::with_fetcher(fetcher))
    }
}

impl<F: PageFetcher> Addic7ed<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            aliases: vec!["addicted".to_string(), "addic7ed".to_string()],
            fetcher,
        }
    }
}

impl<F: PageFetcher> SubtitleSource for Addic7ed<F> {
    fn name(&self) -> &str {
        "Addic7ed"
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn download(&self, video: &VideoFile, language: &Language) -> Result<PathBuf> {
        let video_name = video.file_name();
        let page = self.fetcher.get(search_url(&video_name)?.as_str())?;
        let page = String::from_utf8_lossy(&page);

        let candidates = extract_candidates(&page, language, &video_name);
        tracing::debug!(
            "Found {} candidate subtitles for {} in {}",
            candidates.len(),
            video_name,
            language.description
        );

        let best = ranking::best(&candidates).ok_or(SubtitleError::NotFound)?;
        tracing::debug!("Best candidate: {} -> {}", best.version, best.link);

        let content = self.fetcher.get(&best.link)?;
        check_subtitle_content(&content, &best.link)?;

        let subtitle_path = video.subtitle_path();
        write_subtitle(&subtitle_path, &content)?;
        Ok(subtitle_path)
    }
}

fn search_url(video_name: &str) -> Result<Url> {
    Url::parse_with_params(
        &format!("{HOMEPAGE}/search.php"),
        &[("search", video_name), ("Submit", "search")],
    )
    .map_err(|e| SubtitleError::Config(format!("invalid search url: {e}")))
}

/// The site answers with an HTML page instead of a subtitle when the daily
/// download quota is exhausted
fn check_subtitle_content(content: &[u8], link: &str) -> Result<()> {
    let head = String::from_utf8_lossy(&content[..content.len().min(512)]);
    let head = head.trim_start().to_lowercase();
    if head.is_empty() {
        return Err(SubtitleError::Parse(format!("empty subtitle from {link}")));
    }
    if head.starts_with("<!doctype") || head.starts_with("<html") {
        return Err(SubtitleError::Parse(format!(
            "expected a subtitle from {link}, got an HTML page"
        )));
    }
    Ok(())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Nearest enclosing result block of an element
fn closest_block<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| RESULT_BLOCK.matches(ancestor))
}

fn is_completed(language_cell: &ElementRef) -> bool {
    let status: String = language_cell
        .prev_siblings()
        .chain(language_cell.next_siblings())
        .filter_map(ElementRef::wrap)
        .filter(|sibling| sibling.value().name() == "td")
        .flat_map(|sibling| {
            sibling
                .select(&BOLD)
                .map(|b| element_text(&b))
                .collect::<Vec<_>>()
        })
        .collect();
    status.trim() == "Completed"
}

/// Only the language's own row is searched; a button elsewhere in the block
/// belongs to another language
fn download_link(language_cell: &ElementRef) -> String {
    let button = language_cell
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(|row| row.select(&DOWNLOAD_BUTTON).next());

    match button.and_then(|b| b.value().attr("href")).map(str::trim) {
        None | Some("") => String::new(),
        Some(href) if href.starts_with("http://") || href.starts_with("https://") => {
            href.to_string()
        }
        Some(href) if href.starts_with('/') => format!("{HOMEPAGE}{href}"),
        Some(href) => format!("{HOMEPAGE}/{href}"),
    }
}

fn parse_block(
    block: &ElementRef,
    language_cell: &ElementRef,
    video_name: &str,
) -> Option<Candidate> {
    let version = block
        .select(&NEWS_TITLE)
        .map(|title| element_text(&title))
        .collect::<Vec<_>>()
        .join(" ");
    let release = RELEASE_PATTERN.captures(&version)?.get(1)?.as_str().to_string();

    let stats = block
        .select(&NEWS_DATE)
        .map(|date| element_text(&date))
        .collect::<Vec<_>>()
        .join(" ");
    let (downloads, sequences) = STATS_PATTERN
        .captures(&stats)
        .map(|caps| {
            let number = |i: usize| {
                caps.get(i)
                    .and_then(|m| m.as_str().parse::<u64>().ok())
                    .unwrap_or(0)
            };
            (number(2), number(3))
        })
        .unwrap_or((0, 0));

    Some(Candidate {
        matches: release_matches(&release, video_name),
        completed: is_completed(language_cell),
        link: download_link(language_cell),
        version,
        downloads,
        sequences,
    })
}

/// Lowercase labels a row for `language` may carry
fn row_labels(language: &Language) -> Vec<String> {
    let extra = SITE_LABELS
        .iter()
        .filter(|(code, _)| *code == language.code)
        .flat_map(|(_, labels)| labels.iter());
    std::iter::once(language.description.as_str())
        .chain(extra.copied())
        .map(str::to_lowercase)
        .collect()
}

/// Turns a search result page into one candidate per result block offering `language`
pub fn extract_candidates(page: &str, language: &Language, video_name: &str) -> Vec<Candidate> {
    let document = Html::parse_document(page);
    let wanted = row_labels(language);

    let mut seen = Vec::new();
    let mut candidates = Vec::new();
    for cell in document.select(&LANGUAGE_CELL) {
        if !wanted.contains(&element_text(&cell).to_lowercase()) {
            continue;
        }
        let Some(block) = closest_block(&cell) else {
            continue;
        };
        if seen.contains(&block.id()) {
            continue;
        }
        seen.push(block.id());

        if let Some(candidate) = parse_block(&block, &cell, video_name) {
            tracing::debug!("Candidate: {candidate:?}");
            candidates.push(candidate);
        }
    }
    candidates
}
