use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sources::HttpSettings;

const LANGUAGES_ENV: &str = "SUBGRAB_LANGUAGES";
const PROVIDERS_ENV: &str = "SUBGRAB_PROVIDERS";

pub const DEFAULT_LANGUAGES: &[&str] = &["eng"];
pub const DEFAULT_PROVIDERS: &[&str] = &["addic7ed"];

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    download: DownloadSection,
    http: HttpSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DownloadSection {
    languages: Option<Vec<String>>,
    providers: Option<Vec<String>>,
    jobs: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HttpSection {
    timeout_secs: Option<u64>,
}

/// Values given on the command line, which win over everything else
#[derive(Debug, Default)]
pub struct Overrides {
    pub languages: Option<Vec<String>>,
    pub providers: Option<Vec<String>>,
    pub jobs: Option<usize>,
}

/// Effective settings for a run
#[derive(Debug, Clone)]
pub struct Settings {
    pub languages: Vec<String>,
    pub providers: Vec<String>,
    pub jobs: usize,
    pub http: HttpSettings,
}

/// CLI flag, then environment, then config file, then defaults
pub fn load(overrides: Overrides) -> Result<Settings> {
    load_from(&get_config_path(), |key| env::var(key).ok(), overrides)
}

fn load_from(
    config_path: &Path,
    env_lookup: impl Fn(&str) -> Option<String>,
    overrides: Overrides,
) -> Result<Settings> {
    let file = if config_path.exists() {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {config_path:?}"))?;
        toml::from_str::<ConfigFile>(&content)
            .with_context(|| format!("Invalid config file {config_path:?}"))?
    } else {
        ConfigFile::default()
    };

    let languages = overrides
        .languages
        .or_else(|| env_lookup(LANGUAGES_ENV).map(|v| split_list(&v)))
        .or(file.download.languages)
        .unwrap_or_else(|| to_strings(DEFAULT_LANGUAGES));
    let providers = overrides
        .providers
        .or_else(|| env_lookup(PROVIDERS_ENV).map(|v| split_list(&v)))
        .or(file.download.providers)
        .unwrap_or_else(|| to_strings(DEFAULT_PROVIDERS));
    let jobs = overrides.jobs.or(file.download.jobs).unwrap_or(1);

    if languages.is_empty() {
        bail!("No subtitle language configured");
    }
    if providers.is_empty() {
        bail!("No subtitle provider configured");
    }
    if jobs == 0 {
        bail!("jobs must be at least 1");
    }

    let mut http = HttpSettings::default();
    if let Some(secs) = file.http.timeout_secs {
        http.timeout = Duration::from_secs(secs);
    }

    Ok(Settings {
        languages,
        providers,
        jobs,
        http,
    })
}

/// Splits a comma separated list, dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("subgrab"))
        // Without a standard location (e.g. `$HOME` unset) fall back to the
        // current directory.
        .unwrap_or_default()
}

pub fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}
