use std::collections::HashMap;

use crate::error::{Result, SubtitleError};

/// A subtitle language as known to the providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-2 code
    pub code: String,
    /// Human-readable name, matched against provider result pages
    pub description: String,
    pub aliases: Vec<String>,
}

// (code, description, aliases)
const BUILTIN_LANGUAGES: &[(&str, &str, &[&str])] = &[
    ("ara", "Arabic", &["ar", "arabic"]),
    ("bul", "Bulgarian", &["bg", "bulgarian"]),
    ("cat", "Catalan", &["ca", "catalan"]),
    ("ces", "Czech", &["cs", "cze", "czech"]),
    ("chi", "Chinese (Simplified)", &["zh", "zho", "chinese"]),
    ("dan", "Danish", &["da", "danish"]),
    ("dut", "Dutch", &["nl", "nld", "dutch"]),
    ("ell", "Greek", &["el", "gre", "greek"]),
    ("eng", "English", &["en", "english"]),
    ("fin", "Finnish", &["fi", "finnish"]),
    ("fre", "French", &["fr", "fra", "french"]),
    ("ger", "German", &["de", "deu", "german"]),
    ("heb", "Hebrew", &["he", "hebrew"]),
    ("hrv", "Croatian", &["hr", "croatian"]),
    ("hun", "Hungarian", &["hu", "hungarian"]),
    ("ind", "Indonesian", &["id", "indonesian"]),
    ("ita", "Italian", &["it", "italian"]),
    ("jpn", "Japanese", &["ja", "japanese"]),
    ("kor", "Korean", &["ko", "korean"]),
    ("nor", "Norwegian", &["no", "nb", "norwegian"]),
    ("per", "Persian", &["fa", "fas", "persian", "farsi"]),
    ("pob", "Portuguese (Brazilian)", &["pt-br", "brazilian"]),
    ("pol", "Polish", &["pl", "polish"]),
    ("por", "Portuguese", &["pt", "portuguese"]),
    ("rum", "Romanian", &["ro", "ron", "romanian"]),
    ("rus", "Russian", &["ru", "russian"]),
    ("slv", "Slovenian", &["sl", "slovenian"]),
    ("spa", "Spanish", &["es", "spanish", "castellano"]),
    ("spl", "Spanish (Latin America)", &["es-la", "es-419", "latino"]),
    ("srp", "Serbian", &["sr", "serbian"]),
    ("swe", "Swedish", &["sv", "swedish"]),
    ("tha", "Thai", &["th", "thai"]),
    ("tur", "Turkish", &["tr", "turkish"]),
    ("ukr", "Ukrainian", &["uk", "ukrainian"]),
    ("vie", "Vietnamese", &["vi", "vietnamese"]),
];

/// Immutable lookup table from user tokens to languages.
///
/// Built once at startup and passed by reference to whoever needs it.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
    by_code: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
}

impl LanguageRegistry {
    /// Registry over the languages shipped with the binary
    pub fn builtin() -> Result<Self> {
        let languages = BUILTIN_LANGUAGES
            .iter()
            .map(|(code, description, aliases)| Language {
                code: code.to_string(),
                description: description.to_string(),
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
            })
            .collect();
        Self::new(languages)
    }

    /// Fails when two languages share a code or an alias
    pub fn new(languages: Vec<Language>) -> Result<Self> {
        let mut by_code = HashMap::new();
        let mut by_alias = HashMap::new();

        for (idx, language) in languages.iter().enumerate() {
            let code = language.code.to_lowercase();
            if by_code.insert(code, idx).is_some() {
                return Err(SubtitleError::Config(format!(
                    "duplicate language code '{}'",
                    language.code
                )));
            }
            for alias in &language.aliases {
                if let Some(other) = by_alias.insert(alias.to_lowercase(), idx) {
                    return Err(SubtitleError::Config(format!(
                        "alias '{}' claimed by both '{}' and '{}'",
                        alias, languages[other].code, language.code
                    )));
                }
            }
        }

        Ok(Self {
            languages,
            by_code,
            by_alias,
        })
    }

    /// Case-insensitive lookup, codes first then aliases
    pub fn get(&self, token: &str) -> Option<&Language> {
        let key = token.trim().to_lowercase();
        self.by_code
            .get(&key)
            .or_else(|| self.by_alias.get(&key))
            .map(|&idx| &self.languages[idx])
    }

    /// Resolves a priority list, keeping order and warning about unknown tokens.
    ///
    /// Fails only when nothing in the list resolves.
    pub fn resolve(&self, tokens: &[String]) -> Result<Vec<Language>> {
        let mut resolved: Vec<Language> = Vec::new();
        for token in tokens {
            match self.get(token) {
                Some(language) if resolved.contains(language) => {
                    tracing::debug!("Language '{}' listed twice, keeping first", token);
                }
                Some(language) => resolved.push(language.clone()),
                None => {
                    tracing::warn!(
                        "{}",
                        SubtitleError::Config(format!("unknown language '{token}', skipping"))
                    );
                }
            }
        }

        if resolved.is_empty() {
            return Err(SubtitleError::Config(format!(
                "none of the requested languages are known: {}",
                tokens.join(",")
            )));
        }
        Ok(resolved)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter()
    }
}
