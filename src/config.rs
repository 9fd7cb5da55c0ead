//! Startup configuration
//!
//! Everything here is built once before the first request and read-only
//! afterwards. The language map comes from the `--langmap` argument, parser
//! options from the `GTAGSPYGMENTSOPTS` environment variable (or its
//! `TAGBRIDGE_OPTS` alias).

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

/// Environment variable carrying comma-separated parser options
pub const OPTIONS_ENV: &str = "GTAGSPYGMENTSOPTS";

/// Alias for [`OPTIONS_ENV`]; options from both variables are combined
pub const OPTIONS_ENV_ALIAS: &str = "TAGBRIDGE_OPTS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("malformed langmap entry '{0}': expected LANG:EXTS")]
    MalformedLangMapEntry(String),
    #[error("langmap entry '{0}' has an empty language name")]
    EmptyLanguage(String),
}

/// File extension (with leading `.`) to declared language name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageMap {
    languages: HashMap<String, String>,
}

impl LanguageMap {
    /// Parse `Lang1:ext1.ext2,Lang2:ext3`
    ///
    /// Languages starting with a lowercase letter are left to the tag
    /// generator's builtin parsers and are not recorded. An extension claimed
    /// twice belongs to the later language.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let mut languages = HashMap::new();

        for mapping in spec.split(',') {
            if mapping.trim().is_empty() {
                continue;
            }
            let (lang, exts) = mapping
                .split_once(':')
                .filter(|(_, exts)| !exts.contains(':'))
                .ok_or_else(|| ConfigError::MalformedLangMapEntry(mapping.to_string()))?;

            let Some(first) = lang.chars().next() else {
                return Err(ConfigError::EmptyLanguage(mapping.to_string()));
            };
            if first.is_lowercase() {
                debug!(language = lang, "leaving builtin language to the tag generator");
                continue;
            }

            for ext in exts.split('.').filter(|e| !e.is_empty()) {
                languages.insert(format!(".{}", ext), lang.to_string());
            }
        }

        Ok(Self { languages })
    }

    /// Declared language for an extension such as `.py`
    pub fn language_for(&self, ext: &str) -> Option<&str> {
        self.languages
            .get(ext)
            .map(String::as_str)
            .filter(|lang| !lang.is_empty())
    }

    pub fn extension_count(&self) -> usize {
        self.languages.len()
    }

}

/// Token scanner options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Trim leading/trailing punctuation (except `-`, `_`, `.`) from symbols
    pub strip_symbol_chars: bool,
}

impl ParserOptions {
    /// Read options from [`OPTIONS_ENV`] and [`OPTIONS_ENV_ALIAS`]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        for name in [OPTIONS_ENV, OPTIONS_ENV_ALIAS] {
            if let Some(value) = lookup(name) {
                debug!(variable = name, value = %value, "reading parser options");
                options.apply(&value);
            }
        }
        options
    }

    /// Parse a comma-separated option list; unknown options are ignored
    pub fn parse(value: &str) -> Self {
        let mut options = Self::default();
        options.apply(value);
        options
    }

    fn apply(&mut self, value: &str) {
        for option in value.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            match option {
                "stripsymbolchars" => self.strip_symbol_chars = true,
                other => debug!(option = other, "ignoring unknown parser option"),
            }
        }
    }
}

/// Immutable process-wide configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub language_map: LanguageMap,
    pub options: ParserOptions,
}

impl Config {
    pub fn new(language_map: LanguageMap, options: ParserOptions) -> Self {
        Self {
            language_map,
            options,
        }
    }
}
