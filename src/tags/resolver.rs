//! File extension to lexer resolution

use std::path::Path;

use tracing::trace;

use crate::config::LanguageMap;
use crate::tree_sitter::{Lexer, TreeSitterError};

/// Languages whose lowercase name differs from the registered grammar name
pub const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("c++", "cpp"),
    ("golang", "go"),
    ("javascript", "js"),
    ("python3", "python"),
    ("typescript", "ts"),
];

/// Grammar lookup name for a declared language
pub fn grammar_name(language: &str) -> String {
    let name = language.to_lowercase();
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, grammar)| grammar.to_string())
        .unwrap_or(name)
}

/// Picks a lexer for a path from the configured language map
#[derive(Debug, Clone, Copy)]
pub struct LanguageResolver<'c> {
    language_map: &'c LanguageMap,
}

impl<'c> LanguageResolver<'c> {
    pub fn new(language_map: &'c LanguageMap) -> Self {
        Self { language_map }
    }

    /// Resolve the lexer for `path`
    ///
    /// An extension missing from the map is `Ok(None)`: the file simply has
    /// no tags. A mapped language without a registered grammar is a
    /// configuration error and is returned as such.
    pub fn resolve(&self, path: &str) -> Result<Option<Lexer>, TreeSitterError> {
        let Some(ext) = Path::new(path).extension().and_then(|e| e.to_str()) else {
            trace!(path, "no extension");
            return Ok(None);
        };
        let Some(language) = self.language_map.language_for(&format!(".{}", ext)) else {
            trace!(path, ext, "extension not in language map");
            return Ok(None);
        };

        let grammar = grammar_name(language);
        match Lexer::by_name(&grammar) {
            Some(lexer) => Ok(Some(lexer)),
            None => Err(TreeSitterError::UnknownGrammar {
                language: language.to_string(),
                grammar,
            }),
        }
    }
}
