//! Tokenizer-driven reference scanner
//!
//! Turns the name tokens of a file into reference occurrences. Definitions
//! are never produced here; those come from the structural tag generator.

use std::fs;

use tracing::{debug, warn};

use super::line_index::LineIndex;
use super::occurrence::OccurrenceSet;
use super::resolver::LanguageResolver;
use crate::config::{Config, ParserOptions};
use crate::tree_sitter::{Lexer, Token, TreeSitterError};

/// Characters legal inside identifiers even though they are punctuation
const IDENTIFIER_PUNCTUATION: [char; 3] = ['-', '_', '.'];

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_punctuation() && !IDENTIFIER_PUNCTUATION.contains(&c)
}

/// Normalize a name token into a symbol, or `None` when nothing is left
pub fn normalize_symbol(text: &str, options: &ParserOptions) -> Option<String> {
    let collapsed: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let symbol = if options.strip_symbol_chars {
        collapsed.trim_matches(is_symbol_char)
    } else {
        collapsed.as_str()
    };
    (!symbol.is_empty()).then(|| symbol.to_string())
}

/// Collect reference occurrences from an offset-ordered token stream
pub fn scan_tokens<'t>(
    path: &str,
    text: &str,
    tokens: impl IntoIterator<Item = Token<'t>>,
    options: &ParserOptions,
) -> OccurrenceSet {
    let index = LineIndex::build(text);
    let mut cursor = index.cursor();
    let mut result = OccurrenceSet::new(path);

    for token in tokens.into_iter().filter(|t| t.class.is_name()) {
        let line = cursor.line_of(token.offset);
        if let Some(symbol) = normalize_symbol(token.text, options) {
            result.insert(false, symbol, line, index.line_text(text, line));
        }
    }

    result
}

/// Scan source text with an already resolved lexer
pub fn scan(
    path: &str,
    text: &str,
    lexer: &Lexer,
    options: &ParserOptions,
) -> Result<OccurrenceSet, TreeSitterError> {
    let parsed = lexer.parse(text)?;
    Ok(scan_tokens(path, text, parsed.tokens(), options))
}

/// Reference scanner bound to the process configuration
#[derive(Debug, Clone, Copy)]
pub struct TokenScanner<'c> {
    resolver: LanguageResolver<'c>,
    options: &'c ParserOptions,
}

impl<'c> TokenScanner<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self {
            resolver: LanguageResolver::new(&config.language_map),
            options: &config.options,
        }
    }

    /// Scan the file at `path`
    ///
    /// Unmapped extensions and unreadable or non-UTF-8 files give an empty
    /// set. Only grammar misconfiguration is reported as an error.
    pub fn scan_path(&self, path: &str) -> Result<OccurrenceSet, TreeSitterError> {
        let Some(lexer) = self.resolver.resolve(path)? else {
            return Ok(OccurrenceSet::new(path));
        };

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path, error = %e, "failed to read file");
                return Ok(OccurrenceSet::new(path));
            }
        };
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(path, error = %e, "file is not valid UTF-8");
                return Ok(OccurrenceSet::new(path));
            }
        };

        let result = scan(path, &text, &lexer, self.options)?;
        debug!(
            path,
            grammar = lexer.grammar().display_name(),
            references = result.len(),
            "scanned file"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LanguageMap;
    use crate::tree_sitter::{Grammar, NameKind, TokenClass};

    const STRIP: ParserOptions = ParserOptions {
        strip_symbol_chars: true,
    };

    fn name(offset: usize, text: &str) -> Token<'_> {
        Token {
            offset,
            class: TokenClass::Name(NameKind::Plain),
            text,
        }
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        let options = ParserOptions::default();
        assert_eq!(normalize_symbol("foo\n  bar", &options), Some("foobar".into()));
        assert_eq!(normalize_symbol(" \t\n", &options), None);
    }

    #[test]
    fn test_normalize_strip_symbol_chars() {
        assert_eq!(normalize_symbol("::foo::", &STRIP), Some("foo".into()));
        assert_eq!(normalize_symbol("foo_bar-1", &STRIP), Some("foo_bar-1".into()));
        assert_eq!(normalize_symbol("$var", &STRIP), Some("var".into()));
        assert_eq!(normalize_symbol(".hidden.", &STRIP), Some(".hidden.".into()));
        assert_eq!(normalize_symbol("::", &STRIP), None);
    }

    #[test]
    fn test_normalize_keeps_punctuation_when_disabled() {
        let options = ParserOptions::default();
        assert_eq!(normalize_symbol("::foo::", &options), Some("::foo::".into()));
    }

    #[test]
    fn test_repeated_name_on_one_line_dedups() {
        let text = "foo(foo);\n";
        let tokens = vec![name(0, "foo"), name(4, "foo")];
        let result = scan_tokens("a.c", text, tokens, &ParserOptions::default());

        assert_eq!(result.len(), 1);
        assert_eq!(result.get(false, "foo", 1), Some("foo(foo);"));
    }

    #[test]
    fn test_non_name_tokens_ignored() {
        let text = "if x";
        let tokens = vec![
            Token {
                offset: 0,
                class: TokenClass::Keyword,
                text: "if",
            },
            name(3, "x"),
        ];
        let result = scan_tokens("a.py", text, tokens, &ParserOptions::default());
        let symbols: Vec<&str> = result.iter().map(|o| o.symbol).collect();
        assert_eq!(symbols, vec!["x"]);
    }

    #[test]
    fn test_multiline_token_uses_start_line() {
        let text = "a\nfoo\nbar\n";
        let tokens = vec![name(2, "foo\nbar")];
        let result = scan_tokens("a.c", text, tokens, &ParserOptions::default());
        assert!(result.contains(false, "foobar", 2));
    }

    #[test]
    fn test_scan_c_source() {
        let text = "int x;\nint y = x;\n";
        let lexer = Lexer::new(Grammar::C);
        let result = scan("x.c", text, &lexer, &ParserOptions::default()).unwrap();

        assert!(result.contains(false, "x", 1));
        assert!(result.contains(false, "x", 2));
        assert!(result.contains(false, "y", 2));
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|o| !o.is_definition));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let text = "def f(a):\n    return g(a, a)\n";
        let lexer = Lexer::new(Grammar::Python);
        let first = scan("m.py", text, &lexer, &STRIP).unwrap();
        let second = scan("m.py", text, &lexer, &STRIP).unwrap();
        assert_eq!(first, second);
    }

    fn c_config() -> Config {
        Config::new(LanguageMap::parse("C:.c").unwrap(), ParserOptions::default())
    }

    #[test]
    fn test_scan_path_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.c");
        let config = c_config();

        let result = TokenScanner::new(&config)
            .scan_path(&path.to_string_lossy())
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_scan_path_non_utf8_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.c");
        fs::write(&path, b"int \xff x;\n").unwrap();
        let config = c_config();

        let result = TokenScanner::new(&config)
            .scan_path(&path.to_string_lossy())
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_scan_path_reads_mapped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("good.c");
        fs::write(&path, "int x;\n").unwrap();
        let config = c_config();

        let result = TokenScanner::new(&config)
            .scan_path(&path.to_string_lossy())
            .unwrap();
        assert!(result.contains(false, "x", 1));
    }
}
