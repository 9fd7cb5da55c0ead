//! Tree-sitter grammar registry
//!
//! Maps registered grammar names to tree-sitter languages and hands out
//! lexers that turn source text into a parsed tree ready for tokenization.

use thiserror::Error;
use tree_sitter::{Parser, Tree};

use super::tokens::TokenStream;

/// Grammars known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    C,
    Cpp,
    Go,
    Java,
    JavaScript,
    Python,
    Rust,
    TypeScript,
    Tsx,
}

impl Grammar {
    /// Every registered grammar, in registry order
    pub const ALL: [Grammar; 9] = [
        Grammar::C,
        Grammar::Cpp,
        Grammar::Go,
        Grammar::Java,
        Grammar::JavaScript,
        Grammar::Python,
        Grammar::Rust,
        Grammar::TypeScript,
        Grammar::Tsx,
    ];

    /// Look up a grammar by its registered name
    ///
    /// Names are matched exactly; callers are expected to lowercase and
    /// alias language names before asking.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.name() == name)
    }

    /// Registered lookup name
    pub fn name(&self) -> &'static str {
        match self {
            Grammar::C => "c",
            Grammar::Cpp => "cpp",
            Grammar::Go => "go",
            Grammar::Java => "java",
            Grammar::JavaScript => "js",
            Grammar::Python => "python",
            Grammar::Rust => "rust",
            Grammar::TypeScript => "ts",
            Grammar::Tsx => "tsx",
        }
    }

    /// Get display name for the grammar
    pub fn display_name(&self) -> &'static str {
        match self {
            Grammar::C => "C",
            Grammar::Cpp => "C++",
            Grammar::Go => "Go",
            Grammar::Java => "Java",
            Grammar::JavaScript => "JavaScript",
            Grammar::Python => "Python",
            Grammar::Rust => "Rust",
            Grammar::TypeScript => "TypeScript",
            Grammar::Tsx => "TSX",
        }
    }

    fn language(&self) -> tree_sitter::Language {
        match self {
            Grammar::C => tree_sitter_c::LANGUAGE.into(),
            Grammar::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Grammar::Go => tree_sitter_go::LANGUAGE.into(),
            Grammar::Java => tree_sitter_java::LANGUAGE.into(),
            Grammar::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Grammar::Python => tree_sitter_python::LANGUAGE.into(),
            Grammar::Rust => tree_sitter_rust::LANGUAGE.into(),
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Grammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Error type for tree-sitter operations
#[derive(Debug, Error)]
pub enum TreeSitterError {
    #[error("no grammar registered as '{grammar}' (language '{language}')")]
    UnknownGrammar { language: String, grammar: String },
    #[error("failed to initialize {0} grammar: {1}")]
    LanguageInitFailed(&'static str, String),
    #[error("failed to parse source as {0}")]
    ParseFailed(&'static str),
}

/// A lexer bound to one grammar
///
/// Parsers are created per call; a lexer carries no state between files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexer {
    grammar: Grammar,
}

impl Lexer {
    pub fn new(grammar: Grammar) -> Self {
        Self { grammar }
    }

    /// Look up a lexer by registered grammar name
    pub fn by_name(name: &str) -> Option<Self> {
        Grammar::from_name(name).map(Self::new)
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// Parse source text, returning a tree that can be walked as a token stream
    pub fn parse<'s>(&self, source: &'s str) -> Result<ParsedSource<'s>, TreeSitterError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar.language())
            .map_err(|e| TreeSitterError::LanguageInitFailed(self.grammar.name(), e.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed(self.grammar.name()))?;

        Ok(ParsedSource { tree, source })
    }
}

/// Source text together with its syntax tree
pub struct ParsedSource<'s> {
    tree: Tree,
    source: &'s str,
}

impl<'s> ParsedSource<'s> {
    /// Lazily walk the leaves of the tree in source order
    pub fn tokens(&self) -> TokenStream<'_> {
        TokenStream::new(&self.tree, self.source)
    }

    #[cfg(test)]
    fn has_error(&self) -> bool {
        self.tree.root_node().has_error()
    }
}
