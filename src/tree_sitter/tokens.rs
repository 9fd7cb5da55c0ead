//! Token stream over a tree-sitter tree
//!
//! Walks the leaves of a syntax tree in source order and classifies each
//! one into a small token taxonomy. Identifier-like leaves fall under
//! [`TokenClass::Name`]; everything else is keyword, punctuation, literal,
//! comment or plain text.

use tree_sitter::{Node, Tree, TreeCursor};

/// Subtypes of the `Name` token class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// Plain identifiers (variables, functions, parameters)
    Plain,
    /// Type names
    Type,
    /// Struct fields, object properties
    Field,
    /// Namespaces, packages, modules
    Namespace,
    /// Statement labels
    Label,
    /// `self`, `this`, `super` and similar pseudo names
    Builtin,
}

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Name(NameKind),
    Keyword,
    Punctuation,
    Literal,
    Comment,
    Text,
}

impl TokenClass {
    /// Whether the class belongs to the `Name` taxonomy
    pub fn is_name(&self) -> bool {
        matches!(self, TokenClass::Name(_))
    }

    fn classify(node: &Node, text: &str) -> Self {
        let kind = node.kind();

        if !node.is_named() {
            let word_like = text
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_');
            return if word_like {
                TokenClass::Keyword
            } else {
                TokenClass::Punctuation
            };
        }

        match kind {
            "identifier" => TokenClass::Name(NameKind::Plain),
            "type_identifier" => TokenClass::Name(NameKind::Type),
            "field_identifier"
            | "property_identifier"
            | "private_property_identifier"
            | "shorthand_property_identifier"
            | "shorthand_property_identifier_pattern"
            | "shorthand_field_identifier" => TokenClass::Name(NameKind::Field),
            "namespace_identifier" | "package_identifier" => TokenClass::Name(NameKind::Namespace),
            "statement_identifier" | "label_name" => TokenClass::Name(NameKind::Label),
            "self" | "this" | "super" => TokenClass::Name(NameKind::Builtin),
            "primitive_type" | "integral_type" | "floating_point_type" | "boolean_type"
            | "void_type" | "predefined_type" => TokenClass::Keyword,
            _ if kind.contains("comment") => TokenClass::Comment,
            _ if is_literal_kind(kind) => TokenClass::Literal,
            _ => TokenClass::Text,
        }
    }
}

fn is_literal_kind(kind: &str) -> bool {
    const FRAGMENTS: &[&str] = &[
        "string", "char", "number", "integer", "float", "literal", "escape",
    ];
    FRAGMENTS.iter().any(|f| kind.contains(f))
        || matches!(kind, "true" | "false" | "null" | "none" | "nil")
}

/// A single classified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Byte offset of the token start
    pub offset: usize,
    pub class: TokenClass,
    pub text: &'a str,
}

/// Lazy, forward-only iterator over the leaves of a tree
///
/// Offsets are non-decreasing across the stream. Zero-width nodes inserted
/// by error recovery are skipped.
pub struct TokenStream<'a> {
    cursor: TreeCursor<'a>,
    source: &'a str,
    finished: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(tree: &'a Tree, source: &'a str) -> Self {
        Self {
            cursor: tree.walk(),
            source,
            finished: false,
        }
    }

    /// Move past the current leaf to the next unvisited subtree
    fn advance(&mut self) {
        loop {
            if self.cursor.goto_next_sibling() {
                return;
            }
            if !self.cursor.goto_parent() {
                self.finished = true;
                return;
            }
        }
    }

    fn token(&self, node: Node<'a>) -> Option<Token<'a>> {
        if node.is_missing() || node.start_byte() == node.end_byte() {
            return None;
        }
        let text = self.source.get(node.start_byte()..node.end_byte())?;
        Some(Token {
            offset: node.start_byte(),
            class: TokenClass::classify(&node, text),
            text,
        })
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            while self.cursor.goto_first_child() {}
            let leaf = self.cursor.node();
            self.advance();
            if let Some(token) = self.token(leaf) {
                return Some(token);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::tree_sitter::{Grammar, Lexer, TokenClass};

    fn names(grammar: Grammar, code: &str) -> Vec<(usize, String)> {
        let parsed = Lexer::new(grammar).parse(code).unwrap();
        parsed
            .tokens()
            .filter(|t| t.class.is_name())
            .map(|t| (t.offset, t.text.to_string()))
            .collect()
    }

    #[test]
    fn test_c_identifiers_in_order() {
        let found = names(Grammar::C, "int x;\nint y = x;\n");
        assert_eq!(
            found,
            vec![(4, "x".to_string()), (11, "y".to_string()), (15, "x".to_string())]
        );
    }

    #[test]
    fn test_offsets_non_decreasing() {
        let code = "def add(a, b):\n    # sum\n    return a + b\n";
        let parsed = Lexer::new(Grammar::Python).parse(code).unwrap();
        let offsets: Vec<usize> = parsed.tokens().map(|t| t.offset).collect();
        assert!(!offsets.is_empty());
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_keywords_and_punctuation_are_not_names() {
        let parsed = Lexer::new(Grammar::C).parse("int x;").unwrap();
        let classes: Vec<TokenClass> = parsed.tokens().map(|t| t.class).collect();
        assert_eq!(classes[0], TokenClass::Keyword);
        assert!(classes[1].is_name());
        assert_eq!(classes[2], TokenClass::Punctuation);
    }

    #[test]
    fn test_comments_and_strings_are_skipped_as_names() {
        let found = names(
            Grammar::JavaScript,
            "// greet someone\nconst msg = \"hello world\";\n",
        );
        assert_eq!(found, vec![(23, "msg".to_string())]);
    }

    #[test]
    fn test_field_and_type_names() {
        let found = names(Grammar::Rust, "struct Point { x: i32 }\n");
        let texts: Vec<&str> = found.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["Point", "x"]);
    }

    #[test]
    fn test_empty_source_yields_no_tokens() {
        let parsed = Lexer::new(Grammar::C).parse("").unwrap();
        assert_eq!(parsed.tokens().count(), 0);
    }
}
