//! Tree-sitter integration for tagbridge
//!
//! Tree-sitter grammars serve as the lexical tokenizer: a source buffer is
//! parsed once and its leaves are streamed back as classified tokens
//! `(byte offset, class, text)`. Nothing here knows about tags or lines.

mod parser;
mod tokens;

pub use parser::{Grammar, Lexer, ParsedSource, TreeSitterError};
pub use tokens::{NameKind, Token, TokenClass, TokenStream};
