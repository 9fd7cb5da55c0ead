//! Symbol occurrence extraction
//!
//! Line mapping, language resolution and the token-driven reference scanner,
//! plus the occurrence set shared with the ctags proxy.

mod line_index;
mod occurrence;
mod resolver;
mod scanner;

pub use line_index::{LineCursor, LineIndex};
pub use occurrence::{Occurrence, OccurrenceSet};
pub use resolver::{grammar_name, LanguageResolver, LANGUAGE_ALIASES};
pub use scanner::{normalize_symbol, scan, scan_tokens, TokenScanner};
