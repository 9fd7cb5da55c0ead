//! Structural tag generator integration
//!
//! Definitions come from an external `ctags` running in filter mode. The
//! process is started once and fed one path per request; its cross-reference
//! output is parsed into definition occurrences.

mod client;
pub mod types;

pub use client::{parse_reply_line, reply_pattern, CtagsClient};
pub use types::CtagsError;

use crate::tags::OccurrenceSet;

/// Marker line ending each reply batch, on both sides of the bridge
pub const TERMINATOR: &str = "###terminator###";

/// Fixed filter-mode arguments: cross-reference format, one terminator per file
pub const CTAGS_ARGS: &[&str] = &[
    "-xu",
    "--filter",
    "--filter-terminator=###terminator###\n",
    "--format=1",
];

/// Anything that can report the definitions of a file
pub trait DefinitionSource {
    fn query_definitions(&mut self, path: &str) -> Result<OccurrenceSet, CtagsError>;
}
