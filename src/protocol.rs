//! Request/response framing with the controlling indexer
//!
//! The indexer writes one path per line and reads back, per path, zero or
//! more `TYPE SYMBOL LINE PATH IMAGE` lines followed by a terminator line.
//! Output is flushed after every batch because the reader is line-buffered
//! and waits for the terminator before sending the next path.

use std::borrow::Cow;
use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ctags::{DefinitionSource, TERMINATOR};
use crate::error::Result;
use crate::tags::{Occurrence, OccurrenceSet, TokenScanner};

/// Render one occurrence as a protocol line (without newline)
pub fn format_occurrence(occurrence: &Occurrence<'_>) -> String {
    format!(
        "{} {} {} {} {}",
        occurrence.kind_tag(),
        occurrence.symbol,
        occurrence.line,
        occurrence.path,
        occurrence.image
    )
}

/// Write a batch of occurrences followed by the terminator line
pub fn write_batch<W: Write>(output: &mut W, occurrences: &OccurrenceSet) -> std::io::Result<()> {
    for occurrence in occurrences.iter() {
        writeln!(output, "{}", format_occurrence(&occurrence))?;
    }
    writeln!(output, "{}", TERMINATOR)
}

/// Write a batch as JSON lines, one object per occurrence
pub fn write_json_batch<W: Write>(
    output: &mut W,
    occurrences: &OccurrenceSet,
) -> std::io::Result<()> {
    for occurrence in occurrences.iter() {
        write_json_line(output, &occurrence)?;
    }
    Ok(())
}

fn write_json_line<W: Write, T: Serialize>(output: &mut W, value: &T) -> std::io::Result<()> {
    serde_json::to_writer(&mut *output, value)?;
    writeln!(output)
}

/// Strip the line terminator and trailing whitespace from a request line
pub fn request_path(line: &str) -> &str {
    line.trim_end()
}

/// Single-threaded request loop
///
/// Handles exactly one path at a time: read, query, write, flush.
pub struct RequestLoop<'c, S> {
    definitions: S,
    references: Option<TokenScanner<'c>>,
}

impl<'c, S: DefinitionSource> RequestLoop<'c, S> {
    pub fn new(definitions: S) -> Self {
        Self {
            definitions,
            references: None,
        }
    }

    /// Also report lexical references found by the token scanner
    pub fn with_references(mut self, scanner: TokenScanner<'c>) -> Self {
        self.references = Some(scanner);
        self
    }

    /// Serve requests until the input reaches end of stream
    ///
    /// Returns the number of requests answered. Any error is fatal: the
    /// loop stops and the caller is expected to exit.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<usize> {
        let mut served = 0;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                info!(served, "request channel closed");
                return Ok(served);
            }
            let line = String::from_utf8_lossy(&buf);
            let path = request_path(&line);
            if matches!(line, Cow::Owned(_)) {
                warn!(path, "request path is not valid UTF-8, invalid bytes replaced");
            }
            self.handle(path, &mut output)?;
            served += 1;
        }
    }

    /// Answer a single path
    pub fn handle<W: Write>(&mut self, path: &str, output: &mut W) -> Result<()> {
        let mut occurrences = self.definitions.query_definitions(path)?;
        if let Some(scanner) = &self.references {
            occurrences.merge(scanner.scan_path(path)?);
        }
        debug!(path, occurrences = occurrences.len(), "answering request");

        write_batch(output, &occurrences)?;
        output.flush()?;
        Ok(())
    }
}
