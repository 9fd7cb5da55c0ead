//! ctags filter-mode client
//!
//! Keeps one `ctags --filter` process alive and exchanges one path per
//! request over its stdin/stdout pipes. Every call blocks until the child
//! prints the terminator line; there are no timeouts.

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use regex::Regex;
use tracing::{debug, error, trace, warn};

use super::types::CtagsError;
use super::{DefinitionSource, CTAGS_ARGS, TERMINATOR};
use crate::tags::OccurrenceSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClientState {
    Ready,
    Dead,
}

/// Client for a persistent tag generator process
pub struct CtagsClient {
    /// Generator process
    process: Child,
    /// Request channel; taken on drop to signal end of input
    stdin: Option<ChildStdin>,
    /// Reply channel
    stdout: BufReader<ChildStdout>,
    state: ClientState,
}

impl CtagsClient {
    /// Spawn `program` with the fixed filter-mode ctags arguments
    pub fn spawn(program: &str) -> Result<Self, CtagsError> {
        Self::spawn_with_args(program, CTAGS_ARGS)
    }

    /// Spawn an arbitrary program speaking the filter protocol
    pub fn spawn_with_args<S: AsRef<str>>(program: &str, args: &[S]) -> Result<Self, CtagsError> {
        let mut process = Command::new(program)
            .args(args.iter().map(AsRef::as_ref))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| CtagsError::SpawnFailed {
                program: program.to_string(),
                source,
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or(CtagsError::PipeUnavailable("stdin"))?;
        let stdout = process
            .stdout
            .take()
            .ok_or(CtagsError::PipeUnavailable("stdout"))?;

        debug!(program, pid = process.id(), "tag generator started");

        Ok(Self {
            process,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
            state: ClientState::Ready,
        })
    }

    /// Whether the child is still usable
    pub fn is_ready(&self) -> bool {
        self.state == ClientState::Ready
    }

    /// Ask the generator for the definitions in `path`
    ///
    /// Any failure leaves the pipes in an unknown position, so the client
    /// goes dead and every later call fails with [`CtagsError::SubprocessDead`].
    pub fn query_definitions(&mut self, path: &str) -> Result<OccurrenceSet, CtagsError> {
        if self.state == ClientState::Dead {
            return Err(CtagsError::SubprocessDead);
        }
        self.exchange(path).inspect_err(|e| {
            error!(path, error = %e, "tag generator exchange failed");
            self.state = ClientState::Dead;
        })
    }

    fn exchange(&mut self, path: &str) -> Result<OccurrenceSet, CtagsError> {
        let stdin = self.stdin.as_mut().ok_or(CtagsError::SubprocessDead)?;
        writeln!(stdin, "{}", path)?;
        stdin.flush()?;

        let pattern = reply_pattern(path)?;
        let mut result = OccurrenceSet::new(path);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if self.stdout.read_until(b'\n', &mut buf)? == 0 {
                return Err(CtagsError::SubprocessExited {
                    path: path.to_string(),
                });
            }
            let decoded = String::from_utf8_lossy(&buf);
            if matches!(decoded, Cow::Owned(_)) {
                warn!(path, "tag generator reply is not valid UTF-8, invalid bytes replaced");
            }
            let line = decoded.trim_end_matches('\n').trim_end_matches('\r');
            if line == TERMINATOR {
                break;
            }
            match parse_reply_line(&pattern, line) {
                Some((tag, lnum, image)) => result.insert(true, tag, lnum, image),
                None => trace!(path, line, "skipping unmatched reply line"),
            }
        }

        trace!(path, definitions = result.len(), "tag generator replied");
        Ok(result)
    }
}

impl DefinitionSource for CtagsClient {
    fn query_definitions(&mut self, path: &str) -> Result<OccurrenceSet, CtagsError> {
        CtagsClient::query_definitions(self, path)
    }
}

impl Drop for CtagsClient {
    fn drop(&mut self) {
        // Closing stdin lets a filter-mode child exit on its own
        drop(self.stdin.take());
        let _ = self.process.wait();
    }
}

/// Pattern for `<tag> <line> <path> <image>` reply lines of one path
pub fn reply_pattern(path: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(\S+)\s+(\d+)\s+{}\s+(.*)$", regex::escape(path)))
}

/// Split a reply line into tag, line number and image
pub fn parse_reply_line<'l>(pattern: &Regex, line: &'l str) -> Option<(&'l str, usize, &'l str)> {
    let caps = pattern.captures(line)?;
    let tag = caps.get(1)?.as_str();
    let lnum = caps.get(2)?.as_str().parse::<usize>().ok().filter(|&n| n > 0)?;
    let image = caps.get(3)?.as_str();
    Some((tag, lnum, image))
}
