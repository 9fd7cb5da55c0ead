//! ctags error types

use thiserror::Error;

/// Error types for the ctags subprocess
#[derive(Debug, Error)]
pub enum CtagsError {
    /// Failed to spawn the tag generator
    #[error("failed to spawn tag generator '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// A pipe to the child was not available after spawning
    #[error("tag generator {0} pipe not available")]
    PipeUnavailable(&'static str),
    /// Output ended before the terminator line
    #[error("tag generator exited before finishing '{path}'")]
    SubprocessExited { path: String },
    /// An earlier exchange failed; the child's pipes are no longer usable
    #[error("tag generator is no longer running")]
    SubprocessDead,
    /// IO error while talking to the child
    #[error("tag generator IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The reply pattern for a path could not be built
    #[error("invalid reply pattern: {0}")]
    Pattern(#[from] regex::Error),
}
