use thiserror::Error;

use crate::config::ConfigError;
use crate::ctags::CtagsError;
use crate::tree_sitter::TreeSitterError;

/// Fatal service errors
///
/// Anything reaching this type ends the process; recoverable conditions are
/// logged and turned into empty results before they get here.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grammar(#[from] TreeSitterError),
    #[error(transparent)]
    Ctags(#[from] CtagsError),
    #[error("request channel IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
