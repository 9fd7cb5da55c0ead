//! Tag extraction worker for code indexers
//!
//! Reads file paths from the controlling indexer and answers each with the
//! symbol definitions reported by `ctags`, optionally merged with lexical
//! references found by tokenizing the file with tree-sitter.

pub mod config;
pub mod ctags;
pub mod error;
pub mod protocol;
pub mod tags;
pub mod tree_sitter;

use std::io::{self, BufWriter, Write};

use tracing::info;

use crate::config::Config;
use crate::ctags::CtagsClient;
use crate::error::Result;
use crate::protocol::{write_batch, write_json_batch, RequestLoop};
use crate::tags::TokenScanner;

/// How the request loop answers each path
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Tag generator program, started with the fixed filter-mode arguments
    pub ctags_program: String,
    /// Merge lexical references into every batch
    pub with_references: bool,
}

/// Serve requests from stdin until end of input
///
/// Fails on tag generator launch failure, grammar misconfiguration or a
/// broken exchange with the generator.
pub fn serve(config: &Config, options: &ServeOptions) -> Result<usize> {
    let ctags = CtagsClient::spawn(&options.ctags_program)?;
    info!(
        program = %options.ctags_program,
        extensions = config.language_map.extension_count(),
        references = options.with_references,
        "serving tag requests"
    );

    let mut service = RequestLoop::new(ctags);
    if options.with_references {
        service = service.with_references(TokenScanner::new(config));
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    service.run(stdin.lock(), BufWriter::new(stdout.lock()))
}

/// Scan files once with the token scanner and print their references
pub fn scan_paths<P: AsRef<str>>(config: &Config, paths: &[P], json: bool) -> Result<()> {
    let scanner = TokenScanner::new(config);
    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());

    for path in paths {
        let occurrences = scanner.scan_path(path.as_ref())?;
        if json {
            write_json_batch(&mut output, &occurrences)?;
        } else {
            write_batch(&mut output, &occurrences)?;
        }
    }

    output.flush()?;
    Ok(())
}
