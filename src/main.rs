use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use tagbridge::config::{Config, LanguageMap, ParserOptions};
use tagbridge::ServeOptions;

/// Environment variable holding the log filter
const LOG_ENV: &str = "TAGBRIDGE_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "tagbridge",
    version,
    about = "Answer tag requests for code indexers using ctags and tree-sitter"
)]
struct Args {
    /// Language map: Lang1:ext1.ext2,Lang2:ext3 (lowercase languages are skipped)
    #[arg(long)]
    langmap: String,
    /// Tag generator program
    #[arg(long, default_value = "ctags")]
    ctags: String,
    /// Also report lexical references for every requested path
    #[arg(long)]
    with_references: bool,
    /// Scan these files once and exit instead of serving requests
    #[arg(long, num_args = 1..)]
    scan: Vec<String>,
    /// Print scan results as JSON lines
    #[arg(long, requires = "scan")]
    json: bool,
}

fn init_tracing() {
    // stdout carries the protocol, diagnostics go to stderr
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: Args) -> tagbridge::error::Result<()> {
    let language_map = LanguageMap::parse(&args.langmap)?;
    let config = Config::new(language_map, ParserOptions::from_env());

    if !args.scan.is_empty() {
        return tagbridge::scan_paths(&config, &args.scan, args.json);
    }

    let options = ServeOptions {
        ctags_program: args.ctags,
        with_references: args.with_references,
    };
    tagbridge::serve(&config, &options)?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
