//! `orgchart` — print the root of a node's tree and its members of one kind.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use orgchart::config::load_config;
use orgchart::error::Result;
use orgchart::observability::init_logging;
use orgchart::request::{answer, open_store, parse_node_id, prompt_node_id};
use orgchart::types::NodeKind;

#[derive(Debug, Parser)]
#[command(name = "orgchart", version, about)]
struct Cli {
    /// Node id to start from; prompted for on stdin when omitted.
    id: Option<String>,

    /// YAML config file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database path.
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// JSON seed dataset, loaded when the table is empty.
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// Kind to list under the root (name or code).
    #[arg(short, long, value_parser = parse_kind)]
    kind: Option<NodeKind>,

    /// Abort if the request takes longer than this.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Print traversal metrics as JSON to stderr.
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_kind(s: &str) -> std::result::Result<NodeKind, String> {
    NodeKind::from_str_loose(s).ok_or_else(|| format!("unknown kind {s:?}"))
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database = db;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(kind) = cli.kind {
        config.target_kind = kind;
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeout_ms = Some(ms);
    }

    let node_id = match cli.id.as_deref() {
        Some(text) => parse_node_id(text)?,
        None => prompt_node_id(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let store = open_store(&config)?;
    let result = answer(&store, &config, node_id)?;
    drop(store);

    if cli.stats {
        eprintln!("{}", result.metrics.to_json());
    }
    println!("{}", result.line);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "request failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
