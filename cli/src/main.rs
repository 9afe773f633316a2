mod terminal;

use clap::Parser;
use tracing::{info, warn};

use ipseek_common::config::{Config, SearchMode};
use ipseek_common::network::range::Ipv4Range;
use ipseek_core::fingerprint::Fingerprint;
use ipseek_core::scan::{CancelToken, Progress};
use ipseek_core::search::{self, SearchOutcome};
use ipseek_core::source::RangeList;

use crate::terminal::logging;

#[derive(Parser)]
#[command(name = "ipseek")]
#[command(about = "Find the IPv4 address behind a fingerprint id.")]
pub struct CommandLine {
    /// The name the fingerprint was derived from
    #[arg(short, long)]
    name: String,
    /// The target fingerprint, as a lowercase hex digest
    #[arg(short, long)]
    id: String,
    /// Search the entire IPv4 address space
    #[arg(short, long, conflicts_with_all = ["first", "last"])]
    all: bool,
    /// First address of a custom search range
    #[arg(short, long, requires = "last")]
    first: Option<String>,
    /// Last address of a custom search range
    #[arg(short, long, requires = "first")]
    last: Option<String>,
    /// Refresh the cached range list before searching
    #[arg(short, long)]
    update: bool,
    /// Number of concurrent scanners (default: available cores minus one)
    #[arg(short, long)]
    workers: Option<usize>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    logging::init();

    let cfg = build_config(commands)?;
    info!("name: {}", cfg.name);
    info!("id: {}", cfg.id);

    let fingerprint = Fingerprint::new(&cfg.name, &cfg.id);
    if !fingerprint.id_is_canonical() {
        warn!("the id is not a 32-character lowercase hex digest and can never match");
    }

    let progress = Progress::new();
    let cancel = CancelToken::new();

    let outcome = match cfg.mode {
        SearchMode::Full(range) => {
            info!(
                "searching {} with {} scanners ({} addresses)",
                range,
                cfg.workers,
                range.len()
            );
            let bar = terminal::progress::start(range.len(), progress.clone());
            let outcome = search::race(range, &fingerprint, cfg.workers, &progress, &cancel);
            bar.finish();
            outcome
        }
        SearchMode::Restricted => {
            let list = RangeList::default();
            list.ensure(cfg.refresh)?;
            let ranges = list.load()?;
            let total: u64 = ranges.iter().map(|r| r.len()).sum();
            info!(
                "searching {} cached ranges with {} scanners ({} addresses)",
                ranges.len(),
                cfg.workers,
                total
            );
            let bar = terminal::progress::start(total, progress.clone());
            let outcome = search::race_list(&ranges, &fingerprint, cfg.workers, &progress, &cancel);
            bar.finish();
            outcome
        }
    };

    match outcome {
        SearchOutcome::Found(addr) => {
            info!("match after {} candidates", progress.examined());
            println!("{addr}");
        }
        SearchOutcome::Exhausted => {
            info!("no match in {} candidates", progress.examined());
        }
        SearchOutcome::Indeterminate => {
            warn!("no match, but part of the space was never scanned; the result is not conclusive");
        }
    }
    Ok(())
}

fn build_config(commands: CommandLine) -> anyhow::Result<Config> {
    let mode = match (commands.all, &commands.first, &commands.last) {
        (true, _, _) => SearchMode::Full(Ipv4Range::full()),
        (false, Some(first), Some(last)) => {
            SearchMode::Full(Ipv4Range::parse_endpoints(first, last)?)
        }
        _ => SearchMode::Restricted,
    };

    let workers = commands
        .workers
        .unwrap_or_else(default_workers)
        .max(1);

    Ok(Config {
        name: commands.name,
        id: commands.id,
        mode,
        refresh: commands.update,
        workers,
    })
}

/// One core is left free for the coordinator and the terminal.
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|cores| cores.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}
