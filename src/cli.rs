// src/cli.rs
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use crate::config::consts::{ENV_SOURCE_URL, TIMEOUT_SECS};
use crate::config::{AppOptions, ExportFormat, Layout};
use crate::merge::DedupKey;
use crate::progress::{Progress, Stage};
use crate::runner;

/// Scrape a public VPN node table and fold it into a persistent ledger document.
#[derive(Parser, Debug)]
#[command(name = "vpn_scrape", version, about)]
pub struct Args {
    /// Page holding the node table
    #[arg(long, env = ENV_SOURCE_URL)]
    pub url: Option<String>,

    /// Table shape: `basic` (region, IP) or `detailed` (+ uptime, ping)
    #[arg(long, value_enum, default_value_t = Layout::Basic)]
    pub layout: Layout,

    /// Space-separated class list of the table to prefer; "" means first table
    #[arg(long)]
    pub table_class: Option<String>,

    /// Skip IPs starting with this prefix (repeatable), e.g. `219.`; also drops them from history
    #[arg(long = "deny-prefix", value_name = "PREFIX")]
    pub deny_prefixes: Vec<String>,

    /// Output file, or a directory for the default file name
    #[arg(short, long)]
    pub out: Option<String>,

    #[arg(long, value_enum, default_value_t = ExportFormat::Markdown)]
    pub format: ExportFormat,

    /// Markdown title line
    #[arg(long)]
    pub title: Option<String>,

    /// Merge identity; defaults to `record` (basic) or `ip` (detailed)
    #[arg(long, value_enum)]
    pub dedup: Option<DedupKey>,

    /// JSON-lines file keeping every field across runs
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = TIMEOUT_SECS)]
    pub timeout: u64,

    /// Exit non-zero when there is nothing to write
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Also print the rendered document to stdout
    #[arg(long)]
    pub print: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn to_options(&self) -> AppOptions {
        let mut opts = AppOptions::default();

        opts.scrape.source_url = self.url.clone();
        opts.scrape.layout = self.layout;
        opts.scrape.table_class = self.table_class.clone();
        opts.scrape.deny_prefixes = self.deny_prefixes.clone();
        opts.scrape.timeout_secs = self.timeout;

        opts.merge.dedup = self.dedup;
        opts.merge.ledger = self.ledger.clone();
        opts.merge.fail_on_empty = self.fail_on_empty;

        opts.export.format = self.format;
        if let Some(out) = &self.out {
            opts.export.set_path(out);
        }
        if let Some(title) = &self.title {
            opts.export.title = title.clone();
        }
        opts
    }
}

/// Prints one status line per stage.
struct CliProgress;

impl Progress for CliProgress {
    fn begin(&mut self, url: &str) {
        println!("Fetching: {url}");
    }
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn stage_done(&mut self, stage: Stage, count: usize) {
        match stage {
            Stage::Fetch => println!("Fetched {count} bytes"),
            Stage::Extract => println!("New: {count} nodes"),
            Stage::LoadPrior => println!("History: {count} nodes"),
            Stage::Merge => println!("After dedup: {count} nodes"),
            Stage::Write => {}
        }
    }
    fn wrote(&mut self, path: &Path) {
        println!("Wrote {}", path.display());
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    crate::log::init(args.verbose);

    let cfg = args.to_options().validate().wrap_err("invalid configuration")?;
    let mut progress = CliProgress;
    let summary = runner::run(&cfg, Some(&mut progress)).wrap_err("scrape failed")?;

    if summary.skipped.total() > 0 {
        println!(
            "Skipped rows: {} short, {} bad IP, {} denylisted",
            summary.skipped.short_rows, summary.skipped.bad_ip, summary.skipped.denied
        );
    }
    if args.print {
        if let Some(doc) = &summary.document {
            print!("{doc}");
        }
    }
    Ok(())
}
