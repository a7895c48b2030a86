// src/runner.rs
//
// One run, start to finish:
//   fetch → extract → normalize → load history → merge → sort → render → write
// Every fatal condition surfaces before the first write, so a failed run
// leaves the previous document untouched.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{
    config::{RunConfig, consts::TIMESTAMP_FMT},
    core::net::{Fetcher, HttpFetcher},
    error::{Result, ScrapeError},
    file, merge,
    progress::{Progress, Stage},
    render::{self, DocMeta},
    specs::nodes::{self, SkipTally},
    store,
    types::NodeRecord,
};

/// Summary of what a run did.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub fresh: usize,
    pub prior: usize,
    pub merged: usize,
    pub duplicates: usize,
    pub skipped: SkipTally,
    pub files_written: Vec<PathBuf>,
    /// The rendered output document; `None` when nothing was written.
    pub document: Option<String>,
}

/// Run against the live source over HTTP.
pub fn run(cfg: &RunConfig, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    let fetcher = HttpFetcher::new(cfg.timeout, &cfg.user_agent);
    run_with(cfg, &fetcher, progress)
}

/// Run with any page source.
pub fn run_with(
    cfg: &RunConfig,
    fetcher: &dyn Fetcher,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let now = Utc::now().format(TIMESTAMP_FMT).to_string();

    // 1) Fetch
    logf!("Fetching {}", cfg.source_url);
    if let Some(p) = progress.as_deref_mut() {
        p.begin(&cfg.source_url);
    }
    let page = fetcher.fetch(&cfg.source_url)?;
    if let Some(p) = progress.as_deref_mut() {
        p.stage_done(Stage::Fetch, page.len());
    }

    // 2) Extract + normalize
    let extraction = nodes::extract(&page, &cfg.table)?;
    let skipped = extraction.skipped;
    let fresh: Vec<NodeRecord> = extraction
        .rows
        .into_iter()
        .map(|raw| NodeRecord::from_raw(raw, Some(&now)))
        .collect();
    if let Some(p) = progress.as_deref_mut() {
        p.stage_done(Stage::Extract, fresh.len());
    }

    // 3) History
    let prior = store::load_prior(cfg)?;
    if let Some(p) = progress.as_deref_mut() {
        p.stage_done(Stage::LoadPrior, prior.len());
    }

    // 4) Merge
    let merged = merge::merge(fresh, prior, cfg.dedup);
    if let Some(p) = progress.as_deref_mut() {
        p.stage_done(Stage::Merge, merged.nodes.len());
    }

    let mut summary = RunSummary {
        fresh: merged.fresh,
        prior: merged.prior,
        merged: merged.nodes.len(),
        duplicates: merged.duplicates,
        skipped,
        ..RunSummary::default()
    };

    if merged.nodes.is_empty() {
        if cfg.fail_on_empty {
            return Err(ScrapeError::EmptyResult);
        }
        logw!("No nodes scraped and no history; leaving {} as is", cfg.out_path.display());
        if let Some(p) = progress.as_deref_mut() {
            p.log("No data at all; nothing written.");
            p.finish();
        }
        return Ok(summary);
    }

    // 5) Sort + render everything before touching disk
    let mut nodes = merged.nodes;
    render::sort_nodes(&mut nodes, cfg.layout);

    let meta = DocMeta { title: &cfg.title, generated_at: &now };
    let document = render::render(&nodes, cfg.format, cfg.layout, &meta)?;
    let ledger = match &cfg.ledger {
        Some(path) => Some((path, store::ledger_string(&nodes)?)),
        None => None,
    };

    // 6) Stage every file before swapping any in; ledger first.
    let stage = |path: &Path, text: &str| {
        file::stage_document(path, text)
            .map_err(|source| ScrapeError::Write { path: path.to_path_buf(), source })
    };
    let mut staged = Vec::with_capacity(2);
    if let Some((path, text)) = &ledger {
        staged.push(stage(path.as_path(), text.as_str())?);
    }
    staged.push(stage(cfg.out_path.as_path(), document.as_str())?);

    for pending in staged {
        let path = pending.target().to_path_buf();
        pending
            .commit()
            .map_err(|source| ScrapeError::Write { path: path.clone(), source })?;
        if let Some(p) = progress.as_deref_mut() {
            p.wrote(&path);
        }
        summary.files_written.push(path);
    }

    if let Some(p) = progress.as_deref_mut() {
        p.stage_done(Stage::Write, nodes.len());
        p.finish();
    }
    logf!("Wrote {} nodes to {}", nodes.len(), cfg.out_path.display());

    summary.document = Some(document);
    Ok(summary)
}
