// src/specs/nodes.rs
//! Scraping *spec* for the node listing page.
//!
//! Purpose:
//! - Find the listing table (class signature first, else the first `<table>`).
//! - Walk its body rows and keep the ones whose `<td>` cells look like a node:
//!   enough cells, a dotted-quad IP in the second cell, IP not denylisted.
//!
//! Shape of a data row on the source site:
//! `<tr><th>1</th><td>Japan</td><td>219.100.37.176</td><td>3 hours</td><td>12 ms</td></tr>`
//! The leading `<th>` index cell is not a `td` and never counts.
//!
//! Non-Responsibilities:
//! - No networking, no persistence, no normalization of the cell texts.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::config::Layout;
use crate::core::html::{self, TABLE, TR, child_elements, text_of};
use crate::error::{ConfigError, StructureError};
use crate::types::RawRow;

static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}$").expect("static regex")
});

/// Syntax only: four groups of 1-3 ASCII digits. `999.999.999.999` passes.
pub fn is_dotted_quad(s: &str) -> bool {
    DOTTED_QUAD.is_match(s)
}

/// Where the table is and what a valid row looks like.
#[derive(Clone, Debug)]
pub struct TableSpec {
    layout: Layout,
    table: Option<Selector>,
    deny_prefixes: Vec<String>,
}

impl TableSpec {
    pub fn new(
        layout: Layout,
        class: Option<&str>,
        deny_prefixes: &[String],
    ) -> Result<Self, ConfigError> {
        let table = match class {
            Some(c) => Some(html::class_selector("table", c).map_err(|reason| {
                ConfigError::TableClass { class: s!(c), reason }
            })?),
            None => None,
        };
        let deny_prefixes = deny_prefixes
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        Ok(Self { layout, table, deny_prefixes })
    }

    pub fn min_cells(&self) -> usize { self.layout.min_cells() }
    pub fn has_class_signature(&self) -> bool { self.table.is_some() }

    pub fn is_denied(&self, ip: &str) -> bool {
        self.deny_prefixes.iter().any(|p| ip.starts_with(p.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    TooFewCells { found: usize, need: usize },
    BadIp(String),
    Denied(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewCells { found, need } => write!(f, "{found} cells, need {need}"),
            SkipReason::BadIp(ip) => write!(f, "not an IP: {ip:?}"),
            SkipReason::Denied(ip) => write!(f, "denylisted: {ip}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowOutcome {
    Accept(RawRow),
    Skip(SkipReason),
}

/// Per-reason count of rows that were dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkipTally {
    pub short_rows: usize,
    pub bad_ip: usize,
    pub denied: usize,
}

impl SkipTally {
    pub fn record(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::TooFewCells { .. } => self.short_rows += 1,
            SkipReason::BadIp(_) => self.bad_ip += 1,
            SkipReason::Denied(_) => self.denied += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.short_rows + self.bad_ip + self.denied
    }
}

#[derive(Clone, Debug, Default)]
pub struct Extraction {
    /// Accepted rows, document order.
    pub rows: Vec<RawRow>,
    pub skipped: SkipTally,
}

/// Parse a page and pull every acceptable node row out of its listing table.
/// Zero rows is fine; a page with no table at all is not.
pub fn extract(doc: &str, spec: &TableSpec) -> Result<Extraction, StructureError> {
    let page = Html::parse_document(doc);
    let table = locate_table(&page, spec)
        .ok_or_else(|| StructureError(s!("no table found")))?;

    let mut out = Extraction::default();
    for (i, row) in table_rows(table).into_iter().enumerate() {
        match classify_row(row, spec) {
            RowOutcome::Accept(raw) => {
                logd!("row {i}: {} ({})", raw.ip, raw.region);
                out.rows.push(raw);
            }
            RowOutcome::Skip(reason) => {
                logd!("row {i} skipped: {reason}");
                out.skipped.record(&reason);
            }
        }
    }

    logf!(
        "Extracted {} rows ({} skipped: {} short, {} bad IP, {} denylisted)",
        out.rows.len(),
        out.skipped.total(),
        out.skipped.short_rows,
        out.skipped.bad_ip,
        out.skipped.denied,
    );
    Ok(out)
}

fn locate_table<'a>(page: &'a Html, spec: &TableSpec) -> Option<ElementRef<'a>> {
    if let Some(sel) = &spec.table {
        if let Some(t) = page.select(sel).next() {
            return Some(t);
        }
        logw!("Listing table class not found; falling back to the first table");
    }
    page.select(&TABLE).next()
}

/// Rows of the first `<tbody>` if there is one, else every row in the table.
fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    match child_elements(table, "tbody").next() {
        Some(body) => child_elements(body, "tr").collect(),
        None => table.select(&TR).collect(),
    }
}

pub fn classify_row(row: ElementRef<'_>, spec: &TableSpec) -> RowOutcome {
    let mut cells: Vec<String> = child_elements(row, "td").map(text_of).collect();

    let need = spec.min_cells();
    if cells.len() < need {
        return RowOutcome::Skip(SkipReason::TooFewCells { found: cells.len(), need });
    }

    if !is_dotted_quad(&cells[1]) {
        return RowOutcome::Skip(SkipReason::BadIp(cells.swap_remove(1)));
    }
    if spec.is_denied(&cells[1]) {
        return RowOutcome::Skip(SkipReason::Denied(cells.swap_remove(1)));
    }

    let (uptime, ping) = match spec.layout {
        Layout::Basic => (None, None),
        Layout::Detailed => (Some(cells[2].clone()), Some(cells[3].clone())),
    };
    cells.truncate(2);
    let ip = cells.pop().unwrap_or_default();
    let region = cells.pop().unwrap_or_default();

    RowOutcome::Accept(RawRow { region, ip, uptime, ping })
}
