// src/render.rs
//
// Final ordering and the two output projections (Markdown, JSON).

use std::fmt::Write;

use crate::config::consts::{EMPTY_CELL, RECENT_MARK};
use crate::config::{ExportFormat, Layout};
use crate::core::sanitize::escape_md_cell;
use crate::types::NodeRecord;

/// Detailed layout: ascending uptime rank, newest nodes first. Stable, so
/// equal ranks keep merge order. Basic layout keeps merge order as is.
pub fn sort_nodes(nodes: &mut [NodeRecord], layout: Layout) {
    if layout == Layout::Detailed {
        nodes.sort_by_key(|n| n.uptime_rank());
    }
}

/// Header block shared by both Markdown layouts.
pub struct DocMeta<'a> {
    pub title: &'a str,
    pub generated_at: &'a str,
}

pub fn render(
    nodes: &[NodeRecord],
    format: ExportFormat,
    layout: Layout,
    meta: &DocMeta<'_>,
) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Markdown => Ok(to_markdown(nodes, layout, meta)),
        ExportFormat::Json => to_json(nodes),
    }
}

pub fn to_markdown(nodes: &[NodeRecord], layout: Layout, meta: &DocMeta<'_>) -> String {
    let mut out = String::with_capacity(64 + nodes.len() * 48);

    let _ = writeln!(out, "# {}\n", meta.title);
    let _ = writeln!(out, "> Updated: {} (UTC) | Nodes: {}\n", meta.generated_at, nodes.len());

    match layout {
        Layout::Basic => {
            out.push_str("| IP | Region |\n");
            out.push_str("| :--- | :--- |\n");
            for n in nodes {
                let _ = writeln!(out, "| {} | {} |", n.ip(), escape_md_cell(n.region()));
            }
        }
        Layout::Detailed => {
            out.push_str("| Region | IP | Uptime | Ping |\n");
            out.push_str("| :--- | :--- | :--- | :--- |\n");
            for n in nodes {
                let _ = writeln!(
                    out,
                    "| {} | `{}` | {} | {} |",
                    escape_md_cell(n.region()),
                    n.ip(),
                    uptime_cell(n),
                    optional_cell(n.ping()),
                );
            }
        }
    }
    out
}

/// Recent uptimes are bolded and marked; missing ones render as `-`.
fn uptime_cell(n: &NodeRecord) -> String {
    match n.uptime() {
        Some(text) if !text.trim().is_empty() => {
            let text = escape_md_cell(text);
            if n.uptime_rank().is_recent() {
                format!("**{text}** {RECENT_MARK}")
            } else {
                text
            }
        }
        _ => s!(EMPTY_CELL),
    }
}

fn optional_cell(v: Option<&str>) -> String {
    match v {
        Some(text) if !text.trim().is_empty() => escape_md_cell(text),
        _ => s!(EMPTY_CELL),
    }
}

/// Pretty JSON array, non-ASCII left unescaped, trailing newline.
pub fn to_json(nodes: &[NodeRecord]) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(nodes)?;
    out.push('\n');
    Ok(out)
}
