// src/store.rs
//
// Reloading history. The previous output document (Markdown or JSON) is the
// default source; a JSON-lines ledger, when configured, takes precedence and
// keeps every field across runs.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use crate::config::consts::{EMPTY_CELL, RECENT_MARK};
use crate::config::{ExportFormat, RunConfig};
use crate::core::sanitize::split_md_row;
use crate::error::StoreError;
use crate::specs::nodes::{TableSpec, is_dotted_quad};
use crate::types::NodeRecord;

/// A table line with some cell that starts with a digit (IP cells may sit
/// behind a backtick). Header and `| :--- |` separator lines never match.
static DATA_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*`?[0-9]").expect("static regex"));

/// History for this run: the ledger if it exists, else the previous document.
/// The denylist applies here too, so adding a prefix purges old entries.
pub fn load_prior(cfg: &RunConfig) -> Result<Vec<NodeRecord>, StoreError> {
    let nodes = match &cfg.ledger {
        Some(ledger) if ledger.exists() => load_ledger(ledger)?,
        Some(ledger) => {
            logf!("Ledger {} not found; seeding from the output document", ledger.display());
            load_document(cfg.out_path(), cfg.format)?
        }
        None => load_document(cfg.out_path(), cfg.format)?,
    };
    Ok(drop_denied(nodes, &cfg.table))
}

fn drop_denied(nodes: Vec<NodeRecord>, table: &TableSpec) -> Vec<NodeRecord> {
    let before = nodes.len();
    let kept: Vec<_> = nodes.into_iter().filter(|n| !table.is_denied(n.ip())).collect();
    if kept.len() < before {
        logf!("Dropped {} prior nodes matching the denylist", before - kept.len());
    }
    kept
}

/// A missing file is an empty history, not an error.
fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            logd!("No prior file at {}", path.display());
            Ok(None)
        }
        Err(source) => Err(StoreError::Read { path: PathBuf::from(path), source }),
    }
}

pub fn load_document(path: &Path, format: ExportFormat) -> Result<Vec<NodeRecord>, StoreError> {
    let Some(text) = read_optional(path)? else {
        return Ok(Vec::new());
    };
    let nodes = match format {
        ExportFormat::Markdown => parse_markdown(&text),
        ExportFormat::Json => parse_json(&text)
            .map_err(|source| StoreError::Corrupt { path: PathBuf::from(path), source })?,
    };
    logf!("Loaded {} prior nodes from {}", nodes.len(), path.display());
    Ok(nodes)
}

pub fn parse_markdown(text: &str) -> Vec<NodeRecord> {
    text.lines().filter_map(parse_markdown_line).collect()
}

/// One rendered table row back into a node. Works for either layout:
/// `| ip | region |` or `| region | `ip` | uptime | ping |`.
pub fn parse_markdown_line(line: &str) -> Option<NodeRecord> {
    let line = line.trim();
    if !line.starts_with('|') || !DATA_LINE.is_match(line) {
        return None;
    }

    let cells = split_md_row(line);
    if cells.len() >= 4 {
        let ip = cells[1].trim_matches('`');
        if is_dotted_quad(ip) {
            return Some(NodeRecord::new(
                ip,
                cells[0].as_str(),
                optional(strip_recent_flag(&cells[2])),
                optional(&cells[3]),
            ));
        }
    }
    if cells.len() >= 2 {
        let ip = cells[0].trim_matches('`');
        if is_dotted_quad(ip) {
            return Some(NodeRecord::new(ip, cells[1].as_str(), None, None));
        }
    }

    logd!("Ignoring unrecognised table line: {line}");
    None
}

/// `**3 hours** 🆕` → `3 hours`
fn strip_recent_flag(cell: &str) -> &str {
    let cell = cell.trim();
    let cell = cell.strip_suffix(RECENT_MARK).map_or(cell, str::trim_end);
    cell.strip_prefix("**")
        .and_then(|c| c.strip_suffix("**"))
        .unwrap_or(cell)
}

fn optional(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty() && cell != EMPTY_CELL).then(|| s!(cell))
}

/// Whole-document JSON array. Nodes with a malformed IP are dropped.
pub fn parse_json(text: &str) -> Result<Vec<NodeRecord>, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let nodes: Vec<NodeRecord> = serde_json::from_str(text)?;
    Ok(keep_valid(nodes))
}

fn keep_valid(nodes: Vec<NodeRecord>) -> Vec<NodeRecord> {
    let before = nodes.len();
    let kept: Vec<_> = nodes.into_iter().filter(|n| is_dotted_quad(n.ip())).collect();
    if kept.len() < before {
        logw!("Dropped {} prior nodes with a malformed IP", before - kept.len());
    }
    kept
}

/// One JSON node per line. Bad lines are logged and skipped.
pub fn load_ledger(path: &Path) -> Result<Vec<NodeRecord>, StoreError> {
    let Some(text) = read_optional(path)? else {
        return Ok(Vec::new());
    };

    let mut nodes = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<NodeRecord>(line) {
            Ok(n) => nodes.push(n),
            Err(e) => loge!("{}:{}: unreadable ledger line: {e}", path.display(), i + 1),
        }
    }
    let nodes = keep_valid(nodes);
    logf!("Loaded {} prior nodes from ledger {}", nodes.len(), path.display());
    Ok(nodes)
}

pub fn ledger_string(nodes: &[NodeRecord]) -> Result<String, serde_json::Error> {
    let mut out = String::with_capacity(nodes.len() * 96);
    for n in nodes {
        out.push_str(&serde_json::to_string(n)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_lines_parse_and_headers_are_skipped() {
        let doc = "\
# Title

> Updated: 2026-10-19 08:00:00 (UTC) | Nodes: 2

| IP | Region |
| :--- | :--- |
| 1.2.3.4 | 日本 |
| 5.6.7.8 | Atlantis |
";
        let nodes = parse_markdown(doc);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].ip(), "1.2.3.4");
        assert_eq!(nodes[0].region(), "日本");
        assert_eq!(nodes[1].region(), "Atlantis");
    }

    #[test]
    fn detailed_line_recovers_uptime_and_ping() {
        let n = parse_markdown_line("| 日本 | `1.1.1.1` | **3 hours** 🆕 | 10 ms |").unwrap();
        assert_eq!(n.ip(), "1.1.1.1");
        assert_eq!(n.uptime(), Some("3 hours"));
        assert_eq!(n.uptime_rank().minutes(), Some(180));
        assert_eq!(n.ping(), Some("10 ms"));

        let n = parse_markdown_line("| 美国 | `3.3.3.3` | - | - |").unwrap();
        assert_eq!(n.uptime(), None);
        assert_eq!(n.ping(), None);
    }

    #[test]
    fn lines_without_a_valid_ip_are_skipped() {
        assert!(parse_markdown_line("| 12 | Japan |").is_none());
        assert!(parse_markdown_line("| 1.2.3 | Japan |").is_none());
        assert!(parse_markdown_line("1.2.3.4 | Japan").is_none());
    }

    #[test]
    fn json_tolerates_empty_and_drops_bad_ips() {
        assert!(parse_json("  \n").unwrap().is_empty());
        let nodes = parse_json(
            r#"[{"region":"日本","ip":"1.2.3.4"},{"region":"x","ip":"nope"}]"#,
        )
        .unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(parse_json("{not json").is_err());
    }

    #[test]
    fn denylisted_history_is_dropped() {
        use crate::config::Layout;

        let table = TableSpec::new(Layout::Basic, None, &[s!("219.")]).unwrap();
        let nodes = vec![
            NodeRecord::new("219.1.1.1", "日本", None, None),
            NodeRecord::new("8.8.8.8", "美国", None, None),
            NodeRecord::new("1.219.1.1", "韩国", None, None),
        ];
        let kept = drop_denied(nodes, &table);
        let ips: Vec<_> = kept.iter().map(|n| n.ip()).collect();
        assert_eq!(ips, vec!["8.8.8.8", "1.219.1.1"]);

        let open = TableSpec::new(Layout::Basic, None, &[]).unwrap();
        assert_eq!(drop_denied(kept.clone(), &open), kept);
    }

    #[test]
    fn ledger_string_is_one_node_per_line() {
        let nodes = vec![
            NodeRecord::new("1.2.3.4", "日本", Some(s!("5 mins")), None),
            NodeRecord::new("5.6.7.8", "美国", None, Some(s!("3 ms"))),
        ];
        let text = ledger_string(&nodes).unwrap();
        assert_eq!(text.lines().count(), 2);
        let back: Vec<NodeRecord> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(back, nodes);
    }
}
