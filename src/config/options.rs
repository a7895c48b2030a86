// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;
use crate::error::ConfigError;
use crate::merge::DedupKey;
use crate::specs::nodes::TableSpec;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub merge: MergeOptions,
    pub export: ExportOptions,
}

/// Which shape of listing table is scraped, and therefore which columns a
/// node carries and how the output document looks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Layout {
    /// Region + IP. Unsorted two-column table.
    #[default]
    Basic,
    /// Region + IP + uptime + ping. Sorted by uptime, recent nodes flagged.
    Detailed,
}

impl Layout {
    pub fn min_cells(self) -> usize {
        match self {
            Layout::Basic => 2,
            Layout::Detailed => 4,
        }
    }

    pub fn default_table_class(self) -> Option<&'static str> {
        match self {
            Layout::Basic => None,
            Layout::Detailed => Some(DETAILED_TABLE_CLASS),
        }
    }

    /// Uptime text changes every run, so the detailed layout keys on IP.
    pub fn default_dedup(self) -> DedupKey {
        match self {
            Layout::Basic => DedupKey::Record,
            Layout::Detailed => DedupKey::Ip,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub source_url: Option<String>,
    pub layout: Layout,
    /// `None` uses the layout default; `Some("")` forces "first table".
    pub table_class: Option<String>,
    pub deny_prefixes: Vec<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            source_url: None,
            layout: Layout::Basic,
            table_class: None,
            deny_prefixes: Vec::new(),
            timeout_secs: TIMEOUT_SECS,
            user_agent: s!(USER_AGENT),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// `None` uses the layout default.
    pub dedup: Option<DedupKey>,
    /// JSON-lines file holding the full record set across runs.
    pub ledger: Option<PathBuf>,
    pub fail_on_empty: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    out_path: Option<PathBuf>,
    pub title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Markdown,
            out_path: None,
            title: s!(DEFAULT_TITLE),
        }
    }
}

impl ExportOptions {
    /// Explicit path if one was set, else `out/nodes.<ext>` for the current format.
    pub fn out_path(&self) -> PathBuf {
        match &self.out_path {
            Some(p) => p.clone(),
            None => PathBuf::from(DEFAULT_OUT_DIR).join(join!(DEFAULT_FILE, ".", self.format.ext())),
        }
    }

    /// Accepts a file path, or a directory (existing, or written with a
    /// trailing separator) to hold the default file name.
    pub fn set_path(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            self.out_path = None;
            return;
        }
        let default_name = join!(DEFAULT_FILE, ".", self.format.ext());
        self.out_path = Some(crate::file::resolve_out_path(text, &default_name));
    }
}

/// Validated, ready-to-run configuration. Built once by `AppOptions::validate`.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub source_url: String,
    pub layout: Layout,
    pub table: TableSpec,
    pub timeout: Duration,
    pub user_agent: String,
    pub dedup: DedupKey,
    pub ledger: Option<PathBuf>,
    pub fail_on_empty: bool,
    pub format: ExportFormat,
    pub out_path: PathBuf,
    pub title: String,
}

impl RunConfig {
    pub fn out_path(&self) -> &Path {
        &self.out_path
    }
}

impl AppOptions {
    pub fn validate(&self) -> Result<RunConfig, ConfigError> {
        let url = self
            .scrape
            .source_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingSourceUrl)?;

        let lc = url.to_ascii_lowercase();
        if !(lc.starts_with("http://") || lc.starts_with("https://")) {
            return Err(ConfigError::InvalidSourceUrl(s!(url)));
        }

        if self.scrape.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let layout = self.scrape.layout;
        let class = match &self.scrape.table_class {
            Some(c) => Some(c.trim()).filter(|c| !c.is_empty()),
            None => layout.default_table_class(),
        };
        let table = TableSpec::new(layout, class, &self.scrape.deny_prefixes)?;

        Ok(RunConfig {
            source_url: s!(url),
            layout,
            table,
            timeout: Duration::from_secs(self.scrape.timeout_secs),
            user_agent: self.scrape.user_agent.clone(),
            dedup: self.merge.dedup.unwrap_or_else(|| layout.default_dedup()),
            ledger: self.merge.ledger.clone(),
            fail_on_empty: self.merge.fail_on_empty,
            format: self.export.format,
            out_path: self.export.out_path(),
            title: self.export.title.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> AppOptions {
        let mut opts = AppOptions::default();
        opts.scrape.source_url = Some(s!(url));
        opts
    }

    #[test]
    fn missing_or_blank_url_is_a_config_error() {
        let opts = AppOptions::default();
        assert!(matches!(opts.validate(), Err(ConfigError::MissingSourceUrl)));

        let blank = with_url("   ");
        assert!(matches!(blank.validate(), Err(ConfigError::MissingSourceUrl)));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let opts = with_url("ftp://example.com/list");
        assert!(matches!(opts.validate(), Err(ConfigError::InvalidSourceUrl(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut opts = with_url("https://example.com/");
        opts.scrape.timeout_secs = 0;
        assert!(matches!(opts.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn bad_class_signature_is_rejected() {
        let mut opts = with_url("https://example.com/");
        opts.scrape.table_class = Some(s!("1bad"));
        assert!(matches!(opts.validate(), Err(ConfigError::TableClass { .. })));
    }

    #[test]
    fn layout_drives_defaults() {
        let basic = with_url("https://example.com/").validate().unwrap();
        assert_eq!(basic.dedup, DedupKey::Record);
        assert!(!basic.table.has_class_signature());
        assert_eq!(basic.table.min_cells(), 2);

        let mut opts = with_url("https://example.com/");
        opts.scrape.layout = Layout::Detailed;
        let detailed = opts.validate().unwrap();
        assert_eq!(detailed.dedup, DedupKey::Ip);
        assert!(detailed.table.has_class_signature());
        assert_eq!(detailed.table.min_cells(), 4);
    }

    #[test]
    fn explicit_dedup_overrides_layout_default() {
        let mut opts = with_url("https://example.com/");
        opts.scrape.layout = Layout::Detailed;
        opts.merge.dedup = Some(DedupKey::Record);
        assert_eq!(opts.validate().unwrap().dedup, DedupKey::Record);
    }

    #[test]
    fn default_out_path_follows_format() {
        let mut export = ExportOptions::default();
        assert!(export.out_path().to_string_lossy().ends_with("nodes.md"));
        export.format = ExportFormat::Json;
        assert!(export.out_path().to_string_lossy().ends_with("nodes.json"));
    }

    #[test]
    fn explicit_out_path_is_kept() {
        let mut export = ExportOptions::default();
        export.set_path("history/非219IP.md");
        assert_eq!(export.out_path(), PathBuf::from("history/非219IP.md"));
        export.set_path("");
        assert!(export.out_path().to_string_lossy().ends_with("nodes.md"));
    }
}
