// src/config/consts.rs

// Net
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const TIMEOUT_SECS: u64 = 30;
pub const MAX_BODY_BYTES: u64 = 8 * 1024 * 1024;

// Env
pub const ENV_SOURCE_URL: &str = "VPN_SOURCE_URL";

// Scrape
/// Class list carried by the detailed listing table on the source site.
pub const DETAILED_TABLE_CLASS: &str = "table table-success table-striped text-nowrap";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "nodes";
pub const DEFAULT_TITLE: &str = "VPN Node Ledger";
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

// Render
/// Uptime ranks below this (one day, in minutes) are flagged as recent.
pub const RECENT_THRESHOLD: u64 = 1440;
pub const RECENT_MARK: &str = "🆕";
pub const EMPTY_CELL: &str = "-";
