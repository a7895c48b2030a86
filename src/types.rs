// src/types.rs
use serde::{Deserialize, Serialize};

use crate::config::consts::RECENT_THRESHOLD;
use crate::normalize::{parse_uptime_rank, translate_region};

/// Minutes-equivalent ordering key derived from uptime text.
/// Only used for sorting and the "recent" flag, never displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UptimeRank(u64);

impl UptimeRank {
    /// Missing or unparsable uptime; sorts after every known rank.
    pub const UNKNOWN: UptimeRank = UptimeRank(u64::MAX);

    pub const fn new(minutes: u64) -> Self {
        Self(minutes)
    }

    pub fn minutes(self) -> Option<u64> {
        (self != Self::UNKNOWN).then_some(self.0)
    }

    pub fn is_recent(self) -> bool {
        self.0 < RECENT_THRESHOLD
    }
}

/// Cell texts of one accepted table row, before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRow {
    pub region: String,
    pub ip: String,
    pub uptime: Option<String>,
    pub ping: Option<String>,
}

/// One VPN endpoint. Built once per run, from the page or from history,
/// and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NodeFields", into = "NodeFields")]
pub struct NodeRecord {
    ip: String,
    region: String,
    uptime: Option<String>,
    ping: Option<String>,
    captured_at: Option<String>,
    uptime_rank: UptimeRank,
}

impl NodeRecord {
    /// `region` is taken as-is (already a display label).
    pub fn new(
        ip: impl Into<String>,
        region: impl Into<String>,
        uptime: Option<String>,
        ping: Option<String>,
    ) -> Self {
        let uptime_rank = uptime.as_deref().map_or(UptimeRank::UNKNOWN, parse_uptime_rank);
        Self {
            ip: ip.into(),
            region: region.into(),
            uptime,
            ping,
            captured_at: None,
            uptime_rank,
        }
    }

    /// Normalize a scraped row: region through the lookup table, capture time stamped.
    pub fn from_raw(raw: RawRow, captured_at: Option<&str>) -> Self {
        let node = Self::new(raw.ip, translate_region(&raw.region), raw.uptime, raw.ping);
        match captured_at {
            Some(ts) => node.captured(ts),
            None => node,
        }
    }

    pub fn captured(mut self, ts: impl Into<String>) -> Self {
        self.captured_at = Some(ts.into());
        self
    }

    pub fn ip(&self) -> &str { &self.ip }
    pub fn region(&self) -> &str { &self.region }
    pub fn uptime(&self) -> Option<&str> { self.uptime.as_deref() }
    pub fn ping(&self) -> Option<&str> { self.ping.as_deref() }
    pub fn captured_at(&self) -> Option<&str> { self.captured_at.as_deref() }
    pub fn uptime_rank(&self) -> UptimeRank { self.uptime_rank }
}

/// Serialized shape of a node; the rank is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct NodeFields {
    region: String,
    ip: String,
    #[serde(default)]
    uptime: Option<String>,
    #[serde(default)]
    ping: Option<String>,
    #[serde(default)]
    captured_at: Option<String>,
}

impl From<NodeFields> for NodeRecord {
    fn from(f: NodeFields) -> Self {
        let node = NodeRecord::new(f.ip, f.region, f.uptime, f.ping);
        match f.captured_at {
            Some(ts) => node.captured(ts),
            None => node,
        }
    }
}

impl From<NodeRecord> for NodeFields {
    fn from(n: NodeRecord) -> Self {
        Self {
            region: n.region,
            ip: n.ip,
            uptime: n.uptime,
            ping: n.ping,
            captured_at: n.captured_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_translates_and_ranks() {
        let raw = RawRow {
            region: s!(" Japan "),
            ip: s!("1.2.3.4"),
            uptime: Some(s!("3 hours")),
            ping: Some(s!("12 ms")),
        };
        let node = NodeRecord::from_raw(raw, Some("2026-01-01 00:00:00"));
        assert_eq!(node.region(), "日本");
        assert_eq!(node.uptime_rank().minutes(), Some(180));
        assert!(node.uptime_rank().is_recent());
        assert_eq!(node.captured_at(), Some("2026-01-01 00:00:00"));
    }

    #[test]
    fn missing_uptime_is_unknown_and_not_recent() {
        let node = NodeRecord::new("1.2.3.4", "日本", None, None);
        assert_eq!(node.uptime_rank(), UptimeRank::UNKNOWN);
        assert!(!node.uptime_rank().is_recent());
    }

    #[test]
    fn json_rebuilds_rank_and_tolerates_missing_fields() {
        let node: NodeRecord =
            serde_json::from_str(r#"{"region":"日本","ip":"1.2.3.4","uptime":"2 days"}"#).unwrap();
        assert_eq!(node.uptime_rank().minutes(), Some(2880));
        assert_eq!(node.ping(), None);

        let text = serde_json::to_string(&node).unwrap();
        assert!(text.contains(r#""uptime":"2 days""#));
        assert!(!text.contains("uptime_rank"));
    }
}
