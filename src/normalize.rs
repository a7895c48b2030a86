// src/normalize.rs
//
// Field normalization for freshly scraped rows: region display names and the
// uptime ordering key.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::UptimeRank;

/// English region names as the source site prints them → display labels.
/// The only copy of this table; every layout goes through `translate_region`.
const REGIONS: &[(&str, &str)] = &[
    ("Japan", "日本"),
    ("Republic of Korea", "韩国"),
    ("United States", "美国"),
    ("United Kingdom", "英国"),
    ("Germany", "德国"),
    ("France", "法国"),
    ("Netherlands", "荷兰"),
    ("Singapore", "新加坡"),
    ("Canada", "加拿大"),
    ("Russia", "俄罗斯"),
    ("India", "印度"),
    ("Australia", "澳大利亚"),
    ("China", "中国"),
    ("Hong Kong", "中国香港"),
    ("Taiwan", "中国台湾"),
    ("Brazil", "巴西"),
    ("Vietnam", "越南"),
    ("Thailand", "泰国"),
    ("Indonesia", "印度尼西亚"),
];

/// Unit keyword → minutes multiplier, checked in this order.
const UNITS: &[(&str, u64)] = &[("day", 1440), ("hour", 60), ("min", 1), ("sec", 0)];

static FIRST_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9]+").expect("static regex"));

pub fn translate_region(text: &str) -> String {
    let name = text.trim();
    REGIONS
        .iter()
        .find(|(en, _)| *en == name)
        .map(|(_, label)| s!(*label))
        .unwrap_or_else(|| s!(name))
}

/// "60 days" → 86400, "3 hours" → 180, "5 mins" → 5, "42" → 42.
/// No digits (or a number too large to hold) → `UptimeRank::UNKNOWN`.
pub fn parse_uptime_rank(text: &str) -> UptimeRank {
    let t = text.trim().to_lowercase();

    let Some(n) = FIRST_INT.find(&t).and_then(|m| m.as_str().parse::<u64>().ok()) else {
        return UptimeRank::UNKNOWN;
    };

    match UNITS.iter().find(|(unit, _)| t.contains(unit)) {
        Some((_, factor)) => UptimeRank::new(n.saturating_mul(*factor)),
        None => UptimeRank::new(n),
    }
}
