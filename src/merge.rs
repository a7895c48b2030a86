// src/merge.rs
//
// Fresh-over-prior accumulation. `fresh ++ prior`, first occurrence of each
// identity wins, so the current run shadows history and history that isn't
// shadowed is kept.

use std::collections::HashSet;

use crate::types::NodeRecord;

/// What makes two nodes "the same" during merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DedupKey {
    /// Every displayed field: ip, region, uptime, ping. With the basic
    /// layout this is exactly the rendered line.
    #[default]
    Record,
    /// The IP alone.
    Ip,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Identity {
    Ip(String),
    Record(String, String, Option<String>, Option<String>),
}

impl DedupKey {
    fn identity(self, node: &NodeRecord) -> Identity {
        match self {
            DedupKey::Ip => Identity::Ip(s!(node.ip())),
            DedupKey::Record => Identity::Record(
                s!(node.ip()),
                s!(node.region()),
                node.uptime().map(String::from),
                node.ping().map(String::from),
            ),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Merged {
    pub nodes: Vec<NodeRecord>,
    pub fresh: usize,
    pub prior: usize,
    pub duplicates: usize,
}

pub fn merge(fresh: Vec<NodeRecord>, prior: Vec<NodeRecord>, key: DedupKey) -> Merged {
    let (n_fresh, n_prior) = (fresh.len(), prior.len());

    let mut seen = HashSet::with_capacity(n_fresh + n_prior);
    let mut nodes = Vec::with_capacity(n_fresh + n_prior);
    for node in fresh.into_iter().chain(prior) {
        if seen.insert(key.identity(&node)) {
            nodes.push(node);
        }
    }

    let duplicates = n_fresh + n_prior - nodes.len();
    logf!("Merged {n_fresh} fresh + {n_prior} prior → {} ({duplicates} duplicates)", nodes.len());

    Merged { nodes, fresh: n_fresh, prior: n_prior, duplicates }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(ip: &str, region: &str) -> NodeRecord {
        NodeRecord::new(ip, region, None, None)
    }

    fn ips(m: &Merged) -> Vec<&str> {
        m.nodes.iter().map(|n| n.ip()).collect()
    }

    #[test]
    fn fresh_first_then_unshadowed_history() {
        let fresh = vec![node("1.1.1.1", "日本"), node("2.2.2.2", "美国")];
        let prior = vec![node("3.3.3.3", "德国"), node("1.1.1.1", "日本")];
        let m = merge(fresh, prior, DedupKey::Record);
        assert_eq!(ips(&m), vec!["1.1.1.1", "2.2.2.2", "3.3.3.3"]);
        assert_eq!((m.fresh, m.prior, m.duplicates), (2, 2, 1));
    }

    #[test]
    fn merging_a_set_with_itself_does_not_grow() {
        let set = vec![node("1.1.1.1", "日本"), node("2.2.2.2", "美国")];
        let m = merge(set.clone(), set.clone(), DedupKey::Record);
        assert_eq!(m.nodes, set);
    }

    #[test]
    fn fresh_wins_on_same_key() {
        let fresh = vec![NodeRecord::new("1.1.1.1", "日本", Some(s!("5 mins")), Some(s!("3 ms")))];
        let prior = vec![NodeRecord::new("1.1.1.1", "日本", Some(s!("60 days")), Some(s!("9 ms")))];
        let m = merge(fresh.clone(), prior, DedupKey::Ip);
        assert_eq!(m.nodes, fresh);
    }

    #[test]
    fn record_key_ignores_capture_time() {
        let fresh = vec![node("1.1.1.1", "日本").captured("2026-10-19 00:00:00")];
        let prior = vec![node("1.1.1.1", "日本")];
        let m = merge(fresh.clone(), prior, DedupKey::Record);
        assert_eq!(m.nodes, fresh);
    }

    #[test]
    fn record_key_keeps_region_changes_apart() {
        let fresh = vec![node("1.1.1.1", "日本")];
        let prior = vec![node("1.1.1.1", "Japan")];
        assert_eq!(merge(fresh.clone(), prior.clone(), DedupKey::Record).nodes.len(), 2);
        assert_eq!(merge(fresh, prior, DedupKey::Ip).nodes.len(), 1);
    }

    #[test]
    fn duplicates_inside_fresh_collapse_too() {
        let fresh = vec![node("1.1.1.1", "日本"), node("1.1.1.1", "日本")];
        let m = merge(fresh, Vec::new(), DedupKey::Record);
        assert_eq!(m.nodes.len(), 1);
    }

    #[test]
    fn both_empty_is_empty() {
        let m = merge(Vec::new(), Vec::new(), DedupKey::Ip);
        assert!(m.nodes.is_empty());
        assert_eq!(m.duplicates, 0);
    }
}
