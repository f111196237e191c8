//! Filter/sort engine.
//!
//! Pure transformation of a snapshot into the rendered view order. The
//! store owns the data; this module never mutates it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::ClientSession;

/// Which column the view is ordered by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
    #[default]
    Hostname,
    Floor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Current sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header-click semantics: selecting the current key flips direction,
    /// selecting a new key resets to ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            let direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
            Self { key, direction }
        } else {
            Self {
                key,
                direction: SortDirection::Ascending,
            }
        }
    }
}

/// Retain rows where any field contains `term` (case-insensitive).
pub fn filter(rows: &[Arc<ClientSession>], term: &str) -> Vec<Arc<ClientSession>> {
    rows.iter()
        .filter(|s| s.matches(term))
        .map(Arc::clone)
        .collect()
}

/// Stable-sort rows by the configured key; ties keep their input order.
pub fn sort(rows: &mut [Arc<ClientSession>], config: SortConfig) {
    rows.sort_by(|a, b| {
        let ord = match config.key {
            SortKey::Hostname => a
                .hostname
                .to_lowercase()
                .cmp(&b.hostname.to_lowercase()),
            // Sessions with no extractable floor sort as floor 0.
            SortKey::Floor => a.floor().unwrap_or(0).cmp(&b.floor().unwrap_or(0)),
        };
        match config.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Filter then sort — the full snapshot-to-view pipeline.
pub fn apply(rows: &[Arc<ClientSession>], term: &str, config: SortConfig) -> Vec<Arc<ClientSession>> {
    let mut view = filter(rows, term);
    sort(&mut view, config);
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Whitelist;

    fn session(ip: &str, hostname: &str, ap: Option<&str>) -> Arc<ClientSession> {
        Arc::new(ClientSession {
            ip: ip.into(),
            hostname: hostname.into(),
            band: None,
            ssid: None,
            ap_name: ap.map(Into::into),
            duration: None,
            health: Whitelist::Excluded,
        })
    }

    fn fixture() -> Vec<Arc<ClientSession>> {
        vec![
            session("10.0.0.1", "Alice", Some("AP-LT07-East")),
            session("10.0.0.2", "bob", Some("AP-LT03-West")),
            session("10.0.0.3", "Carol", Some("AP-Lobby")),
        ]
    }

    #[test]
    fn filter_mixed_case_substring() {
        let rows = fixture();
        let hit = filter(&rows, "aLi");
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].hostname, "Alice");

        assert!(filter(&rows, "zz").is_empty());
        assert_eq!(filter(&rows, "").len(), 3);
    }

    #[test]
    fn sort_by_hostname_ignores_case() {
        let mut rows = fixture();
        sort(&mut rows, SortConfig::new(SortKey::Hostname, SortDirection::Ascending));
        let names: Vec<_> = rows.iter().map(|s| s.hostname.as_str()).collect();
        assert_eq!(names, ["Alice", "bob", "Carol"]);
    }

    #[test]
    fn sort_by_floor_treats_absent_as_zero() {
        let mut rows = fixture();
        sort(&mut rows, SortConfig::new(SortKey::Floor, SortDirection::Ascending));
        let ips: Vec<_> = rows.iter().map(|s| s.ip.as_str()).collect();
        // Carol has no LT token, so she sorts first as floor 0.
        assert_eq!(ips, ["10.0.0.3", "10.0.0.2", "10.0.0.1"]);
    }

    #[test]
    fn descending_flips_order() {
        let mut rows = fixture();
        sort(&mut rows, SortConfig::new(SortKey::Floor, SortDirection::Descending));
        let ips: Vec<_> = rows.iter().map(|s| s.ip.as_str()).collect();
        assert_eq!(ips, ["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    }

    #[test]
    fn toggle_same_key_flips_direction() {
        let cfg = SortConfig::default();
        let flipped = cfg.toggle(SortKey::Hostname);
        assert_eq!(flipped.direction, SortDirection::Descending);
        let back = flipped.toggle(SortKey::Hostname);
        assert_eq!(back.direction, SortDirection::Ascending);
    }

    #[test]
    fn toggle_new_key_resets_to_ascending() {
        let cfg = SortConfig::default().toggle(SortKey::Hostname); // now descending
        let switched = cfg.toggle(SortKey::Floor);
        assert_eq!(switched.key, SortKey::Floor);
        assert_eq!(switched.direction, SortDirection::Ascending);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut rows = vec![
            session("10.0.0.1", "same", Some("AP-Lobby")),
            session("10.0.0.2", "same", Some("AP-Annex")),
        ];
        sort(&mut rows, SortConfig::new(SortKey::Hostname, SortDirection::Ascending));
        let ips: Vec<_> = rows.iter().map(|s| s.ip.as_str()).collect();
        assert_eq!(ips, ["10.0.0.1", "10.0.0.2"]);
    }
}
