// ── Client session domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aruwatch_api::RawSession;

use crate::derive;

/// Whitelist membership, as mirrored from the portal's binary sentinel.
///
/// Only changes in response to a confirmed whitelist mutation or a full
/// snapshot replacement — never speculatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whitelist {
    Included,
    Excluded,
}

impl Whitelist {
    /// The sentinel string the portal uses on the wire.
    pub fn sentinel(self) -> &'static str {
        match self {
            Self::Included => "✅",
            Self::Excluded => "❌",
        }
    }

    /// Parse the portal sentinel; anything but `"✅"` is excluded.
    pub fn from_sentinel(raw: Option<&str>) -> Self {
        if raw == Some("✅") {
            Self::Included
        } else {
            Self::Excluded
        }
    }

    pub fn is_included(self) -> bool {
        matches!(self, Self::Included)
    }
}

impl Serialize for Whitelist {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.sentinel())
    }
}

impl<'de> Deserialize<'de> for Whitelist {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_sentinel(raw.as_deref()))
    }
}

/// One associated wireless device, keyed by `ip` within a snapshot.
///
/// `hostname` is the only field mutable through this tool; everything
/// else is backend-supplied and display-only. Derived values (floor,
/// connect timestamp) are recomputed per render, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSession {
    pub ip: String,
    pub hostname: String,
    pub band: Option<String>,
    pub ssid: Option<String>,
    pub ap_name: Option<String>,
    /// Connection age as `d:h:m` or `h:m`.
    pub duration: Option<String>,
    pub health: Whitelist,
}

impl ClientSession {
    /// Floor number extracted from the AP name (`LT` + two digits).
    pub fn floor(&self) -> Option<u8> {
        self.ap_name.as_deref().and_then(derive::extract_floor)
    }

    /// Wall-clock connect time computed from `duration` and `now`.
    /// `None` means the duration was missing or malformed.
    pub fn connected_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration
            .as_deref()
            .and_then(|d| derive::connected_at(d, now))
    }

    /// SSID up to its first `/` separator (the raw value carries
    /// `essid/bssid/phy`).
    pub fn ssid_display(&self) -> Option<&str> {
        self.ssid
            .as_deref()
            .map(|s| s.split('/').next().unwrap_or(s))
    }

    /// Case-insensitive substring match against every field's string
    /// representation. An empty term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        let mut haystacks = vec![self.ip.as_str(), self.hostname.as_str()];
        haystacks.extend(self.band.as_deref());
        haystacks.extend(self.ssid.as_deref());
        haystacks.extend(self.ap_name.as_deref());
        haystacks.extend(self.duration.as_deref());
        haystacks.push(self.health.sentinel());
        haystacks
            .iter()
            .any(|h| h.to_lowercase().contains(&needle))
    }
}

impl From<RawSession> for ClientSession {
    fn from(raw: RawSession) -> Self {
        Self {
            ip: raw.ip,
            hostname: raw.hostname.unwrap_or_default(),
            band: raw.band,
            ssid: raw.ssid,
            ap_name: raw.ap_name,
            duration: raw.duration,
            health: Whitelist::from_sentinel(raw.health.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ClientSession {
        ClientSession {
            ip: "10.20.7.31".into(),
            hostname: "Alice-Laptop".into(),
            band: Some("6GHz".into()),
            ssid: Some("CorpNet/aa:bb:cc/6GHz-ax".into()),
            ap_name: Some("AP-LT07-East".into()),
            duration: Some("0:02:30".into()),
            health: Whitelist::Included,
        }
    }

    #[test]
    fn sentinel_round_trip() {
        assert_eq!(Whitelist::from_sentinel(Some("✅")), Whitelist::Included);
        assert_eq!(Whitelist::from_sentinel(Some("❌")), Whitelist::Excluded);
        assert_eq!(Whitelist::from_sentinel(None), Whitelist::Excluded);
        assert_eq!(Whitelist::Included.sentinel(), "✅");
    }

    #[test]
    fn ssid_truncates_at_first_slash() {
        assert_eq!(session().ssid_display(), Some("CorpNet"));

        let mut s = session();
        s.ssid = Some("PlainSsid".into());
        assert_eq!(s.ssid_display(), Some("PlainSsid"));
    }

    #[test]
    fn match_is_case_insensitive_across_fields() {
        let s = session();
        assert!(s.matches("ali"));
        assert!(s.matches("ALI"));
        assert!(s.matches("lt07"));
        assert!(s.matches("10.20.7"));
        assert!(s.matches(""));
        assert!(!s.matches("zz"));
    }
}
