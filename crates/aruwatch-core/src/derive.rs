//! Derived display/sort fields.
//!
//! Pure functions turning raw backend strings into the values the table
//! renders and sorts by. Nothing here is stored — callers recompute per
//! render, so a stale `now` can never leak into the snapshot.

use chrono::{DateTime, Duration, Utc};

/// Extract a floor number from an AP name.
///
/// Matches the literal token `LT` immediately followed by two ASCII
/// digits anywhere in the name (site convention: `AP-LT07-East` hangs on
/// floor 7). Returns `None` when no such token exists.
pub fn extract_floor(ap_name: &str) -> Option<u8> {
    let bytes = ap_name.as_bytes();
    ap_name.match_indices("LT").find_map(|(i, _)| {
        match bytes.get(i + 2..i + 4) {
            Some([a, b]) if a.is_ascii_digit() && b.is_ascii_digit() => {
                Some((a - b'0') * 10 + (b - b'0'))
            }
            _ => None,
        }
    })
}

/// Compute the wall-clock connect time from a connection age.
///
/// `duration` is colon-separated: exactly three parts are `d:h:m`, exactly
/// two are `h:m` (days = 0). Any other shape, or a non-numeric part, yields
/// `None`. Deterministic given a fixed `now`.
pub fn connected_at(duration: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = duration.split(':').collect();
    let (days, hours, minutes) = match parts.as_slice() {
        [d, h, m] => (parse_part(d)?, parse_part(h)?, parse_part(m)?),
        [h, m] => (0, parse_part(h)?, parse_part(m)?),
        _ => return None,
    };

    let total_minutes = days * 24 * 60 + hours * 60 + minutes;
    now.checked_sub_signed(Duration::minutes(total_minutes))
}

fn parse_part(part: &str) -> Option<i64> {
    // u32 parse rejects signs; ages are always non-negative.
    part.trim().parse::<u32>().ok().map(i64::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).single().expect("valid timestamp")
    }

    #[test]
    fn floor_from_lt_token() {
        assert_eq!(extract_floor("AP-LT07-East"), Some(7));
        assert_eq!(extract_floor("LT21"), Some(21));
        assert_eq!(extract_floor("fooLT33bar"), Some(33));
    }

    #[test]
    fn floor_absent_without_two_digit_token() {
        assert_eq!(extract_floor("AP-Lobby"), None);
        assert_eq!(extract_floor("LT-07"), None);
        assert_eq!(extract_floor("LT7"), None);
        assert_eq!(extract_floor(""), None);
    }

    #[test]
    fn floor_skips_partial_match_then_finds_later_token() {
        // First LT has no digits; the second one does.
        assert_eq!(extract_floor("LT-annex-LT04"), Some(4));
    }

    #[test]
    fn connected_at_three_parts() {
        // 0 days, 2 hours, 30 minutes = 150 minutes ago.
        let got = connected_at("0:02:30", now()).expect("valid duration");
        assert_eq!(now() - got, Duration::minutes(150));
    }

    #[test]
    fn connected_at_two_parts_means_zero_days() {
        let got = connected_at("2:30", now()).expect("valid duration");
        assert_eq!(now() - got, Duration::minutes(150));
    }

    #[test]
    fn connected_at_counts_days() {
        let got = connected_at("1:00:00", now()).expect("valid duration");
        assert_eq!(now() - got, Duration::days(1));
    }

    #[test]
    fn connected_at_rejects_malformed() {
        assert_eq!(connected_at("garbage", now()), None);
        assert_eq!(connected_at("5", now()), None);
        assert_eq!(connected_at("1:2:3:4", now()), None);
        assert_eq!(connected_at("-1:30", now()), None);
        assert_eq!(connected_at("", now()), None);
    }
}
