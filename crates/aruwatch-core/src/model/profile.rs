// ── Network profile enumeration ──
//
// The portal polls one Aruba AAA profile at a time. The set is fixed
// external configuration; operators know the friendly labels, the
// backend knows the `*_aaa_prof` identifiers. Both spellings parse.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// One of the fixed wireless network profiles the portal can serve.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum NetworkProfile {
    #[strum(to_string = "Spatium", serialize = "IDM_aaa_prof")]
    Spatium,
    #[strum(to_string = "iSaku", serialize = "ISAKU_aaa_prof")]
    ISaku,
    #[strum(to_string = "K5", serialize = "K5_aaa_prof")]
    K5,
    #[strum(to_string = "Guest", serialize = "GUEST_aaa_prof")]
    Guest,
    #[strum(to_string = "Support", serialize = "SUPPORT_aaa_prof")]
    Support,
    #[strum(to_string = "A5", serialize = "A5_aaa_prof")]
    A5,
}

impl NetworkProfile {
    /// The backend identifier sent as the `profile` query parameter.
    pub fn profile_id(self) -> &'static str {
        match self {
            Self::Spatium => "IDM_aaa_prof",
            Self::ISaku => "ISAKU_aaa_prof",
            Self::K5 => "K5_aaa_prof",
            Self::Guest => "GUEST_aaa_prof",
            Self::Support => "SUPPORT_aaa_prof",
            Self::A5 => "A5_aaa_prof",
        }
    }

    /// The operator-facing label shown in listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Spatium => "Spatium",
            Self::ISaku => "iSaku",
            Self::K5 => "K5",
            Self::Guest => "Guest",
            Self::Support => "Support",
            Self::A5 => "A5",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_label_and_backend_id() {
        assert_eq!(
            NetworkProfile::from_str("spatium").ok(),
            Some(NetworkProfile::Spatium)
        );
        assert_eq!(
            NetworkProfile::from_str("IDM_aaa_prof").ok(),
            Some(NetworkProfile::Spatium)
        );
        assert_eq!(
            NetworkProfile::from_str("guest").ok(),
            Some(NetworkProfile::Guest)
        );
        assert!(NetworkProfile::from_str("office").is_err());
    }

    #[test]
    fn every_profile_has_an_aaa_identifier() {
        for p in NetworkProfile::iter() {
            assert!(p.profile_id().ends_with("_aaa_prof"), "{p:?}");
        }
    }
}
