//! Connectivity indicators tracked by this crate and their World Bank codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A semantic indicator name mapped to an opaque World Bank indicator code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Indicator {
    /// Individuals using the Internet (% of population).
    InternetUsers,
    /// Mobile cellular subscriptions (per 100 people).
    MobileSubscriptions,
    /// Fixed broadband subscriptions (per 100 people).
    FixedBroadband,
}

impl Indicator {
    /// All indicators, in display order.
    pub const ALL: [Indicator; 3] = [
        Indicator::InternetUsers,
        Indicator::MobileSubscriptions,
        Indicator::FixedBroadband,
    ];

    /// External indicator code used in API paths.
    pub fn code(self) -> &'static str {
        match self {
            Indicator::InternetUsers => "IT.NET.USER.ZS",
            Indicator::MobileSubscriptions => "IT.CEL.SETS.P2",
            Indicator::FixedBroadband => "IT.NET.BBND.P2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Indicator::InternetUsers => "Internet users",
            Indicator::MobileSubscriptions => "Mobile subscriptions",
            Indicator::FixedBroadband => "Fixed broadband subscriptions",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Indicator::InternetUsers => "%",
            Indicator::MobileSubscriptions | Indicator::FixedBroadband => "per 100 people",
        }
    }

    /// Reverse lookup from an external code.
    pub fn from_code(code: &str) -> Option<Indicator> {
        Indicator::ALL
            .into_iter()
            .find(|i| i.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Codes of every tracked indicator, in display order.
    pub fn all_codes() -> Vec<String> {
        Indicator::ALL.iter().map(|i| i.code().to_string()).collect()
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.unit())
    }
}

/// Error returned when a string names no known indicator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown indicator '{0}' (expected internet, mobile, broadband or a code like IT.NET.USER.ZS)")]
pub struct UnknownIndicator(pub String);

impl FromStr for Indicator {
    type Err = UnknownIndicator;

    /// Accepts short aliases (`internet`, `mobile`, `broadband`) or raw codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "internet" | "internet-users" | "internet_users" => Ok(Indicator::InternetUsers),
            "mobile" | "mobile-subscriptions" | "mobile_subscriptions" => {
                Ok(Indicator::MobileSubscriptions)
            }
            "broadband" | "fixed-broadband" | "fixed_broadband" => Ok(Indicator::FixedBroadband),
            _ => Indicator::from_code(s).ok_or_else(|| UnknownIndicator(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_and_codes_parse() {
        assert_eq!("internet".parse::<Indicator>(), Ok(Indicator::InternetUsers));
        assert_eq!("Mobile".parse::<Indicator>(), Ok(Indicator::MobileSubscriptions));
        assert_eq!("it.net.bbnd.p2".parse::<Indicator>(), Ok(Indicator::FixedBroadband));
        assert!("gdp".parse::<Indicator>().is_err());
    }

    #[test]
    fn codes_are_distinct() {
        let codes = Indicator::all_codes();
        assert_eq!(codes, vec!["IT.NET.USER.ZS", "IT.CEL.SETS.P2", "IT.NET.BBND.P2"]);
    }
}
