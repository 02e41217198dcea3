//! Target segment - named subset of users for a broadcast.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Named subset of users used as a notification target filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSegment {
    /// Every user, premium or not.
    All,
    /// Users with an active premium entitlement.
    Premium,
    /// Users on the free tier.
    Free,
}

impl TargetSegment {
    /// Whether a user with the given premium status falls in this segment.
    pub fn includes(&self, is_premium: bool) -> bool {
        match self {
            TargetSegment::All => true,
            TargetSegment::Premium => is_premium,
            TargetSegment::Free => !is_premium,
        }
    }

    /// Returns the wire name of the segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetSegment::All => "all",
            TargetSegment::Premium => "premium",
            TargetSegment::Free => "free",
        }
    }
}

impl fmt::Display for TargetSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetSegment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TargetSegment::All),
            "premium" => Ok(TargetSegment::Premium),
            "free" => Ok(TargetSegment::Free),
            other => Err(ValidationError::invalid_value(
                "segment",
                format!("'{}' is not 'all', 'premium', or 'free'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_segment_includes_everyone() {
        assert!(TargetSegment::All.includes(true));
        assert!(TargetSegment::All.includes(false));
    }

    #[test]
    fn premium_segment_filters_on_entitlement() {
        assert!(TargetSegment::Premium.includes(true));
        assert!(!TargetSegment::Premium.includes(false));
    }

    #[test]
    fn free_segment_is_the_complement() {
        assert!(!TargetSegment::Free.includes(true));
        assert!(TargetSegment::Free.includes(false));
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("all".parse::<TargetSegment>().unwrap(), TargetSegment::All);
        assert_eq!(
            "premium".parse::<TargetSegment>().unwrap(),
            TargetSegment::Premium
        );
        assert_eq!("free".parse::<TargetSegment>().unwrap(), TargetSegment::Free);
    }

    #[test]
    fn rejects_unknown_segment_names() {
        assert!("everyone".parse::<TargetSegment>().is_err());
        assert!("".parse::<TargetSegment>().is_err());
    }
}
