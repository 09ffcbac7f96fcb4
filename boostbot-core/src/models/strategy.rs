//! Session strategy tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The session strategy tier a handle was opened with.
///
/// Selected once from configuration; never auto-detected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Direct request/response, no challenge handling.
    Plain,
    /// HTTP with fingerprint headers and a warm-up delay.
    #[default]
    Challenge,
    /// Headless browser executing page scripts.
    Browser,
}

impl StrategyKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Plain => "Plain HTTP",
            Self::Challenge => "Challenge-aware HTTP",
            Self::Browser => "Browser",
        }
    }

    /// Returns the configuration value for this kind.
    pub fn config_name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Challenge => "challenge",
            Self::Browser => "browser",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for StrategyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "http" => Ok(Self::Plain),
            "challenge" | "challenge-aware" | "challenge_aware" => Ok(Self::Challenge),
            "browser" | "chrome" => Ok(Self::Browser),
            other => Err(CoreError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy_kind() {
        assert_eq!("plain".parse::<StrategyKind>().unwrap(), StrategyKind::Plain);
        assert_eq!(" Browser ".parse::<StrategyKind>().unwrap(), StrategyKind::Browser);
        assert_eq!(
            "challenge-aware".parse::<StrategyKind>().unwrap(),
            StrategyKind::Challenge
        );
        assert!("playwright".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_config_name_round_trips() {
        for kind in [StrategyKind::Plain, StrategyKind::Challenge, StrategyKind::Browser] {
            assert_eq!(kind.config_name().parse::<StrategyKind>().unwrap(), kind);
        }
    }
}
