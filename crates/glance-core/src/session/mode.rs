//! Response-length mode and question classification.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Response-length setting, fixed for the lifetime of a session.
///
/// `Short` asks for a one-to-two sentence answer and suppresses follow-up
/// derivation; `Long` asks for a structured answer and derives follow-ups.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    Short,
    #[default]
    Long,
}

impl Mode {
    /// Whether follow-up suggestions are derived after a reply.
    pub fn derives_followups(self) -> bool {
        !matches!(self, Mode::Short)
    }
}

/// Structural category of a submitted question.
///
/// Computed per submission by [`crate::prompt::classify`]; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Classification {
    /// Multiple-choice exam question.
    Mcq,
    /// Anything else: a term, concept or free-form question.
    Definitional,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_mode_parses_case_insensitive() {
        assert_eq!(Mode::from_str("short").unwrap(), Mode::Short);
        assert_eq!(Mode::from_str("LONG").unwrap(), Mode::Long);
        assert!(Mode::from_str("medium").is_err());
    }

    #[test]
    fn test_mode_defaults_to_long() {
        assert_eq!(Mode::default(), Mode::Long);
    }

    #[test]
    fn test_only_short_suppresses_followups() {
        assert!(!Mode::Short.derives_followups());
        assert!(Mode::Long.derives_followups());
    }
}
