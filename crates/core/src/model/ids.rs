use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Stable identifier for a Challenge.
///
/// The same string keys the validator's rule table and the persisted
/// progress records, so it must never change once a catalog ships.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(String);

impl ChallengeId {
    /// Creates a new `ChallengeId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChallengeId({})", self.0)
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChallengeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ChallengeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for ChallengeId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ChallengeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Error type for parsing an ID from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse ChallengeId from {:?}", self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for ChallengeId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(ParseIdError { raw: s.to_string() });
        }
        Ok(Self::new(trimmed))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_id_display() {
        let id = ChallengeId::new("send-xrp");
        assert_eq!(id.to_string(), "send-xrp");
    }

    #[test]
    fn test_challenge_id_from_str_trims() {
        let id: ChallengeId = "  escrow ".parse().unwrap();
        assert_eq!(id, ChallengeId::new("escrow"));
    }

    #[test]
    fn test_challenge_id_from_str_rejects_blank_and_spaces() {
        assert!("   ".parse::<ChallengeId>().is_err());
        assert!("two words".parse::<ChallengeId>().is_err());
    }

    #[test]
    fn test_challenge_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ChallengeId::new("wallet")).unwrap();
        assert_eq!(json, "\"wallet\"");
    }
}
