use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable key for one card's question slot within a deck
///
/// Derived from the card's front text and ordinal by
/// [`crate::identity::card_identity`]. It is only ever compared, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardIdentity(String);

impl CardIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CardIdentity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CardIdentity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for CardIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hash of a deck's ordered front texts
///
/// Stored next to each progress row so a regenerated deck can be told apart
/// from the one the user actually studied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContentFingerprint {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ContentFingerprint {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for ContentFingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
