use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ProgressError;

/// A self-reported recall quality between 0 and 5
///
/// Values below [`Quality::SUCCESS_THRESHOLD`] count as a failed review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 5;
    pub const SUCCESS_THRESHOLD: u8 = 3;

    /// Creates a quality signal
    ///
    /// ### Errors
    ///
    /// Returns `InvalidArgument` when `value` is outside 0..=5.
    pub fn new(value: i32) -> Result<Self, ProgressError> {
        if !(Self::MIN as i32..=Self::MAX as i32).contains(&value) {
            return Err(ProgressError::invalid(format!(
                "Quality must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )));
        }
        Ok(Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 >= Self::SUCCESS_THRESHOLD
    }
}

impl TryFrom<i32> for Quality {
    type Error = ProgressError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

impl<'de> Deserialize<'de> for Quality {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i32::deserialize(deserializer)?;
        Quality::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The review buttons shown under a revealed card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewButton {
    Again,
    Hard,
    Good,
    Easy,
}

impl ReviewButton {
    pub const ALL: [ReviewButton; 4] = [
        ReviewButton::Again,
        ReviewButton::Hard,
        ReviewButton::Good,
        ReviewButton::Easy,
    ];

    pub fn quality(self) -> Quality {
        match self {
            ReviewButton::Again => Quality(0),
            ReviewButton::Hard => Quality(2),
            ReviewButton::Good => Quality(3),
            ReviewButton::Easy => Quality(5),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewButton::Again => "again",
            ReviewButton::Hard => "hard",
            ReviewButton::Good => "good",
            ReviewButton::Easy => "easy",
        }
    }
}
