use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Initial ease factor of a card that has never been reviewed
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Lowest ease factor a card can reach
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Interval (in days) from which a card counts as mastered
pub const MASTERED_INTERVAL_DAYS: u32 = 21;

/// Scheduling state of one card for one user
///
/// A state only exists once the user has reviewed the card. Cards without a
/// state are new; see [`RetentionBucket::of`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawReviewState")]
pub struct ReviewState {
    /// Consecutive successful reviews
    repetitions: u32,

    /// Multiplier applied to the interval on each later success
    ease_factor: f64,

    /// Days between `last_reviewed_at` and `next_review_at`
    interval_days: u32,

    last_reviewed_at: Option<DateTime<Utc>>,

    next_review_at: DateTime<Utc>,

    created_at: DateTime<Utc>,

    updated_at: DateTime<Utc>,
}

impl ReviewState {
    /// Creates a state with all fields specified
    ///
    /// An ease factor below [`MIN_EASE_FACTOR`] (or NaN) is raised to the floor.
    pub fn new_with_fields(
        repetitions: u32,
        ease_factor: f64,
        interval_days: u32,
        last_reviewed_at: Option<DateTime<Utc>>,
        next_review_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            repetitions,
            ease_factor: clamp_ease(ease_factor),
            interval_days,
            last_reviewed_at,
            next_review_at,
            created_at,
            updated_at,
        }
    }

    pub fn get_repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn get_ease_factor(&self) -> f64 {
        self.ease_factor
    }

    pub fn get_interval_days(&self) -> u32 {
        self.interval_days
    }

    pub fn get_last_reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed_at
    }

    pub fn get_next_review_at(&self) -> DateTime<Utc> {
        self.next_review_at
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Same state with `created_at` replaced
    pub(crate) fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Whether the card should be shown again at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_review_at
    }

    /// Retention bucket of this state
    pub fn bucket(&self) -> RetentionBucket {
        RetentionBucket::of(Some(self))
    }
}

/// Wire shape of a [`ReviewState`]; decoding goes through `new_with_fields`
#[derive(Deserialize)]
struct RawReviewState {
    repetitions: u32,
    ease_factor: f64,
    interval_days: u32,
    #[serde(default)]
    last_reviewed_at: Option<DateTime<Utc>>,
    next_review_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RawReviewState> for ReviewState {
    fn from(raw: RawReviewState) -> Self {
        ReviewState::new_with_fields(
            raw.repetitions,
            raw.ease_factor,
            raw.interval_days,
            raw.last_reviewed_at,
            raw.next_review_at,
            raw.created_at,
            raw.updated_at,
        )
    }
}

pub(crate) fn clamp_ease(ease_factor: f64) -> f64 {
    if ease_factor.is_nan() {
        return MIN_EASE_FACTOR;
    }
    ease_factor.max(MIN_EASE_FACTOR)
}

/// Coarse display label derived from a [`ReviewState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionBucket {
    New,
    Learning,
    Review,
    Mastered,
}

impl RetentionBucket {
    /// Computes the bucket for a card; `None` means the card has no stored state
    pub fn of(state: Option<&ReviewState>) -> Self {
        let Some(state) = state else {
            return RetentionBucket::New;
        };

        if state.repetitions == 0 && state.last_reviewed_at.is_none() {
            RetentionBucket::New
        } else if state.repetitions < 2 {
            RetentionBucket::Learning
        } else if state.interval_days >= MASTERED_INTERVAL_DAYS {
            RetentionBucket::Mastered
        } else {
            RetentionBucket::Review
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RetentionBucket::New => "new",
            RetentionBucket::Learning => "learning",
            RetentionBucket::Review => "review",
            RetentionBucket::Mastered => "mastered",
        }
    }
}

impl fmt::Display for RetentionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    fn state(repetitions: u32, interval_days: u32, reviewed: bool) -> ReviewState {
        let last = reviewed.then(|| at(1));
        ReviewState::new_with_fields(
            repetitions,
            INITIAL_EASE_FACTOR,
            interval_days,
            last,
            at(1) + Duration::days(interval_days as i64),
            at(1),
            at(1),
        )
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(RetentionBucket::of(None), RetentionBucket::New);
        assert_eq!(state(0, 0, false).bucket(), RetentionBucket::New);
        assert_eq!(state(0, 1, true).bucket(), RetentionBucket::Learning);
        assert_eq!(state(1, 1, true).bucket(), RetentionBucket::Learning);
        assert_eq!(state(2, 6, true).bucket(), RetentionBucket::Review);
        assert_eq!(state(4, 20, true).bucket(), RetentionBucket::Review);
        assert_eq!(state(4, 21, true).bucket(), RetentionBucket::Mastered);
        assert_eq!(state(5, 30, true).bucket(), RetentionBucket::Mastered);
    }

    #[test]
    fn test_is_due_is_inclusive() {
        let s = state(1, 1, true);
        assert!(!s.is_due(at(1)));
        assert!(s.is_due(at(2)));
        assert!(s.is_due(at(3)));
    }

    #[test]
    fn test_new_with_fields_clamps_ease() {
        let s = ReviewState::new_with_fields(1, 0.5, 1, Some(at(1)), at(2), at(1), at(1));
        assert_eq!(s.get_ease_factor(), MIN_EASE_FACTOR);

        let s = ReviewState::new_with_fields(1, f64::NAN, 1, Some(at(1)), at(2), at(1), at(1));
        assert_eq!(s.get_ease_factor(), MIN_EASE_FACTOR);
    }

    #[test]
    fn test_deserialize_clamps_ease() {
        let json = serde_json::json!({
            "repetitions": 3,
            "ease_factor": 0.5,
            "interval_days": 10,
            "last_reviewed_at": at(1),
            "next_review_at": at(11),
            "created_at": at(1),
            "updated_at": at(1),
        });

        let s: ReviewState = serde_json::from_value(json).unwrap();
        assert_eq!(s.get_ease_factor(), MIN_EASE_FACTOR);
        assert_eq!(s.get_interval_days(), 10);
    }

    #[test]
    fn test_serde_keeps_valid_state() {
        let s = state(2, 6, true);
        let json = serde_json::to_value(&s).unwrap();
        let back: ReviewState = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_bucket_serializes_lowercase() {
        let json = serde_json::to_string(&RetentionBucket::Mastered).unwrap();
        assert_eq!(json, "\"mastered\"");
        assert_eq!(RetentionBucket::Learning.to_string(), "learning");
    }
}
