//! SM-2 review scheduler.
//!
//! A pure state transition: `(state, quality, now) -> state`. Failures reset
//! the repetition streak to a one day interval without touching the ease
//! factor. Successes follow the fixed 1 day, 6 day ramp and then grow the
//! interval by the ease factor, which itself moves with the quality.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    INITIAL_EASE_FACTOR, Quality, ReviewButton, ReviewState, clamp_ease,
};

/// Interval after the first success, and after any failure
pub const FIRST_INTERVAL_DAYS: u32 = 1;

/// Interval after the second consecutive success
pub const SECOND_INTERVAL_DAYS: u32 = 6;

/// Upper bound on any interval (about a century), keeps due dates representable
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Computes the state that follows a review of quality `quality` at `now`
///
/// `state` is `None` for a card that has never been reviewed; it is treated as
/// zero repetitions, ease 2.5, interval 0.
pub fn schedule(state: Option<&ReviewState>, quality: Quality, now: DateTime<Utc>) -> ReviewState {
    let (repetitions, ease_factor, interval_days, created_at) = match state {
        Some(s) => (
            s.get_repetitions(),
            s.get_ease_factor(),
            s.get_interval_days(),
            s.get_created_at(),
        ),
        None => (0, INITIAL_EASE_FACTOR, 0, now),
    };

    let (repetitions, interval_days, ease_factor) = if quality.is_success() {
        let repetitions = repetitions.saturating_add(1);
        let interval_days = match repetitions {
            1 => FIRST_INTERVAL_DAYS,
            2 => SECOND_INTERVAL_DAYS,
            _ => grow_interval(interval_days, ease_factor),
        };
        (repetitions, interval_days, clamp_ease(ease_factor + ease_delta(quality)))
    } else {
        (0, FIRST_INTERVAL_DAYS, ease_factor)
    };

    ReviewState::new_with_fields(
        repetitions,
        ease_factor,
        interval_days,
        Some(now),
        now + Duration::days(i64::from(interval_days)),
        created_at,
        now,
    )
}

/// Ease adjustment for a successful review
///
/// `0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)`: +0.10 at q=5, 0.00 at q=4,
/// -0.14 at q=3.
pub fn ease_delta(quality: Quality) -> f64 {
    let miss = f64::from(Quality::MAX - quality.value());
    0.1 - miss * (0.08 + miss * 0.02)
}

fn grow_interval(previous_days: u32, ease_factor: f64) -> u32 {
    let next = (f64::from(previous_days) * ease_factor).round();
    next.min(f64::from(MAX_INTERVAL_DAYS)) as u32
}

/// What one review button would do to a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPreview {
    pub button: ReviewButton,
    pub quality: Quality,
    pub interval_days: u32,
    pub next_review_at: DateTime<Utc>,
}

/// Computes the outcome of every review button for a card at `now`
pub fn preview(state: Option<&ReviewState>, now: DateTime<Utc>) -> Vec<ReviewPreview> {
    ReviewButton::ALL
        .iter()
        .map(|&button| {
            let next = schedule(state, button.quality(), now);
            ReviewPreview {
                button,
                quality: button.quality(),
                interval_days: next.get_interval_days(),
                next_review_at: next.get_next_review_at(),
            }
        })
        .collect()
}
