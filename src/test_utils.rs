//! Shared test helpers: proptest strategies, store doubles and a test database.

use crate::db::{self, DbPool};
use crate::models::{CardIdentity, Quality, ReviewState, StoredProgress};
use crate::store::ProgressStore;
use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Sets up a test database with migrations applied
///
/// Plain ":memory:" gives each pooled connection its own separate database, so
/// a unique shared-cache URI is used instead: every connection in this pool
/// sees the same schema while staying isolated from other tests.
pub fn setup_test_db() -> Arc<DbPool> {
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_database(&database_url).expect("Failed to set up test database");
    Arc::new(pool)
}

/// A store whose backend is always down
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl ProgressStore for UnavailableStore {
    async fn load_states(
        &self,
        _user_id: &str,
        _cards: &[CardIdentity],
    ) -> anyhow::Result<HashMap<CardIdentity, StoredProgress>> {
        Err(anyhow!("connection refused"))
    }

    async fn upsert_state(&self, _user_id: &str, _progress: &StoredProgress) -> anyhow::Result<()> {
        Err(anyhow!("connection refused"))
    }

    async fn delete_states(&self, _user_id: &str, _cards: &[CardIdentity]) -> anyhow::Result<usize> {
        Err(anyhow!("connection refused"))
    }

    async fn delete_user(&self, _user_id: &str) -> anyhow::Result<usize> {
        Err(anyhow!("connection refused"))
    }
}

/// Generates an arbitrary DateTime<Utc> within 2020-01-01 to 2030-01-01
pub fn arb_datetime_utc() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..1_893_456_000i64)
        .prop_map(|ts| DateTime::from_timestamp(ts, 0).unwrap())
}

/// Generates any valid quality
pub fn arb_quality() -> impl Strategy<Value = Quality> {
    (0i32..=5).prop_map(|v| Quality::new(v).unwrap())
}

/// Generates a quality below the success threshold
pub fn arb_failing_quality() -> impl Strategy<Value = Quality> {
    (0i32..=2).prop_map(|v| Quality::new(v).unwrap())
}

/// Generates a quality at or above the success threshold
pub fn arb_successful_quality() -> impl Strategy<Value = Quality> {
    (3i32..=5).prop_map(|v| Quality::new(v).unwrap())
}

/// Generates an integer outside 0..=5
pub fn arb_invalid_quality() -> impl Strategy<Value = i32> {
    prop_oneof![
        i32::MIN..0i32,
        6i32..=i32::MAX,
    ]
}

/// Generates a reviewed card state
///
/// Ease comes from integer hundredths in [1.30, 3.50] so the floor is reachable.
pub fn arb_review_state() -> impl Strategy<Value = ReviewState> {
    (0u32..30, 130u32..=350, 0u32..=3650, arb_datetime_utc()).prop_map(
        |(repetitions, ease_hundredths, interval_days, reviewed_at)| {
            ReviewState::new_with_fields(
                repetitions,
                f64::from(ease_hundredths) / 100.0,
                interval_days,
                Some(reviewed_at),
                reviewed_at + Duration::days(i64::from(interval_days)),
                reviewed_at,
                reviewed_at,
            )
        },
    )
}

/// Generates either no state (a new card) or a reviewed state
pub fn arb_optional_review_state() -> impl Strategy<Value = Option<ReviewState>> {
    prop_oneof![
        Just(None),
        arb_review_state().prop_map(Some),
    ]
}

/// Generates front text, including unicode and awkward whitespace
pub fn arb_front_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9 ?]{1,40}",
        "\\PC{1,40}",
        Just("  padded  ".to_string()),
        Just("日本語の質問".to_string()),
    ]
}

/// Generates an ordered list of front texts
pub fn arb_front_texts() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_front_text(), 0..12)
}

/// Generates strings with padding, punctuation and unicode
pub fn arb_messy_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9_./:]{0,30}",
        "\\PC{0,30}",
        Just(String::new()),
        Just("  spaced  out  ".to_string()),
    ]
}
