use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{CardIdentity, ContentFingerprint, ReviewState};

/// One persisted progress entry for a user: the card, the deck fingerprint it
/// was last reviewed under, and its scheduling state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProgress {
    pub card_identity: CardIdentity,
    pub content_hash: ContentFingerprint,
    pub state: ReviewState,
}

impl StoredProgress {
    pub fn new(card_identity: CardIdentity, content_hash: ContentFingerprint, state: ReviewState) -> Self {
        Self {
            card_identity,
            content_hash,
            state,
        }
    }
}

/// Row of the `card_progress` table
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::card_progress)]
#[diesel(primary_key(user_id, card_identity))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CardProgressRow {
    pub user_id: String,
    pub card_identity: String,
    pub content_hash: String,
    pub repetitions: i32,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub last_reviewed_at: Option<NaiveDateTime>,
    pub next_review_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CardProgressRow {
    /// Builds the row for `user_id` from a progress entry
    ///
    /// ### Errors
    ///
    /// Returns an error if a counter does not fit the column type.
    pub fn from_progress(user_id: &str, progress: &StoredProgress) -> Result<Self> {
        let state = &progress.state;
        Ok(Self {
            user_id: user_id.to_string(),
            card_identity: progress.card_identity.as_str().to_string(),
            content_hash: progress.content_hash.as_str().to_string(),
            repetitions: i32::try_from(state.get_repetitions())
                .context("repetitions out of range for storage")?,
            ease_factor: state.get_ease_factor(),
            interval_days: i32::try_from(state.get_interval_days())
                .context("interval out of range for storage")?,
            last_reviewed_at: state.get_last_reviewed_at().map(|t| t.naive_utc()),
            next_review_at: state.get_next_review_at().naive_utc(),
            created_at: state.get_created_at().naive_utc(),
            updated_at: state.get_updated_at().naive_utc(),
        })
    }

    /// Converts the row back into a progress entry
    ///
    /// ### Errors
    ///
    /// Returns an error if the row holds negative counters.
    pub fn into_progress(self) -> Result<StoredProgress> {
        let repetitions = u32::try_from(self.repetitions)
            .with_context(|| format!("negative repetitions stored for card {}", self.card_identity))?;
        let interval_days = u32::try_from(self.interval_days)
            .with_context(|| format!("negative interval stored for card {}", self.card_identity))?;

        let state = ReviewState::new_with_fields(
            repetitions,
            self.ease_factor,
            interval_days,
            self.last_reviewed_at.map(utc),
            utc(self.next_review_at),
            utc(self.created_at),
            utc(self.updated_at),
        );

        Ok(StoredProgress::new(
            CardIdentity::new(self.card_identity),
            ContentFingerprint::new(self.content_hash),
            state,
        ))
    }
}

fn utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}
