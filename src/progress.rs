//! Progress store adapter.
//!
//! [`ProgressTracker`] joins the pure scheduler to a [`ProgressStore`] and
//! reconciles stored rows against the deck currently on screen. It never
//! schedules against a state it failed to load, and never hands back a state
//! it failed to persist.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::deck::Deck;
use crate::errors::ProgressError;
use crate::models::{CardIdentity, ContentFingerprint, Quality, RetentionBucket, ReviewState, StoredProgress};
use crate::scheduler::{self, ReviewPreview};
use crate::store::ProgressStore;

/// How a stored row recorded under another deck fingerprint is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintScope {
    /// Rows from a different fingerprint are ignored; the card starts over
    #[default]
    Strict,
    /// Rows are reused whatever fingerprint they were recorded under
    Card,
}

impl FingerprintScope {
    fn accepts(self, stored: &StoredProgress, current: &ContentFingerprint) -> bool {
        match self {
            FingerprintScope::Strict => &stored.content_hash == current,
            FingerprintScope::Card => true,
        }
    }
}

impl std::str::FromStr for FingerprintScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(FingerprintScope::Strict),
            "card" => Ok(FingerprintScope::Card),
            other => Err(format!("unknown fingerprint scope `{other}` (expected `strict` or `card`)")),
        }
    }
}

/// Progress of one card of a deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardProgress {
    pub card_identity: CardIdentity,
    pub ordinal: usize,
    pub front: String,
    pub bucket: RetentionBucket,
    pub due: bool,
    pub state: Option<ReviewState>,
}

/// Number of cards per bucket, plus how many are due
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub new: usize,
    pub learning: usize,
    pub review: usize,
    pub mastered: usize,
    pub due: usize,
}

impl BucketCounts {
    fn add(&mut self, card: &CardProgress) {
        match card.bucket {
            RetentionBucket::New => self.new += 1,
            RetentionBucket::Learning => self.learning += 1,
            RetentionBucket::Review => self.review += 1,
            RetentionBucket::Mastered => self.mastered += 1,
        }
        if card.due {
            self.due += 1;
        }
    }
}

/// Progress view of a whole deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckProgress {
    pub content_hash: ContentFingerprint,
    pub cards: Vec<CardProgress>,
    pub counts: BucketCounts,
}

impl DeckProgress {
    /// Due cards in study order
    ///
    /// Reviewed cards come first, most overdue first; new cards follow in deck
    /// order.
    pub fn study_queue(&self) -> Vec<&CardProgress> {
        let mut queue: Vec<&CardProgress> = self.cards.iter().filter(|c| c.due).collect();
        queue.sort_by_key(|c| match &c.state {
            Some(state) => (0, Some(state.get_next_review_at()), c.ordinal),
            None => (1, None, c.ordinal),
        });
        queue
    }
}

/// Records reviews and reports progress for decks
pub struct ProgressTracker<S> {
    store: S,
    scope: FingerprintScope,
}

impl<S: ProgressStore> ProgressTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            scope: FingerprintScope::default(),
        }
    }

    pub fn with_scope(mut self, scope: FingerprintScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn scope(&self) -> FingerprintScope {
        self.scope
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the stored states of `cards` in one bulk fetch
    ///
    /// Cards never reviewed are absent from the result.
    #[instrument(skip(self, cards), fields(cards = cards.len()))]
    pub async fn load_states(
        &self,
        user_id: &str,
        cards: &[CardIdentity],
    ) -> Result<HashMap<CardIdentity, ReviewState>, ProgressError> {
        require_non_empty("user_id", user_id)?;
        let rows = self.store.load_states(user_id, cards).await?;
        Ok(rows.into_iter().map(|(id, progress)| (id, progress.state)).collect())
    }

    /// Records a review at the current time
    pub async fn record_review(
        &self,
        user_id: &str,
        card_identity: &CardIdentity,
        content_hash: &ContentFingerprint,
        quality: Quality,
    ) -> Result<ReviewState, ProgressError> {
        self.record_review_at(user_id, card_identity, content_hash, quality, Utc::now())
            .await
    }

    /// Records a review as of `now` and returns the persisted state
    #[instrument(skip(self), fields(card = %card_identity, quality = %quality))]
    pub async fn record_review_at(
        &self,
        user_id: &str,
        card_identity: &CardIdentity,
        content_hash: &ContentFingerprint,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> Result<ReviewState, ProgressError> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("card_identity", card_identity.as_str())?;

        let previous = self.load_scoped(user_id, card_identity, content_hash).await?;
        let mut next = scheduler::schedule(previous.state.as_ref(), quality, now);
        if let Some(created_at) = previous.created_at {
            next = next.with_created_at(created_at);
        }

        let progress = StoredProgress::new(card_identity.clone(), content_hash.clone(), next);
        self.store.upsert_state(user_id, &progress).await?;

        info!(
            repetitions = progress.state.get_repetitions(),
            interval_days = progress.state.get_interval_days(),
            bucket = %progress.state.bucket(),
            "Recorded review"
        );
        Ok(progress.state)
    }

    /// Shows what each review button would do to a card, without saving
    #[instrument(skip(self), fields(card = %card_identity))]
    pub async fn preview_review(
        &self,
        user_id: &str,
        card_identity: &CardIdentity,
        content_hash: &ContentFingerprint,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReviewPreview>, ProgressError> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("card_identity", card_identity.as_str())?;

        let previous = self.load_scoped(user_id, card_identity, content_hash).await?;
        Ok(scheduler::preview(previous.state.as_ref(), now))
    }

    /// Retention bucket of a card; `None` is a card with no stored state
    pub fn get_bucket(state: Option<&ReviewState>) -> RetentionBucket {
        RetentionBucket::of(state)
    }

    /// Builds the progress view of `deck` as of `now`
    #[instrument(skip(self, deck), fields(content_hash = %deck.content_hash(), cards = deck.len()))]
    pub async fn deck_progress(
        &self,
        user_id: &str,
        deck: &Deck,
        now: DateTime<Utc>,
    ) -> Result<DeckProgress, ProgressError> {
        require_non_empty("user_id", user_id)?;

        let mut rows = self.store.load_states(user_id, &deck.identities()).await?;

        let mut counts = BucketCounts::default();
        let mut stale = 0usize;
        let cards = deck
            .cards()
            .iter()
            .map(|deck_card| {
                let state = rows.remove(&deck_card.card_identity).and_then(|row| {
                    if self.scope.accepts(&row, deck.content_hash()) {
                        Some(row.state)
                    } else {
                        stale += 1;
                        None
                    }
                });
                let card = CardProgress {
                    card_identity: deck_card.card_identity.clone(),
                    ordinal: deck_card.ordinal,
                    front: deck_card.card.front.clone(),
                    bucket: RetentionBucket::of(state.as_ref()),
                    due: state.as_ref().is_none_or(|s| s.is_due(now)),
                    state,
                };
                counts.add(&card);
                card
            })
            .collect();

        if stale > 0 {
            debug!(stale, "Ignored progress recorded under another deck fingerprint");
        }

        Ok(DeckProgress {
            content_hash: deck.content_hash().clone(),
            cards,
            counts,
        })
    }

    /// Deletes the user's progress for `cards`
    #[instrument(skip(self, cards), fields(cards = cards.len()))]
    pub async fn reset_cards(&self, user_id: &str, cards: &[CardIdentity]) -> Result<usize, ProgressError> {
        require_non_empty("user_id", user_id)?;
        let deleted = self.store.delete_states(user_id, cards).await?;
        info!(deleted, "Reset card progress");
        Ok(deleted)
    }

    /// Deletes all progress owned by the user
    #[instrument(skip(self))]
    pub async fn forget_user(&self, user_id: &str) -> Result<usize, ProgressError> {
        require_non_empty("user_id", user_id)?;
        let deleted = self.store.delete_user(user_id).await?;
        warn!(deleted, "Deleted all progress for user");
        Ok(deleted)
    }

    async fn load_scoped(
        &self,
        user_id: &str,
        card_identity: &CardIdentity,
        content_hash: &ContentFingerprint,
    ) -> Result<ScopedState, ProgressError> {
        let mut rows = self
            .store
            .load_states(user_id, std::slice::from_ref(card_identity))
            .await?;

        let Some(row) = rows.remove(card_identity) else {
            return Ok(ScopedState { state: None, created_at: None });
        };
        let created_at = Some(row.state.get_created_at());
        if self.scope.accepts(&row, content_hash) {
            Ok(ScopedState { state: Some(row.state), created_at })
        } else {
            debug!(stored = %row.content_hash, "Stored progress belongs to another deck fingerprint");
            Ok(ScopedState { state: None, created_at })
        }
    }
}

/// Stored row of one card as seen through the fingerprint scope
struct ScopedState {
    /// Absent when the card counts as new under the scope
    state: Option<ReviewState>,
    /// First write of the `(user, card)` row, kept even when `state` is discarded
    created_at: Option<DateTime<Utc>>,
}

fn require_non_empty(name: &str, value: &str) -> Result<(), ProgressError> {
    if value.trim().is_empty() {
        return Err(ProgressError::invalid(format!("{name} must not be empty")));
    }
    Ok(())
}
